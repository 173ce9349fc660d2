//! Extension SDK Database
//!
//! The database records, for every extension SDK level, the minimum version
//! of each module that the level requires. It is persisted as protobuf text
//! and consumed downstream in protobuf wire format.

pub mod domain;
pub use domain::{
    compute_new_version, Database, ExtensionVersion, InvalidLevelError, NewSdkError, Requirement,
    SdkLevel, SdkModule, UnknownModuleError,
};

/// Text and binary encodings of the database, and the database file.
pub mod storage;
pub use storage::{LoadError, ParseError};
