//! Domain models for the extension SDK database.
//!
//! This module contains the module catalog, SDK levels, the database of
//! extension versions, and the requirement accumulator that derives a new
//! version from the history.

/// The closed catalog of modules that can appear in the database.
pub mod module;
pub use module::{SdkModule, UnknownModuleError};

mod level;
pub use level::{InvalidLevelError, SdkLevel};

/// Extension versions and the database that holds them.
pub mod database;
pub use database::{Database, ExtensionVersion, NewSdkError, Requirement};

mod accumulator;
pub use accumulator::compute_new_version;
