//! Hand-written protobuf messages for the extension database.
//!
//! Uses prost derive macros for encoding without prost-build. Field numbers
//! match the `sdk.proto` schema that downstream readers are generated from.

use prost::Message;

use crate::domain::{Database, ExtensionVersion, Requirement, SdkLevel};

#[derive(Clone, PartialEq, Eq, Message)]
struct ProtoExtensionDatabase {
    #[prost(message, repeated, tag = "1")]
    versions: Vec<ProtoExtensionVersion>,
}

#[derive(Clone, PartialEq, Eq, Message)]
struct ProtoExtensionVersion {
    #[prost(int32, tag = "1")]
    version: i32,
    #[prost(message, repeated, tag = "2")]
    requirements: Vec<ProtoModuleRequirement>,
}

#[derive(Clone, PartialEq, Eq, Message)]
struct ProtoModuleRequirement {
    /// `SdkModule` enumeration value.
    #[prost(int32, tag = "1")]
    module: i32,
    #[prost(message, optional, tag = "2")]
    version: Option<ProtoSdkVersion>,
}

#[derive(Clone, PartialEq, Eq, Message)]
struct ProtoSdkVersion {
    #[prost(int32, tag = "1")]
    version: i32,
}

impl From<&Database> for ProtoExtensionDatabase {
    fn from(database: &Database) -> Self {
        Self {
            versions: database.versions().iter().map(Into::into).collect(),
        }
    }
}

impl From<&ExtensionVersion> for ProtoExtensionVersion {
    fn from(version: &ExtensionVersion) -> Self {
        Self {
            version: version.version.get(),
            requirements: version.requirements.iter().map(Into::into).collect(),
        }
    }
}

impl From<&Requirement> for ProtoModuleRequirement {
    fn from(requirement: &Requirement) -> Self {
        Self {
            module: requirement.module.code(),
            version: Some(requirement.version.into()),
        }
    }
}

impl From<SdkLevel> for ProtoSdkVersion {
    fn from(level: SdkLevel) -> Self {
        Self {
            version: level.get(),
        }
    }
}

/// Encodes the whole database in protobuf wire format.
///
/// Versions and requirements are written in storage order.
#[must_use]
pub fn encode(database: &Database) -> Vec<u8> {
    ProtoExtensionDatabase::from(database).encode_to_vec()
}
