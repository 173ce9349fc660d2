use std::collections::BTreeSet;

use crate::domain::{compute_new_version, SdkLevel, SdkModule};

/// A module's minimum version at some extension SDK level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// The module the requirement applies to.
    pub module: SdkModule,
    /// The minimum version of the module.
    pub version: SdkLevel,
}

impl Requirement {
    /// Creates a new requirement.
    #[must_use]
    pub const fn new(module: SdkModule, version: SdkLevel) -> Self {
        Self { module, version }
    }
}

/// An extension SDK level and the module versions it requires.
///
/// A version holds at most one requirement per module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionVersion {
    /// The SDK level.
    pub version: SdkLevel,
    /// The requirements of this level.
    pub requirements: Vec<Requirement>,
}

impl ExtensionVersion {
    /// Creates a new extension version.
    #[must_use]
    pub const fn new(version: SdkLevel, requirements: Vec<Requirement>) -> Self {
        Self {
            version,
            requirements,
        }
    }

    /// Returns the required version of the given module, if this level
    /// mentions it.
    #[must_use]
    pub fn requirement(&self, module: SdkModule) -> Option<SdkLevel> {
        self.requirements
            .iter()
            .find(|requirement| requirement.module == module)
            .map(|requirement| requirement.version)
    }
}

/// The extension SDK database.
///
/// An ordered sequence of extension versions. The storage order is the order
/// versions were loaded or appended in, and need not be numeric.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Database {
    versions: Vec<ExtensionVersion>,
}

impl Database {
    /// Creates a database from versions in storage order.
    #[must_use]
    pub const fn new(versions: Vec<ExtensionVersion>) -> Self {
        Self { versions }
    }

    /// Returns the versions in storage order.
    #[must_use]
    pub fn versions(&self) -> &[ExtensionVersion] {
        &self.versions
    }

    /// Returns the first stored version with the given level.
    #[must_use]
    pub fn version(&self, level: SdkLevel) -> Option<&ExtensionVersion> {
        self.versions.iter().find(|version| version.version == level)
    }

    /// Returns true if any stored version has the given level.
    #[must_use]
    pub fn contains(&self, level: SdkLevel) -> bool {
        self.version(level).is_some()
    }

    /// Returns the highest-numbered version.
    #[must_use]
    pub fn latest(&self) -> Option<&ExtensionVersion> {
        self.versions.iter().max_by_key(|version| version.version)
    }

    /// Appends a version to the end of the database.
    ///
    /// No check is made for a version with the same level; see
    /// [`Database::new_sdk`] for the checked variant.
    pub fn append_version(&mut self, version: ExtensionVersion) {
        self.versions.push(version);
    }

    /// Returns every module mentioned by any version.
    #[must_use]
    pub fn modules_referenced(&self) -> BTreeSet<SdkModule> {
        self.versions
            .iter()
            .flat_map(|version| &version.requirements)
            .map(|requirement| requirement.module)
            .collect()
    }

    /// Creates a new extension SDK level.
    ///
    /// The new level carries forward every requirement recorded so far and
    /// raises the given modules to the new level. The result is appended to
    /// the database and returned.
    ///
    /// # Errors
    ///
    /// Returns [`NewSdkError::DuplicateVersion`] if the database already has
    /// a version with this level. The database is left unchanged.
    pub fn new_sdk(
        &mut self,
        level: SdkLevel,
        modules: &[SdkModule],
    ) -> Result<&ExtensionVersion, NewSdkError> {
        if self.contains(level) {
            return Err(NewSdkError::DuplicateVersion(level));
        }

        let version = compute_new_version(self, level, modules);
        tracing::debug!(
            level = %level,
            requirements = version.requirements.len(),
            "computed new extension version"
        );
        let index = self.versions.len();
        self.append_version(version);

        Ok(&self.versions[index])
    }
}

/// Errors that can occur when creating a new extension SDK level.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NewSdkError {
    /// The database already has a version with this level.
    #[error("Extension SDK level {0} already exists")]
    DuplicateVersion(SdkLevel),
}
