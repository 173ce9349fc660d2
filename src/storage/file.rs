use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::instrument;

use crate::{storage::text, Database, ParseError};

/// The database file used when no path is given.
pub const DEFAULT_PATH: &str = "extensions_db.textpb";

/// Reads a database from a text-format file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid text-format
/// database.
#[instrument]
pub fn load(path: &Path) -> Result<Database, LoadError> {
    let content = fs::read_to_string(path)?;
    let database = text::decode(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(versions = database.versions().len(), "loaded database");
    Ok(database)
}

/// Writes a database to a text-format file, replacing its contents.
///
/// The text is written to a temporary file alongside the target, which is
/// then renamed over it. The target is either left untouched or replaced
/// whole. If `path` is a symlink, the file it points to is replaced and the
/// link is kept.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or
/// if it cannot be moved into place.
#[instrument(skip(database))]
pub fn save(path: &Path, database: &Database) -> io::Result<()> {
    let content = text::encode(database);

    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };

    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    if let Ok(metadata) = fs::metadata(&target) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(&target)?;

    tracing::debug!(
        versions = database.versions().len(),
        bytes = content.len(),
        "saved database"
    );
    Ok(())
}

/// Errors that can occur when loading the database file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read database file")]
    Io(#[from] io::Error),

    /// The file is not a valid text-format database.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// Where and why parsing failed.
        source: ParseError,
    },
}
