use std::path::Path;

use anyhow::Context;
use gen_sdk::{storage, Database, SdkLevel, SdkModule};
use tracing::instrument;

/// Creates a new extension SDK level and writes the database back.
///
/// The database file is only written once the new level has been computed.
#[instrument(skip(database))]
pub fn run(
    mut database: Database,
    path: &Path,
    sdk: SdkLevel,
    modules: &[SdkModule],
) -> anyhow::Result<()> {
    let created = database.new_sdk(sdk, modules)?;
    tracing::info!(
        level = %created.version,
        requirements = created.requirements.len(),
        "created extension version"
    );

    println!(
        "Created a new extension SDK level {sdk} with modules {}",
        module_names(modules)
    );

    storage::save(path, &database)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Joins module names with commas, keeping the given order.
fn module_names(modules: &[SdkModule]) -> String {
    modules
        .iter()
        .map(|module| module.name())
        .collect::<Vec<_>>()
        .join(",")
}
