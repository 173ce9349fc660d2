use std::io::{self, Write};

use anyhow::Context;
use gen_sdk::{storage::binary, Database};
use tracing::instrument;

/// Writes the wire-format encoding of the database to stdout.
#[instrument(skip_all)]
pub fn run(database: &Database) -> anyhow::Result<()> {
    let bytes = binary::encode(database);
    tracing::info!(bytes = bytes.len(), "writing binary database");

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .context("failed to write to stdout")
}
