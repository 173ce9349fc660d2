//! Command line tool for managing the extension SDK database.
//!
//! ```text
//! # Print a binary representation of the database.
//! $ gen_sdk --action print_binary
//!
//! # Create a new extension SDK level.
//! $ gen_sdk --action new_sdk --sdk 1 --modules IPSEC,SDK_EXTENSIONS
//! ```

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
