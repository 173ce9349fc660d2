use std::path::PathBuf;

#[cfg(feature = "new-sdk")]
mod new_sdk;
mod print_binary;

use anyhow::Context;
use clap::ArgAction;
use gen_sdk::storage;
#[cfg(feature = "new-sdk")]
use gen_sdk::{SdkLevel, SdkModule};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// The existing text-proto database to use
    #[arg(long, value_name = "PATH", default_value = storage::file::DEFAULT_PATH)]
    database: PathBuf,

    /// Which action to take
    #[arg(long, value_enum)]
    action: Action,

    /// The extension SDK level to create
    #[cfg(feature = "new-sdk")]
    #[arg(long, value_name = "SDK", required_if_eq("action", "new_sdk"))]
    sdk: Option<SdkLevel>,

    /// Comma-separated list of modules providing new APIs
    #[cfg(feature = "new-sdk")]
    #[arg(
        long,
        value_name = "MODULES",
        value_delimiter = ',',
        required_if_eq("action", "new_sdk")
    )]
    modules: Vec<SdkModule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Action {
    /// Print the binary representation of the database to stdout
    #[value(name = "print_binary")]
    PrintBinary,

    /// Create a new extension SDK level and save the database
    #[cfg(feature = "new-sdk")]
    #[value(name = "new_sdk")]
    NewSdk,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let database = storage::load(&self.database)
            .with_context(|| format!("failed to load {}", self.database.display()))?;

        match self.action {
            Action::PrintBinary => print_binary::run(&database)?,
            #[cfg(feature = "new-sdk")]
            Action::NewSdk => {
                let sdk = self
                    .sdk
                    .context("--sdk is required for action new_sdk")?;
                new_sdk::run(database, &self.database, sdk, &self.modules)?;
            }
        }
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the binary database, so logs go to stderr
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Parser};

    use super::*;

    #[test]
    fn print_binary_uses_default_database() {
        let cli = Cli::try_parse_from(["gen_sdk", "--action", "print_binary"]).unwrap();
        assert_eq!(cli.action, Action::PrintBinary);
        assert_eq!(cli.database, PathBuf::from("extensions_db.textpb"));
    }

    #[test]
    fn action_is_required() {
        let err = Cli::try_parse_from(["gen_sdk"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = Cli::try_parse_from(["gen_sdk", "--action", "print-binary"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["gen_sdk", "-vv", "--action", "print_binary"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[cfg(feature = "new-sdk")]
    #[test]
    fn new_sdk_parses_modules_in_order() {
        let cli = Cli::try_parse_from([
            "gen_sdk",
            "--database",
            "db.textpb",
            "--action",
            "new_sdk",
            "--sdk",
            "4",
            "--modules",
            "TETHERING,IPSEC",
        ])
        .unwrap();

        assert_eq!(cli.action, Action::NewSdk);
        assert_eq!(cli.database, PathBuf::from("db.textpb"));
        assert_eq!(cli.sdk, Some(SdkLevel::new(4).unwrap()));
        assert_eq!(cli.modules, vec![SdkModule::Tethering, SdkModule::Ipsec]);
    }

    #[cfg(feature = "new-sdk")]
    #[test]
    fn new_sdk_requires_sdk_and_modules() {
        let err = Cli::try_parse_from(["gen_sdk", "--action", "new_sdk", "--modules", "IPSEC"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err =
            Cli::try_parse_from(["gen_sdk", "--action", "new_sdk", "--sdk", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[cfg(feature = "new-sdk")]
    #[test]
    fn unknown_module_is_rejected() {
        let err = Cli::try_parse_from([
            "gen_sdk",
            "--action",
            "new_sdk",
            "--sdk",
            "1",
            "--modules",
            "IPSEC,BOGUS",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[cfg(feature = "new-sdk")]
    #[test]
    fn negative_sdk_is_rejected() {
        let err = Cli::try_parse_from([
            "gen_sdk",
            "--action",
            "new_sdk",
            "--sdk=-1",
            "--modules",
            "IPSEC",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[cfg(not(feature = "new-sdk"))]
    #[test]
    fn new_sdk_is_not_available() {
        let err = Cli::try_parse_from(["gen_sdk", "--action", "new_sdk"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
