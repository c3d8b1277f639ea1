//! CLI argument definitions for `dhis2-utils`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dhis2_import::Stage;
use dhis2_uid::DEFAULT_UID_LENGTH;

#[derive(Parser)]
#[command(
    name = "dhis2-utils",
    version,
    about = "Utilities for DHIS2 - UID generation and TB data seeding",
    long_about = "Utilities for working with a DHIS2 instance.\n\n\
                  Generates DHIS2 compatible UIDs and seeds an instance with\n\
                  org units, data elements and data values from the WHO TB\n\
                  burden estimates."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate DHIS2 compatible codes (UIDs).
    Uid(UidArgs),

    /// Seed a DHIS2 instance with the TB burden estimates.
    Seed(SeedArgs),
}

#[derive(Parser)]
pub struct UidArgs {
    /// Number of UIDs to generate.
    #[arg(short = 'l', long = "limit", default_value_t = 10)]
    pub limit: usize,

    /// Output in JSON format.
    #[arg(long = "json")]
    pub json: bool,

    /// Output in CSV format.
    #[arg(long = "csv")]
    pub csv: bool,

    /// Length of each UID.
    #[arg(long = "length", default_value_t = DEFAULT_UID_LENGTH)]
    pub length: usize,

    /// Seed for reproducible output (default: non-deterministic).
    #[arg(long = "seed")]
    pub seed: Option<u32>,
}

#[derive(Parser)]
pub struct SeedArgs {
    /// Server configuration with `server`, `username` and `password`.
    #[arg(long = "config", value_name = "PATH", default_value = "config.json")]
    pub config: PathBuf,

    /// Org unit tree to seed instead of the built-in one.
    #[arg(long = "org-units", value_name = "PATH")]
    pub org_units: Option<PathBuf>,

    /// Stage to start from; earlier stages are skipped.
    #[arg(long = "from-stage", value_enum, default_value = "seed-org-units")]
    pub from_stage: StageArg,
}

/// Pipeline stages selectable on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum StageArg {
    SeedOrgUnits,
    ReassignRootUser,
    ImportDataElements,
    ImportDataValues,
}

impl From<StageArg> for Stage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::SeedOrgUnits => Stage::SeedOrgUnits,
            StageArg::ReassignRootUser => Stage::ReassignRootUser,
            StageArg::ImportDataElements => Stage::ImportDataElements,
            StageArg::ImportDataValues => Stage::ImportDataValues,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_uid_defaults() {
        let cli = Cli::try_parse_from(["dhis2-utils", "uid"]).unwrap();
        match cli.command {
            Some(Command::Uid(args)) => {
                assert_eq!(args.limit, 10);
                assert_eq!(args.length, 11);
                assert!(!args.json && !args.csv);
                assert_eq!(args.seed, None);
            }
            _ => panic!("expected uid command"),
        }
    }

    #[test]
    fn test_uid_flags() {
        let cli =
            Cli::try_parse_from(["dhis2-utils", "uid", "-l", "3", "--json", "--seed", "7"])
                .unwrap();
        match cli.command {
            Some(Command::Uid(args)) => {
                assert_eq!(args.limit, 3);
                assert!(args.json);
                assert_eq!(args.seed, Some(7));
            }
            _ => panic!("expected uid command"),
        }
    }

    #[test]
    fn test_seed_args() {
        let cli = Cli::try_parse_from([
            "dhis2-utils",
            "seed",
            "--config",
            "prod.json",
            "--from-stage",
            "import-data-values",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Seed(args)) => {
                assert_eq!(args.config, PathBuf::from("prod.json"));
                assert_eq!(Stage::from(args.from_stage), Stage::ImportDataValues);
                assert!(args.org_units.is_none());
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::try_parse_from(["dhis2-utils"]).unwrap();
        assert!(cli.command.is_none());
    }
}
