//! `dhis2-utils` command line tool.

use clap::{ColorChoice, CommandFactory, Parser};
use dhis2_cli::logging::{LogConfig, LogFormat, init_logging};
use dhis2_import::ExitClass;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_seed, run_uid};
use crate::summary::print_seed_summary;

/// Exit code when a request could not be made or completed.
const EXIT_REQUEST_FAILED: i32 = 1;
/// Exit code when the server's answer is not the expected one.
const EXIT_RESULT_REJECTED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        None => {
            if let Err(error) = Cli::command().print_help() {
                eprintln!("error: {error}");
            }
            0
        }
        Some(Command::Uid(args)) => match run_uid(&args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Some(Command::Seed(args)) => match run_seed(&args) {
            Ok(report) => {
                print_seed_summary(&report);
                0
            }
            Err(error) => {
                eprintln!("error: {error}");
                match error.exit_class() {
                    ExitClass::RequestFailed => EXIT_REQUEST_FAILED,
                    ExitClass::ResultRejected => EXIT_RESULT_REJECTED,
                }
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
///
/// `--log-level` beats `-v`/`-q`, and either one disables `RUST_LOG`. Log
/// files get timestamps and no colors unless `--color always` is given.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };

    LogConfig::default()
        .with_level_filter(level_filter)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_ansi(with_ansi)
        .with_timestamps(cli.log_file.is_some())
        .with_log_file(cli.log_file.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(args: &[&str]) -> LogConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        log_config_from_cli(&cli)
    }

    #[test]
    fn test_defaults_follow_env() {
        let config = config_for(&["dhis2-utils", "uid"]);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(!config.with_timestamps);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_level_beats_verbosity() {
        let config = config_for(&["dhis2-utils", "-vv", "--log-level", "error", "uid"]);
        assert_eq!(config.level_filter, LevelFilter::ERROR);
        assert!(!config.use_env_filter);

        let config = config_for(&["dhis2-utils", "-v", "uid"]);
        assert_eq!(config.level_filter, LevelFilter::INFO);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn test_log_file_gets_timestamps_without_color() {
        let config = config_for(&[
            "dhis2-utils",
            "--log-file",
            "seed.log",
            "--log-format",
            "compact",
            "seed",
        ]);
        assert_eq!(config.log_file, Some(std::path::PathBuf::from("seed.log")));
        assert!(config.with_timestamps);
        assert!(!config.with_ansi);
        assert_eq!(config.format, LogFormat::Compact);
    }
}
