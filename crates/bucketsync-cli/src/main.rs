//! bucketsync CLI - one-way sync of a local directory into an S3 bucket
//!
//! Provides commands for:
//! - Uploading every file under a directory to `s3://bucket/prefix`
//! - Excluding files by regular expression
//! - Moving instead of copying (`--delete-source`)
//! - Dry runs that only log the planned uploads

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bucketsync_core::config::Config;
use bucketsync_s3::credentials::Keys;
use bucketsync_sync::SyncError;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod location;
mod output;

use commands::sync::{RunContext, SyncCommand};
use location::LocationError;
use output::get_formatter;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_INVALID: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "bucketsync",
    version,
    about = "One-way sync of a local directory into an S3 bucket"
)]
pub struct Cli {
    /// AWS access key (overrides the environment)
    #[arg(long, global = true, value_name = "KEY")]
    aws_access_key: Option<String>,

    /// AWS secret key (overrides the environment)
    #[arg(long, global = true, value_name = "SECRET")]
    aws_secret_key: Option<String>,

    /// AWS session token
    #[arg(long, global = true, value_name = "TOKEN")]
    aws_token: Option<String>,

    /// Dry run: log what would be uploaded without writing or deleting (implies -v)
    #[arg(short = 'd', long = "dry-run", global = true)]
    dry_run: bool,

    /// Log each file's source and destination
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output the summary in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Do not print the end-of-run summary
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a local directory tree to s3://bucket/prefix
    Sync(SyncCommand),
}

impl Cli {
    fn keys(&self) -> Keys {
        let keys = Keys::new(
            self.aws_access_key.clone().unwrap_or_default(),
            self.aws_secret_key.clone().unwrap_or_default(),
        );
        match &self.aws_token {
            Some(token) => keys.with_token(token.clone()),
            None => keys,
        }
    }
}

/// Exit code for an argument parsing failure
fn parse_error_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        ErrorKind::MissingSubcommand
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => EXIT_FAILURE,
        _ => EXIT_INVALID,
    }
}

/// Exit code for an error returned by a command
fn error_exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<LocationError>().is_some() {
        return EXIT_INVALID;
    }
    if err
        .downcast_ref::<bucketsync_core::domain::DomainError>()
        .is_some()
    {
        return EXIT_INVALID;
    }
    match err.downcast_ref::<SyncError>() {
        Some(SyncError::Domain(_)) => EXIT_INVALID,
        _ => EXIT_FAILURE,
    }
}

/// Loads `--config` if given, otherwise the default file when it exists
fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => {
            let default = Config::default_path();
            if !default.exists() {
                return Ok(Config::default());
            }
            default
        }
    };
    Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))
}

fn init_tracing(verbose: bool, level: &str) {
    let default_level = if verbose { "info" } else { level };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            debug!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                debug!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), finishing current upload");
        }
        _ = terminate => {
            info!("Received SIGTERM, finishing current upload");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_exit_code(e.kind()));
        }
    };

    let formatter = get_formatter(cli.json);
    let verbose = cli.verbose || cli.dry_run;

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(verbose, "warn");
            formatter.error(&format!("{e:#}"));
            return ExitCode::from(EXIT_INVALID);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        init_tracing(verbose, "warn");
        for error in &errors {
            formatter.error(&format!("Invalid configuration: {error}"));
        }
        return ExitCode::from(EXIT_INVALID);
    }

    init_tracing(verbose, &config.logging.level);

    if cli.aws_access_key.is_some() != cli.aws_secret_key.is_some() {
        formatter.warn("--aws-access-key and --aws-secret-key must be given together; ignoring them");
    }

    let ctx = RunContext {
        config,
        keys: cli.keys(),
        dry_run: cli.dry_run,
        verbose,
    };

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let result = match &cli.command {
        Commands::Sync(cmd) => cmd.execute(&ctx, cancel).await,
    };

    match result {
        Ok(report) => {
            if !cli.quiet {
                formatter.report(&report, ctx.dry_run);
            }
            if report.cancelled {
                ExitCode::from(EXIT_CANCELLED)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            }
        }
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            ExitCode::from(error_exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse_code(args: &[&str]) -> u8 {
        match Cli::try_parse_from(args) {
            Ok(_) => EXIT_SUCCESS,
            Err(e) => parse_error_exit_code(e.kind()),
        }
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        assert_eq!(parse_code(&["bucketsync", "--help"]), 0);
        assert_eq!(parse_code(&["bucketsync", "--version"]), 0);
    }

    #[test]
    fn test_missing_command_or_args_exit_one() {
        assert_eq!(parse_code(&["bucketsync"]), 1);
        assert_eq!(parse_code(&["bucketsync", "sync"]), 1);
        assert_eq!(parse_code(&["bucketsync", "sync", "/src"]), 1);
    }

    #[test]
    fn test_bad_arguments_exit_two() {
        assert_eq!(parse_code(&["bucketsync", "--bogus", "sync", "/a", "s3://b"]), 2);
        assert_eq!(
            parse_code(&["bucketsync", "sync", "--exclude", "[", "/a", "s3://b"]),
            2
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bucketsync",
            "sync",
            "-d",
            "--aws-access-key",
            "AKIA",
            "--aws-secret-key",
            "s",
            "/src",
            "s3://b/p",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.keys(), Keys::new("AKIA", "s"));
    }

    #[test]
    fn test_error_exit_codes() {
        let location: anyhow::Error = LocationError::MissingBucket("s3:///x".into()).into();
        assert_eq!(error_exit_code(&location), EXIT_INVALID);

        let source: anyhow::Error = SyncError::SourceAccess {
            path: PathBuf::from("/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
        .into();
        assert_eq!(error_exit_code(&source), EXIT_FAILURE);
    }

    #[test]
    fn test_load_config_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/bucketsync.yaml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_load_config_explicit_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"pipeline:\n  queue_capacity: 3\n").unwrap();
        tmp.flush().unwrap();

        let config = load_config(Some(&tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.pipeline.queue_capacity, 3);
    }
}
