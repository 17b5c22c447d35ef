//! Command-line interface module for typesort.
//!
//! This module handles:
//! - Argument parsing
//! - Merging arguments with the configuration file
//! - Wiring the console reporter and audit log into a run

use crate::audit::AuditLog;
use crate::config::{ConfigError, OrganizerConfig};
use crate::error::OrganizeError;
use crate::organizer::Organizer;
use crate::outcome::{Fanout, RunOutcome};
use crate::output::{ConsoleReporter, OutputFormatter};
use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sort the files of a folder into subdirectories named after their extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "typesort", version, about)]
pub struct Cli {
    /// Folder to organize (defaults to `organizer.root` from the config file)
    pub path: Option<PathBuf>,

    /// Show what would be moved without touching anything
    #[arg(long, conflicts_with = "execute")]
    pub dry_run: bool,

    /// Move files even if the config file asks for a dry run
    #[arg(long)]
    pub execute: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Audit log file (defaults to `organizer.log`)
    #[arg(long, value_name = "FILE", conflicts_with = "no_log")]
    pub log_file: Option<PathBuf>,

    /// Do not write an audit log
    #[arg(long)]
    pub no_log: bool,

    /// Print the run outcome as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Only print failures and the summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase diagnostic logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors that stop the CLI before or during a run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("No folder to organize: pass a path or set `organizer.root` in the config file")]
    MissingRoot,

    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Settings for one run after merging arguments and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub root: PathBuf,
    pub simulate: bool,
    pub log_file: Option<PathBuf>,
}

impl RunSettings {
    /// Command-line arguments win over the configuration file.
    pub fn resolve(cli: &Cli, config: &OrganizerConfig) -> Result<Self, CliError> {
        let root = cli
            .path
            .clone()
            .or_else(|| config.organizer.root.clone())
            .ok_or(CliError::MissingRoot)?;

        let simulate = if cli.dry_run {
            true
        } else if cli.execute {
            false
        } else {
            config.organizer.dry_run
        };

        let log_file = if cli.no_log {
            None
        } else {
            Some(
                cli.log_file
                    .clone()
                    .unwrap_or_else(|| config.organizer.log_file.clone()),
            )
        };

        Ok(Self {
            root,
            simulate,
            log_file,
        })
    }
}

/// Runs the CLI application.
///
/// Returns the outcome of the run; entry-level failures are part of it rather
/// than an error.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use typesort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["typesort", "/path/to/directory", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(outcome) => println!("{} entries processed", outcome.entries.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunOutcome, CliError> {
    let config = OrganizerConfig::load(cli.config.as_deref())?;
    let filters = config.compile_filters()?;
    let settings = RunSettings::resolve(cli, &config)?;

    let mut audit = match settings.log_file.as_deref() {
        Some(path) if settings.simulate && sits_in(path, &settings.root) => {
            tracing::info!(
                path = %path.display(),
                "audit log lives in the folder being simulated, not writing it"
            );
            None
        }
        Some(path) => Some(AuditLog::open(path)?),
        None => None,
    };
    if let Some(log) = audit.as_mut() {
        log.record("File organizer started");
    }

    let mut organizer = Organizer::new(&settings.root)
        .simulate(settings.simulate)
        .with_filters(filters);
    if let Some(path) = &settings.log_file {
        organizer = organizer.protect(path);
    }
    if let Some(source) = &config.source {
        organizer = organizer.protect(source);
    }

    let mut reporter = ConsoleReporter::new(cli.quiet || cli.json);
    if cli.json {
        reporter = reporter.without_progress();
    }

    let result = {
        let mut observers = Fanout::new();
        if !cli.json {
            observers.push(&mut reporter);
        }
        if let Some(log) = audit.as_mut() {
            observers.push(log);
        }
        organizer.run(&mut observers)
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(log) = audit.as_mut() {
                log.record(&e.to_string());
            }
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        OutputFormatter::run_summary(&outcome);
        if outcome.simulate {
            println!(
                "Run 'typesort {} --execute' to move the files.",
                settings.root.display()
            );
        }
    }

    Ok(outcome)
}

/// Whether `path` names an entry directly inside `dir`.
fn sits_in(path: &Path, dir: &Path) -> bool {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), fs::canonicalize(dir)) {
        (Ok(parent), Ok(dir)) => parent == dir,
        _ => false,
    }
}

/// Default tracing filter for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
