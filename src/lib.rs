//! typesort - sort a folder's files into extension-named subdirectories
//!
//! This library classifies the files directly inside a folder by extension,
//! picks a destination name that never overwrites an existing file, and moves
//! each file into its category directory. Runs can be simulated, every event
//! can be observed, and significant events are written to an append-only
//! audit log.

pub mod audit;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod organizer;
pub mod outcome;
pub mod output;
pub mod planner;
pub mod resolver;

pub use audit::AuditLog;
pub use classifier::{Category, SourceEntry, classify};
pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use error::{OrganizeError, OrganizeResult};
pub use organizer::{Organizer, run};
pub use outcome::{EntryOutcome, RunObserver, RunOutcome, RunSummary};
pub use planner::{RelocationPlan, plan};
pub use resolver::resolve_unique_name;

pub use cli::{Cli, CliError, run_cli};
