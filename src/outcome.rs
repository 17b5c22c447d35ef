//! Per-entry results of a run and the observer hook used to report them.

use crate::classifier::Category;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What happened to one entry of the root folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum EntryOutcome {
    /// The file was moved.
    Moved {
        original_name: String,
        category: Category,
        destination: PathBuf,
    },
    /// The file would be moved (simulate mode).
    WouldMove {
        original_name: String,
        category: Category,
        target_dir: PathBuf,
        final_name: String,
    },
    /// The entry is not a regular file.
    SkippedNotAFile { name: String },
    /// The entry matched an exclusion rule or is one of the tool's own files.
    SkippedExcluded { name: String },
    /// The entry could not be relocated.
    Failed { name: String, reason: String },
}

impl EntryOutcome {
    /// Name of the entry in the root folder.
    pub fn name(&self) -> &str {
        match self {
            Self::Moved { original_name, .. } | Self::WouldMove { original_name, .. } => {
                original_name
            }
            Self::SkippedNotAFile { name }
            | Self::SkippedExcluded { name }
            | Self::Failed { name, .. } => name,
        }
    }

    /// True for `Moved` and `WouldMove`.
    pub fn is_relocation(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::WouldMove { .. })
    }

    /// Category of a relocated entry.
    pub fn category(&self) -> Option<&Category> {
        match self {
            Self::Moved { category, .. } | Self::WouldMove { category, .. } => Some(category),
            _ => None,
        }
    }
}

/// Everything recorded during one run, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Folder that was organized.
    pub root: PathBuf,
    /// Whether the run was simulated.
    pub simulate: bool,
    /// One result per enumerated entry.
    pub entries: Vec<EntryOutcome>,
    /// Category directories created, or that would be created when simulating.
    pub directories_created: Vec<PathBuf>,
}

/// Counts derived from a [`RunOutcome`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Entries moved, or that would be moved.
    pub relocated: usize,
    /// Directories created, or that would be created.
    pub directories_created: usize,
    /// Entries that failed.
    pub failed: usize,
    /// Entries left alone on purpose.
    pub skipped: usize,
}

impl RunOutcome {
    pub fn new(root: PathBuf, simulate: bool) -> Self {
        Self {
            root,
            simulate,
            entries: Vec::new(),
            directories_created: Vec::new(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            directories_created: self.directories_created.len(),
            ..RunSummary::default()
        };
        for entry in &self.entries {
            match entry {
                EntryOutcome::Moved { .. } | EntryOutcome::WouldMove { .. } => {
                    summary.relocated += 1
                }
                EntryOutcome::SkippedNotAFile { .. } | EntryOutcome::SkippedExcluded { .. } => {
                    summary.skipped += 1
                }
                EntryOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Number of relocated entries per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for category in self.entries.iter().filter_map(EntryOutcome::category) {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Entries that failed, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Failed { .. }))
    }
}

/// Receives run events as they happen.
///
/// All methods default to doing nothing, so implementors only pick the events
/// they care about.
pub trait RunObserver {
    /// The root listing is complete and `total` entries are about to be processed.
    fn run_started(&mut self, _root: &Path, _total: usize, _simulate: bool) {}

    /// A category directory was created (or would be, when simulating).
    fn directory_created(&mut self, _path: &Path, _simulate: bool) {}

    /// One entry has been processed.
    fn entry_processed(&mut self, _outcome: &EntryOutcome) {}

    /// All entries have been processed.
    fn run_finished(&mut self, _outcome: &RunOutcome) {}
}

/// Observer that ignores every event.
impl RunObserver for () {}

/// Forwards every event to several observers in order.
#[derive(Default)]
pub struct Fanout<'a> {
    observers: Vec<&'a mut dyn RunObserver>,
}

impl<'a> Fanout<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: &'a mut dyn RunObserver) {
        self.observers.push(observer);
    }
}

impl RunObserver for Fanout<'_> {
    fn run_started(&mut self, root: &Path, total: usize, simulate: bool) {
        for observer in &mut self.observers {
            observer.run_started(root, total, simulate);
        }
    }

    fn directory_created(&mut self, path: &Path, simulate: bool) {
        for observer in &mut self.observers {
            observer.directory_created(path, simulate);
        }
    }

    fn entry_processed(&mut self, outcome: &EntryOutcome) {
        for observer in &mut self.observers {
            observer.entry_processed(outcome);
        }
    }

    fn run_finished(&mut self, outcome: &RunOutcome) {
        for observer in &mut self.observers {
            observer.run_finished(outcome);
        }
    }
}
