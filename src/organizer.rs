//! The organizer run loop.
//!
//! One run lists the root folder once, then handles its entries one at a time:
//! classify, plan, and (unless simulating) create the category directory and
//! move the file. A failure on one entry is recorded and the loop moves on.

use crate::classifier::SourceEntry;
use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};
use crate::outcome::{EntryOutcome, RunObserver, RunOutcome};
use crate::planner::{RelocationPlan, plan};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Organizes one folder.
///
/// # Examples
///
/// ```no_run
/// use typesort::Organizer;
///
/// let outcome = Organizer::new("/home/me/Downloads")
///     .simulate(true)
///     .run(&mut ())
///     .expect("organize failed");
/// println!("{} files would move", outcome.summary().relocated);
/// ```
#[derive(Debug, Clone)]
pub struct Organizer {
    root: PathBuf,
    simulate: bool,
    filters: CompiledFilters,
    protected: Vec<PathBuf>,
}

impl Organizer {
    /// Creates an organizer for `root` in execute mode with no exclusions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            simulate: false,
            filters: CompiledFilters::default(),
            protected: Vec::new(),
        }
    }

    /// Only report what would happen.
    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Never relocate `path`, even if it sits in the root.
    pub fn protect(mut self, path: &Path) -> Self {
        self.protected.push(normalize(path));
        self
    }

    /// Runs the organizer, reporting each event to `observer`.
    ///
    /// # Errors
    ///
    /// Fails only when the root is missing, not a directory, or cannot be
    /// listed. Entry-level problems end up as [`EntryOutcome::Failed`].
    pub fn run(&self, observer: &mut dyn RunObserver) -> OrganizeResult<RunOutcome> {
        self.check_root()?;

        let listing: Vec<_> = fs::read_dir(&self.root)
            .map_err(|e| OrganizeError::ReadDirFailed {
                path: self.root.clone(),
                source: e,
            })?
            .collect();

        info!(
            root = %self.root.display(),
            entries = listing.len(),
            simulate = self.simulate,
            "organizing folder"
        );
        observer.run_started(&self.root, listing.len(), self.simulate);

        let mut outcome = RunOutcome::new(self.root.clone(), self.simulate);
        // Directories a simulated run would have created, reported once each.
        let mut pending_dirs: HashSet<PathBuf> = HashSet::new();

        for item in listing {
            let entry = item
                .map_err(|e| OrganizeError::EntryUnreadable {
                    dir: self.root.clone(),
                    source: e,
                })
                .and_then(|dir_entry| SourceEntry::from_dir_entry(&dir_entry));

            let result = match entry {
                Ok(entry) => self.process(&entry, &mut outcome, &mut pending_dirs, observer),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    EntryOutcome::Failed {
                        name: unreadable_name(&e),
                        reason: e.to_string(),
                    }
                }
            };

            observer.entry_processed(&result);
            outcome.entries.push(result);
        }

        let summary = outcome.summary();
        info!(
            relocated = summary.relocated,
            directories = summary.directories_created,
            failed = summary.failed,
            "run finished"
        );
        observer.run_finished(&outcome);
        Ok(outcome)
    }

    fn check_root(&self) -> OrganizeResult<()> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(OrganizeError::RootNotADirectory {
                path: self.root.clone(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OrganizeError::RootNotFound {
                    path: self.root.clone(),
                })
            }
            Err(e) => Err(OrganizeError::ReadDirFailed {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    fn process(
        &self,
        entry: &SourceEntry,
        outcome: &mut RunOutcome,
        pending_dirs: &mut HashSet<PathBuf>,
        observer: &mut dyn RunObserver,
    ) -> EntryOutcome {
        if self.is_protected(&entry.path) || !self.filters.should_include(&entry.name) {
            debug!(name = %entry.name, "excluded");
            return EntryOutcome::SkippedExcluded {
                name: entry.name.clone(),
            };
        }

        let Some(plan) = plan(entry, &self.root) else {
            debug!(name = %entry.name, "not a regular file");
            return EntryOutcome::SkippedNotAFile {
                name: entry.name.clone(),
            };
        };

        if self.simulate {
            if plan.target_dir_missing && pending_dirs.insert(plan.target_dir.clone()) {
                observer.directory_created(&plan.target_dir, true);
                outcome.directories_created.push(plan.target_dir.clone());
            }
            return EntryOutcome::WouldMove {
                original_name: plan.original_name,
                category: plan.category,
                target_dir: plan.target_dir,
                final_name: plan.final_name,
            };
        }

        match self.relocate(&plan, outcome, observer) {
            Ok(destination) => EntryOutcome::Moved {
                original_name: plan.original_name,
                category: plan.category,
                destination,
            },
            Err(e) => {
                warn!(name = %plan.original_name, error = %e, "relocation failed");
                EntryOutcome::Failed {
                    name: plan.original_name,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn relocate(
        &self,
        plan: &RelocationPlan,
        outcome: &mut RunOutcome,
        observer: &mut dyn RunObserver,
    ) -> OrganizeResult<PathBuf> {
        if plan.target_dir_missing && plan.create_target_dir()? {
            debug!(path = %plan.target_dir.display(), "created category directory");
            observer.directory_created(&plan.target_dir, false);
            outcome.directories_created.push(plan.target_dir.clone());
        }

        let destination = plan.execute()?;
        if plan.is_renamed() {
            info!(
                name = %plan.original_name,
                renamed = %plan.final_name,
                "destination name taken, renamed"
            );
        }
        Ok(destination)
    }

    fn is_protected(&self, path: &Path) -> bool {
        if self.protected.is_empty() {
            return false;
        }
        let path = normalize(path);
        self.protected.iter().any(|p| *p == path)
    }
}

/// Organizes `root` with default settings.
///
/// Shorthand for `Organizer::new(root).simulate(simulate).run(&mut ())`.
pub fn run(root: &Path, simulate: bool) -> OrganizeResult<RunOutcome> {
    Organizer::new(root).simulate(simulate).run(&mut ())
}

/// Canonical form of `path` when it exists, the path itself otherwise.
fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn unreadable_name(error: &OrganizeError) -> String {
    match error {
        OrganizeError::NonUtf8Name { path }
        | OrganizeError::EntryInspectionFailed { path, .. } => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        _ => String::from("<unreadable entry>"),
    }
}
