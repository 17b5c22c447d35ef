//! Append-only audit log.
//!
//! Every line carries a local timestamp followed by the event text:
//!
//! ```text
//! 2026-10-17 14:30:52,118 - Created folder: /home/me/Downloads/PDF
//! 2026-10-17 14:30:52,119 - Moved: report.pdf -> /home/me/Downloads/PDF/report.pdf
//! ```

use crate::error::{OrganizeError, OrganizeResult};
use crate::outcome::{EntryOutcome, RunObserver, RunOutcome};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// A text file that only ever grows.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    /// Opens `path` for appending, creating it when missing.
    pub fn open(path: &Path) -> OrganizeResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| OrganizeError::AuditLogUnavailable {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Appends one timestamped line.
    ///
    /// A failed write is logged and otherwise ignored; the audit trail never
    /// stops a run.
    pub fn record(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        if let Err(e) = writeln!(self.file, "{} - {}", timestamp, message) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write audit log");
        }
    }
}

impl RunObserver for AuditLog {
    fn directory_created(&mut self, path: &Path, simulate: bool) {
        if simulate {
            self.record(&format!("[DRY-RUN] Would create folder: {}", path.display()));
        } else {
            self.record(&format!("Created folder: {}", path.display()));
        }
    }

    fn entry_processed(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Moved {
                original_name,
                destination,
                ..
            } => self.record(&format!("Moved: {} -> {}", original_name, destination.display())),
            EntryOutcome::Failed { name, reason } => {
                self.record(&format!("Failed: {}: {}", name, reason))
            }
            _ => {}
        }
    }

    fn run_finished(&mut self, outcome: &RunOutcome) {
        let summary = outcome.summary();
        let verb = if outcome.simulate { "would move" } else { "moved" };
        self.record(&format!(
            "File organizer finished: {} {}, {} folders, {} failed",
            summary.relocated, verb, summary.directories_created, summary.failed
        ));
    }
}
