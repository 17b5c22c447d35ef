//! Output formatting and styling module.
//!
//! Everything the user sees on the terminal goes through here: one line per
//! processed entry, a progress bar while a run is going, and the summary table
//! at the end.

use crate::outcome::{EntryOutcome, RunObserver, RunOutcome};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Styled one-off messages.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` entries.
    ///
    /// The bar hides itself when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table with file counts by category.
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }

    /// Prints the closing summary of a run.
    pub fn run_summary(outcome: &RunOutcome) {
        let summary = outcome.summary();
        if summary.relocated > 0 {
            Self::summary_table(&outcome.category_counts(), summary.relocated);
        }

        println!();
        if outcome.simulate {
            Self::dry_run_notice(&format!(
                "{} {} would be moved, {} {} would be created.",
                summary.relocated,
                plural(summary.relocated),
                summary.directories_created,
                folders(summary.directories_created)
            ));
        } else {
            Self::success(&format!(
                "{} {} moved, {} {} created.",
                summary.relocated,
                plural(summary.relocated),
                summary.directories_created,
                folders(summary.directories_created)
            ));
        }

        if summary.failed > 0 {
            Self::warning(&format!(
                "{} {} could not be organized:",
                summary.failed,
                plural(summary.failed)
            ));
            for failure in outcome.failures() {
                if let EntryOutcome::Failed { name, reason } = failure {
                    Self::error(&format!("{}: {}", name, reason));
                }
            }
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

fn folders(count: usize) -> &'static str {
    if count == 1 { "folder" } else { "folders" }
}

/// Prints one line per processed entry, in the order entries are handled.
pub struct ConsoleReporter {
    quiet: bool,
    show_progress: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            show_progress: true,
            progress: None,
        }
    }

    /// Disables the progress bar.
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Renders the line shown for an outcome, if any.
    pub fn format_line(outcome: &EntryOutcome) -> Option<String> {
        match outcome {
            EntryOutcome::Moved {
                original_name,
                destination,
                ..
            } => {
                let renamed = destination
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy() != original_name.as_str());
                if renamed {
                    Some(format!(
                        "Moved: {} -> {}",
                        original_name,
                        destination.display()
                    ))
                } else {
                    Some(format!("Moved: {}", original_name))
                }
            }
            EntryOutcome::WouldMove {
                original_name,
                target_dir,
                final_name,
                ..
            } => {
                let mut line = format!(
                    "[DRY-RUN] Would move: {} -> {}",
                    original_name,
                    target_dir.display()
                );
                if final_name != original_name {
                    line.push_str(&format!(" (as {})", final_name));
                }
                Some(line)
            }
            EntryOutcome::Failed { name, reason } => Some(format!("{}: {}", name, reason)),
            EntryOutcome::SkippedNotAFile { .. } | EntryOutcome::SkippedExcluded { .. } => None,
        }
    }

    fn emit(&self, print: impl FnOnce()) {
        match &self.progress {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }
}

impl RunObserver for ConsoleReporter {
    fn run_started(&mut self, root: &Path, total: usize, simulate: bool) {
        if simulate {
            OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", root.display()));
        } else {
            OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));
        }
        if self.show_progress && total > 0 {
            self.progress = Some(OutputFormatter::create_progress_bar(total as u64));
        }
    }

    fn directory_created(&mut self, path: &Path, simulate: bool) {
        if self.quiet {
            return;
        }
        let line = if simulate {
            format!("[DRY-RUN] Would create folder: {}", path.display())
        } else {
            format!("Created folder: {}", path.display())
        };
        self.emit(|| println!("{}", line.dimmed()));
    }

    fn entry_processed(&mut self, outcome: &EntryOutcome) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        let Some(line) = Self::format_line(outcome) else {
            return;
        };
        match outcome {
            EntryOutcome::Failed { .. } => self.emit(|| OutputFormatter::error(&line)),
            EntryOutcome::WouldMove { .. } if !self.quiet => {
                self.emit(|| println!("{}", line.yellow()))
            }
            _ if !self.quiet => self.emit(|| println!("{}", line)),
            _ => {}
        }
    }

    fn run_finished(&mut self, _outcome: &RunOutcome) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }
}
