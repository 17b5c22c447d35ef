//! Collision-free destination names.
//!
//! When `report.pdf` already exists in the destination, the resolver hands
//! out `report_1.pdf`, then `report_2.pdf`, and so on. The probe only looks at
//! what is on disk at the moment of the call.

use crate::classifier::split_extension;
use std::fs;
use std::path::Path;

/// Whether anything (file, directory, or dangling symlink) sits at `path`.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns a name for `desired_name` that is free inside `destination_dir`.
///
/// A destination directory that does not exist yet is treated as empty, so
/// the desired name comes back unchanged. The counter has no upper bound.
///
/// # Examples
///
/// ```
/// use typesort::resolver::resolve_unique_name;
///
/// let dir = tempfile::tempdir().unwrap();
/// assert_eq!(resolve_unique_name(dir.path(), "report.pdf"), "report.pdf");
///
/// std::fs::write(dir.path().join("report.pdf"), b"").unwrap();
/// assert_eq!(resolve_unique_name(dir.path(), "report.pdf"), "report_1.pdf");
/// ```
pub fn resolve_unique_name(destination_dir: &Path, desired_name: &str) -> String {
    if !entry_exists(&destination_dir.join(desired_name)) {
        return desired_name.to_string();
    }

    let (stem, extension) = split_extension(desired_name);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{stem}_{counter}{extension}");
        if !entry_exists(&destination_dir.join(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}
