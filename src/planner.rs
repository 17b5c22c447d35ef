/// Relocation planning for single entries.
///
/// Planning only probes the filesystem: it picks the category directory and a
/// collision-free destination name. Creating the directory and moving the file
/// are separate acts on the resulting [`RelocationPlan`], performed only when
/// the organizer is not simulating.
use crate::classifier::{Category, SourceEntry};
use crate::error::{OrganizeError, OrganizeResult};
use crate::resolver::resolve_unique_name;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where one entry is going to end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    /// Current path of the entry.
    pub source_path: PathBuf,
    /// Name of the entry before the move.
    pub original_name: String,
    /// Category the entry was classified into.
    pub category: Category,
    /// Category directory inside the root.
    pub target_dir: PathBuf,
    /// Collision-free name inside `target_dir`.
    pub final_name: String,
    /// True when `target_dir` is not an existing directory yet.
    pub target_dir_missing: bool,
}

impl RelocationPlan {
    /// Full destination path of the entry.
    pub fn destination(&self) -> PathBuf {
        self.target_dir.join(&self.final_name)
    }

    /// Whether the entry gets a new name to avoid a collision.
    pub fn is_renamed(&self) -> bool {
        self.final_name != self.original_name
    }

    /// Creates the category directory.
    ///
    /// Returns `Ok(true)` when this call created it and `Ok(false)` when a
    /// directory was already there, including one that appeared after
    /// planning.
    pub fn create_target_dir(&self) -> OrganizeResult<bool> {
        match fs::create_dir(&self.target_dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && self.target_dir.is_dir() => {
                Ok(false)
            }
            Err(e) => Err(OrganizeError::DirectoryCreationFailed {
                path: self.target_dir.clone(),
                source: e,
            }),
        }
    }

    /// Moves the entry to its destination with a single rename.
    ///
    /// Moves across filesystems are not attempted and surface as
    /// [`OrganizeError::MoveFailed`].
    pub fn execute(&self) -> OrganizeResult<PathBuf> {
        let destination = self.destination();
        fs::rename(&self.source_path, &destination).map_err(|e| OrganizeError::MoveFailed {
            from: self.source_path.clone(),
            to: destination.clone(),
            error: e,
        })?;
        Ok(destination)
    }
}

/// Plans the relocation of `entry` into its category directory under `root`.
///
/// Returns `None` for anything that is not a regular file.
///
/// # Examples
///
/// ```no_run
/// use typesort::classifier::SourceEntry;
/// use typesort::planner::plan;
/// use std::path::Path;
///
/// let root = Path::new("/home/me/Downloads");
/// for entry in std::fs::read_dir(root).unwrap() {
///     let entry = SourceEntry::from_dir_entry(&entry.unwrap()).unwrap();
///     if let Some(plan) = plan(&entry, root) {
///         println!("{} -> {}", plan.original_name, plan.destination().display());
///     }
/// }
/// ```
pub fn plan(entry: &SourceEntry, root: &Path) -> Option<RelocationPlan> {
    if !entry.is_file {
        return None;
    }

    let category = entry.category();
    let target_dir = root.join(category.dir_name());
    let target_dir_missing = !target_dir.is_dir();
    let final_name = resolve_unique_name(&target_dir, &entry.name);

    Some(RelocationPlan {
        source_path: entry.path.clone(),
        original_name: entry.name.clone(),
        category,
        target_dir,
        final_name,
        target_dir_missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::extension_of;
    use tempfile::TempDir;

    fn file_entry(root: &Path, name: &str) -> SourceEntry {
        let path = root.join(name);
        fs::write(&path, "test content").expect("Failed to write test file");
        SourceEntry {
            name: name.to_string(),
            extension: extension_of(name),
            path,
            is_file: true,
        }
    }

    #[test]
    fn test_plan_skips_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let entry = SourceEntry {
            name: "photos".to_string(),
            path: temp_dir.path().join("photos"),
            is_file: false,
            extension: None,
        };

        assert!(plan(&entry, temp_dir.path()).is_none());
    }

    #[test]
    fn test_plan_does_not_create_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let entry = file_entry(base_path, "notes.txt");

        let plan = plan(&entry, base_path).expect("Expected a plan");

        assert_eq!(plan.target_dir, base_path.join("TXT"));
        assert_eq!(plan.final_name, "notes.txt");
        assert!(plan.target_dir_missing);
        assert!(!plan.is_renamed());
        assert!(!base_path.join("TXT").exists());
    }

    #[test]
    fn test_plan_resolves_collisions_in_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("TXT")).unwrap();
        fs::write(base_path.join("TXT").join("a.txt"), "old").unwrap();
        let entry = file_entry(base_path, "a.txt");

        let plan = plan(&entry, base_path).expect("Expected a plan");

        assert!(!plan.target_dir_missing);
        assert_eq!(plan.final_name, "a_1.txt");
        assert!(plan.is_renamed());
        assert_eq!(plan.destination(), base_path.join("TXT").join("a_1.txt"));
    }

    #[test]
    fn test_execute_moves_file_without_overwriting() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("TXT")).unwrap();
        fs::write(base_path.join("TXT").join("a.txt"), "old").unwrap();
        let entry = file_entry(base_path, "a.txt");

        let plan = plan(&entry, base_path).expect("Expected a plan");
        let destination = plan.execute().expect("Failed to move file");

        assert_eq!(destination, base_path.join("TXT").join("a_1.txt"));
        assert!(!base_path.join("a.txt").exists());
        assert_eq!(fs::read_to_string(base_path.join("TXT").join("a.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(&destination).unwrap(), "test content");
    }

    #[test]
    fn test_create_target_dir_reports_creation() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let entry = file_entry(base_path, "photo.JPG");

        let plan = plan(&entry, base_path).expect("Expected a plan");
        assert!(plan.create_target_dir().expect("Failed to create directory"));
        assert!(base_path.join("JPG").is_dir());

        // A second attempt finds the directory already there.
        assert!(!plan.create_target_dir().expect("Existing directory is fine"));
    }

    #[test]
    fn test_create_target_dir_fails_when_file_occupies_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("TXT"), "not a directory").unwrap();
        let entry = file_entry(base_path, "notes.txt");

        let plan = plan(&entry, base_path).expect("Expected a plan");
        assert!(plan.target_dir_missing);

        let result = plan.create_target_dir();
        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
    }

    #[test]
    fn test_execute_fails_when_source_vanished() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let entry = file_entry(base_path, "gone.txt");
        let plan = plan(&entry, base_path).expect("Expected a plan");
        plan.create_target_dir().unwrap();

        fs::remove_file(base_path.join("gone.txt")).unwrap();

        assert!(matches!(plan.execute(), Err(OrganizeError::MoveFailed { .. })));
    }
}
