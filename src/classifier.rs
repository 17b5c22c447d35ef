//! Extension-based classification of directory entries.
//!
//! A [`Category`] is the upper-cased extension of a file name, or `OTHERS`
//! when the name carries no usable extension. There is no fixed list of
//! categories; they appear as names get classified.
//!
//! # Examples
//!
//! ```
//! use typesort::classifier::classify;
//!
//! assert_eq!(classify("photo.JPG").as_str(), "JPG");
//! assert_eq!(classify("notes.txt").as_str(), "TXT");
//! assert_eq!(classify("README").as_str(), "OTHERS");
//! assert_eq!(classify(".bashrc").as_str(), "OTHERS");
//! ```

use crate::error::{OrganizeError, OrganizeResult};
use serde::Serialize;
use std::fmt;
use std::fs::{self, DirEntry};
use std::io;
use std::path::PathBuf;

/// Label of the category for names without an extension.
pub const OTHERS: &str = "OTHERS";

/// A file category, which doubles as the name of its subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// The catch-all category.
    pub fn others() -> Self {
        Self(OTHERS.to_string())
    }

    /// Builds the category for a lower-cased extension, without its leading dot.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some(ext) if !ext.is_empty() => Self(ext.to_uppercase()),
            _ => Self::others(),
        }
    }

    /// Returns the category label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name of the subdirectory holding this category.
    ///
    /// ```
    /// use typesort::classifier::Category;
    ///
    /// assert_eq!(Category::from_extension(Some("pdf")).dir_name(), "PDF");
    /// assert_eq!(Category::from_extension(None).dir_name(), "OTHERS");
    /// ```
    pub fn dir_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Splits a file name into its stem and its extension, dot included.
///
/// Leading dots belong to the stem, so `.bashrc` has no extension while
/// `.config.toml` has `.toml`. The extension is empty when there is no dot.
///
/// ```
/// use typesort::classifier::split_extension;
///
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
/// assert_eq!(split_extension("README"), ("README", ""));
/// ```
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => name.split_at(leading_dots + idx),
        None => (name, ""),
    }
}

/// Returns the lower-cased extension of a name, or `None` when it has none.
///
/// A trailing dot (`notes.`) counts as no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, dotted) = split_extension(name);
    dotted
        .strip_prefix('.')
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

/// Maps a file name to its category.
pub fn classify(name: &str) -> Category {
    Category::from_extension(extension_of(name).as_deref())
}

/// An object found directly inside the folder being organized.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// The entry's file name.
    pub name: String,
    /// Full path to the entry.
    pub path: PathBuf,
    /// Whether the entry is a regular file (symlinks are followed).
    pub is_file: bool,
    /// Lower-cased extension without the dot.
    pub extension: Option<String>,
}

impl SourceEntry {
    /// Inspects a directory entry.
    ///
    /// Fails when the name is not valid UTF-8, since the destination name is
    /// derived from it, and when the entry's metadata cannot be read for any
    /// reason other than a dangling symlink.
    pub fn from_dir_entry(entry: &DirEntry) -> OrganizeResult<Self> {
        let path = entry.path();
        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| OrganizeError::NonUtf8Name { path: path.clone() })?;

        let is_file = match fs::metadata(&path) {
            Ok(meta) => meta.is_file(),
            // Dangling symlink: nothing to follow, so not a file.
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                return Err(OrganizeError::EntryInspectionFailed { path, source: e });
            }
        };

        Ok(Self {
            extension: extension_of(&name),
            name,
            path,
            is_file,
        })
    }

    /// The category this entry belongs to.
    pub fn category(&self) -> Category {
        Category::from_extension(self.extension.as_deref())
    }
}
