//! Error types for the organizer engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while organizing a folder.
///
/// The root-level variants abort a run before anything is touched. The
/// entry-level variants are recorded against a single entry and the run
/// carries on with the next one.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The folder to organize does not exist.
    #[error("Target folder does not exist: {}", .path.display())]
    RootNotFound { path: PathBuf },

    /// The folder to organize is not a directory.
    #[error("Target path is not a directory: {}", .path.display())]
    RootNotADirectory { path: PathBuf },

    /// The folder to organize could not be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory entry could not be read during enumeration.
    #[error("Failed to read an entry of {}: {source}", .dir.display())]
    EntryUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry name is not valid UTF-8.
    #[error("File name is not valid UTF-8: {}", .path.display())]
    NonUtf8Name { path: PathBuf },

    /// The entry's metadata could not be read.
    #[error("Failed to inspect {}: {source}", .path.display())]
    EntryInspectionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a file into its category directory.
    #[error("Failed to move {} to {}: {error}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The audit log could not be opened.
    #[error("Failed to open audit log {}: {source}", .path.display())]
    AuditLogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_root_error_message() {
        let err = OrganizeError::RootNotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.to_string(), "Target folder does not exist: /missing");
    }

    #[test]
    fn test_move_error_message() {
        let err = OrganizeError::MoveFailed {
            from: PathBuf::from("/root/a.txt"),
            to: PathBuf::from("/root/TXT/a.txt"),
            error: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to move /root/a.txt to /root/TXT/a.txt"));
    }

    #[test]
    fn test_inspection_error_keeps_source() {
        use std::error::Error as _;

        let err = OrganizeError::EntryInspectionFailed {
            path: PathBuf::from("/root/loop.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to inspect /root/loop.txt: denied");
        assert!(err.source().is_some());
    }
}
