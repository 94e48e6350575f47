/*!
 * Core types and data structures for extcopy
 */

use std::collections::BTreeMap;
use std::fmt;
use std::fs::FileType;
use std::path::PathBuf;

use serde::Serialize;
use strum::Display;

use crate::error::ExtCopyError;

/// Classification of a filesystem entry at the time it is observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory, walked into
    Directory,
    /// Regular file, copied into a bucket
    RegularFile,
    /// Symlink, device, socket or fifo
    Other,
}

impl From<FileType> for EntryKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::RegularFile
        } else {
            Self::Other
        }
    }
}

/// Category of a recoverable walk failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    #[strum(to_string = "Directory access failure")]
    DirectoryAccess,
    #[strum(to_string = "Directory creation failure")]
    DirectoryCreation,
    #[strum(to_string = "File copy failure")]
    FileCopy,
}

/// A failure the walk recovered from
#[derive(Debug, Clone, Serialize)]
pub struct WalkFailure {
    /// What went wrong
    pub kind: FailureKind,
    /// The offending path
    pub path: PathBuf,
    /// Underlying cause
    pub message: String,
}

impl WalkFailure {
    /// Build a failure record from a walk error.
    ///
    /// Returns `None` for errors that are not recoverable walk failures.
    pub fn from_error(err: &ExtCopyError) -> Option<Self> {
        let (kind, path, source) = match err {
            ExtCopyError::DirectoryAccess { path, source } => {
                (FailureKind::DirectoryAccess, path, source)
            }
            ExtCopyError::DirectoryCreation { path, source } => {
                (FailureKind::DirectoryCreation, path, source)
            }
            ExtCopyError::FileCopy { path, source } => (FailureKind::FileCopy, path, source),
            _ => return None,
        };

        Some(Self {
            kind,
            path: path.clone(),
            message: source.to_string(),
        })
    }
}

impl fmt::Display for WalkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.kind, self.path.display(), self.message)
    }
}

/// Per-bucket totals
#[derive(Debug, Clone, Default, Serialize)]
pub struct BucketStats {
    /// Files copied into the bucket
    pub files: usize,
    /// Bytes copied into the bucket
    pub bytes: u64,
}

/// Walker statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkStatistics {
    /// Directories successfully listed
    pub directories_visited: usize,
    /// Regular files copied
    pub files_copied: usize,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Entries not copied: non-regular files and collisions under `skip`
    pub entries_skipped: usize,
    /// Totals keyed by bucket name
    pub buckets: BTreeMap<String, BucketStats>,
    /// Every recoverable failure, in the order encountered
    pub failures: Vec<WalkFailure>,
}
