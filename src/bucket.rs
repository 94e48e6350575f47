/*!
 * Extension buckets
 *
 * A bucket is a directory directly under the destination root, named after
 * the extension of the files it holds.
 */

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::error::{ExtCopyError, Result};

/// Bucket for files without an extension
pub const NO_EXTENSION_BUCKET: &str = "no_extension";

/// Bucket name for a file: the text after the last dot, case preserved.
///
/// Dotfiles such as `.bashrc` and names ending in a dot have no extension.
pub fn bucket_name(path: &Path) -> &OsStr {
    match path.extension() {
        Some(ext) if !ext.is_empty() => ext,
        _ => OsStr::new(NO_EXTENSION_BUCKET),
    }
}

/// A bucket directory that exists on disk
#[derive(Debug, Clone)]
pub struct Bucket {
    /// Path of the bucket directory
    pub dir: PathBuf,
    /// Serializes writes into this bucket
    lock: Arc<Mutex<()>>,
}

impl Bucket {
    /// Claim the bucket for one choose-target-then-write sequence
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Buckets already created during this run
#[derive(Debug, Default)]
pub struct BucketSet {
    created: Mutex<HashMap<OsString, Arc<Mutex<()>>>>,
}

impl BucketSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `dest_root/name` exists and return it.
    ///
    /// The directory is created at most once per name; creating a bucket that
    /// is already on disk is not an error. Every call for the same name hands
    /// out the same write lock.
    pub fn ensure(&self, dest_root: &Path, name: &OsStr) -> Result<Bucket> {
        let dir = dest_root.join(name);

        // Held across create_dir_all so two threads never race on one bucket
        let mut created = self.created.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = created.get(name) {
            return Ok(Bucket {
                dir,
                lock: Arc::clone(lock),
            });
        }

        fs::create_dir_all(&dir).map_err(|source| ExtCopyError::DirectoryCreation {
            path: dir.clone(),
            source,
        })?;
        debug!("Created bucket {}", dir.display());

        let lock = Arc::new(Mutex::new(()));
        created.insert(name.to_os_string(), Arc::clone(&lock));
        Ok(Bucket { dir, lock })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.created.lock().map(|c| c.len()).unwrap_or_default()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
