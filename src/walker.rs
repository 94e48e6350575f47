/*!
 * Directory walking and per-extension copying
 */

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use filetime::FileTime;
use indicatif::ProgressBar;
use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use walkdir::{DirEntry, WalkDir};

use crate::bucket::{bucket_name, Bucket, BucketSet};
use crate::config::{CollisionPolicy, Config};
use crate::error::{ExtCopyError, Result};
use crate::types::{EntryKind, WalkFailure, WalkStatistics};

/// Outcome of handling one regular file
enum CopyOutcome {
    Copied { bucket: String, bytes: u64 },
    Skipped,
}

/// Copies every regular file under the source root into extension buckets
pub struct Walker {
    /// Walker configuration
    config: Config,
    /// Progress bar
    progress: Arc<ProgressBar>,
    /// Buckets created so far
    buckets: BucketSet,
    /// Walker statistics
    statistics: Mutex<WalkStatistics>,
    /// Canonical destination root, skipped if it lies inside the source
    dest_canonical: Mutex<Option<PathBuf>>,
}

impl Walker {
    /// Create a new walker
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            progress,
            buckets: BucketSet::new(),
            statistics: Mutex::new(WalkStatistics::default()),
            dest_canonical: Mutex::new(None),
        }
    }

    /// Get walker statistics
    pub fn get_statistics(&self) -> WalkStatistics {
        self.stats().clone()
    }

    fn stats(&self) -> std::sync::MutexGuard<'_, WalkStatistics> {
        self.statistics.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy the whole source tree into the destination.
    ///
    /// Only a destination root that cannot be created, or a thread pool that
    /// cannot be built, is fatal. Every other failure is reported, recorded,
    /// and the walk carries on. Files are copied on a pool of
    /// `config.num_threads` threads.
    pub fn run(&self) -> Result<()> {
        self.build_pool()?.install(|| self.walk())
    }

    fn build_pool(&self) -> Result<ThreadPool> {
        Ok(ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()?)
    }

    fn walk(&self) -> Result<()> {
        let dest_root = &self.config.dest_dir;
        fs::create_dir_all(dest_root).map_err(|source| ExtCopyError::DirectoryCreation {
            path: dest_root.clone(),
            source,
        })?;
        *self.dest_canonical.lock().unwrap_or_else(|e| e.into_inner()) =
            fs::canonicalize(dest_root).ok();

        let mut pending = vec![self.config.source_dir.clone()];
        while let Some(dir) = pending.pop() {
            match self.list_directory(&dir) {
                Ok(children) => {
                    let mut subdirs = self.process_entries(children);
                    // Reversed so the stack pops them in name order
                    subdirs.reverse();
                    pending.extend(subdirs);
                }
                Err(err) => self.record_failure(&err),
            }
        }

        Ok(())
    }

    /// List the direct children of a directory, sorted by file name
    fn list_directory(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let mut children = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => children.push(entry),
                // The directory itself could not be read
                Err(err) if err.depth() == 0 => {
                    return Err(ExtCopyError::DirectoryAccess {
                        path: dir.to_path_buf(),
                        source: err.into(),
                    })
                }
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    self.record_failure(&ExtCopyError::DirectoryAccess {
                        path,
                        source: err.into(),
                    });
                }
            }
        }

        self.stats().directories_visited += 1;
        Ok(children)
    }

    /// Copy the files among `entries` and return the subdirectories to visit
    fn process_entries(&self, entries: Vec<DirEntry>) -> Vec<PathBuf> {
        let mut subdirs = Vec::new();
        let mut files = Vec::new();

        for entry in entries {
            match EntryKind::from(entry.file_type()) {
                EntryKind::Directory => {
                    if self.is_destination(entry.path()) {
                        debug!("Skipping destination root {}", entry.path().display());
                    } else {
                        subdirs.push(entry.into_path());
                    }
                }
                EntryKind::RegularFile => files.push(entry),
                EntryKind::Other => {
                    warn!("Skipping non-regular file {}", entry.path().display());
                    self.stats().entries_skipped += 1;
                }
            }
        }

        // Copies into one bucket are serialized by the bucket lock
        files.par_iter().for_each(|entry| {
            let outcome = self.copy_file(entry.path());
            self.progress.inc(1);

            match outcome {
                Ok(CopyOutcome::Copied { bucket, bytes }) => {
                    let mut stats = self.stats();
                    stats.files_copied += 1;
                    stats.bytes_copied += bytes;
                    let totals = stats.buckets.entry(bucket).or_default();
                    totals.files += 1;
                    totals.bytes += bytes;
                }
                Ok(CopyOutcome::Skipped) => self.stats().entries_skipped += 1,
                Err(err) => self.record_failure(&err),
            }
        });

        subdirs
    }

    /// Copy one regular file into its bucket
    fn copy_file(&self, path: &Path) -> Result<CopyOutcome> {
        let name = bucket_name(path);
        let bucket = self.buckets.ensure(&self.config.dest_dir, name)?;
        let file_name = path.file_name().unwrap_or_default();

        // Target choice and write happen under one claim of the bucket
        let _guard = bucket.lock();
        let target = match self.resolve_target(&bucket, file_name) {
            Some(target) => target,
            None => {
                debug!("Keeping existing {}", bucket.dir.join(file_name).display());
                return Ok(CopyOutcome::Skipped);
            }
        };

        // The source may sit inside the destination; copying a file onto
        // itself would truncate it
        if is_same_file(path, &target) {
            return Err(ExtCopyError::FileCopy {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is the same file", target.display()),
                ),
            });
        }

        let bytes = fs::copy(path, &target).map_err(|source| ExtCopyError::FileCopy {
            path: path.to_path_buf(),
            source,
        })?;
        if let Err(e) = copy_times(path, &target) {
            warn!("Could not preserve timestamps on {}: {}", target.display(), e);
        }
        debug!("Copied {} -> {}", path.display(), target.display());

        Ok(CopyOutcome::Copied {
            bucket: name.to_string_lossy().into_owned(),
            bytes,
        })
    }

    /// Destination path for `file_name` under the collision policy,
    /// or `None` when the file should not be copied.
    /// Callers hold the bucket lock.
    fn resolve_target(&self, bucket: &Bucket, file_name: &OsStr) -> Option<PathBuf> {
        let bucket_dir = &bucket.dir;
        let target = bucket_dir.join(file_name);
        if !target.exists() {
            return Some(target);
        }

        match self.config.collision_policy {
            CollisionPolicy::Overwrite => Some(target),
            CollisionPolicy::Skip => None,
            CollisionPolicy::Rename => {
                let name = Path::new(file_name);
                let stem = name.file_stem().unwrap_or(file_name).to_string_lossy();
                let ext = name.extension().map(|e| e.to_string_lossy());

                (1..)
                    .map(|n| match &ext {
                        Some(ext) => bucket_dir.join(format!("{}_{}.{}", stem, n, ext)),
                        None => bucket_dir.join(format!("{}_{}", stem, n)),
                    })
                    .find(|candidate| !candidate.exists())
            }
        }
    }

    fn is_destination(&self, path: &Path) -> bool {
        let dest = self.dest_canonical.lock().unwrap_or_else(|e| e.into_inner());
        match dest.as_ref() {
            Some(dest) => fs::canonicalize(path).map_or(false, |p| &p == dest),
            None => false,
        }
    }

    /// Print a failure as one diagnostic line and keep it in the statistics
    fn record_failure(&self, err: &ExtCopyError) {
        if let Some(failure) = WalkFailure::from_error(err) {
            self.progress.suspend(|| eprintln!("{}", failure));
            self.stats().failures.push(failure);
        } else {
            self.progress.suspend(|| eprintln!("Error: {}", err));
        }
    }
}

/// Whether both paths resolve to one existing file
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Carry access and modification times over to the copy.
/// Permission bits are already copied by `fs::copy`.
fn copy_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(to, atime, mtime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_follows_thread_count() {
        for threads in [1, 4] {
            let mut config = Config::new("src", "dest");
            config.num_threads = threads;
            let walker = Walker::new(config, Arc::new(ProgressBar::hidden()));

            let pool = walker.build_pool().unwrap();
            assert_eq!(pool.current_num_threads(), threads);
        }
    }

    #[test]
    fn test_is_same_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        assert!(is_same_file(&file, &temp_dir.path().join(".").join("a.txt")));
        assert!(!is_same_file(&file, &temp_dir.path().join("b.txt")));
    }
}
