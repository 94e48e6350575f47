/*!
 * Utility functions for extcopy
 */

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

/// Count regular files under `dir` for progress tracking.
///
/// Unreadable entries are ignored here; the walker reports them.
/// `exclude` prunes a subtree, used for a destination nested in the source.
pub fn count_files(dir: &Path, exclude: Option<&Path>) -> u64 {
    let exclude = exclude.and_then(|p| fs::canonicalize(p).ok());

    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| match &exclude {
            Some(excluded) if entry.file_type().is_dir() => {
                fs::canonicalize(entry.path()).map_or(true, |p| &p != excluded)
            }
            _ => true,
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count() as u64
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
