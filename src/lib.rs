/*!
 * extcopy - Copy a directory tree into per-extension buckets
 *
 * Every regular file under the source is copied to `<destination>/<extension>/`,
 * flattening the source layout, and the resulting destination can be rendered
 * as a tree.
 */

pub mod bucket;
pub mod config;
pub mod error;
pub mod renderer;
pub mod report;
pub mod types;
pub mod utils;
pub mod walker;


// Re-export main components for easier access
pub use bucket::{bucket_name, BucketSet, NO_EXTENSION_BUCKET};
pub use config::{CollisionPolicy, Config, ReportKind};
pub use error::{ExtCopyError, Result};
pub use renderer::{RenderStyle, TreeRenderer};
pub use report::{CopyReport, ReportFormat, Reporter};
pub use types::{EntryKind, FailureKind, WalkFailure, WalkStatistics};
pub use utils::{count_files, format_file_size};
pub use walker::Walker;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
