/*!
 * Configuration handling for extcopy
 */

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::ensure;
use crate::error::Result;

/// Default destination directory, relative to the working directory
pub const DEFAULT_DESTINATION: &str = "destination";

/// Policy for a file whose name is already taken inside its bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionPolicy {
    /// Replace the existing file, the last write wins (default)
    Overwrite,
    /// Copy under the first free name `stem_N.ext`
    Rename,
    /// Keep the existing file and skip the new one
    Skip,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        Self::Overwrite
    }
}

/// Output format of the end-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Console tables
    Table,
    /// A single JSON document
    Json,
    /// No summary
    None,
}

impl Default for ReportKind {
    fn default() -> Self {
        Self::Table
    }
}

/// Command-line arguments for extcopy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "extcopy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy a directory tree into per-extension buckets",
    long_about = "Recursively copies every regular file under SOURCE into DESTINATION/<extension>/, flattening the original layout, then prints the resulting tree."
)]
pub struct Args {
    /// Source directory to copy from
    pub source: String,

    /// Destination directory to copy into
    #[clap(default_value = DEFAULT_DESTINATION)]
    pub destination: String,

    /// Number of threads used to copy the files of a directory
    #[clap(long, default_value = "1")]
    pub threads: usize,

    /// What to do when a bucket already holds a file with the same name
    #[clap(long, value_enum, default_value_t = CollisionPolicy::default())]
    pub on_conflict: CollisionPolicy,

    /// Print directory names without color
    #[clap(long)]
    pub no_color: bool,

    /// Summary printed after the tree
    #[clap(long, value_enum, default_value_t = ReportKind::default())]
    pub report: ReportKind,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Source directory to walk
    pub source_dir: PathBuf,

    /// Destination root holding the buckets
    pub dest_dir: PathBuf,

    /// Number of threads to use for copying
    pub num_threads: usize,

    /// Name collision policy inside a bucket
    pub collision_policy: CollisionPolicy,

    /// Whether directories are colored in the rendered tree
    pub color: bool,

    /// Summary format
    pub report: ReportKind,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            source_dir: PathBuf::from(args.source),
            dest_dir: PathBuf::from(args.destination),
            num_threads: args.threads,
            collision_policy: args.on_conflict,
            color: !args.no_color,
            report: args.report,
        }
    }

    /// Configuration with defaults for everything but the two roots
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            num_threads: 1,
            collision_policy: CollisionPolicy::default(),
            color: false,
            report: ReportKind::None,
        }
    }

    /// Validate the configuration. Touches nothing on disk.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.source_dir.exists(),
            InvalidInvocation,
            "Source folder does not exist: {}",
            self.source_dir.display()
        );
        ensure!(
            self.source_dir.is_dir(),
            InvalidInvocation,
            "Source is not a directory: {}",
            self.source_dir.display()
        );

        // A missing destination is fine, the walker creates it
        ensure!(
            !self.dest_dir.exists() || self.dest_dir.is_dir(),
            InvalidInvocation,
            "Destination exists and is not a directory: {}",
            self.dest_dir.display()
        );

        // Copying a tree into itself would walk and overwrite its own files
        if let (Ok(source), Ok(dest)) = (
            fs::canonicalize(&self.source_dir),
            fs::canonicalize(&self.dest_dir),
        ) {
            ensure!(
                !source.starts_with(&dest),
                InvalidInvocation,
                "Source {} is inside destination {}",
                self.source_dir.display(),
                self.dest_dir.display()
            );
        }

        ensure!(
            self.num_threads > 0,
            InvalidInvocation,
            "Thread count must be at least 1"
        );

        Ok(())
    }
}
