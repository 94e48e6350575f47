//! Global error handling for extcopy
//!
//! Walk failures (`DirectoryAccess`, `DirectoryCreation`, `FileCopy`) are
//! recoverable and get recorded by the walker; everything else is fatal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for extcopy operations
#[derive(Error, Debug)]
pub enum ExtCopyError {
    /// Bad arguments or an unusable source/destination
    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    /// A source directory could not be listed
    #[error("Cannot read directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A destination bucket could not be created
    #[error("Cannot create directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source file could not be copied into its bucket
    #[error("Cannot copy {}: {source}", path.display())]
    FileCopy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination tree could not be rendered
    #[error("Cannot render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The copy thread pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Specialized Result type for extcopy operations
pub type Result<T> = std::result::Result<T, ExtCopyError>;

/// Creates an ExtCopyError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ExtCopyError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl ExtCopyError {
    /// Path the error is about, if it carries one
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DirectoryAccess { path, .. }
            | Self::DirectoryCreation { path, .. }
            | Self::FileCopy { path, .. }
            | Self::Render { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }
}
