//! Error types for s3-fast-upload.
//!
//! Two families live here:
//! - [`UploadError`]: a single file failed to upload. Workers report these and
//!   keep going; they never stop the pool.
//! - [`ConfigError`]: the run cannot start at all. These are raised while
//!   building an [`UploadConfig`](crate::config::UploadConfig), before any
//!   worker exists.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to upload one work item
#[derive(Error, Debug)]
pub enum UploadError {
    /// The local source file could not be opened or stat'ed
    #[error("couldn't open {} for upload: {source}", .path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file name cannot be turned into an object key. Lossy conversion
    /// would let two distinct files collide on one key, so the file is skipped.
    #[error("{} is not valid UTF-8, no object key can be built for it", .path.display())]
    UnrepresentableKey { path: PathBuf },

    /// The object store rejected the put or the transfer broke off
    #[error("put to s3://{bucket}/{key} failed: {message}")]
    Remote {
        bucket: String,
        key: String,
        message: String,
    },
}

impl UploadError {
    /// True when the failure happened on the local side
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            UploadError::LocalRead { .. } | UploadError::UnrepresentableKey { .. }
        )
    }
}

/// Configuration problems that abort the run before the pool starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("bucket name must not be empty")]
    EmptyBucket,

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("source directory does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("unknown AWS region '{0}'")]
    InvalidRegion(String),

    #[error("endpoint '{0}' must start with http:// or https://")]
    InvalidEndpoint(String),
}
