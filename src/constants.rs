//! Global constants for the s3-fast-upload application.
//!
//! Defaults for the command line and the pipeline live here so the CLI,
//! the config layer and the tests agree on them.

// Pipeline defaults
/// Default number of upload workers
pub const DEFAULT_WORKERS: usize = 100;

/// Default bound of the task queue between the scanner and the workers
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Read size used when streaming a file body to the object store (64KB)
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

// Cloud storage defaults
/// Default AWS region
pub const DEFAULT_REGION: &str = "us-west-1";

/// Default source directory
pub const DEFAULT_SOURCE_DIR: &str = "./";
