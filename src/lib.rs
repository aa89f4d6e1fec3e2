//! # s3-fast-upload
//!
//! Recursively uploads a local directory to an Amazon S3 (or S3-compatible)
//! bucket using a fixed pool of concurrent workers.
//!
//! ## Overview
//!
//! A single scanner walks the source tree and queues every regular file.
//! N workers take files off the shared queue and stream each one to the
//! bucket under `prefix + relative path`. When the walk is done the scanner
//! queues one termination marker per worker; each worker exits on the first
//! marker it sees. A completion barrier lets the caller wait for the scanner
//! and all workers without polling.
//!
//! A failed upload is reported and counted, never fatal: the remaining files
//! are still uploaded and the run still finishes.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use s3_fast_upload::cloud::store::{ObjectStore, PutObject, PutOutcome};
//! use s3_fast_upload::config::UploadTarget;
//! use s3_fast_upload::error::UploadError;
//! use s3_fast_upload::models::Acl;
//! use s3_fast_upload::pipeline::pool::UploadPool;
//! use s3_fast_upload::reporter::LogReporter;
//!
//! struct DryRun;
//!
//! #[async_trait::async_trait]
//! impl ObjectStore for DryRun {
//!     async fn put_object(&self, request: PutObject) -> Result<PutOutcome, UploadError> {
//!         println!("would upload {}", request.key);
//!         Ok(PutOutcome::default())
//!     }
//! }
//!
//! # async fn example() -> anyhow::Result<()> {
//! let target = UploadTarget {
//!     bucket: "my-bucket".to_string(),
//!     prefix: "backups/".to_string(),
//!     acl: Acl::Private,
//!     source_root: "./data".into(),
//! };
//! let report = UploadPool::new(target, 8, 256, Arc::new(DryRun), Arc::new(LogReporter))
//!     .run()
//!     .await?;
//! println!("{} files, {} failed", report.files_discovered, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Validated run configuration
//! - [`pipeline`]: Scanner, task queue, workers and completion barrier
//! - [`cloud`]: Object store trait, S3 implementation and client setup
//! - [`reporter`]: Status and failure reporting
//! - [`models`]: Work items, ACLs and the run report
//! - [`error`]: Error types
//! - [`constants`]: Application defaults

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures
pub mod models;

/// Error types for uploads and configuration
pub mod error;

/// Validated run configuration
pub mod config;

/// Cloud storage integration (S3)
pub mod cloud;

/// The concurrent upload pipeline
pub mod pipeline;

/// Operator-facing status reporting
pub mod reporter;

/// Application constants and default values
pub mod constants;
