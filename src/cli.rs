use clap::Parser;
use std::path::PathBuf;

use crate::constants::{DEFAULT_QUEUE_CAPACITY, DEFAULT_REGION, DEFAULT_SOURCE_DIR, DEFAULT_WORKERS};
use crate::models::Acl;

/// Command-line arguments for s3-fast-upload.
///
/// Uploads every file below `SOURCE_DIR` to `s3://<bucket>/<subfolder><relative path>`
/// using a fixed pool of concurrent workers.
#[derive(Parser, Debug)]
#[clap(name = "s3-fast-upload", about = "Upload a directory tree to S3 with many concurrent workers")]
pub struct Args {
    /// S3 bucket to upload to
    #[clap(short, long)]
    pub bucket: String,

    /// Key prefix inside the bucket, can be blank (e.g. "backups/2024/")
    #[clap(short, long, default_value = "")]
    pub subfolder: String,

    /// Number of upload workers to use
    #[clap(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// AWS region of the bucket
    #[clap(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Custom endpoint for S3-compatible storage (e.g. http://localhost:9000)
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Canned ACL for uploaded objects
    #[clap(long, value_enum, default_value_t = Acl::Private)]
    pub acl: Acl,

    /// AWS profile to take credentials from
    #[clap(long, conflicts_with = "ec2_role")]
    pub profile: Option<String>,

    /// Running with an EC2 instance IAM role; take credentials from instance metadata only
    #[clap(long)]
    pub ec2_role: bool,

    /// Maximum number of files the scanner may run ahead of the workers
    #[clap(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Write a JSON summary of the run to this path
    #[clap(long)]
    pub report: Option<PathBuf>,

    /// Exit with an error status when any file failed to upload
    #[clap(long)]
    pub strict: bool,

    /// Be verbose
    #[clap(short, long)]
    pub verbose: bool,

    /// Source directory
    #[clap(default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: PathBuf,
}
