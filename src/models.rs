use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One file queued for upload, identified by its path relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkItem {
    relative_path: PathBuf,
}

impl WorkItem {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        WorkItem {
            relative_path: relative_path.into(),
        }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Location of the file on the local disk
    pub fn source_path(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.relative_path)
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path.display())
    }
}

/// Canned ACL applied to every uploaded object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acl {
    /// Owner gets full control, nobody else has access
    #[default]
    Private,
    /// Anyone can read the object
    #[value(alias = "public")]
    PublicRead,
    /// Anyone can read and write the object
    PublicReadWrite,
    /// Any authenticated AWS user can read the object
    AuthenticatedRead,
    /// Bucket owner can read the object
    BucketOwnerRead,
    /// Bucket owner gets full control
    BucketOwnerFullControl,
}

impl Acl {
    /// The value S3 expects in the `x-amz-acl` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Acl::Private => "private",
            Acl::PublicRead => "public-read",
            Acl::PublicReadWrite => "public-read-write",
            Acl::AuthenticatedRead => "authenticated-read",
            Acl::BucketOwnerRead => "bucket-owner-read",
            Acl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one pool run, written as JSON when `--report` is given.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PoolReport {
    pub bucket: String,
    pub prefix: String,
    pub workers: usize,
    pub files_discovered: u64,
    pub entries_skipped: u64,
    pub uploaded: u64,
    pub failed: u64,
    pub bytes_uploaded: u64,
    pub crashed_workers: usize,
    pub started_at: String,
    pub finished_at: String,
    pub elapsed_ms: u64,
}

impl PoolReport {
    /// True when at least one file did not make it to the bucket
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.crashed_workers > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_source_path() {
        let item = WorkItem::new("a/b.txt");
        assert_eq!(item.source_path(Path::new("/data")), PathBuf::from("/data/a/b.txt"));
        assert_eq!(item.to_string(), "a/b.txt");
    }

    #[test]
    fn test_acl_header_values() {
        assert_eq!(Acl::default(), Acl::Private);
        assert_eq!(Acl::PublicRead.as_str(), "public-read");
        assert_eq!(Acl::BucketOwnerFullControl.to_string(), "bucket-owner-full-control");
    }

    #[test]
    fn test_acl_accepts_public_alias() {
        assert_eq!(Acl::from_str("public", true).unwrap(), Acl::PublicRead);
        assert_eq!(Acl::from_str("private", true).unwrap(), Acl::Private);
        assert!(Acl::from_str("world", true).is_err());
    }

    #[test]
    fn test_report_failure_flag() {
        let mut report = PoolReport {
            bucket: "bucket".to_string(),
            prefix: String::new(),
            workers: 4,
            files_discovered: 3,
            entries_skipped: 0,
            uploaded: 3,
            failed: 0,
            bytes_uploaded: 42,
            crashed_workers: 0,
            started_at: "2024-01-01T00:00:00Z".to_string(),
            finished_at: "2024-01-01T00:00:01Z".to_string(),
            elapsed_ms: 1000,
        };
        assert!(!report.has_failures());

        report.failed = 1;
        assert!(report.has_failures());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"failed\":1"));
    }
}
