//! Shared test doubles and fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use s3_fast_upload::cloud::store::{ObjectStore, PutObject, PutOutcome};
use s3_fast_upload::config::UploadTarget;
use s3_fast_upload::error::UploadError;
use s3_fast_upload::models::Acl;
use s3_fast_upload::reporter::Reporter;

/// One put as the store saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPut {
    pub bucket: String,
    pub key: String,
    pub acl: Acl,
    pub body: Vec<u8>,
}

/// Object store that records every put and can be told to fail or panic on
/// specific keys
#[derive(Default)]
pub struct RecordingStore {
    puts: Mutex<Vec<RecordedPut>>,
    fail_keys: HashSet<String>,
    panic_keys: HashSet<String>,
    delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on<I: IntoIterator<Item = S>, S: Into<String>>(mut self, keys: I) -> Self {
        self.fail_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn panicking_on<I: IntoIterator<Item = S>, S: Into<String>>(mut self, keys: I) -> Self {
        self.panic_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.puts().into_iter().map(|put| put.key).collect()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(&self, request: PutObject) -> Result<PutOutcome, UploadError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_keys.contains(&request.key) {
            panic!("store exploded on {}", request.key);
        }
        if self.fail_keys.contains(&request.key) {
            return Err(UploadError::Remote {
                bucket: request.bucket,
                key: request.key,
                message: "InternalError".to_string(),
            });
        }

        let PutObject { bucket, key, acl, body } = request;
        let body = body.collect().await.map_err(|e| UploadError::Remote {
            bucket: bucket.clone(),
            key: key.clone(),
            message: e.to_string(),
        })?;

        self.puts.lock().unwrap().push(RecordedPut { bucket, key: key.clone(), acl, body });
        Ok(PutOutcome {
            e_tag: Some(format!("\"{}\"", key)),
            version_id: None,
        })
    }
}

/// Reporter that keeps every message
#[derive(Default)]
pub struct RecordingReporter {
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Create `count` files spread over a few nested directories.
/// Returns the relative paths, `/`-separated.
pub fn create_tree(root: &Path, count: usize) -> Vec<String> {
    let mut relative_paths = Vec::with_capacity(count);
    for i in 0..count {
        let relative = match i % 3 {
            0 => format!("file_{}.txt", i),
            1 => format!("dir_{}/file_{}.log", i % 7, i),
            _ => format!("dir_{}/nested_{}/file_{}.bin", i % 5, i % 4, i),
        };
        let path = root.join(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("contents of {}", relative)).unwrap();
        relative_paths.push(relative);
    }
    relative_paths
}

pub fn target(temp_dir: &TempDir, prefix: &str) -> UploadTarget {
    UploadTarget {
        bucket: "test-bucket".to_string(),
        prefix: prefix.to_string(),
        acl: Acl::Private,
        source_root: temp_dir.path().to_path_buf(),
    }
}
