use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Result};
use chrono::Utc;
use log::warn;
use tokio::task::JoinHandle;

use crate::cloud::store::ObjectStore;
use crate::config::{UploadConfig, UploadTarget};
use crate::models::PoolReport;
use crate::pipeline::barrier::CompletionBarrier;
use crate::pipeline::queue::task_queue;
use crate::pipeline::scanner::DirectoryScanner;
use crate::pipeline::stats::PoolStats;
use crate::pipeline::worker::UploadWorker;
use crate::reporter::Reporter;

/// One scanner plus a fixed number of upload workers.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use s3_fast_upload::cloud::client::create_s3_client;
/// use s3_fast_upload::cloud::store::S3Store;
/// use s3_fast_upload::config::{CredentialSource, UploadTarget};
/// use s3_fast_upload::models::Acl;
/// use s3_fast_upload::pipeline::pool::UploadPool;
/// use s3_fast_upload::reporter::LogReporter;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = create_s3_client(rusoto_core::Region::UsWest1, &CredentialSource::Default)?;
/// let target = UploadTarget {
///     bucket: "my-bucket".to_string(),
///     prefix: "backups/".to_string(),
///     acl: Acl::Private,
///     source_root: "/srv/data".into(),
/// };
///
/// let report = UploadPool::new(target, 16, 1024, Arc::new(S3Store::new(client)), Arc::new(LogReporter))
///     .run()
///     .await?;
/// println!("uploaded {} files", report.uploaded);
/// # Ok(())
/// # }
/// ```
pub struct UploadPool {
    target: Arc<UploadTarget>,
    workers: usize,
    queue_capacity: usize,
    store: Arc<dyn ObjectStore>,
    reporter: Arc<dyn Reporter>,
}

impl UploadPool {
    pub fn new(
        target: UploadTarget,
        workers: usize,
        queue_capacity: usize,
        store: Arc<dyn ObjectStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        UploadPool {
            target: Arc::new(target),
            workers,
            queue_capacity,
            store,
            reporter,
        }
    }

    pub fn from_config(
        config: &UploadConfig,
        store: Arc<dyn ObjectStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        UploadPool::new(
            config.target.clone(),
            config.workers,
            config.queue_capacity,
            store,
            reporter,
        )
    }

    /// Start the scanner and the workers, wait for all of them, and report.
    ///
    /// Upload failures do not make this return an error; they show up in the
    /// report. Must be called from within a multi-threaded tokio runtime.
    pub async fn run(self) -> Result<PoolReport> {
        ensure!(self.workers > 0, "upload pool needs at least one worker");
        ensure!(self.queue_capacity > 0, "task queue capacity must be at least 1");

        let started_at = Utc::now();
        let clock = Instant::now();
        let stats = Arc::new(PoolStats::default());
        let barrier = CompletionBarrier::new(self.workers + 1);
        let (sender, receiver) = task_queue(self.queue_capacity);

        self.reporter.info(&format!(
            "Starting {} workers uploading {} to s3://{}/{}",
            self.workers,
            self.target.source_root.display(),
            self.target.bucket,
            self.target.prefix
        ));

        let scanner = DirectoryScanner::new(
            &self.target.source_root,
            self.workers,
            sender,
            Arc::clone(&stats),
            Arc::clone(&self.reporter),
        );
        let scanner_guard = barrier.participant();
        let scanner_handle = tokio::task::spawn_blocking(move || scanner.run(scanner_guard));

        let mut worker_handles: Vec<JoinHandle<_>> = Vec::with_capacity(self.workers);
        for id in 1..=self.workers {
            let worker = UploadWorker::new(
                id,
                Arc::clone(&self.target),
                receiver.clone(),
                Arc::clone(&self.store),
                Arc::clone(&stats),
                Arc::clone(&self.reporter),
            );
            let guard = barrier.participant();
            worker_handles.push(tokio::spawn(worker.run(guard)));
        }
        // Workers now hold the only receivers; if all of them die the scanner's sends fail
        drop(receiver);

        barrier.wait().await;

        if let Err(e) = scanner_handle.await {
            warn!("Directory scanner terminated abnormally: {}", e);
        }

        let mut crashed_workers = 0;
        for (index, handle) in worker_handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                crashed_workers += 1;
                self.reporter
                    .error(&format!("Worker-{}: terminated abnormally: {}", index + 1, e));
            }
        }

        let report = PoolReport {
            bucket: self.target.bucket.clone(),
            prefix: self.target.prefix.clone(),
            workers: self.workers,
            files_discovered: stats.files_discovered(),
            entries_skipped: stats.entries_skipped(),
            uploaded: stats.uploaded(),
            failed: stats.failed(),
            bytes_uploaded: stats.bytes_uploaded(),
            crashed_workers,
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            elapsed_ms: clock.elapsed().as_millis() as u64,
        };

        self.reporter.info(&format!(
            "Finished: {} of {} files uploaded ({} bytes), {} failed, {} skipped in {} ms",
            report.uploaded,
            report.files_discovered,
            report.bytes_uploaded,
            report.failed,
            report.entries_skipped,
            report.elapsed_ms
        ));

        Ok(report)
    }
}
