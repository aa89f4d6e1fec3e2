use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use crate::models::WorkItem;
use crate::pipeline::barrier::ParticipantGuard;
use crate::pipeline::queue::{QueueMessage, TaskSender};
use crate::pipeline::stats::PoolStats;
use crate::reporter::Reporter;

/// Producer side of the pipeline: walks the source tree and queues one work
/// item per regular file, followed by one termination marker per worker.
pub struct DirectoryScanner {
    root: PathBuf,
    worker_count: usize,
    queue: TaskSender,
    stats: Arc<PoolStats>,
    reporter: Arc<dyn Reporter>,
}

impl DirectoryScanner {
    pub fn new(
        root: &Path,
        worker_count: usize,
        queue: TaskSender,
        stats: Arc<PoolStats>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        DirectoryScanner {
            root: root.to_path_buf(),
            worker_count,
            queue,
            stats,
            reporter,
        }
    }

    /// Walk the tree and feed the queue. Blocks while the queue is full, so
    /// run it on a blocking thread. The guard is released when this returns,
    /// whether or not the walk finished cleanly.
    pub fn run(self, _guard: ParticipantGuard) {
        self.reporter
            .info(&format!("Scanner: walking {}", self.root.display()));

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.skip(&format!("Scanner: skipping unreadable entry: {}", e));
                    continue;
                }
            };

            match self.is_regular_file(&entry) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    self.skip(
                        &format!("Scanner: skipping {}: {}", entry.path().display(), e),
                    );
                    continue;
                }
            }

            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    self.skip(
                        &format!("Scanner: {} is outside the source root", entry.path().display()),
                    );
                    continue;
                }
            };

            if self
                .queue
                .send_blocking(QueueMessage::Work(WorkItem::new(relative)))
                .is_err()
            {
                self.reporter
                    .error("Scanner: task queue closed before the walk finished, stopping");
                return;
            }
            self.stats.record_discovered();
        }

        for _ in 0..self.worker_count {
            if self.queue.send_blocking(QueueMessage::Terminate).is_err() {
                break;
            }
        }

        self.reporter.info(&format!(
            "Scanner: queued {} files ({} entries skipped)",
            self.stats.files_discovered(),
            self.stats.entries_skipped()
        ));
    }

    fn is_regular_file(&self, entry: &DirEntry) -> std::io::Result<bool> {
        if entry.file_type().is_file() {
            return Ok(true);
        }
        if entry.path_is_symlink() {
            return Ok(fs::metadata(entry.path())?.is_file());
        }
        Ok(false)
    }

    fn skip(&self, message: &str) {
        self.reporter.debug(message);
        self.stats.record_skipped();
    }
}
