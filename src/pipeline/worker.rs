use std::sync::Arc;

use crate::cloud::store::ObjectStore;
use crate::config::UploadTarget;
use crate::error::UploadError;
use crate::pipeline::barrier::ParticipantGuard;
use crate::pipeline::queue::{QueueMessage, TaskReceiver};
use crate::pipeline::stats::PoolStats;
use crate::pipeline::upload::{object_key, upload_item};
use crate::reporter::Reporter;

/// Consumer side of the pipeline. Pulls work items until it sees a
/// termination marker and uploads each one.
pub struct UploadWorker {
    id: usize,
    target: Arc<UploadTarget>,
    queue: TaskReceiver,
    store: Arc<dyn ObjectStore>,
    stats: Arc<PoolStats>,
    reporter: Arc<dyn Reporter>,
}

impl UploadWorker {
    pub fn new(
        id: usize,
        target: Arc<UploadTarget>,
        queue: TaskReceiver,
        store: Arc<dyn ObjectStore>,
        stats: Arc<PoolStats>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        UploadWorker {
            id,
            target,
            queue,
            store,
            stats,
            reporter,
        }
    }

    /// Run until a termination marker arrives (or the queue closes).
    ///
    /// A failed upload is reported and counted in the pool stats, never
    /// returned. The guard is dropped on every exit path, unwinding included.
    pub async fn run(self, _guard: ParticipantGuard) {
        self.debug("started");

        loop {
            let item = match self.queue.next().await {
                Some(QueueMessage::Work(item)) => item,
                Some(QueueMessage::Terminate) => break,
                None => {
                    self.debug("queue closed without a termination marker");
                    break;
                }
            };

            let key = match object_key(&self.target.prefix, item.relative_path()) {
                Ok(key) => key,
                Err(e) => {
                    self.fail(&item.to_string(), &e);
                    continue;
                }
            };
            self.debug(&format!("uploading to {}", key));

            match upload_item(self.store.as_ref(), &self.target, &item, key.clone()).await {
                Ok(uploaded) => {
                    self.debug(&format!(
                        "uploaded {} ({} bytes, {})",
                        uploaded.key, uploaded.bytes, uploaded.outcome
                    ));
                    self.stats.record_uploaded(uploaded.bytes);
                }
                Err(e) => self.fail(&key, &e),
            }
        }

        self.debug("finished");
    }

    fn fail(&self, what: &str, error: &UploadError) {
        self.reporter
            .error(&format!("Worker-{}: error uploading {}: {}", self.id, what, error));
        self.stats.record_failed();
    }

    fn debug(&self, message: &str) {
        self.reporter.debug(&format!("Worker-{}: {}", self.id, message));
    }
}
