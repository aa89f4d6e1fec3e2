//! Task queue between the directory scanner and the upload workers.
//!
//! A single bounded tokio channel carries [`QueueMessage`]s. The scanner is
//! the only sender and runs on a blocking thread, so it enqueues with
//! `blocking_send` and stalls while the queue is full. The receiving half is
//! shared by every worker behind an async mutex; whichever worker holds the
//! lock takes the next message, so each message reaches exactly one worker.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::models::WorkItem;

/// What travels through the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueMessage {
    /// A file to upload
    Work(WorkItem),
    /// No more work for whichever worker receives this
    Terminate,
}

/// Every receiver is gone; nothing sent now would ever be consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed;

/// Create a queue holding at most `capacity` pending messages
pub fn task_queue(capacity: usize) -> (TaskSender, TaskReceiver) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        TaskSender { sender },
        TaskReceiver {
            receiver: Arc::new(Mutex::new(receiver)),
        },
    )
}

/// Producing half, owned by the scanner
#[derive(Debug)]
pub struct TaskSender {
    sender: mpsc::Sender<QueueMessage>,
}

impl TaskSender {
    /// Enqueue from a blocking thread, waiting for room if the queue is full.
    ///
    /// Must not be called from inside an async task.
    pub fn send_blocking(&self, message: QueueMessage) -> Result<(), QueueClosed> {
        self.sender.blocking_send(message).map_err(|_| QueueClosed)
    }

    /// Enqueue from async code, waiting for room if the queue is full
    pub async fn send(&self, message: QueueMessage) -> Result<(), QueueClosed> {
        self.sender.send(message).await.map_err(|_| QueueClosed)
    }
}

/// Consuming half, cloned into every worker
#[derive(Debug, Clone)]
pub struct TaskReceiver {
    receiver: Arc<Mutex<mpsc::Receiver<QueueMessage>>>,
}

impl TaskReceiver {
    /// Take the next message, waiting while the queue is empty.
    ///
    /// Returns `None` once the sender is gone and the queue is drained.
    pub async fn next(&self) -> Option<QueueMessage> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }
}
