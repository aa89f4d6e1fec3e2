//! Completion barrier for the scanner and the workers.
//!
//! The barrier starts with one slot per participant (N workers plus the
//! scanner). Each participant holds a [`ParticipantGuard`]; dropping the guard
//! frees the slot. Because the release happens in `Drop`, it also runs when a
//! participant unwinds from a panic, so a crashed worker can never leave the
//! orchestrator waiting forever.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::warn;
use tokio::sync::Notify;

#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: AtomicUsize,
    notify: Notify,
}

impl CompletionBarrier {
    /// Create a barrier that opens after `participants` guards have been dropped
    pub fn new(participants: usize) -> Arc<Self> {
        Arc::new(CompletionBarrier {
            remaining: AtomicUsize::new(participants),
            notify: Notify::new(),
        })
    }

    /// Hand out the guard for one participant
    pub fn participant(self: &Arc<Self>) -> ParticipantGuard {
        ParticipantGuard {
            barrier: Arc::clone(self),
        }
    }

    /// Participants that have not finished yet
    pub fn outstanding(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Wait until every participant has finished
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a release between the check and the await is not lost
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn arrive(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match previous {
            Ok(1) => self.notify.notify_waiters(),
            Ok(_) => {}
            Err(_) => warn!("Completion barrier released more times than it has participants"),
        }
    }
}

/// Frees one barrier slot when dropped
#[derive(Debug)]
pub struct ParticipantGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for ParticipantGuard {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_zero_participants_is_open() {
        let barrier = CompletionBarrier::new(0);
        timeout(Duration::from_secs(1), barrier.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_opens_after_all_guards_drop() {
        let barrier = CompletionBarrier::new(3);
        let guards: Vec<_> = (0..3).map(|_| barrier.participant()).collect();
        assert_eq!(barrier.outstanding(), 3);

        let waiter = {
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move { barrier.wait().await })
        };

        let mut guards = guards.into_iter();
        drop(guards.next());
        drop(guards.next());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        assert_eq!(barrier.outstanding(), 1);

        drop(guards.next());
        timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        assert_eq!(barrier.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_panicking_participant_still_releases() {
        let barrier = CompletionBarrier::new(2);
        let healthy = barrier.participant();
        let doomed = barrier.participant();

        let task = tokio::spawn(async move {
            let _guard = doomed;
            panic!("worker blew up");
        });
        assert!(task.await.unwrap_err().is_panic());
        drop(healthy);

        timeout(Duration::from_secs(1), barrier.wait()).await.unwrap();
    }

    #[test]
    fn test_extra_release_does_not_underflow() {
        let barrier = CompletionBarrier::new(1);
        drop(barrier.participant());
        drop(barrier.participant());
        assert_eq!(barrier.outstanding(), 0);
    }
}
