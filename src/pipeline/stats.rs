use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the scanner and the workers for the end-of-run report.
/// Nothing in the pipeline reads them while it runs.
#[derive(Debug, Default)]
pub struct PoolStats {
    files_discovered: AtomicU64,
    entries_skipped: AtomicU64,
    uploaded: AtomicU64,
    failed: AtomicU64,
    bytes_uploaded: AtomicU64,
}

impl PoolStats {
    pub fn record_discovered(&self) {
        self.files_discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.entries_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_uploaded(&self, bytes: u64) {
        self.uploaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_uploaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn files_discovered(&self) -> u64 {
        self.files_discovered.load(Ordering::Relaxed)
    }

    pub fn entries_skipped(&self) -> u64 {
        self.entries_skipped.load(Ordering::Relaxed)
    }

    pub fn uploaded(&self) -> u64 {
        self.uploaded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded.load(Ordering::Relaxed)
    }
}
