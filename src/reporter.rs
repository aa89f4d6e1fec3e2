//! Status and failure reporting.
//!
//! The scanner and every worker receive a [`Reporter`] when they are built
//! instead of reaching for a global logger. The binary plugs in
//! [`LogReporter`], which forwards to the `log` facade; tests plug in their
//! own recorders.

use log::{debug, error, info};

/// Sink for operator-facing messages. Nothing in the pipeline branches on it.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// Per-file chatter; ignored unless the sink cares
    fn debug(&self, _message: &str) {}
}

/// Reporter backed by the `log` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}
