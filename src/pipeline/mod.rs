//! The bounded concurrent upload pipeline.
//!
//! ```text
//!                    ┌──────────────┐
//!                    │   Scanner    │  walks SOURCE_DIR, 1 item per file,
//!                    └──────┬───────┘  then N termination markers
//!                           │
//!                    ┌──────▼───────┐
//!                    │  Task queue  │  bounded; scanner blocks when full
//!                    └──────┬───────┘
//!          ┌────────────────┼────────────────┐
//!    ┌─────▼─────┐    ┌─────▼─────┐    ┌─────▼─────┐
//!    │ Worker-1  │    │ Worker-2  │ .. │ Worker-N  │  one put per item,
//!    └─────┬─────┘    └─────┬─────┘    └─────┬─────┘  exit on any marker
//!          └────────────────┼────────────────┘
//!                    ┌──────▼───────┐
//!                    │   Barrier    │  N + 1 participants
//!                    └──────────────┘
//! ```
//!
//! Nothing polls. The queue and the barrier are the only coordination.

pub mod barrier;
pub mod pool;
pub mod queue;
pub mod scanner;
pub mod stats;
pub mod upload;
pub mod worker;
