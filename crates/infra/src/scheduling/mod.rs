//! Scheduling infrastructure for the background order auto-sync
//!
//! One interval scheduler with explicit lifecycle management (start/stop),
//! a join handle for the spawned task and cancellation-token support.

pub mod error;
pub mod sync_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use sync_scheduler::{SyncScheduler, SyncSchedulerConfig};
