//! Incremental reconciliation of the tracked series.
//!
//! Flow of one run (`Reconciler::synchronize`):
//! load dataset -> fetch window from watermark -> fetch -> merge/dedup/sort
//! -> persist dataset + watermark -> render chart.

pub mod engine;
pub mod merge;
pub mod window;

pub use engine::{Reconciler, SyncContext, SyncOutcome, SyncReport};
pub use merge::{MergeStats, reconcile};
pub use window::fetch_window;
