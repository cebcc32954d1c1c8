//! Terminal output for a finished run.
//!
//! Formatting lives here so the engine never prints, and output changes stay
//! localized (important for snapshot tests).

pub mod format;

pub use format::format_sync_summary;
