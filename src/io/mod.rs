//! Durable state.
//!
//! - full dataset as JSON (`dataset`)
//! - last-synchronized date as plain text (`watermark`)
//!
//! Both stores report prior state as a `LoadOutcome` so callers can tell a
//! blank slate from a damaged file, even though the sync engine treats the two
//! the same way.

pub mod dataset;
pub mod watermark;

pub use dataset::*;
pub use watermark::*;

/// Result of reading prior state from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Present(T),
    /// No file, or an empty one.
    Absent,
    /// The file exists but could not be read or parsed.
    Corrupt(String),
}

impl<T> LoadOutcome<T> {
    /// Collapse `Absent` and `Corrupt` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            LoadOutcome::Present(value) => Some(value),
            LoadOutcome::Absent | LoadOutcome::Corrupt(_) => None,
        }
    }
}
