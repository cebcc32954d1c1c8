//! Domain types used throughout the sync run.
//!
//! This module defines:
//!
//! - the persisted data model (`Dataset`, `Series`, `Observation`)
//! - the fetch window requested from the provider (`FetchWindow`)
//! - run configuration (`SyncConfig`)

pub mod types;

pub use types::*;
