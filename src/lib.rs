//! `fx-sync` library crate.
//!
//! The binary (`fx-sync`) is a thin wrapper around this library so that:
//!
//! - the reconciliation engine is testable without spawning processes or
//!   touching the network
//! - stores, fetcher and renderer can be swapped behind their seams

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod sync;
