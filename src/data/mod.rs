//! Remote data sources.
//!
//! The engine only sees the `ObservationSource` trait; `BanxicoClient` is the
//! production implementation backed by the Banxico SIE REST API.

pub mod banxico;

pub use banxico::*;
