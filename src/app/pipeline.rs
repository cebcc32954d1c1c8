//! Wiring for one production sync run.
//!
//! Builds the `SyncContext` from configuration (HTTP client, file stores,
//! SVG chart) and hands it to the reconciliation engine. Tests build their own
//! context with fakes instead of going through here.

use chrono::Local;

use crate::data::BanxicoClient;
use crate::domain::SyncConfig;
use crate::error::AppError;
use crate::io::{DatasetStore, WatermarkStore};
use crate::plot::SvgChart;
use crate::sync::{Reconciler, SyncContext, SyncOutcome};

pub fn build_context(config: &SyncConfig) -> Result<SyncContext, AppError> {
    let client = BanxicoClient::from_env(config)?;
    Ok(SyncContext {
        source: Box::new(client),
        datasets: DatasetStore::new(&config.data_file),
        watermarks: WatermarkStore::new(&config.watermark_file),
        renderer: Box::new(SvgChart::new(&config.chart_path)),
        default_start: config.default_start,
    })
}

/// Execute one full synchronize-and-render cycle for today's date.
pub fn run_sync(config: &SyncConfig) -> Result<SyncOutcome, AppError> {
    let ctx = build_context(config)?;
    let today = Local::now().date_naive();
    Reconciler::new(ctx).synchronize(today)
}
