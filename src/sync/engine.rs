//! The reconciliation engine.
//!
//! `Reconciler` owns every collaborator it needs through an explicit
//! `SyncContext`; nothing is looked up globally. A run either fails before any
//! store is touched (fetch failure) or carries on to the end, downgrading
//! persistence failures to flags in the `SyncReport`.

use chrono::NaiveDate;
use log::{error, info, warn};

use crate::data::ObservationSource;
use crate::domain::{Dataset, FetchWindow};
use crate::error::AppError;
use crate::io::{DatasetStore, LoadOutcome, WatermarkStore};
use crate::plot::ChartRenderer;
use crate::sync::merge::reconcile;
use crate::sync::window::fetch_window;

/// Collaborators for one run.
pub struct SyncContext {
    pub source: Box<dyn ObservationSource>,
    pub datasets: DatasetStore,
    pub watermarks: WatermarkStore,
    pub renderer: Box<dyn ChartRenderer>,
    /// Lower bound of the fetch window when there is no watermark.
    pub default_start: NaiveDate,
}

/// What a single run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub first_run: bool,
    pub window: FetchWindow,
    pub fetched_series: usize,
    pub fetched_observations: usize,
    pub skipped_records: usize,
    pub added_observations: usize,
    pub ignored_series: usize,
    pub empty_series: usize,
    pub previous_watermark: Option<NaiveDate>,
    pub watermark: Option<NaiveDate>,
    pub dataset_saved: bool,
    pub watermark_saved: bool,
    pub chart_rendered: bool,
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The merged dataset, whether or not it reached disk.
    pub dataset: Dataset,
    pub report: SyncReport,
}

pub struct Reconciler {
    ctx: SyncContext,
}

impl Reconciler {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Run one fetch/merge/persist/render cycle with `today` as the window end.
    pub fn synchronize(&self, today: NaiveDate) -> Result<SyncOutcome, AppError> {
        let prior = match self.ctx.datasets.load() {
            LoadOutcome::Present(dataset) => Some(dataset),
            LoadOutcome::Absent => {
                info!("No existing data found, creating initial data");
                None
            }
            LoadOutcome::Corrupt(_) => {
                warn!("Existing data is unreadable, creating initial data");
                None
            }
        };
        let first_run = prior.as_ref().is_none_or(Dataset::is_empty);

        let previous_watermark = self.ctx.watermarks.load().into_option();
        let window = fetch_window(previous_watermark, self.ctx.default_start, today);
        info!("Fetch window {window} (first run: {first_run})");

        let batch = self.ctx.source.fetch(window)?;
        let fetched_series = batch.series.len();
        let fetched_observations = batch.observation_count();
        if batch.skipped_records > 0 {
            warn!("{} malformed records skipped", batch.skipped_records);
        }

        let (dataset, stats) = reconcile(prior, batch.series);
        if stats.ignored_series > 0 {
            warn!("{} untracked series ignored", stats.ignored_series);
        }
        info!(
            "Merged {} new observations ({} already present)",
            stats.added_observations, stats.duplicate_observations
        );

        let dataset_saved = match self.ctx.datasets.save(&dataset) {
            Ok(()) => true,
            Err(e) => {
                error!("An error occurred while saving the data: {e}");
                false
            }
        };

        // The watermark never runs ahead of what is on disk: it is skipped when
        // the dataset write failed (see DESIGN.md, "Watermark after a failed
        // dataset save").
        let watermark = dataset.latest_date();
        let watermark_saved = match watermark {
            Some(date) if dataset_saved => match self.ctx.watermarks.save(date) {
                Ok(()) => true,
                Err(e) => {
                    error!("An error occurred while saving the watermark: {e}");
                    false
                }
            },
            Some(_) => {
                warn!("Watermark not updated because the dataset was not saved");
                false
            }
            None => {
                info!("Dataset has no observations; watermark not written");
                false
            }
        };

        let chart_rendered = if dataset.observation_count() == 0 {
            warn!("Nothing to chart");
            false
        } else {
            self.ctx.renderer.render(&dataset)?;
            true
        };

        let report = SyncReport {
            first_run,
            window,
            fetched_series,
            fetched_observations,
            skipped_records: batch.skipped_records,
            added_observations: stats.added_observations,
            ignored_series: stats.ignored_series,
            empty_series: stats.empty_series,
            previous_watermark,
            watermark,
            dataset_saved,
            watermark_saved,
            chart_rendered,
        };

        Ok(SyncOutcome { dataset, report })
    }
}
