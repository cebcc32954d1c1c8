//! Merge freshly fetched series into the dataset.
//!
//! Everything here is pure: no I/O, no clock. Rules:
//!
//! - an observation is appended only if its series has no observation on that
//!   date yet (first-seen wins, existing values are never revised)
//! - an update never introduces a series id the dataset does not already track
//! - empty fetched series are skipped
//! - every series ends sorted ascending by date

use std::collections::HashSet;

use chrono::NaiveDate;
use log::debug;

use crate::domain::{Dataset, Observation, Series};

/// Counters describing what one merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added_observations: usize,
    /// Incoming observations whose date was already present.
    pub duplicate_observations: usize,
    /// Fetched series with an id the dataset does not track (update only).
    pub ignored_series: usize,
    /// Fetched series with no observations.
    pub empty_series: usize,
}

/// Merge `fetched` into `prior` and return the sorted result.
///
/// A missing or series-less prior dataset is a first run: fetched series are
/// adopted. Otherwise it is an update run.
pub fn reconcile(prior: Option<Dataset>, fetched: Vec<Series>) -> (Dataset, MergeStats) {
    let (mut dataset, stats) = match prior {
        Some(mut dataset) if !dataset.is_empty() => {
            let stats = merge_update(&mut dataset, fetched);
            (dataset, stats)
        }
        _ => adopt_initial(fetched),
    };
    sort_all(&mut dataset);
    (dataset, stats)
}

/// First run: keep every non-empty series, folding repeated ids together.
pub fn adopt_initial(fetched: Vec<Series>) -> (Dataset, MergeStats) {
    let mut dataset = Dataset::default();
    let mut stats = MergeStats::default();

    for incoming in fetched {
        if incoming.is_empty() {
            debug!("Dropping series {} with no observations", incoming.id);
            stats.empty_series += 1;
            continue;
        }

        let Series {
            observations,
            id,
            title,
        } = incoming;

        if dataset.get(&id).is_none() {
            dataset.series.push(Series {
                observations: Vec::new(),
                id: id.clone(),
                title,
            });
        }
        if let Some(target) = dataset.get_mut(&id) {
            append_new(target, observations, &mut stats);
        }
    }

    (dataset, stats)
}

/// Update run: extend tracked series only. Does not sort.
pub fn merge_update(dataset: &mut Dataset, fetched: Vec<Series>) -> MergeStats {
    let mut stats = MergeStats::default();

    for incoming in fetched {
        if incoming.is_empty() {
            stats.empty_series += 1;
            continue;
        }
        match dataset.get_mut(&incoming.id) {
            Some(target) => append_new(target, incoming.observations, &mut stats),
            None => {
                debug!("Ignoring untracked series {}", incoming.id);
                stats.ignored_series += 1;
            }
        }
    }

    stats
}

pub fn sort_all(dataset: &mut Dataset) {
    for series in &mut dataset.series {
        series.sort_observations();
    }
}

fn append_new(target: &mut Series, incoming: Vec<Observation>, stats: &mut MergeStats) {
    let mut seen: HashSet<NaiveDate> = target.observations.iter().map(|o| o.date).collect();
    for obs in incoming {
        if seen.insert(obs.date) {
            debug!("Added {} = {} to {}", obs.date, obs.value, target.id);
            target.observations.push(obs);
            stats.added_observations += 1;
        } else {
            stats.duplicate_observations += 1;
        }
    }
}
