use crate::domain::Dataset;
use crate::sync::SyncReport;

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "NO" }
}

/// Format the run summary (window, merge counts, persistence status, series).
pub fn format_sync_summary(report: &SyncReport, dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str("=== fx-sync ===\n");
    out.push_str(&format!(
        "Mode: {}\n",
        if report.first_run { "initial load" } else { "update" }
    ));
    out.push_str(&format!("Window: {}\n", report.window));
    out.push_str(&format!(
        "Fetched: {} series, {} observations ({} records skipped)\n",
        report.fetched_series, report.fetched_observations, report.skipped_records
    ));
    out.push_str(&format!("Added: {} observations\n", report.added_observations));
    if report.ignored_series > 0 {
        out.push_str(&format!("Ignored: {} untracked series\n", report.ignored_series));
    }
    if report.empty_series > 0 {
        out.push_str(&format!("Empty: {} series without data\n", report.empty_series));
    }

    let watermark = match (report.previous_watermark, report.watermark) {
        (Some(prev), Some(next)) if prev != next => format!("{prev} -> {next}"),
        (_, Some(next)) => next.to_string(),
        (_, None) => "-".to_string(),
    };
    out.push_str(&format!("Watermark: {watermark}\n"));
    out.push_str(&format!(
        "Saved: dataset={} watermark={} chart={}\n",
        yes_no(report.dataset_saved),
        yes_no(report.watermark_saved),
        yes_no(report.chart_rendered)
    ));

    if !dataset.series.is_empty() {
        out.push_str("\nSeries:\n");
        for s in &dataset.series {
            let range = match (s.observations.first(), s.observations.last()) {
                (Some(first), Some(last)) => format!(
                    "{}..{} (last {})",
                    first.date, last.date, last.value
                ),
                _ => "no observations".to_string(),
            };
            out.push_str(&format!(
                "  {:<10} n={:<5} {range}  {}\n",
                s.id,
                s.observations.len(),
                s.title
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{FetchWindow, Observation, Series};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn report() -> SyncReport {
        SyncReport {
            first_run: false,
            window: FetchWindow {
                start: d(1),
                end: d(3),
            },
            fetched_series: 1,
            fetched_observations: 2,
            skipped_records: 1,
            added_observations: 1,
            ignored_series: 0,
            empty_series: 0,
            previous_watermark: Some(d(1)),
            watermark: Some(d(2)),
            dataset_saved: true,
            watermark_saved: true,
            chart_rendered: false,
        }
    }

    #[test]
    fn summary_lists_counts_and_series() {
        let dataset = Dataset::new(vec![Series::new(
            "SF43718",
            "FIX",
            vec![
                Observation::new(d(1), "17.05"),
                Observation::new(d(2), "17.10"),
            ],
        )]);

        let txt = format_sync_summary(&report(), &dataset);

        assert!(txt.contains("Mode: update\n"));
        assert!(txt.contains("Window: [2024-01-01, 2024-01-03]\n"));
        assert!(txt.contains("Fetched: 1 series, 2 observations (1 records skipped)\n"));
        assert!(txt.contains("Watermark: 2024-01-01 -> 2024-01-02\n"));
        assert!(txt.contains("Saved: dataset=yes watermark=yes chart=NO\n"));
        assert!(txt.contains("2024-01-01..2024-01-02 (last 17.10)"));
        assert!(!txt.contains("Ignored"));
    }
}
