use chrono::NaiveDate;

use crate::domain::FetchWindow;

/// Window for the next fetch: `[watermark or default_start, today]`.
///
/// The lower bound never passes `today`, so a future-dated watermark still
/// yields a valid (single-day) window.
pub fn fetch_window(
    watermark: Option<NaiveDate>,
    default_start: NaiveDate,
    today: NaiveDate,
) -> FetchWindow {
    let start = watermark.unwrap_or(default_start).min(today);
    FetchWindow { start, end: today }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn uses_default_start_without_watermark() {
        let w = fetch_window(None, d(2023, 1, 1), d(2024, 5, 1));
        assert_eq!(w.start, d(2023, 1, 1));
        assert_eq!(w.end, d(2024, 5, 1));
    }

    #[test]
    fn watermark_is_the_lower_bound() {
        let w = fetch_window(Some(d(2024, 4, 30)), d(2023, 1, 1), d(2024, 5, 1));
        assert_eq!(w.start, d(2024, 4, 30));
    }

    #[test]
    fn same_day_rerun_gives_single_day_window() {
        let today = d(2024, 5, 1);
        let w = fetch_window(Some(today), d(2023, 1, 1), today);
        assert_eq!(w.start, w.end);
    }

    #[test]
    fn future_watermark_is_clamped_to_today() {
        let today = d(2024, 5, 1);
        let w = fetch_window(Some(d(2025, 1, 1)), d(2023, 1, 1), today);
        assert_eq!(w, FetchWindow { start: today, end: today });
    }
}
