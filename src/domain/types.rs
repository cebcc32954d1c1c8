//! Shared domain types.
//!
//! The data model doubles as the on-disk JSON shape of the Series Store, so the
//! serde attributes here *are* the persisted format:
//!
//! - `Dataset`      -> `{ "series": [...] }`
//! - `Series`       -> `{ "datos": [...], "idSerie": "...", "titulo": "..." }`
//! - `Observation`  -> `{ "dato": "17.0500", "fecha": "02/01/2024" }`
//!
//! Unknown fields are ignored on read so newer files stay loadable.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Date format used for `fecha` fields (provider responses and `data.json`).
pub const DATUM_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format used for URL path segments and the watermark file.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single `(date, value)` pair.
///
/// `value` is kept exactly as the provider sent it; nothing here rounds or
/// reformats it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "dato")]
    pub value: String,
    #[serde(rename = "fecha", with = "datum_date")]
    pub date: NaiveDate,
}

impl Observation {
    pub fn new(date: NaiveDate, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            date,
        }
    }
}

/// One identified time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    #[serde(rename = "datos", default, deserialize_with = "null_as_empty")]
    pub observations: Vec<Observation>,
    #[serde(rename = "idSerie")]
    pub id: String,
    #[serde(rename = "titulo", default, deserialize_with = "normalized_title")]
    pub title: String,
}

impl Series {
    pub fn new(id: impl Into<String>, title: &str, observations: Vec<Observation>) -> Self {
        Self {
            observations,
            id: id.into(),
            title: normalize_title(title),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).max()
    }

    /// Sort observations ascending by date (stable).
    pub fn sort_observations(&mut self) {
        self.observations.sort_by_key(|o| o.date);
    }
}

/// The full collection of tracked series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub series: Vec<Series>,
}

impl Dataset {
    pub fn new(series: Vec<Series>) -> Self {
        Self { series }
    }

    /// `true` when the dataset tracks no series at all (first-run state).
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Series> {
        self.series.iter_mut().find(|s| s.id == id)
    }

    pub fn observation_count(&self) -> usize {
        self.series.iter().map(|s| s.observations.len()).sum()
    }

    /// Latest observation date across every series (the watermark).
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.series.iter().filter_map(Series::latest_date).max()
    }
}

/// Inclusive `[start, end]` date range requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// `start/end` as `yyyy-MM-dd` path segments.
    pub fn path_segments(&self) -> String {
        format!(
            "{}/{}",
            self.start.format(ISO_DATE_FORMAT),
            self.end.format(ISO_DATE_FORMAT)
        )
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Fully-resolved configuration for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub series_id: String,
    pub base_url: String,
    pub data_file: PathBuf,
    pub watermark_file: PathBuf,
    pub chart_path: PathBuf,
    /// Lower bound of the fetch window when no watermark exists.
    pub default_start: NaiveDate,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub preview: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Collapse every run of whitespace into a single ASCII space.
pub fn normalize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

pub fn parse_datum_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATUM_DATE_FORMAT).ok()
}

pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT).ok()
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn normalized_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(normalize_title(&raw))
}

mod datum_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATUM_DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATUM_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), DATUM_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn title_whitespace_is_collapsed() {
        assert_eq!(
            normalize_title("Tipo de cambio\n   Pesos  por\tdólar"),
            "Tipo de cambio Pesos por dólar"
        );
        assert_eq!(normalize_title("  a  "), " a ");
    }

    #[test]
    fn series_serializes_in_persisted_shape() {
        let series = Series::new("SF43718", "FIX", vec![Observation::new(d(2024, 1, 2), "17.10")]);
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(
            json,
            r#"{"datos":[{"dato":"17.10","fecha":"02/01/2024"}],"idSerie":"SF43718","titulo":"FIX"}"#
        );
    }

    #[test]
    fn dataset_read_ignores_unknown_fields_and_null_lists() {
        let raw = r#"{
            "series": [
                {"idSerie": "A", "titulo": "Rate\n  MXN", "datos": null, "extra": 1},
                {"idSerie": "B", "datos": [{"dato": "1.5", "fecha": "31/12/2023", "note": "x"}]}
            ],
            "version": 3
        }"#;
        let dataset: Dataset = serde_json::from_str(raw).unwrap();
        assert_eq!(dataset.series.len(), 2);
        assert!(dataset.series[0].is_empty());
        assert_eq!(dataset.series[0].title, "Rate MXN");
        assert_eq!(dataset.series[1].title, "");
        assert_eq!(dataset.series[1].observations[0].date, d(2023, 12, 31));
    }

    #[test]
    fn latest_date_spans_all_series() {
        let dataset = Dataset::new(vec![
            Series::new("A", "a", vec![Observation::new(d(2024, 1, 5), "1")]),
            Series::new("B", "b", vec![]),
            Series::new(
                "C",
                "c",
                vec![
                    Observation::new(d(2024, 2, 1), "2"),
                    Observation::new(d(2024, 1, 1), "3"),
                ],
            ),
        ]);
        assert_eq!(dataset.latest_date(), Some(d(2024, 2, 1)));
        assert_eq!(Dataset::default().latest_date(), None);
    }

    #[test]
    fn window_path_segments_are_iso() {
        let window = FetchWindow {
            start: d(2023, 1, 1),
            end: d(2024, 3, 9),
        };
        assert_eq!(window.path_segments(), "2023-01-01/2024-03-09");
    }

    #[test]
    fn date_parsers_reject_wrong_format() {
        assert_eq!(parse_datum_date("02/01/2024"), Some(d(2024, 1, 2)));
        assert_eq!(parse_datum_date("2024-01-02"), None);
        assert_eq!(parse_iso_date(" 2024-01-02\n"), Some(d(2024, 1, 2)));
        assert_eq!(parse_iso_date("02/01/2024"), None);
    }
}
