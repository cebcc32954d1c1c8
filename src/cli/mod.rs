//! Command-line parsing for the exchange-rate sync job.
//!
//! Every option has a default, so a bare `fx-sync` performs the standard
//! sync-and-render cycle in the current directory.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::data::{DEFAULT_BASE_URL, DEFAULT_SERIES_ID};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fx-sync",
    version,
    about = "Incrementally sync the Banxico FIX exchange rate and chart it"
)]
pub struct Cli {
    /// Series identifier to request from the provider.
    #[arg(long, default_value = DEFAULT_SERIES_ID)]
    pub series: String,

    /// Base URL of the provider's series endpoint.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Persisted dataset (JSON).
    #[arg(long, default_value = "data.json", value_hint = clap::ValueHint::FilePath)]
    pub data_file: PathBuf,

    /// File holding the last synchronized date (yyyy-MM-dd).
    #[arg(long, default_value = "lastUpdate.txt", value_hint = clap::ValueHint::FilePath)]
    pub watermark_file: PathBuf,

    /// Output path for the SVG chart.
    #[arg(long, default_value = "chart.svg", value_hint = clap::ValueHint::FilePath)]
    pub chart: PathBuf,

    /// First date requested when no watermark exists (yyyy-MM-dd).
    #[arg(long, default_value = "2023-01-01")]
    pub default_start: NaiveDate,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    pub request_timeout: u64,

    /// Connection-establishment timeout in seconds.
    #[arg(long, default_value_t = 20)]
    pub connect_timeout: u64,

    /// Print an ASCII plot of the first series after syncing.
    #[arg(long)]
    pub preview: bool,

    /// Preview width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Preview height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Minimum log level to display.
    #[arg(long, default_value_t = LogLevelArg::Info, value_enum)]
    pub log_level: LogLevelArg,

    /// Append log output to this file (rotated by size, parent dir created).
    #[arg(long, default_value = "logs/app.log", value_hint = clap::ValueHint::FilePath)]
    pub log_file: PathBuf,

    /// Log to stderr instead of the log file.
    #[arg(long)]
    pub log_stderr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_defaults() {
        let cli = Cli::parse_from(["fx-sync"]);
        assert_eq!(cli.series, "SF43718");
        assert_eq!(cli.data_file, PathBuf::from("data.json"));
        assert_eq!(cli.watermark_file, PathBuf::from("lastUpdate.txt"));
        assert_eq!(cli.chart, PathBuf::from("chart.svg"));
        assert_eq!(cli.default_start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(cli.request_timeout, 60);
        assert_eq!(cli.connect_timeout, 20);
        assert!(!cli.preview);
        assert_eq!(cli.log_level, LogLevelArg::Info);
        assert_eq!(cli.log_file, PathBuf::from("logs/app.log"));
        assert!(!cli.log_stderr);
    }

    #[test]
    fn invalid_default_start_is_rejected() {
        assert!(Cli::try_parse_from(["fx-sync", "--default-start", "01/01/2023"]).is_err());
    }
}
