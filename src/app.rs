//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - runs one sync cycle (see `pipeline`)
//! - prints the run summary and optional preview

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::{LevelFilter, error, info};

use crate::cli::Cli;
use crate::domain::SyncConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fx-sync` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = sync_config_from_args(&cli);
    info!("Starting sync for series {}", config.series_id);

    let outcome = pipeline::run_sync(&config).inspect_err(|e| error!("Sync failed: {e}"))?;

    println!(
        "{}",
        crate::report::format_sync_summary(&outcome.report, &outcome.dataset)
    );

    if config.preview {
        if let Some(series) = outcome.dataset.series.first() {
            println!(
                "{}",
                crate::plot::render_ascii_plot(series, config.plot_width, config.plot_height)
            );
        }
    }

    Ok(())
}

pub fn sync_config_from_args(cli: &Cli) -> SyncConfig {
    SyncConfig {
        series_id: cli.series.clone(),
        base_url: cli.base_url.clone(),
        data_file: cli.data_file.clone(),
        watermark_file: cli.watermark_file.clone(),
        chart_path: cli.chart.clone(),
        default_start: cli.default_start,
        request_timeout: Duration::from_secs(cli.request_timeout),
        connect_timeout: Duration::from_secs(cli.connect_timeout),
        preview: cli.preview,
        plot_width: cli.width,
        plot_height: cli.height,
    }
}

/// Rotate once the active log file reaches this size.
const LOG_MAX_BYTES: u64 = 1024 * 1024;
/// Rotated files kept next to the active one (`app.1.log` .. `app.9.log`).
const LOG_KEEP: usize = 9;

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default());
    logger.filter_level(LevelFilter::from(cli.log_level));

    if !cli.log_stderr {
        let path = &cli.log_file;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::local(format!("Failed to create log dir '{}': {e}", dir.display()))
            })?;
        }
        rotate_log(path, LOG_MAX_BYTES, LOG_KEEP).map_err(|e| {
            AppError::local(format!("Failed to rotate log file '{}': {e}", path.display()))
        })?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                AppError::local(format!("Failed to open log file '{}': {e}", path.display()))
            })?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }

    let _ = logger.try_init();
    Ok(())
}

/// `logs/app.log` -> `logs/app.{n}.log`
fn rotated_path(path: &Path, n: usize) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("app");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{n}.{ext}"),
        None => format!("{stem}.{n}"),
    };
    path.with_file_name(name)
}

/// Shift `path` to `.1`, `.1` to `.2`, ... once it reaches `max_bytes`,
/// dropping anything past `keep`.
fn rotate_log(path: &Path, max_bytes: u64, keep: usize) -> std::io::Result<()> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if len < max_bytes || keep == 0 {
        return Ok(());
    }

    let oldest = rotated_path(path, keep);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..keep).rev() {
        let from = rotated_path(path, n);
        if from.exists() {
            fs::rename(&from, rotated_path(path, n + 1))?;
        }
    }
    fs::rename(path, rotated_path(path, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_mirrors_cli_defaults() {
        let cli = Cli::parse_from(["fx-sync", "--preview", "--request-timeout", "30"]);
        let config = sync_config_from_args(&cli);
        assert_eq!(config.series_id, "SF43718");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(20));
        assert!(config.preview);
        assert_eq!(config.plot_width, 100);
    }

    #[test]
    fn small_log_is_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        fs::write(&log, "short").unwrap();

        rotate_log(&log, 1024, 3).unwrap();

        assert!(log.exists());
        assert!(!dir.path().join("app.1.log").exists());
    }

    #[test]
    fn full_log_shifts_and_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        fs::write(&log, "current!").unwrap();
        fs::write(dir.path().join("app.1.log"), "one").unwrap();
        fs::write(dir.path().join("app.2.log"), "two").unwrap();

        rotate_log(&log, 4, 2).unwrap();

        assert!(!log.exists());
        assert_eq!(fs::read_to_string(dir.path().join("app.1.log")).unwrap(), "current!");
        assert_eq!(fs::read_to_string(dir.path().join("app.2.log")).unwrap(), "one");
        assert!(!dir.path().join("app.3.log").exists());
    }

    #[test]
    fn missing_log_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        rotate_log(&dir.path().join("app.log"), 1, 3).unwrap();
    }
}
