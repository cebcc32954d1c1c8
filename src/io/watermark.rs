//! Read/write the watermark file (`lastUpdate.txt`).
//!
//! The file holds a single ISO date (`yyyy-MM-dd`): the latest observation
//! date already persisted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::{ISO_DATE_FORMAT, parse_iso_date};
use crate::error::AppError;
use crate::io::LoadOutcome;

#[derive(Debug, Clone)]
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadOutcome<NaiveDate> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadOutcome::Absent,
            Err(e) => {
                let reason = format!("Failed to read '{}': {e}", self.path.display());
                warn!("{reason}");
                return LoadOutcome::Corrupt(reason);
            }
        };

        if text.trim().is_empty() {
            return LoadOutcome::Absent;
        }

        match parse_iso_date(&text) {
            Some(date) => LoadOutcome::Present(date),
            None => {
                let reason = format!(
                    "Invalid watermark '{}' in '{}'",
                    text.trim(),
                    self.path.display()
                );
                warn!("{reason}");
                LoadOutcome::Corrupt(reason)
            }
        }
    }

    pub fn save(&self, date: NaiveDate) -> Result<(), AppError> {
        fs::write(&self.path, date.format(ISO_DATE_FORMAT).to_string()).map_err(|e| {
            AppError::local(format!("Failed to write '{}': {e}", self.path.display()))
        })?;
        info!("Watermark {date} saved to '{}'", self.path.display());
        Ok(())
    }
}
