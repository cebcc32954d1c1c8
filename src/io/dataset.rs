//! Read/write the persisted dataset (`data.json`).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::NamedTempFile;

use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::LoadOutcome;

#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadOutcome<Dataset> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadOutcome::Absent,
            Err(e) => {
                let reason = format!("Failed to read '{}': {e}", self.path.display());
                warn!("{reason}");
                return LoadOutcome::Corrupt(reason);
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return LoadOutcome::Absent;
        }

        match serde_json::from_slice::<Dataset>(&bytes) {
            Ok(dataset) => {
                info!(
                    "Loaded {} series ({} observations) from '{}'",
                    dataset.series.len(),
                    dataset.observation_count(),
                    self.path.display()
                );
                LoadOutcome::Present(dataset)
            }
            Err(e) => {
                let reason = format!("Invalid dataset JSON in '{}': {e}", self.path.display());
                warn!("{reason}");
                LoadOutcome::Corrupt(reason)
            }
        }
    }

    /// Write the dataset next to its destination, then rename it into place.
    pub fn save(&self, dataset: &Dataset) -> Result<(), AppError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
            AppError::local(format!("Failed to create temp file in '{}': {e}", dir.display()))
        })?;

        serde_json::to_writer_pretty(&mut tmp, dataset)
            .map_err(|e| AppError::local(format!("Failed to write dataset JSON: {e}")))?;
        writeln!(tmp).map_err(|e| AppError::local(format!("Failed to write dataset JSON: {e}")))?;

        tmp.persist(&self.path).map_err(|e| {
            AppError::local(format!("Failed to replace '{}': {e}", self.path.display()))
        })?;

        info!("Dataset saved to '{}'", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Observation, Series};

    fn sample() -> Dataset {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Dataset::new(vec![Series::new(
            "SF43718",
            "FIX",
            vec![Observation::new(date, "17.10")],
        )])
    }

    #[test]
    fn missing_or_blank_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.json"));
        assert_eq!(store.load(), LoadOutcome::Absent);

        fs::write(store.path(), "  \n").unwrap();
        assert_eq!(store.load(), LoadOutcome::Absent);
    }

    #[test]
    fn corrupt_file_is_reported_and_collapses_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.json"));
        fs::write(store.path(), "{\"series\": [ {").unwrap();

        let outcome = store.load();
        assert!(matches!(outcome, LoadOutcome::Corrupt(_)));
        assert_eq!(outcome.into_option(), None);
    }

    #[test]
    fn save_then_load_returns_same_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.json"));
        store.save(&sample()).unwrap();

        assert_eq!(store.load(), LoadOutcome::Present(sample()));
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"fecha\": \"02/01/2024\""));
        assert!(text.contains("\"idSerie\": \"SF43718\""));
    }

    #[test]
    fn save_into_missing_directory_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("missing").join("data.json"));
        assert!(store.save(&sample()).is_err());
        assert_eq!(store.load(), LoadOutcome::Absent);
    }
}
