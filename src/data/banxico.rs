//! Banxico SIE API integration for a single exchange-rate series.

use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::domain::{FetchWindow, Observation, Series, SyncConfig, parse_datum_date};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://www.banxico.org.mx/SieAPIRest/service/v1/series";
/// FIX exchange rate, pesos per US dollar.
pub const DEFAULT_SERIES_ID: &str = "SF43718";
pub const TOKEN_ENV: &str = "API_TOKEN_BMX";

const TOKEN_HEADER: &str = "Bmx-Token";
const JSON_MIME_TYPE: &str = "application/json";

/// Anything that can return observations for a date window.
pub trait ObservationSource {
    fn fetch(&self, window: FetchWindow) -> Result<FetchedBatch, AppError>;
}

/// Validated result of one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedBatch {
    /// Series in provider order. Observation lists may be empty.
    pub series: Vec<Series>,
    /// Records dropped because their date or value did not parse.
    pub skipped_records: usize,
}

impl FetchedBatch {
    pub fn observation_count(&self) -> usize {
        self.series.iter().map(|s| s.observations.len()).sum()
    }
}

pub struct BanxicoClient {
    client: Client,
    base_url: String,
    series_id: String,
    token: String,
}

impl BanxicoClient {
    /// Build a client using the token from `API_TOKEN_BMX` (`.env` is honored).
    ///
    /// A missing token is not an error; the provider will reject the request
    /// and that rejection is reported as a fetch failure.
    pub fn from_env(config: &SyncConfig) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let token = match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.is_empty() => token,
            _ => {
                warn!("{TOKEN_ENV} environment variable is not set; sending an empty token");
                String::new()
            }
        };
        Self::new(config, token)
    }

    pub fn new(config: &SyncConfig, token: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::local(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            series_id: config.series_id.clone(),
            token: token.into(),
        })
    }

    pub fn url_for(&self, window: FetchWindow) -> String {
        format!(
            "{}/{}/datos/{}",
            self.base_url,
            self.series_id,
            window.path_segments()
        )
    }
}

impl ObservationSource for BanxicoClient {
    fn fetch(&self, window: FetchWindow) -> Result<FetchedBatch, AppError> {
        let url = self.url_for(window);
        info!("Requesting series {} for window {window}", self.series_id);
        debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, JSON_MIME_TYPE)
            .header(TOKEN_HEADER, self.token.as_str())
            .send()
            .map_err(|e| AppError::fetch(format!("Banxico request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(AppError::fetch(format!(
                "Banxico request failed with status {status}."
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::fetch(format!("Failed to read Banxico response: {e}")))?;

        let batch = parse_response(&body)?;
        info!(
            "Fetched {} series, {} observations ({} records skipped)",
            batch.series.len(),
            batch.observation_count(),
            batch.skipped_records
        );
        Ok(batch)
    }
}

#[derive(Debug, Deserialize)]
struct BmxResponse {
    bmx: BmxEnvelope,
}

#[derive(Debug, Deserialize)]
struct BmxEnvelope {
    #[serde(default)]
    series: Option<Vec<RawSeries>>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    #[serde(rename = "idSerie")]
    id: String,
    #[serde(rename = "titulo", default)]
    title: Option<String>,
    // Kept as raw JSON so that one bad record cannot fail the whole document.
    #[serde(rename = "datos", default)]
    records: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RawDatum {
    dato: String,
    fecha: String,
}

/// Parse a provider response body into validated series.
///
/// An unreadable envelope is a fetch failure; an individual record with a bad
/// shape, date or value is skipped and counted.
pub fn parse_response(body: &str) -> Result<FetchedBatch, AppError> {
    let response: BmxResponse = serde_json::from_str(body)
        .map_err(|e| AppError::fetch(format!("Failed to parse Banxico response: {e}")))?;

    let mut batch = FetchedBatch::default();
    for raw in response.bmx.series.unwrap_or_default() {
        let mut observations = Vec::new();
        for record in raw.records.unwrap_or_default() {
            match parse_record(record) {
                Ok(obs) => observations.push(obs),
                Err(reason) => {
                    warn!("Skipping record in series {}: {reason}", raw.id);
                    batch.skipped_records += 1;
                }
            }
        }
        batch.series.push(Series::new(
            raw.id,
            raw.title.as_deref().unwrap_or_default(),
            observations,
        ));
    }

    Ok(batch)
}

fn parse_record(record: serde_json::Value) -> Result<Observation, String> {
    let datum: RawDatum =
        serde_json::from_value(record).map_err(|e| format!("malformed record ({e})"))?;
    let date = parse_datum_date(&datum.fecha)
        .ok_or_else(|| format!("invalid date '{}'", datum.fecha))?;
    if parse_value(&datum.dato).is_none() {
        return Err(format!("invalid value '{}' on {date}", datum.dato));
    }
    Ok(Observation::new(date, datum.dato))
}

/// Numeric check only; the original string is what gets stored.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
