//! Core data types for the energy & weather collection service.
//!
//! This module defines the uniform record schema shared by every provider
//! adapter, the provenance tag, and the error types raised along the
//! fetch → normalize path. It contains no I/O.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Fixed tag identifying which provider produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataSource {
    #[serde(rename = "EIA")]
    Eia,
    #[serde(rename = "NOAA")]
    Noaa,
    #[serde(rename = "OpenWeatherMap")]
    OpenWeatherMap,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Eia => "EIA",
            DataSource::Noaa => "NOAA",
            DataSource::OpenWeatherMap => "OpenWeatherMap",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request-side types
// ---------------------------------------------------------------------------

/// A WGS84 coordinate pair as requested by the caller.
///
/// Weather records echo these values back verbatim, even when the provider
/// snaps the request to its own grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Inclusive hour-granular window for EIA queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Format EIA expects for `start` / `end` on hourly datasets.
pub const EIA_HOUR_FORMAT: &str = "%Y-%m-%dT%H";

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days` days leading up to `now`.
    ///
    /// Takes `now` explicitly so callers (and tests) control the clock.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    pub fn start_param(&self) -> String {
        self.start.format(EIA_HOUR_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(EIA_HOUR_FORMAT).to_string()
    }
}

/// NWS forecast grid address resolved from a coordinate pair.
///
/// Lives only for the duration of a single forecast fetch; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gridpoint {
    pub office: String,
    pub grid_x: i64,
    pub grid_y: i64,
}

// ---------------------------------------------------------------------------
// Uniform records
// ---------------------------------------------------------------------------

/// Hourly electricity demand for a balancing authority or subregion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandRecord {
    pub timestamp: DateTime<Utc>,
    pub region: String,
    /// `None` when EIA reports a null value for the hour.
    pub demand_mw: Option<f64>,
    pub data_source: DataSource,
}

/// Hourly generation for a single fuel type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRecord {
    pub timestamp: DateTime<Utc>,
    pub region: String,
    pub fuel_type: Option<String>,
    pub generation_mw: Option<f64>,
    pub data_source: DataSource,
}

/// One hourly period of an NWS gridpoint forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoaaForecastRecord {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    /// Compass point as reported ("NNW"), "N" when absent.
    pub wind_direction: String,
    pub forecast_text: String,
    pub data_source: DataSource,
}

/// One 3-hour step of an OpenWeatherMap forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenWeatherForecastRecord {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: f64,
    pub cloud_cover_pct: f64,
    pub weather_main: String,
    pub data_source: DataSource,
}

/// A normalized batch from a single fetch.
///
/// The variant fixes the record kind, so a batch can never mix field sets
/// or providers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum RecordBatch {
    Demand(Vec<DemandRecord>),
    Generation(Vec<GenerationRecord>),
    NoaaForecast(Vec<NoaaForecastRecord>),
    OpenWeatherForecast(Vec<OpenWeatherForecastRecord>),
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        match self {
            RecordBatch::Demand(r) => r.len(),
            RecordBatch::Generation(r) => r.len(),
            RecordBatch::NoaaForecast(r) => r.len(),
            RecordBatch::OpenWeatherForecast(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_source(&self) -> DataSource {
        match self {
            RecordBatch::Demand(_) | RecordBatch::Generation(_) => DataSource::Eia,
            RecordBatch::NoaaForecast(_) => DataSource::Noaa,
            RecordBatch::OpenWeatherForecast(_) => DataSource::OpenWeatherMap,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecordBatch::Demand(_) => "demand",
            RecordBatch::Generation(_) => "generation",
            RecordBatch::NoaaForecast(_) => "noaa_forecast",
            RecordBatch::OpenWeatherForecast(_) => "openweather_forecast",
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures raised by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-2xx HTTP response.
    #[error("HTTP error: {status} from {url}")]
    Status { status: u16, url: String },
    /// Connection, timeout or other I/O failure before a response arrived.
    #[error("request failed: {0}")]
    Network(String),
    /// The response body was not valid JSON.
    #[error("response body is not JSON: {0}")]
    Decode(String),
}

/// Errors surfaced by a fetch-and-normalize call.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A required response field was missing or malformed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CollectError {
    pub(crate) fn parse(context: &str, err: impl fmt::Display) -> Self {
        CollectError::Parse(format!("{}: {}", context, err))
    }
}

/// Errors raised while building configuration or constructing an adapter.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),
}
