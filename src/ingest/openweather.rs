//! OpenWeatherMap API client
//!
//! Two operations over the same key and base URL:
//! - current weather: returned as the provider's raw JSON, untouched
//! - 5 day / 3 hour forecast: normalized into uniform records
//!
//! Both requests ask for `units=metric`, so temperatures already arrive in
//! Celsius and wind speeds in m/s; nothing is converted client-side.
//!
//! API Documentation: https://openweathermap.org/forecast5

use crate::config::{CollectorConfig, ENV_OPENWEATHER_API_KEY, require_credential};
use crate::ingest::{Collector, logged};
use crate::logging;
use crate::model::{
    CollectError, ConfigError, Coordinates, DataSource, OpenWeatherForecastRecord, RecordBatch,
};
use crate::transport::{BlockingTransport, HttpRequest, Transport};
use crate::units::normalize_degrees;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_WIND_DIRECTION_DEG: f64 = 0.0;

// ============================================================================
// OpenWeatherMap Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Option<Vec<ForecastEntry>>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainReadings,
    wind: Wind,
    clouds: Clouds,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
    #[serde(default)]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
}

// ============================================================================
// Normalizer
// ============================================================================

/// `list[]` → forecast records stamped with the requested coordinates.
///
/// `wind.deg` defaults to 0 when absent. An entry without any `weather`
/// condition is malformed and fails the batch.
pub fn normalize_forecast(
    raw: &Value,
    requested: Coordinates,
) -> Result<Vec<OpenWeatherForecastRecord>, CollectError> {
    let forecast =
        ForecastResponse::deserialize(raw).map_err(|e| CollectError::parse("OpenWeatherMap forecast", e))?;

    forecast
        .list
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let timestamp = DateTime::from_timestamp(entry.dt, 0)
                .ok_or_else(|| CollectError::Parse(format!("forecast dt {} out of range", entry.dt)))?;
            let weather_main = entry
                .weather
                .into_iter()
                .next()
                .map(|c| c.main)
                .ok_or_else(|| CollectError::Parse(format!("forecast entry {} has no weather condition", entry.dt)))?;

            Ok(OpenWeatherForecastRecord {
                timestamp,
                latitude: requested.latitude,
                longitude: requested.longitude,
                temperature_c: entry.main.temp,
                humidity_pct: entry.main.humidity,
                wind_speed_ms: entry.wind.speed,
                wind_direction_deg: normalize_degrees(entry.wind.deg.unwrap_or(DEFAULT_WIND_DIRECTION_DEG)),
                cloud_cover_pct: entry.clouds.all,
                weather_main,
                data_source: DataSource::OpenWeatherMap,
            })
        })
        .collect()
}

// ============================================================================
// API Client
// ============================================================================

pub struct OpenWeatherCollector<T = BlockingTransport> {
    transport: T,
    api_key: String,
    base_url: String,
}

impl OpenWeatherCollector {
    /// Production collector. Fails immediately when `OPENWEATHER_API_KEY` is unset.
    pub fn from_config(config: &CollectorConfig) -> Result<Self, ConfigError> {
        let transport = config.transport()?;
        OpenWeatherCollector::with_transport(config, transport)
    }
}

impl<T: Transport> OpenWeatherCollector<T> {
    pub fn with_transport(config: &CollectorConfig, transport: T) -> Result<Self, ConfigError> {
        let api_key = require_credential(config.openweather.api_key.as_deref(), ENV_OPENWEATHER_API_KEY)?;
        Ok(Self {
            transport,
            api_key,
            base_url: config.openweather.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Current conditions, exactly as the provider returned them.
    pub fn get_current_weather(&self, latitude: f64, longitude: f64) -> Result<Value, CollectError> {
        let coords = Coordinates::new(latitude, longitude);
        logged(
            DataSource::OpenWeatherMap,
            &coords.to_string(),
            "current weather",
            self.get_json("weather", coords),
        )
    }

    /// 5 day / 3 hour forecast as uniform records.
    pub fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<OpenWeatherForecastRecord>, CollectError> {
        let coords = Coordinates::new(latitude, longitude);
        let context = coords.to_string();

        let raw = logged(
            DataSource::OpenWeatherMap,
            &context,
            "forecast",
            self.get_json("forecast", coords),
        )?;
        let records = logged(
            DataSource::OpenWeatherMap,
            &context,
            "forecast normalization",
            normalize_forecast(&raw, coords),
        )?;

        logging::log_batch_summary(DataSource::OpenWeatherMap, "forecast", &context, records.len());
        Ok(records)
    }

    fn get_json(&self, endpoint: &str, coords: Coordinates) -> Result<Value, CollectError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(url = %url, lat = coords.latitude, lon = coords.longitude, "OpenWeatherMap request");

        let request = HttpRequest::get(url)
            .query("lat", coords.latitude)
            .query("lon", coords.longitude)
            .query("appid", &self.api_key)
            .query("units", "metric");
        Ok(self.transport.send(&request)?)
    }
}

impl<T: Transport> Collector for OpenWeatherCollector<T> {
    type Query = Coordinates;

    fn source(&self) -> DataSource {
        DataSource::OpenWeatherMap
    }

    fn collect(&self, query: &Coordinates) -> Result<RecordBatch, CollectError> {
        self.get_forecast(query.latitude, query.longitude)
            .map(RecordBatch::OpenWeatherForecast)
    }
}

// ============================================================================
// Tests
// ============================================================================
