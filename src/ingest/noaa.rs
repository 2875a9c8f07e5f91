//! NOAA / National Weather Service API client
//!
//! Hourly forecasts are addressed by forecast office + grid cell, not by
//! coordinate, so every forecast fetch runs three steps in order:
//!
//! 1. resolve `lat,lon` → (office, gridX, gridY) via `/points`
//! 2. wait `NOAA_RATE_LIMIT_PAUSE` (NWS usage policy; skipping it gets
//!    clients throttled or blocked)
//! 3. fetch `/gridpoints/{office}/{x},{y}/forecast/hourly`
//!
//! A failed resolve aborts the whole fetch. Gridpoints are not cached.
//!
//! API Documentation: https://www.weather.gov/documentation/services-web-api

use crate::config::CollectorConfig;
use crate::ingest::{Collector, logged};
use crate::logging;
use crate::model::{
    CollectError, ConfigError, Coordinates, DataSource, Gridpoint, NoaaForecastRecord, RecordBatch,
};
use crate::transport::{BlockingTransport, HttpRequest, Pacer, ThreadPacer, Transport};
use crate::units::{parse_wind_speed, temperature_to_celsius};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Mandatory wait between the points lookup and the forecast request.
pub const NOAA_RATE_LIMIT_PAUSE: Duration = Duration::from_millis(500);

pub const DEFAULT_WIND_SPEED: &str = "0 mph";
pub const DEFAULT_WIND_DIRECTION: &str = "N";

// ============================================================================
// NWS API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    grid_id: String,
    grid_x: i64,
    grid_y: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Option<Vec<ForecastPeriod>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastPeriod {
    start_time: String,
    temperature: f64,
    temperature_unit: String,
    #[serde(default)]
    wind_speed: Option<String>,
    #[serde(default)]
    wind_direction: Option<String>,
    #[serde(default)]
    short_forecast: Option<String>,
}

// ============================================================================
// Normalizers
// ============================================================================

/// Pull the grid address out of a `/points` response.
pub fn parse_gridpoint(raw: &Value) -> Result<Gridpoint, CollectError> {
    let points = PointsResponse::deserialize(raw).map_err(|e| CollectError::parse("NWS points response", e))?;
    Ok(Gridpoint {
        office: points.properties.grid_id,
        grid_x: points.properties.grid_x,
        grid_y: points.properties.grid_y,
    })
}

/// `properties.periods[]` → forecast records stamped with the requested
/// coordinates (not the grid cell's own centroid).
///
/// Defaults for absent fields: wind speed `"0 mph"`, wind direction `"N"`,
/// forecast text `""`.
pub fn normalize_forecast(raw: &Value, requested: Coordinates) -> Result<Vec<NoaaForecastRecord>, CollectError> {
    let forecast =
        ForecastResponse::deserialize(raw).map_err(|e| CollectError::parse("NWS forecast response", e))?;
    let periods = forecast
        .properties
        .and_then(|p| p.periods)
        .unwrap_or_default();

    periods
        .into_iter()
        .map(|period| {
            let timestamp = DateTime::parse_from_rfc3339(&period.start_time)
                .map_err(|e| CollectError::parse(&format!("NWS startTime '{}'", period.start_time), e))?
                .with_timezone(&Utc);
            let wind_speed = period.wind_speed.as_deref().unwrap_or(DEFAULT_WIND_SPEED);

            Ok(NoaaForecastRecord {
                timestamp,
                latitude: requested.latitude,
                longitude: requested.longitude,
                temperature_c: temperature_to_celsius(period.temperature, &period.temperature_unit),
                wind_speed_ms: parse_wind_speed(wind_speed),
                wind_direction: period
                    .wind_direction
                    .unwrap_or_else(|| DEFAULT_WIND_DIRECTION.to_string()),
                forecast_text: period.short_forecast.unwrap_or_default(),
                data_source: DataSource::Noaa,
            })
        })
        .collect()
}

// ============================================================================
// API Client
// ============================================================================

pub struct NoaaCollector<T = BlockingTransport, P = ThreadPacer> {
    transport: T,
    pacer: P,
    base_url: String,
    user_agent: String,
}

impl NoaaCollector {
    pub fn from_config(config: &CollectorConfig) -> Result<Self, ConfigError> {
        Ok(NoaaCollector::with_transport(config, config.transport()?))
    }
}

impl<T: Transport> NoaaCollector<T> {
    pub fn with_transport(config: &CollectorConfig, transport: T) -> Self {
        Self {
            transport,
            pacer: ThreadPacer,
            base_url: config.noaa.base_url.trim_end_matches('/').to_string(),
            user_agent: config.noaa.user_agent(),
        }
    }
}

impl<T: Transport, P: Pacer> NoaaCollector<T, P> {
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> NoaaCollector<T, Q> {
        NoaaCollector {
            transport: self.transport,
            pacer,
            base_url: self.base_url,
            user_agent: self.user_agent,
        }
    }

    /// Resolve a coordinate pair to its NWS forecast gridpoint.
    pub fn get_gridpoint(&self, latitude: f64, longitude: f64) -> Result<Gridpoint, CollectError> {
        let coords = Coordinates::new(latitude, longitude);
        let context = coords.to_string();
        let url = format!("{}/points/{}", self.base_url, coords);

        let raw = logged(
            DataSource::Noaa,
            &context,
            "gridpoint lookup",
            self.get_json(&url),
        )?;
        let gridpoint = logged(DataSource::Noaa, &context, "gridpoint lookup", parse_gridpoint(&raw))?;
        tracing::debug!(
            context = %context,
            office = %gridpoint.office,
            grid_x = gridpoint.grid_x,
            grid_y = gridpoint.grid_y,
            "resolved gridpoint"
        );
        Ok(gridpoint)
    }

    /// Hourly forecast for a coordinate pair: resolve, wait, fetch, normalize.
    pub fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<NoaaForecastRecord>, CollectError> {
        let coords = Coordinates::new(latitude, longitude);
        let context = coords.to_string();

        let gridpoint = self.get_gridpoint(latitude, longitude)?;
        self.wait_for_rate_limit();

        let url = format!(
            "{}/gridpoints/{}/{},{}/forecast/hourly",
            self.base_url, gridpoint.office, gridpoint.grid_x, gridpoint.grid_y
        );
        let raw = logged(DataSource::Noaa, &context, "hourly forecast", self.get_json(&url))?;
        let records = logged(
            DataSource::Noaa,
            &context,
            "forecast normalization",
            normalize_forecast(&raw, coords),
        )?;

        logging::log_batch_summary(DataSource::Noaa, "forecast", &context, records.len());
        Ok(records)
    }

    /// NWS usage policy: never hit the forecast endpoint straight after a
    /// points lookup.
    fn wait_for_rate_limit(&self) {
        self.pacer.pause(NOAA_RATE_LIMIT_PAUSE);
    }

    fn get_json(&self, url: &str) -> Result<Value, CollectError> {
        tracing::debug!(url, "NWS request");
        let request = HttpRequest::get(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/geo+json");
        Ok(self.transport.send(&request)?)
    }
}

impl<T: Transport, P: Pacer> Collector for NoaaCollector<T, P> {
    type Query = Coordinates;

    fn source(&self) -> DataSource {
        DataSource::Noaa
    }

    fn collect(&self, query: &Coordinates) -> Result<RecordBatch, CollectError> {
        self.get_forecast(query.latitude, query.longitude)
            .map(RecordBatch::NoaaForecast)
    }
}

// ============================================================================
// Tests
// ============================================================================
