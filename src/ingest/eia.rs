//! EIA (U.S. Energy Information Administration) API v2 client
//!
//! Retrieves hourly electric grid data from the EIA "electricity/rto"
//! datasets and normalizes it into demand / generation records.
//!
//! Unlike the weather providers, EIA takes its query as a JSON body on a
//! POST: frequency, data columns, facet filters, date window, sort and
//! pagination all travel in the body while the API key rides in the URL.
//!
//! API Documentation: https://www.eia.gov/opendata/documentation.php

use crate::config::{CollectorConfig, require_credential};
use crate::ingest::{Collector, logged};
use crate::logging;
use crate::model::{
    CollectError, ConfigError, DataSource, DateRange, DemandRecord, GenerationRecord, RecordBatch,
};
use crate::transport::{BlockingTransport, HttpRequest, Pacer, ThreadPacer, Transport};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use std::time::Duration;

/// Courtesy pause after every successful EIA call.
pub const EIA_REQUEST_PAUSE: Duration = Duration::from_millis(100);

/// Rows requested per call; EIA caps a page at 5000.
pub const EIA_PAGE_LENGTH: u32 = 5000;

/// Window used when the caller gives no date range.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Region for demand and subregion queries that name none.
pub const DEFAULT_REGION: &str = "US48";
pub const DEFAULT_GENERATION_REGION: &str = "CISO";
pub const DEFAULT_FUEL_TYPE: &str = "SUN";

// ============================================================================
// Query types
// ============================================================================

/// Which EIA series to pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EiaMetric {
    /// Balancing-authority demand (`type = D`).
    Demand,
    /// Generation for one fuel type (SUN = solar, WND = wind, ...).
    RenewableGeneration { fuel_type: String },
    /// Demand broken out by subregion.
    SubregionDemand,
}

impl EiaMetric {
    pub fn dataset(&self) -> &'static str {
        match self {
            EiaMetric::Demand => "electricity/rto/region-data",
            EiaMetric::RenewableGeneration { .. } => "electricity/rto/fuel-type-data",
            EiaMetric::SubregionDemand => "electricity/rto/subregion-data",
        }
    }

    /// Solar generation, the series pulled when no fuel type is named.
    pub fn default_generation() -> Self {
        EiaMetric::RenewableGeneration {
            fuel_type: DEFAULT_FUEL_TYPE.to_string(),
        }
    }

    pub fn default_region(&self) -> &'static str {
        match self {
            EiaMetric::RenewableGeneration { .. } => DEFAULT_GENERATION_REGION,
            EiaMetric::Demand | EiaMetric::SubregionDemand => DEFAULT_REGION,
        }
    }

    fn facets(&self, region: &str) -> Value {
        match self {
            EiaMetric::Demand => json!({ "respondent": [region], "type": ["D"] }),
            EiaMetric::RenewableGeneration { fuel_type } => {
                json!({ "respondent": [region], "fueltype": [fuel_type] })
            }
            EiaMetric::SubregionDemand => json!({ "respondent": [region] }),
        }
    }

    fn sort_direction(&self) -> &'static str {
        match self {
            EiaMetric::Demand => "asc",
            EiaMetric::RenewableGeneration { .. } | EiaMetric::SubregionDemand => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EiaQuery {
    pub metric: EiaMetric,
    pub region: String,
    /// `None` means the trailing `DEFAULT_LOOKBACK_DAYS`.
    pub range: Option<DateRange>,
}

impl Default for EiaQuery {
    /// US48 demand over the trailing week.
    fn default() -> Self {
        Self::for_metric(EiaMetric::Demand)
    }
}

impl EiaQuery {
    pub fn demand(region: &str) -> Self {
        Self {
            metric: EiaMetric::Demand,
            region: region.to_string(),
            range: None,
        }
    }

    pub fn renewable_generation(region: &str, fuel_type: &str) -> Self {
        Self {
            metric: EiaMetric::RenewableGeneration {
                fuel_type: fuel_type.to_string(),
            },
            region: region.to_string(),
            range: None,
        }
    }

    pub fn subregion_demand(region: &str) -> Self {
        Self {
            metric: EiaMetric::SubregionDemand,
            region: region.to_string(),
            range: None,
        }
    }

    /// `metric` over its default region (`US48`, or `CISO` for generation).
    pub fn for_metric(metric: EiaMetric) -> Self {
        Self {
            region: metric.default_region().to_string(),
            metric,
            range: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Request body for one EIA page.
pub fn build_request_body(metric: &EiaMetric, region: &str, range: &DateRange) -> Value {
    json!({
        "frequency": "hourly",
        "data": ["value"],
        "facets": metric.facets(region),
        "start": range.start_param(),
        "end": range.end_param(),
        "sort": [{ "column": "period", "direction": metric.sort_direction() }],
        "offset": 0,
        "length": EIA_PAGE_LENGTH,
    })
}

// ============================================================================
// EIA API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct EiaEnvelope {
    #[serde(default)]
    response: Option<EiaResponseBody>,
}

#[derive(Debug, Deserialize)]
struct EiaResponseBody {
    #[serde(default)]
    data: Option<Vec<EiaRow>>,
}

#[derive(Debug, Deserialize)]
struct EiaRow {
    period: String,
    respondent: String,
    #[serde(default)]
    fueltype: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    value: Option<f64>,
}

/// EIA serves `value` as a number on some datasets and a numeric string on others.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Number(f64),
        Text(String),
    }

    match Option::<RawValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawValue::Number(n)) => Ok(Some(n)),
        Some(RawValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawValue::Text(s)) => s.trim().parse::<f64>().map(Some).map_err(D::Error::custom),
    }
}

fn data_rows(raw: &Value) -> Result<Vec<EiaRow>, CollectError> {
    let envelope = EiaEnvelope::deserialize(raw).map_err(|e| CollectError::parse("EIA response", e))?;
    Ok(envelope
        .response
        .and_then(|body| body.data)
        .unwrap_or_default())
}

/// Parse an EIA `period`.
///
/// Accepts `2024-01-01T00` (UTC hour), `2024-01-01T00-05` (local hour with
/// offset), `2024-01-01`, and full RFC 3339.
pub fn parse_period(period: &str) -> Result<DateTime<Utc>, CollectError> {
    let p = period.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(p) {
        return Ok(dt.with_timezone(&Utc));
    }

    let parsed = if !p.is_ascii() {
        None
    } else {
        match p.len() {
            10 => NaiveDateTime::parse_from_str(&format!("{}T00:00", p), "%Y-%m-%dT%H:%M")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive)),
            13 => NaiveDateTime::parse_from_str(&format!("{}:00", p), "%Y-%m-%dT%H:%M")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive)),
            16 => DateTime::parse_from_str(
                &format!("{}:00{}:00", &p[..13], &p[13..]),
                "%Y-%m-%dT%H:%M%:z",
            )
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    };

    parsed.ok_or_else(|| CollectError::Parse(format!("unrecognized EIA period '{}'", period)))
}

// ============================================================================
// Normalizers
// ============================================================================

/// `response.data[]` → demand records. A missing path yields no records.
pub fn normalize_demand(raw: &Value) -> Result<Vec<DemandRecord>, CollectError> {
    data_rows(raw)?
        .into_iter()
        .map(|row| {
            Ok(DemandRecord {
                timestamp: parse_period(&row.period)?,
                region: row.respondent,
                demand_mw: row.value,
                data_source: DataSource::Eia,
            })
        })
        .collect()
}

/// `response.data[]` → generation records. A missing path yields no records.
pub fn normalize_generation(raw: &Value) -> Result<Vec<GenerationRecord>, CollectError> {
    data_rows(raw)?
        .into_iter()
        .map(|row| {
            Ok(GenerationRecord {
                timestamp: parse_period(&row.period)?,
                region: row.respondent,
                fuel_type: row.fueltype,
                generation_mw: row.value,
                data_source: DataSource::Eia,
            })
        })
        .collect()
}

// ============================================================================
// API Client
// ============================================================================

pub struct EiaCollector<T = BlockingTransport, P = ThreadPacer> {
    transport: T,
    pacer: P,
    api_key: String,
    base_url: String,
    clock: fn() -> DateTime<Utc>,
}

impl EiaCollector {
    /// Production collector. Fails immediately when `EIA_API_KEY` is unset.
    pub fn from_config(config: &CollectorConfig) -> Result<Self, ConfigError> {
        let transport = config.transport()?;
        EiaCollector::with_transport(config, transport)
    }
}

impl<T: Transport> EiaCollector<T> {
    pub fn with_transport(config: &CollectorConfig, transport: T) -> Result<Self, ConfigError> {
        let api_key = require_credential(config.eia.api_key.as_deref(), crate::config::ENV_EIA_API_KEY)?;
        Ok(Self {
            transport,
            pacer: ThreadPacer,
            api_key,
            base_url: config.eia.base_url.trim_end_matches('/').to_string(),
            clock: Utc::now,
        })
    }
}

impl<T: Transport, P: Pacer> EiaCollector<T, P> {
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> EiaCollector<T, Q> {
        EiaCollector {
            transport: self.transport,
            pacer,
            api_key: self.api_key,
            base_url: self.base_url,
            clock: self.clock,
        }
    }

    /// Replace the clock used for the default date range.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Hourly demand for `region`; defaults to the last 7 days.
    pub fn get_electricity_demand(
        &self,
        region: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<DemandRecord>, CollectError> {
        let raw = self.request(&EiaMetric::Demand, region, range)?;
        self.normalized(region, "demand", normalize_demand(&raw))
    }

    /// Hourly generation for one fuel type in `region`.
    ///
    /// Bounded by the same default window as demand: without a range only the
    /// last 7 days are requested, newest first.
    pub fn get_renewable_generation(
        &self,
        region: &str,
        fuel_type: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<GenerationRecord>, CollectError> {
        let metric = EiaMetric::RenewableGeneration {
            fuel_type: fuel_type.to_string(),
        };
        let raw = self.request(&metric, region, range)?;
        self.normalized(region, "generation", normalize_generation(&raw))
    }

    /// Hourly subregion demand for `region`.
    pub fn get_subregion_demand(
        &self,
        region: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<DemandRecord>, CollectError> {
        let raw = self.request(&EiaMetric::SubregionDemand, region, range)?;
        self.normalized(region, "subregion demand", normalize_demand(&raw))
    }

    pub fn fetch(&self, query: &EiaQuery) -> Result<RecordBatch, CollectError> {
        match &query.metric {
            EiaMetric::Demand => self
                .get_electricity_demand(&query.region, query.range)
                .map(RecordBatch::Demand),
            EiaMetric::RenewableGeneration { fuel_type } => self
                .get_renewable_generation(&query.region, fuel_type, query.range)
                .map(RecordBatch::Generation),
            EiaMetric::SubregionDemand => self
                .get_subregion_demand(&query.region, query.range)
                .map(RecordBatch::Demand),
        }
    }

    fn request(
        &self,
        metric: &EiaMetric,
        region: &str,
        range: Option<DateRange>,
    ) -> Result<Value, CollectError> {
        let range = range.unwrap_or_else(|| DateRange::trailing_days((self.clock)(), DEFAULT_LOOKBACK_DAYS));
        let url = format!("{}/{}", self.base_url, metric.dataset());
        let context = format!("{} {}", metric.dataset(), region);

        tracing::debug!(url = %url, region, start = %range.start_param(), end = %range.end_param(), "EIA request");

        let request = HttpRequest::post(&url, build_request_body(metric, region, &range))
            .query("api_key", &self.api_key)
            .header("Content-Type", "application/json");

        let raw = logged(
            DataSource::Eia,
            &context,
            "EIA request",
            self.transport.send(&request).map_err(CollectError::from),
        )?;
        self.pacer.pause(EIA_REQUEST_PAUSE);
        Ok(raw)
    }

    fn normalized<R>(
        &self,
        region: &str,
        kind: &str,
        result: Result<Vec<R>, CollectError>,
    ) -> Result<Vec<R>, CollectError> {
        let records = logged(DataSource::Eia, region, "EIA normalization", result)?;
        logging::log_batch_summary(DataSource::Eia, kind, region, records.len());
        Ok(records)
    }
}

impl<T: Transport, P: Pacer> Collector for EiaCollector<T, P> {
    type Query = EiaQuery;

    fn source(&self) -> DataSource {
        DataSource::Eia
    }

    fn collect(&self, query: &EiaQuery) -> Result<RecordBatch, CollectError> {
        self.fetch(query)
    }
}

// ============================================================================
// Tests
// ============================================================================
