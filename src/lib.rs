//! energy_weather_collect: provider adapters that pull grid and weather
//! time series and normalize them into one record schema.
//!
//! # Module structure
//!
//! ```text
//! energy_weather_collect
//! ├── model       — DataSource, uniform records, RecordBatch, Gridpoint, error types
//! ├── units       — Fahrenheit → Celsius, mph text → m/s, bearing wrap
//! ├── transport   — Transport / Pacer seams, reqwest blocking transport
//! ├── sink        — RecordSink trait and in-memory sink
//! ├── config      — TOML + .env configuration
//! ├── logging     — tracing setup and failure classification
//! └── ingest
//!     ├── eia         — EIA v2 demand / generation
//!     ├── noaa        — NWS gridpoint resolution + hourly forecast
//!     ├── openweather — OpenWeatherMap current + 5 day forecast
//!     └── fixtures (test only) — representative API response payloads
//! ```

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod sink;
pub mod transport;
pub mod units;

pub use ingest::{Collector, collect_into};
pub use ingest::eia::{EiaCollector, EiaMetric, EiaQuery};
pub use ingest::noaa::NoaaCollector;
pub use ingest::openweather::OpenWeatherCollector;
pub use model::{CollectError, ConfigError, DataSource, RecordBatch, TransportError};
