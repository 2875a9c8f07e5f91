//! Provider adapters.
//!
//! Each submodule owns one provider's request shape and the normalizer
//! that turns its raw JSON into uniform records:
//! - `eia`         — EIA v2 electricity demand / generation (POST + JSON body)
//! - `noaa`        — NWS hourly forecast via gridpoint resolution (two GETs)
//! - `openweather` — OpenWeatherMap current conditions and 5-day forecast
//!
//! Adapters share only the `Collector` capability below. There is no
//! generic REST layer: the providers differ too much for one to pay off.

pub mod eia;
pub mod noaa;
pub mod openweather;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::logging;
use crate::model::{CollectError, DataSource, RecordBatch};
use crate::sink::RecordSink;

/// One self-contained request → normalize cycle for a provider.
pub trait Collector {
    type Query;

    fn source(&self) -> DataSource;

    fn collect(&self, query: &Self::Query) -> Result<RecordBatch, CollectError>;
}

/// Run one collection and hand the batch to `sink`.
///
/// The sink sees either the complete batch or nothing: on error the sink is
/// never called. Returns the number of records delivered.
pub fn collect_into<C, S>(collector: &C, query: &C::Query, sink: &mut S) -> Result<usize, CollectError>
where
    C: Collector + ?Sized,
    S: RecordSink + ?Sized,
{
    let batch = collector.collect(query)?;
    let count = batch.len();
    tracing::debug!(source = %collector.source(), kind = batch.kind(), count, "delivering batch to sink");
    sink.accept(batch);
    Ok(count)
}

/// Log-then-return helper shared by the adapters.
pub(crate) fn logged<T>(
    source: DataSource,
    context: &str,
    operation: &str,
    result: Result<T, CollectError>,
) -> Result<T, CollectError> {
    if let Err(err) = &result {
        logging::log_fetch_failure(source, context, operation, err);
    }
    result
}
