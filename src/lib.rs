//! Fetch, normalize, aggregate, chart and export Open-Meteo weather observations.
//!
//! The stages are usable on their own: [`normalize`] turns a raw JSON block into an
//! [`ObservationSeries`], [`aggregate`] buckets it by calendar period, [`select_chart`]
//! describes how to plot a parameter, and the `export` functions write CSV or chart
//! documents. [`MeteoPipeline`] ties them to the HTTP clients.

mod aggregate;
mod chart;
mod config;
mod error;
mod export;
mod fetch;
mod geocode;
mod pipeline;
mod series;
mod types;

#[cfg(test)]
mod test_support;

pub use config::*;
pub use error::MeteoError;
pub use pipeline::MeteoPipeline;

pub use types::location::LocationCoordinate;
pub use types::parameter;
pub use types::period::{DateSelection, Month, StartEndDate, Year};
pub use types::resolution::{Resolution, Source};

pub use series::error::SeriesError;
pub use series::normalizer::{normalize, RawBlock};
pub use series::observation_series::{ObservationSeries, ParameterColumn, TimeMode};
pub use series::stats;
pub use series::stats::Summary;

pub use aggregate::aggregator::{aggregate, AggregatedSeries, AggregationBucket};
pub use aggregate::error::AggregateError;
pub use aggregate::granularity::{Granularity, PeriodKey};
pub use aggregate::reduction::{ReductionKind, ReductionTable};

pub use chart::chart_spec::{select_chart, ChartKind, ChartSpec};
pub use chart::error::ChartError;

pub use export::chart_document::ChartDocument;
pub use export::csv::{aggregated_to_csv, series_to_csv, write_aggregated_csv, write_series_csv};
pub use export::error::ExportError;
pub use export::file_name;
pub use export::frame::{aggregated_to_frame, series_to_frame, PERIOD_COLUMN, TIME_COLUMN};

pub use fetch::cache::ResponseCache;
pub use fetch::client::OpenMeteoClient;
pub use fetch::error::FetchError;
pub use fetch::payload::RawPayload;
pub use fetch::request::{CacheKey, WeatherRequest};

pub use geocode::error::GeocodeError;
pub use geocode::geocoder::Geocoder;
