use crate::aggregate::error::AggregateError;
use crate::chart::error::ChartError;
use crate::export::error::ExportError;
use crate::fetch::error::FetchError;
use crate::geocode::error::GeocodeError;
use crate::series::error::SeriesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteoError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Coordinate ({latitude}, {longitude}) is out of range")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}
