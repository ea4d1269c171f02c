use crate::series::error::SeriesError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build DataFrame for export")]
    Frame(#[from] PolarsError),

    #[error("Export output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to serialize chart document")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Series(#[from] SeriesError),
}
