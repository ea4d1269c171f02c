use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Unsupported chart kind '{0}' (expected line, scatter, bar, area or box)")]
    UnsupportedChartKind(String),
}
