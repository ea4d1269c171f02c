//! Converts series and buckets into Polars `DataFrame`s, for CSV export and for callers
//! that want to continue in Polars.

use crate::aggregate::aggregator::AggregatedSeries;
use crate::series::observation_series::ObservationSeries;
use polars::prelude::*;

/// Name of the timestamp column of an exported series.
pub const TIME_COLUMN: &str = "time";
/// Name of the period column of exported buckets.
pub const PERIOD_COLUMN: &str = "period";

/// A frame with a `time` datetime column followed by one `f64` column per parameter.
/// Missing values become nulls.
pub fn series_to_frame(series: &ObservationSeries) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(series.columns().len() + 1);
    columns.push(Column::new(
        TIME_COLUMN.into(),
        series.timestamps().to_vec(),
    ));
    for column in series.columns() {
        columns.push(Column::new(column.name().into(), column.values().to_vec()));
    }
    DataFrame::new(columns)
}

/// A frame with a `period` string column (`2024-03`, `2024-W10`, ...) followed by one
/// `f64` column per parameter.
pub fn aggregated_to_frame(aggregated: &AggregatedSeries) -> PolarsResult<DataFrame> {
    let periods: Vec<String> = aggregated
        .buckets()
        .iter()
        .map(|bucket| bucket.period.to_string())
        .collect();

    let mut columns = Vec::with_capacity(aggregated.parameter_names().len() + 1);
    columns.push(Column::new(PERIOD_COLUMN.into(), periods));
    for name in aggregated.parameter_names() {
        let values = aggregated.column(name).unwrap_or_default();
        columns.push(Column::new(name.as_str().into(), values));
    }
    DataFrame::new(columns)
}
