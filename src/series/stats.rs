//! Summary statistics over a parameter column: the numbers shown beside every chart
//! (count, mean, spread, quartiles), an hour-of-day profile, a day-of-month by hour
//! matrix for heatmaps and a least-squares trend.
//!
//! All functions skip missing values rather than treating them as zero.

use crate::series::error::SeriesError;
use crate::series::observation_series::ObservationSeries;
use chrono::{Datelike, Timelike};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Descriptive statistics for one column. Every statistic is `None` when `count` is zero;
/// `std` is also `None` with a single value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (divides by `n - 1`).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Computes [`Summary`] statistics over the present values of a column.
///
/// Quartiles use linear interpolation between the closest ranks.
///
/// ```
/// use meteo_pipeline::stats::describe;
///
/// let summary = describe(&[Some(1.0), None, Some(3.0), Some(2.0)]);
/// assert_eq!(summary.count, 3);
/// assert_eq!(summary.median, Some(2.0));
/// ```
pub fn describe(values: &[Option<f64>]) -> Summary {
    let mut present: Vec<OrderedFloat<f64>> = values
        .iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .map(|v| OrderedFloat(*v))
        .collect();
    if present.is_empty() {
        return Summary::default();
    }
    present.sort();
    let sorted: Vec<f64> = present.into_iter().map(|v| v.0).collect();

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    Summary {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        q25: Some(quantile(&sorted, 0.25)),
        median: Some(quantile(&sorted, 0.5)),
        q75: Some(quantile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Mean of a parameter for each hour of the day that has at least one present value.
///
/// # Errors
///
/// [`SeriesError::UnknownParameter`] if the series has no such column.
pub fn hour_of_day_profile(
    series: &ObservationSeries,
    parameter: &str,
) -> Result<Vec<(u32, f64)>, SeriesError> {
    let values = series
        .parameter(parameter)
        .ok_or_else(|| SeriesError::UnknownParameter(parameter.to_string()))?;

    let mut by_hour: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (timestamp, value) in series.timestamps().iter().zip(values) {
        if let Some(value) = value {
            let slot = by_hour.entry(timestamp.hour()).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }
    Ok(by_hour
        .into_iter()
        .map(|(hour, (sum, count))| (hour, sum / count as f64))
        .collect())
}

/// Mean of a parameter per (day of month, hour of day) cell, for a heatmap.
///
/// Rows are days of the month in ascending order; only days with at least one present
/// value appear. The same day number in different months shares a row.
///
/// # Errors
///
/// [`SeriesError::UnknownParameter`] if the series has no such column.
pub fn day_hour_matrix(
    series: &ObservationSeries,
    parameter: &str,
) -> Result<Vec<(u32, [Option<f64>; 24])>, SeriesError> {
    let values = series
        .parameter(parameter)
        .ok_or_else(|| SeriesError::UnknownParameter(parameter.to_string()))?;

    let mut cells: BTreeMap<u32, [(f64, usize); 24]> = BTreeMap::new();
    for (timestamp, value) in series.timestamps().iter().zip(values) {
        if let Some(value) = value {
            let row = cells.entry(timestamp.day()).or_insert([(0.0, 0); 24]);
            let cell = &mut row[timestamp.hour() as usize];
            cell.0 += value;
            cell.1 += 1;
        }
    }
    Ok(cells
        .into_iter()
        .map(|(day, row)| {
            (
                day,
                row.map(|(sum, count)| (count > 0).then(|| sum / count as f64)),
            )
        })
        .collect())
}

/// Ordinary least-squares line of a parameter against time, evaluated at every row.
///
/// Returns `Ok(None)` when fewer than two values are present or all present values
/// share one timestamp.
///
/// # Errors
///
/// [`SeriesError::UnknownParameter`] if the series has no such column.
pub fn linear_trend(
    series: &ObservationSeries,
    parameter: &str,
) -> Result<Option<Vec<f64>>, SeriesError> {
    let values = series
        .parameter(parameter)
        .ok_or_else(|| SeriesError::UnknownParameter(parameter.to_string()))?;
    let xs: Vec<f64> = series
        .timestamps()
        .iter()
        .map(|t| t.and_utc().timestamp() as f64)
        .collect();

    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(values)
        .filter_map(|(x, y)| y.map(|y| (*x, y)))
        .collect();
    if points.len() < 2 {
        return Ok(None);
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return Ok(None);
    }
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(Some(xs.iter().map(|x| intercept + slope * x).collect()))
}
