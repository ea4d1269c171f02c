//! Buckets an [`ObservationSeries`] by calendar period and reduces each bucket per parameter.

use crate::aggregate::error::AggregateError;
use crate::aggregate::granularity::{Granularity, PeriodKey};
use crate::aggregate::reduction::ReductionTable;
use crate::series::observation_series::ObservationSeries;
use crate::series::observation_series::TimeMode;
use crate::types::resolution::Resolution;
use std::collections::BTreeMap;

/// One period and its reduced value per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationBucket {
    pub period: PeriodKey,
    /// Reduced values aligned with [`AggregatedSeries::parameter_names`].
    pub values: Vec<Option<f64>>,
    /// Number of source rows that fell into the period.
    pub records: usize,
}

/// The result of [`aggregate`]: chronological buckets sharing one column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    granularity: Granularity,
    resolution: Resolution,
    time_mode: TimeMode,
    parameter_names: Vec<String>,
    buckets: Vec<AggregationBucket>,
}

impl AggregatedSeries {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    pub fn buckets(&self) -> &[AggregationBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Reduced values of one parameter across all buckets, or `None` for an unknown name.
    pub fn column(&self, parameter: &str) -> Option<Vec<Option<f64>>> {
        let index = self.parameter_names.iter().position(|name| name == parameter)?;
        Some(
            self.buckets
                .iter()
                .map(|bucket| bucket.values[index])
                .collect(),
        )
    }

    /// Converts the buckets back into a series keyed by period start, so charts and
    /// exports treat aggregated and raw data alike.
    ///
    /// # Errors
    ///
    /// [`AggregateError::InvalidPeriod`] if a period has no representable start.
    pub fn to_series(&self) -> Result<ObservationSeries, AggregateError> {
        let timestamps = self
            .buckets
            .iter()
            .map(|bucket| {
                bucket
                    .period
                    .start()
                    .ok_or_else(|| AggregateError::InvalidPeriod(bucket.period.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let resolution = match self.granularity {
            Granularity::Hours(_) => Resolution::Hourly,
            _ => Resolution::Daily,
        };
        let columns = self
            .parameter_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                (
                    name.clone(),
                    self.buckets.iter().map(|b| b.values[index]).collect(),
                )
            })
            .collect();
        // Columns come from our own buckets, so lengths always line up.
        ObservationSeries::new(resolution, self.time_mode, timestamps, columns)
            .map_err(|e| AggregateError::InvalidPeriod(e.to_string()))
    }

    /// The native resolution of the series these buckets were built from.
    pub fn source_resolution(&self) -> Resolution {
        self.resolution
    }
}

/// Groups a series into calendar periods and reduces each parameter with its
/// table-declared [`ReductionKind`](crate::ReductionKind).
///
/// Buckets are returned in chronological order, one per period that contains at least
/// one row; periods without rows are omitted. A bucket value is `None` only when every
/// underlying value is missing. An empty series yields an empty result.
///
/// # Errors
///
/// [`AggregateError::InvalidGranularity`] for an hour window that does not divide 24.
///
/// # Examples
///
/// ```
/// use meteo_pipeline::{aggregate, Granularity, ObservationSeries, ReductionTable, Resolution, TimeMode};
/// use chrono::NaiveDate;
///
/// let days: Vec<_> = (1..=3)
///     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
///     .collect();
/// let series = ObservationSeries::new(
///     Resolution::Daily,
///     TimeMode::Naive,
///     days,
///     vec![("rain_sum".to_string(), vec![Some(2.0), None, Some(4.0)])],
/// )?;
/// let monthly = aggregate(&series, Granularity::Monthly, &ReductionTable::default())?;
/// assert_eq!(monthly.column("rain_sum"), Some(vec![Some(6.0)]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn aggregate(
    series: &ObservationSeries,
    granularity: Granularity,
    reductions: &ReductionTable,
) -> Result<AggregatedSeries, AggregateError> {
    granularity.validate()?;

    let mut rows_by_period: BTreeMap<PeriodKey, Vec<usize>> = BTreeMap::new();
    for (row, timestamp) in series.timestamps().iter().enumerate() {
        rows_by_period
            .entry(granularity.period_of(*timestamp))
            .or_default()
            .push(row);
    }

    let columns = series.columns();
    let buckets = rows_by_period
        .into_iter()
        .map(|(period, rows)| {
            let values = columns
                .iter()
                .map(|column| {
                    let values = column.values();
                    reductions
                        .kind_for(column.name())
                        .reduce(rows.iter().map(|row| &values[*row]))
                })
                .collect();
            AggregationBucket {
                period,
                values,
                records: rows.len(),
            }
        })
        .collect();

    Ok(AggregatedSeries {
        granularity,
        resolution: series.resolution(),
        time_mode: series.time_mode(),
        parameter_names: series.parameter_names().map(str::to_string).collect(),
        buckets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::reduction::ReductionKind;
    use crate::types::period::Month;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn daily(timestamps: Vec<NaiveDateTime>, columns: Vec<(&str, Vec<Option<f64>>)>) -> ObservationSeries {
        ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            timestamps,
            columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), values))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_daily_on_daily_is_identity() {
        let series = daily(
            vec![at(1, 1, 0), at(1, 2, 0), at(1, 3, 0)],
            vec![
                ("temperature_2m_max", vec![Some(4.5), None, Some(6.0)]),
                ("rain_sum", vec![Some(0.0), Some(1.2), None]),
            ],
        );
        let result = aggregate(&series, Granularity::Daily, &ReductionTable::default()).unwrap();
        assert_eq!(result.len(), series.len());
        for (row, bucket) in result.buckets().iter().enumerate() {
            assert_eq!(bucket.period.start(), Some(series.timestamps()[row]));
            assert_eq!(bucket.records, 1);
        }
        assert_eq!(result.to_series().unwrap(), series);
    }

    #[test]
    fn test_empty_series_gives_no_buckets() {
        let series = daily(vec![], vec![("rain_sum", vec![])]);
        let result = aggregate(&series, Granularity::Monthly, &ReductionTable::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.parameter_names(), &["rain_sum".to_string()]);
    }

    #[test]
    fn test_sum_and_mean_skip_missing() {
        let series = daily(
            vec![at(3, 1, 0), at(3, 2, 0), at(3, 3, 0)],
            vec![
                ("rain_sum", vec![Some(2.0), None, Some(4.0)]),
                ("temperature_2m_max", vec![Some(10.0), None, Some(20.0)]),
            ],
        );
        let result = aggregate(&series, Granularity::Monthly, &ReductionTable::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.buckets()[0].period, PeriodKey::Month(Month(2024, 3)));
        assert_eq!(result.column("rain_sum"), Some(vec![Some(6.0)]));
        assert_eq!(result.column("temperature_2m_max"), Some(vec![Some(15.0)]));
    }

    #[test]
    fn test_all_missing_bucket_stays_missing() {
        let series = daily(
            vec![at(1, 31, 0), at(2, 1, 0)],
            vec![("rain_sum", vec![None, Some(1.0)])],
        );
        let result = aggregate(&series, Granularity::Monthly, &ReductionTable::default()).unwrap();
        assert_eq!(result.column("rain_sum"), Some(vec![None, Some(1.0)]));
    }

    #[test]
    fn test_empty_periods_are_omitted_and_order_is_chronological() {
        // Input deliberately out of order with a gap in February.
        let series = daily(
            vec![at(3, 5, 0), at(1, 10, 0), at(3, 6, 0)],
            vec![("temperature_2m_max", vec![Some(8.0), Some(1.0), Some(10.0)])],
        );
        let result = aggregate(&series, Granularity::Monthly, &ReductionTable::default()).unwrap();
        let periods: Vec<_> = result.buckets().iter().map(|b| b.period.to_string()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-03"]);
        assert_eq!(result.column("temperature_2m_max"), Some(vec![Some(1.0), Some(9.0)]));
    }

    #[test]
    fn test_weekly_buckets_split_on_monday() {
        // Sunday 2024-01-07 and Monday 2024-01-08.
        let series = daily(
            vec![at(1, 6, 0), at(1, 7, 0), at(1, 8, 0)],
            vec![("rain_sum", vec![Some(1.0), Some(2.0), Some(5.0)])],
        );
        let result = aggregate(&series, Granularity::Weekly, &ReductionTable::default()).unwrap();
        assert_eq!(result.column("rain_sum"), Some(vec![Some(3.0), Some(5.0)]));
        assert_eq!(result.buckets()[0].records, 2);
    }

    #[test]
    fn test_hourly_to_daily_and_hour_windows() {
        let series = ObservationSeries::new(
            Resolution::Hourly,
            TimeMode::Naive,
            vec![at(6, 1, 0), at(6, 1, 5), at(6, 1, 6), at(6, 2, 0)],
            vec![
                ("temperature_2m".to_string(), vec![Some(10.0), Some(12.0), Some(20.0), Some(5.0)]),
                ("precipitation".to_string(), vec![Some(0.5), Some(0.5), None, None]),
            ],
        )
        .unwrap();
        let table = ReductionTable::default();

        let by_day = aggregate(&series, Granularity::Daily, &table).unwrap();
        assert_eq!(by_day.column("temperature_2m"), Some(vec![Some(14.0), Some(5.0)]));
        assert_eq!(by_day.column("precipitation"), Some(vec![Some(1.0), None]));

        let by_six = aggregate(&series, Granularity::Hours(6), &table).unwrap();
        assert_eq!(by_six.len(), 3);
        assert_eq!(by_six.column("temperature_2m"), Some(vec![Some(11.0), Some(20.0), Some(5.0)]));
        assert_eq!(by_six.to_series().unwrap().resolution(), Resolution::Hourly);
    }

    #[test]
    fn test_custom_table_changes_reduction() {
        let series = daily(
            vec![at(1, 1, 0), at(1, 2, 0)],
            vec![("rain_sum", vec![Some(2.0), Some(4.0)])],
        );
        let table = ReductionTable::new(ReductionKind::Mean).with("rain_sum", ReductionKind::Mean);
        let result = aggregate(&series, Granularity::Yearly, &table).unwrap();
        assert_eq!(result.column("rain_sum"), Some(vec![Some(3.0)]));
    }

    #[test]
    fn test_invalid_hour_window() {
        let series = daily(vec![], vec![]);
        assert!(matches!(
            aggregate(&series, Granularity::Hours(7), &ReductionTable::default()),
            Err(AggregateError::InvalidGranularity(7))
        ));
    }

    #[test]
    fn test_unknown_column() {
        let series = daily(vec![at(1, 1, 0)], vec![("rain_sum", vec![Some(1.0)])]);
        let result = aggregate(&series, Granularity::Daily, &ReductionTable::default()).unwrap();
        assert_eq!(result.column("snowfall"), None);
    }
}
