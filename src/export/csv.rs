//! Delimited-text export of series and aggregation buckets.
//!
//! The header is the time (or period) column followed by parameter names in table order.
//! Missing values are written as empty fields.

use crate::aggregate::aggregator::AggregatedSeries;
use crate::export::error::ExportError;
use crate::export::frame::{aggregated_to_frame, series_to_frame};
use crate::series::observation_series::ObservationSeries;
use polars::prelude::*;
use std::io::Write;

/// Writes a series as CSV to `writer`. Daily timestamps render as `YYYY-MM-DD`,
/// hourly ones as `YYYY-MM-DDTHH:MM`.
pub fn write_series_csv<W: Write>(series: &ObservationSeries, writer: W) -> Result<(), ExportError> {
    let mut df = series_to_frame(series)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_datetime_format(Some(series.resolution().timestamp_format().to_string()))
        .with_null_value(String::new())
        .finish(&mut df)?;
    Ok(())
}

/// Writes aggregation buckets as CSV to `writer`, one row per bucket.
pub fn write_aggregated_csv<W: Write>(
    aggregated: &AggregatedSeries,
    writer: W,
) -> Result<(), ExportError> {
    let mut df = aggregated_to_frame(aggregated)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_null_value(String::new())
        .finish(&mut df)?;
    Ok(())
}

/// Renders a series as a CSV string.
///
/// ```
/// use meteo_pipeline::{series_to_csv, ObservationSeries, Resolution, TimeMode};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let series = ObservationSeries::new(
///     Resolution::Daily,
///     TimeMode::Naive,
///     vec![day],
///     vec![("rain_sum".to_string(), vec![None])],
/// )?;
/// let csv = series_to_csv(&series)?;
/// assert_eq!(csv.lines().nth(1), Some("2024-01-01,"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn series_to_csv(series: &ObservationSeries) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_series_csv(series, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Renders aggregation buckets as a CSV string.
pub fn aggregated_to_csv(aggregated: &AggregatedSeries) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_aggregated_csv(aggregated, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregator::aggregate;
    use crate::aggregate::granularity::Granularity;
    use crate::aggregate::reduction::ReductionTable;
    use crate::series::observation_series::TimeMode;
    use crate::types::resolution::Resolution;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::NamedTempFile;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn daily() -> ObservationSeries {
        ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            vec![at(1, 0), at(2, 0), at(3, 0)],
            vec![
                ("temperature_2m_max".to_string(), vec![Some(4.0), Some(5.5), Some(6.0)]),
                ("rain_sum".to_string(), vec![Some(2.0), None, Some(4.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_header_and_missing_field() -> Result<(), Box<dyn std::error::Error>> {
        let csv = series_to_csv(&daily())?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "time,temperature_2m_max,rain_sum");
        assert_eq!(lines.len(), 4);

        let missing_row: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(missing_row[0], "2024-01-02");
        assert_eq!(missing_row[2], "");
        assert!(!lines[2].contains("null"));
        Ok(())
    }

    #[test]
    fn test_hourly_timestamps_include_time() -> Result<(), Box<dyn std::error::Error>> {
        let series = ObservationSeries::new(
            Resolution::Hourly,
            TimeMode::Naive,
            vec![at(1, 13)],
            vec![("temperature_2m".to_string(), vec![Some(1.5)])],
        )?;
        let csv = series_to_csv(&series)?;
        assert!(csv.lines().nth(1).unwrap().starts_with("2024-01-01T13:00,"));
        Ok(())
    }

    #[test]
    fn test_round_trip_through_csv_reader() -> Result<(), Box<dyn std::error::Error>> {
        let series = daily();
        let mut file = NamedTempFile::new()?;
        write_series_csv(&series, file.as_file_mut())?;
        file.flush()?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(file.path().to_path_buf()))?
            .finish()?;

        let headers: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(headers, vec!["time", "temperature_2m_max", "rain_sum"]);
        assert_eq!(df.height(), series.len());
        assert_eq!(df.column("rain_sum")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_aggregated_csv() -> Result<(), Box<dyn std::error::Error>> {
        let monthly = aggregate(&daily(), Granularity::Monthly, &ReductionTable::default())?;
        let csv = aggregated_to_csv(&monthly)?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "period,temperature_2m_max,rain_sum");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2024-01,"));
        Ok(())
    }

    #[test]
    fn test_aggregated_csv_leaves_missing_bucket_empty() -> Result<(), Box<dyn std::error::Error>> {
        let feb = |d: u32| {
            NaiveDate::from_ymd_opt(2024, 2, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let series = ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            vec![at(30, 0), at(31, 0), feb(1), feb(2)],
            vec![
                ("temperature_2m_max".to_string(), vec![Some(3.0), Some(5.0), Some(7.0), Some(9.0)]),
                ("rain_sum".to_string(), vec![Some(1.0), Some(0.0), None, None]),
            ],
        )?;
        let monthly = aggregate(&series, Granularity::Monthly, &ReductionTable::default())?;
        let csv = aggregated_to_csv(&monthly)?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);

        let january: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(january[0], "2024-01");
        assert_eq!(january[1].parse::<f64>()?, 4.0);
        assert_eq!(january[2].parse::<f64>()?, 1.0);
        let february: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(february[0], "2024-02");
        assert_eq!(february[1].parse::<f64>()?, 8.0);
        assert_eq!(february[2], "");
        assert!(!lines[2].contains("null"));
        Ok(())
    }

    #[test]
    fn test_empty_series_writes_header_only() -> Result<(), Box<dyn std::error::Error>> {
        let series = ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            vec![],
            vec![("rain_sum".to_string(), vec![])],
        )?;
        let csv = series_to_csv(&series)?;
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec!["time,rain_sum"]);
        Ok(())
    }
}
