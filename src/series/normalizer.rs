//! Turns a raw `daily`/`hourly` block from a weather API into an [`ObservationSeries`].
//!
//! This stage is a pure function of already-fetched data. It fails loudly on structural
//! problems (unparseable timestamps, misaligned arrays) and keeps legitimately missing
//! values as explicit `None` entries so rows stay aligned across parameters.

use crate::series::error::SeriesError;
use crate::series::observation_series::{ObservationSeries, TimeMode};
use crate::types::resolution::Resolution;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

const TIME_KEY: &str = "time";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A payload block before normalization: a time column plus parameter columns,
/// each still holding raw JSON values.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub resolution: Resolution,
    pub time: Vec<Value>,
    /// Parameter columns in payload order.
    pub parameters: Vec<(String, Vec<Value>)>,
}

impl RawBlock {
    /// Splits an Open-Meteo block object (`{"time": [...], "rain_sum": [...], ...}`)
    /// into its time column and parameter columns, preserving key order.
    ///
    /// # Errors
    ///
    /// * [`SeriesError::MissingTimeColumn`] if there is no `time` key.
    /// * [`SeriesError::NotAnArray`] if `time` or any parameter is not a JSON array.
    pub fn from_json(resolution: Resolution, block: &Map<String, Value>) -> Result<Self, SeriesError> {
        let time = match block.get(TIME_KEY) {
            Some(Value::Array(values)) => values.clone(),
            Some(_) => return Err(SeriesError::NotAnArray(TIME_KEY.to_string())),
            None => return Err(SeriesError::MissingTimeColumn),
        };
        let parameters = block
            .iter()
            .filter(|(key, _)| key.as_str() != TIME_KEY)
            .map(|(key, value)| match value {
                Value::Array(values) => Ok((key.clone(), values.clone())),
                _ => Err(SeriesError::NotAnArray(key.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            resolution,
            time,
            parameters,
        })
    }
}

/// Normalizes a raw block into an [`ObservationSeries`].
///
/// Timestamps may be ISO dates, naive ISO datetimes, RFC 3339 datetimes with an offset,
/// or integer Unix seconds; they are all converted to wall-clock time under `time_mode`.
/// Any non-numeric value becomes a missing marker.
///
/// # Errors
///
/// * [`SeriesError::MalformedTimestamp`] for the first timestamp that does not parse.
/// * [`SeriesError::LengthMismatch`] if a parameter column length differs from the time column.
/// * [`SeriesError::DuplicateParameter`] if a parameter name repeats.
///
/// # Examples
///
/// ```
/// use meteo_pipeline::{normalize, RawBlock, Resolution, TimeMode};
/// use serde_json::json;
///
/// let block = RawBlock {
///     resolution: Resolution::Daily,
///     time: vec![json!("2024-01-01"), json!("2024-01-02")],
///     parameters: vec![("rain_sum".to_string(), vec![json!(1.2), json!(null)])],
/// };
/// let series = normalize(&block, TimeMode::Naive)?;
/// assert_eq!(series.parameter("rain_sum"), Some(&[Some(1.2), None][..]));
/// # Ok::<(), meteo_pipeline::SeriesError>(())
/// ```
pub fn normalize(block: &RawBlock, time_mode: TimeMode) -> Result<ObservationSeries, SeriesError> {
    let timestamps = block
        .time
        .iter()
        .enumerate()
        .map(|(index, value)| {
            parse_timestamp(value, time_mode).ok_or_else(|| SeriesError::MalformedTimestamp {
                index,
                value: render_raw(value),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let columns = block
        .parameters
        .iter()
        .map(|(name, values)| (name.clone(), values.iter().map(Value::as_f64).collect()))
        .collect();

    ObservationSeries::new(block.resolution, time_mode, timestamps, columns)
}

fn parse_timestamp(value: &Value, time_mode: TimeMode) -> Option<NaiveDateTime> {
    match value {
        Value::String(text) => parse_timestamp_str(text.trim(), time_mode),
        Value::Number(number) => {
            let seconds = number.as_i64()?;
            DateTime::<Utc>::from_timestamp(seconds, 0).map(|utc| time_mode.localize_utc(utc))
        }
        _ => None,
    }
}

fn parse_timestamp_str(text: &str, time_mode: TimeMode) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(time_mode.localize_fixed(with_offset));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn render_raw(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
