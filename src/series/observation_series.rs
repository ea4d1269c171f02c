//! Contains [`ObservationSeries`], the canonical table every other stage consumes:
//! an ordered timestamp column plus named numeric columns with explicit missing values.

use crate::series::error::SeriesError;
use crate::types::resolution::Resolution;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::{HashMap, HashSet};

/// How timestamps in a payload relate to absolute time.
///
/// Open-Meteo reports local wall-clock times together with the IANA `timezone` and a
/// single `utc_offset_seconds` when called with `timezone=auto`. Series keep the
/// wall-clock value (so calendar bucketing follows the location's days) and remember
/// how to get back to absolute time here.
///
/// The reported offset is only valid for part of the year in zones with daylight saving
/// time, so [`TimeMode::Zoned`] is preferred whenever the zone name is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    /// Timestamps carry no zone information.
    #[default]
    Naive,
    /// Timestamps are wall-clock times at a fixed offset from UTC.
    Offset(FixedOffset),
    /// Timestamps are wall-clock times in an IANA zone, daylight saving included.
    Zoned(Tz),
}

impl TimeMode {
    /// Builds the mode from Open-Meteo's `utc_offset_seconds`, if present and valid.
    pub fn from_utc_offset_seconds(seconds: Option<i32>) -> Self {
        seconds
            .and_then(FixedOffset::east_opt)
            .map(TimeMode::Offset)
            .unwrap_or(TimeMode::Naive)
    }

    /// Uses the IANA zone name when it is one `chrono-tz` knows, otherwise falls back to
    /// the fixed offset.
    pub fn from_zone_or_offset(timezone: Option<&str>, utc_offset_seconds: Option<i32>) -> Self {
        timezone
            .and_then(|name| name.parse::<Tz>().ok())
            .map(TimeMode::Zoned)
            .unwrap_or_else(|| Self::from_utc_offset_seconds(utc_offset_seconds))
    }

    /// Wall-clock time of a UTC instant. Naive mode keeps UTC.
    pub(crate) fn localize_utc(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            TimeMode::Naive => instant.naive_utc(),
            TimeMode::Offset(offset) => instant.with_timezone(offset).naive_local(),
            TimeMode::Zoned(zone) => instant.with_timezone(zone).naive_local(),
        }
    }

    /// Wall-clock time of an offset-carrying instant.
    pub(crate) fn localize_fixed(&self, instant: DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            TimeMode::Naive => instant.naive_local(),
            TimeMode::Offset(offset) => instant.with_timezone(offset).naive_local(),
            TimeMode::Zoned(zone) => instant.with_timezone(zone).naive_local(),
        }
    }
}

/// One named parameter column.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterColumn {
    name: String,
    values: Vec<Option<f64>>,
}

impl ParameterColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values aligned with the series timestamps. `None` marks a missing observation.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// An ordered, immutable table of timestamped weather observations.
///
/// Every parameter column has exactly one entry per timestamp; construction
/// enforces this. Missing observations are `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    resolution: Resolution,
    time_mode: TimeMode,
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<ParameterColumn>,
    units: HashMap<String, String>,
}

impl ObservationSeries {
    /// Creates a series from a timestamp column and `(name, values)` pairs kept in the given order.
    ///
    /// # Errors
    ///
    /// * [`SeriesError::LengthMismatch`] if a column length differs from `timestamps.len()`.
    /// * [`SeriesError::DuplicateParameter`] if a name is repeated.
    pub fn new(
        resolution: Resolution,
        time_mode: TimeMode,
        timestamps: Vec<NaiveDateTime>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, SeriesError> {
        let mut seen = HashSet::new();
        let mut parameter_columns = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != timestamps.len() {
                return Err(SeriesError::LengthMismatch {
                    parameter: name,
                    expected: timestamps.len(),
                    found: values.len(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(SeriesError::DuplicateParameter(name));
            }
            parameter_columns.push(ParameterColumn { name, values });
        }
        Ok(Self {
            resolution,
            time_mode,
            timestamps,
            columns: parameter_columns,
            units: HashMap::new(),
        })
    }

    /// Attaches display units (`"°C"`, `"mm"`, ...) keyed by parameter name.
    pub fn with_units(mut self, units: HashMap<String, String>) -> Self {
        self.units = units;
        self
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn columns(&self) -> &[ParameterColumn] {
        &self.columns
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Values of one parameter, or `None` if the series has no such column.
    pub fn parameter(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.values.as_slice())
    }

    pub fn unit(&self, name: &str) -> Option<&str> {
        self.units.get(name).map(String::as_str)
    }

    /// Absolute instant of row `index`. `None` in naive mode, for out-of-range rows,
    /// or when the wall-clock time falls in a daylight saving gap.
    ///
    /// A wall-clock time repeated when clocks go back resolves to its first occurrence.
    pub fn instant(&self, index: usize) -> Option<DateTime<FixedOffset>> {
        let local = self.timestamps.get(index)?;
        match self.time_mode {
            TimeMode::Naive => None,
            TimeMode::Offset(offset) => offset.from_local_datetime(local).single(),
            TimeMode::Zoned(zone) => zone
                .from_local_datetime(local)
                .earliest()
                .map(|instant| instant.fixed_offset()),
        }
    }

    /// A new series with only the named columns, in the requested order.
    ///
    /// # Errors
    ///
    /// [`SeriesError::UnknownParameter`] for a name the series does not contain.
    pub fn select(&self, names: &[&str]) -> Result<Self, SeriesError> {
        let columns = names
            .iter()
            .map(|name| {
                self.parameter(name)
                    .map(|values| (name.to_string(), values.to_vec()))
                    .ok_or_else(|| SeriesError::UnknownParameter(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let units = self
            .units
            .iter()
            .filter(|(name, _)| names.contains(&name.as_str()))
            .map(|(name, unit)| (name.clone(), unit.clone()))
            .collect();
        Ok(Self::new(self.resolution, self.time_mode, self.timestamps.clone(), columns)?
            .with_units(units))
    }

    /// Renames a column. Renaming a name that is absent is a no-op.
    ///
    /// # Errors
    ///
    /// [`SeriesError::DuplicateParameter`] if `to` is already a different column.
    pub fn rename_parameter(mut self, from: &str, to: &str) -> Result<Self, SeriesError> {
        if from == to || self.parameter(from).is_none() {
            return Ok(self);
        }
        if self.parameter(to).is_some() {
            return Err(SeriesError::DuplicateParameter(to.to_string()));
        }
        if let Some(column) = self.columns.iter_mut().find(|column| column.name == from) {
            column.name = to.to_string();
        }
        if let Some(unit) = self.units.remove(from) {
            self.units.insert(to.to_string(), unit);
        }
        Ok(self)
    }

    /// Removes a column and its unit. Removing an absent name is a no-op.
    pub fn drop_parameter(mut self, name: &str) -> Self {
        self.columns.retain(|column| column.name != name);
        self.units.remove(name);
        self
    }

    /// Fraction of parameter cells that are missing, in `0.0..=1.0`. Zero for a table with no cells.
    pub fn missing_ratio(&self) -> f64 {
        let cells = self.len() * self.columns.len();
        if cells == 0 {
            return 0.0;
        }
        let missing: usize = self
            .columns
            .iter()
            .map(|column| column.values.iter().filter(|v| v.is_none()).count())
            .sum();
        missing as f64 / cells as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample() -> ObservationSeries {
        ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            vec![day(1), day(2)],
            vec![
                ("temperature_2m_max".to_string(), vec![Some(5.0), None]),
                ("rain_sum".to_string(), vec![Some(0.0), Some(1.5)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_short_column() {
        let err = ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            vec![day(1), day(2)],
            vec![("rain_sum".to_string(), vec![Some(1.0)])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LengthMismatch { expected: 2, found: 1, .. }
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_column() {
        let err = ObservationSeries::new(
            Resolution::Daily,
            TimeMode::Naive,
            vec![day(1)],
            vec![
                ("rain_sum".to_string(), vec![Some(1.0)]),
                ("rain_sum".to_string(), vec![Some(2.0)]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateParameter(name) if name == "rain_sum"));
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let selected = sample().select(&["rain_sum", "temperature_2m_max"]).unwrap();
        let names: Vec<_> = selected.parameter_names().collect();
        assert_eq!(names, vec!["rain_sum", "temperature_2m_max"]);
        assert!(matches!(
            sample().select(&["nope"]),
            Err(SeriesError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_rename_parameter_moves_units() {
        let mut units = HashMap::new();
        units.insert("rain_sum".to_string(), "mm".to_string());
        let renamed = sample()
            .with_units(units)
            .rename_parameter("rain_sum", "rain")
            .unwrap();
        assert!(renamed.parameter("rain_sum").is_none());
        assert_eq!(renamed.unit("rain"), Some("mm"));
        assert!(sample()
            .rename_parameter("rain_sum", "temperature_2m_max")
            .is_err());
    }

    #[test]
    fn test_drop_parameter() {
        let mut units = HashMap::new();
        units.insert("rain_sum".to_string(), "mm".to_string());
        let dropped = sample().with_units(units).drop_parameter("rain_sum");
        assert_eq!(dropped.parameter_names().collect::<Vec<_>>(), vec!["temperature_2m_max"]);
        assert_eq!(dropped.unit("rain_sum"), None);
        assert_eq!(dropped.len(), 2);
        assert_eq!(sample().drop_parameter("nope"), sample());
    }

    #[test]
    fn test_missing_ratio() {
        assert_eq!(sample().missing_ratio(), 0.25);
        let empty = ObservationSeries::new(Resolution::Hourly, TimeMode::Naive, vec![], vec![])
            .unwrap();
        assert_eq!(empty.missing_ratio(), 0.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_instant_uses_offset() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let series = ObservationSeries::new(
            Resolution::Hourly,
            TimeMode::Offset(offset),
            vec![day(1)],
            vec![],
        )
        .unwrap();
        let instant = series.instant(0).unwrap();
        assert_eq!(instant.with_timezone(&Utc).naive_utc(), day(1) - chrono::Duration::hours(1));
        assert!(sample().instant(0).is_none());
    }

    fn london_hours(stamps: Vec<NaiveDateTime>) -> ObservationSeries {
        let values = vec![None; stamps.len()];
        ObservationSeries::new(
            Resolution::Hourly,
            TimeMode::from_zone_or_offset(Some("Europe/London"), Some(0)),
            stamps,
            vec![("temperature_2m".to_string(), values)],
        )
        .unwrap()
    }

    #[test]
    fn test_instant_follows_daylight_saving() {
        let at = |m: u32, d: u32, h: u32, min: u32| {
            NaiveDate::from_ymd_opt(2024, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap()
        };
        let series = london_hours(vec![
            at(1, 15, 12, 0),
            at(7, 15, 12, 0),
            at(3, 31, 1, 30),
            at(10, 27, 1, 30),
        ]);
        let utc = |index: usize| series.instant(index).map(|i| i.with_timezone(&Utc).naive_utc());

        assert_eq!(utc(0), Some(at(1, 15, 12, 0)));
        assert_eq!(utc(1), Some(at(7, 15, 11, 0)));
        // Clocks skip 01:00-02:00 on the last Sunday of March.
        assert_eq!(utc(2), None);
        // 01:30 happens twice in late October; the first one is still BST.
        assert_eq!(utc(3), Some(at(10, 27, 0, 30)));
    }

    #[test]
    fn test_unknown_zone_falls_back_to_offset() {
        let offset = FixedOffset::east_opt(7200).unwrap();
        assert_eq!(
            TimeMode::from_zone_or_offset(Some("Mars/Olympus_Mons"), Some(7200)),
            TimeMode::Offset(offset)
        );
        assert_eq!(TimeMode::from_zone_or_offset(None, None), TimeMode::Naive);
        assert_eq!(
            TimeMode::from_zone_or_offset(Some("Europe/Amsterdam"), Some(3600)),
            TimeMode::Zoned(chrono_tz::Europe::Amsterdam)
        );
    }
}
