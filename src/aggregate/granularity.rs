//! Aggregation periods and the keys that identify one bucket.

use crate::aggregate::error::AggregateError;
use crate::types::period::{Month, Year};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::fmt;

/// The period a series is bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Fixed windows of `n` hours aligned to midnight (`n` must divide 24).
    Hours(u32),
    /// Calendar days.
    Daily,
    /// ISO weeks, Monday through Sunday.
    Weekly,
    /// Calendar months.
    Monthly,
    /// Calendar years.
    Yearly,
}

impl Granularity {
    /// Checks the hour window size; calendar granularities are always valid.
    pub(crate) fn validate(&self) -> Result<(), AggregateError> {
        match self {
            Granularity::Hours(hours) if *hours == 0 || 24 % hours != 0 => {
                Err(AggregateError::InvalidGranularity(*hours))
            }
            _ => Ok(()),
        }
    }

    /// The bucket a wall-clock timestamp belongs to.
    pub fn period_of(&self, timestamp: NaiveDateTime) -> PeriodKey {
        let date = timestamp.date();
        match self {
            Granularity::Hours(hours) => {
                let hours = (*hours).max(1);
                let start_hour = timestamp.hour() / hours * hours;
                let start = NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
                PeriodKey::Hours(date.and_time(start))
            }
            Granularity::Daily => PeriodKey::Day(date),
            Granularity::Weekly => {
                let week = date.iso_week();
                PeriodKey::Week {
                    year: week.year(),
                    week: week.week(),
                }
            }
            Granularity::Monthly => PeriodKey::Month(Month(date.year(), date.month())),
            Granularity::Yearly => PeriodKey::Year(Year(date.year())),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Granularity::Hours(1) => "Hourly".to_string(),
            Granularity::Hours(hours) => format!("{hours}-Hour"),
            Granularity::Daily => "Daily".to_string(),
            Granularity::Weekly => "Weekly".to_string(),
            Granularity::Monthly => "Monthly".to_string(),
            Granularity::Yearly => "Yearly".to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Identifies one aggregation bucket.
///
/// Within a single granularity the derived ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    /// Window starting at the given wall-clock time.
    Hours(NaiveDateTime),
    Day(NaiveDate),
    /// ISO week-numbering year and week (1..=53).
    Week { year: i32, week: u32 },
    Month(Month),
    Year(Year),
}

impl PeriodKey {
    /// First instant of the period, used as the x value when charting buckets.
    pub fn start(&self) -> Option<NaiveDateTime> {
        let date = match self {
            PeriodKey::Hours(start) => return Some(*start),
            PeriodKey::Day(date) => Some(*date),
            PeriodKey::Week { year, week } => NaiveDate::from_isoywd_opt(*year, *week, Weekday::Mon),
            PeriodKey::Month(month) => month.first_day(),
            PeriodKey::Year(year) => NaiveDate::from_ymd_opt(year.get(), 1, 1),
        };
        date.map(|d| d.and_time(NaiveTime::MIN))
    }
}

/// ```
/// use meteo_pipeline::{Granularity, PeriodKey};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(7, 0, 0).unwrap();
/// assert_eq!(Granularity::Weekly.period_of(day).to_string(), "2024-W01");
/// assert_eq!(Granularity::Monthly.period_of(day).to_string(), "2024-01");
/// ```
impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Hours(start) => write!(f, "{}", start.format("%Y-%m-%dT%H:%M")),
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { year, week } => write!(f, "{:04}-W{:02}", year, week),
            PeriodKey::Month(month) => write!(f, "{}", month),
            PeriodKey::Year(year) => write!(f, "{}", year),
        }
    }
}
