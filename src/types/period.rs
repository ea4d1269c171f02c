//! Calendar helpers: `Year`, `Month`, inclusive date ranges and the ways a caller
//! can pick the range to request (a whole year, a month, the last few days, or a
//! manual range).

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month: `Month(year, month)`. Field order makes the derived `Ord` chronological.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, days_in_month(self.0, self.1)?)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StartEndDate {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StartEndDate {
    /// Number of days covered, counting both ends. Zero or negative when `end < start`.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Shortens the range so that it covers at most `max_days` days.
    pub fn truncated_to(self, max_days: u32) -> Self {
        if max_days == 0 || self.days() <= i64::from(max_days) {
            return self;
        }
        Self {
            start: self.start,
            end: self.start + Duration::days(i64::from(max_days) - 1),
        }
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// How the caller chose the dates to request.
///
/// Archive data ends yesterday, so the relative selections are anchored on the day
/// before `today` when resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DateSelection {
    /// January 1st through December 31st.
    Year(Year),
    /// The whole month, or up to yesterday when it is the current month.
    Month(Month),
    /// The last `n` complete days, ending yesterday.
    LastDays(u32),
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSelection {
    /// Turns the selection into concrete dates. Returns `None` for impossible
    /// calendar values (month 13, `LastDays(0)`, ...).
    pub fn resolve(self, today: NaiveDate) -> Option<StartEndDate> {
        let yesterday = today.pred_opt()?;
        match self {
            DateSelection::Year(year) => Some(StartEndDate {
                start: NaiveDate::from_ymd_opt(year.get(), 1, 1)?,
                end: NaiveDate::from_ymd_opt(year.get(), 12, 31)?,
            }),
            DateSelection::Month(month) => {
                let start = month.first_day()?;
                let end = if month.year() == today.year() && month.month() == today.month() {
                    yesterday
                } else {
                    month.last_day()?
                };
                Some(StartEndDate { start, end })
            }
            DateSelection::LastDays(days) if days > 0 => Some(StartEndDate {
                start: yesterday - Duration::days(i64::from(days) - 1),
                end: yesterday,
            }),
            DateSelection::LastDays(_) => None,
            DateSelection::Range { start, end } => Some(StartEndDate { start, end }),
        }
    }
}
