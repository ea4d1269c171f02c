//! Suggested download names for exported files.

use chrono::NaiveDate;

pub const DAILY_CSV: &str = "daily_weather.csv";
pub const DAILY_CHART: &str = "daily_chart.html";

/// `hourly_weather_full_20240101_20240131.csv`
pub fn hourly_full_csv(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "hourly_weather_full_{}_{}.csv",
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}

/// `hourly_weather_selected_20240101_20240131.csv`, for an export of chosen columns only.
pub fn hourly_selected_csv(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "hourly_weather_selected_{}_{}.csv",
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}
