//! Describes one weather data request and checks it before anything goes on the wire.

use crate::fetch::error::FetchError;
use crate::types::location::LocationCoordinate;
use crate::types::resolution::{Resolution, Source};
use bon::Builder;
use chrono::NaiveDate;
use ordered_float::OrderedFloat;

/// What to fetch: where, when, which variables, at which resolution, from which endpoint.
///
/// # Examples
///
/// ```
/// use meteo_pipeline::{LocationCoordinate, Resolution, WeatherRequest};
/// use chrono::NaiveDate;
///
/// let request = WeatherRequest::builder()
///     .location(LocationCoordinate::new(51.5, -0.12)?)
///     .start(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2023, 1, 31).unwrap())
///     .parameters(vec!["temperature_2m".to_string()])
///     .resolution(Resolution::Hourly)
///     .build();
/// assert!(request.validate(31).is_ok());
/// # Ok::<(), meteo_pipeline::MeteoError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct WeatherRequest {
    pub location: LocationCoordinate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub parameters: Vec<String>,
    pub resolution: Resolution,
    #[builder(default)]
    pub source: Source,
}

impl WeatherRequest {
    /// Checks the date order, the hourly range limit and that something is requested.
    ///
    /// # Errors
    ///
    /// * [`FetchError::InvalidDateRange`] if `start > end`.
    /// * [`FetchError::DateRangeTooLong`] if an hourly request spans more than
    ///   `max_hourly_days` days (inclusive). A limit of zero disables the check.
    /// * [`FetchError::NoParameters`] if the parameter list is empty.
    pub fn validate(&self, max_hourly_days: u32) -> Result<(), FetchError> {
        if self.start > self.end {
            return Err(FetchError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        let days = (self.end - self.start).num_days() + 1;
        if self.resolution == Resolution::Hourly
            && max_hourly_days > 0
            && days > i64::from(max_hourly_days)
        {
            return Err(FetchError::DateRangeTooLong {
                requested: days,
                max: max_hourly_days,
            });
        }
        if self.parameters.is_empty() {
            return Err(FetchError::NoParameters);
        }
        Ok(())
    }

    /// Query string pairs for the Open-Meteo forecast and archive endpoints.
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.location.latitude().to_string()),
            ("longitude", self.location.longitude().to_string()),
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
            (self.resolution.block_name(), self.parameters.join(",")),
            ("timezone", "auto".to_string()),
        ]
    }

    /// Identity of this request for response caching. Covers the location, both dates,
    /// the parameter list, the resolution and the endpoint.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            latitude: OrderedFloat(self.location.latitude()),
            longitude: OrderedFloat(self.location.longitude()),
            start: self.start,
            end: self.end,
            parameters: self.parameters.clone(),
            resolution: self.resolution,
            source: self.source,
        }
    }
}

/// Hashable identity of a [`WeatherRequest`]. The location label is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    latitude: OrderedFloat<f64>,
    longitude: OrderedFloat<f64>,
    start: NaiveDate,
    end: NaiveDate,
    parameters: Vec<String>,
    resolution: Resolution,
    source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(resolution: Resolution, start: NaiveDate, end: NaiveDate) -> WeatherRequest {
        WeatherRequest::builder()
            .location(LocationCoordinate::new(51.5074, -0.1278).unwrap())
            .start(start)
            .end(end)
            .parameters(vec!["temperature_2m".to_string(), "rain".to_string()])
            .resolution(resolution)
            .build()
    }

    #[test]
    fn test_validate_date_order() {
        let err = request(Resolution::Daily, date(2024, 2, 1), date(2024, 1, 1))
            .validate(31)
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_validate_hourly_limit() {
        assert!(request(Resolution::Hourly, date(2024, 1, 1), date(2024, 1, 31))
            .validate(31)
            .is_ok());
        let err = request(Resolution::Hourly, date(2024, 1, 1), date(2024, 2, 1))
            .validate(31)
            .unwrap_err();
        assert!(matches!(err, FetchError::DateRangeTooLong { requested: 32, max: 31 }));
        // Daily requests are not limited.
        assert!(request(Resolution::Daily, date(2020, 1, 1), date(2024, 1, 1))
            .validate(31)
            .is_ok());
    }

    #[test]
    fn test_validate_requires_parameters() {
        let mut empty = request(Resolution::Daily, date(2024, 1, 1), date(2024, 1, 2));
        empty.parameters.clear();
        assert!(matches!(empty.validate(31), Err(FetchError::NoParameters)));
    }

    #[test]
    fn test_query_pairs() {
        let query = request(Resolution::Hourly, date(2024, 1, 1), date(2024, 1, 7)).query();
        assert!(query.contains(&("hourly", "temperature_2m,rain".to_string())));
        assert!(query.contains(&("start_date", "2024-01-01".to_string())));
        assert!(query.contains(&("timezone", "auto".to_string())));
        assert_eq!(request(Resolution::Daily, date(2024, 1, 1), date(2024, 1, 7)).source, Source::Archive);
    }

    #[test]
    fn test_cache_key_separates_location_and_dates() {
        let base = request(Resolution::Daily, date(2024, 1, 1), date(2024, 1, 7));
        let mut elsewhere = base.clone();
        elsewhere.location = LocationCoordinate::new(48.85, 2.35).unwrap();
        let mut later = base.clone();
        later.end = date(2024, 1, 8);
        let labelled = WeatherRequest {
            location: base.location.clone().with_label("London"),
            ..base.clone()
        };

        assert_ne!(base.cache_key(), elsewhere.cache_key());
        assert_ne!(base.cache_key(), later.cache_key());
        assert_eq!(base.cache_key(), labelled.cache_key());
    }
}
