//! Defines the native row spacing of fetched data and which Open-Meteo endpoint it comes from.

use std::fmt;

/// The time granularity of a fetched series, before any aggregation.
///
/// Decides which block of the Open-Meteo response is read (`daily` or `hourly`)
/// and how timestamps are rendered on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One row per calendar day (e.g. `temperature_2m_max`, `rain_sum`).
    Daily,
    /// One row per hour (e.g. `temperature_2m`, `precipitation`).
    Hourly,
}

impl Resolution {
    /// Query parameter and response block name.
    pub(crate) fn block_name(&self) -> &'static str {
        match self {
            Resolution::Daily => "daily",
            Resolution::Hourly => "hourly",
        }
    }

    /// `strftime` pattern used when a timestamp of this resolution is written out.
    pub(crate) fn timestamp_format(&self) -> &'static str {
        match self {
            Resolution::Daily => "%Y-%m-%d",
            Resolution::Hourly => "%Y-%m-%dT%H:%M",
        }
    }
}

/// ```
/// use meteo_pipeline::Resolution;
///
/// assert_eq!(Resolution::Hourly.to_string(), "hourly");
/// ```
impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block_name())
    }
}

/// Which Open-Meteo endpoint serves the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Source {
    /// Recent past and the next days (`/v1/forecast`).
    Forecast,
    /// Historical reanalysis back to 1940 (`/v1/archive`).
    #[default]
    Archive,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Forecast => write!(f, "forecast"),
            Source::Archive => write!(f, "archive"),
        }
    }
}
