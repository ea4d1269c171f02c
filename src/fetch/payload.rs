use crate::series::error::SeriesError;
use crate::series::normalizer::{normalize, RawBlock};
use crate::series::observation_series::{ObservationSeries, TimeMode};
use crate::types::resolution::Resolution;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Top-level shape of an Open-Meteo forecast/archive response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub daily: Option<Map<String, Value>>,
    #[serde(default)]
    pub daily_units: Option<HashMap<String, String>>,
    #[serde(default)]
    pub hourly: Option<Map<String, Value>>,
    #[serde(default)]
    pub hourly_units: Option<HashMap<String, String>>,
}

/// Body returned alongside a 4xx status, e.g. `{"error": true, "reason": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub reason: String,
}

impl ApiResponse {
    /// Splits off the block for `resolution`. `None` if the response has no such block.
    pub(crate) fn into_payload(self, resolution: Resolution) -> Option<RawPayload> {
        let (block, units) = match resolution {
            Resolution::Daily => (self.daily?, self.daily_units),
            Resolution::Hourly => (self.hourly?, self.hourly_units),
        };
        let mut units = units.unwrap_or_default();
        units.remove("time");
        Some(RawPayload {
            resolution,
            block,
            utc_offset_seconds: self.utc_offset_seconds,
            timezone: self.timezone,
            units,
        })
    }
}

/// One fetched `daily` or `hourly` block, exactly as the service returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    pub resolution: Resolution,
    pub block: Map<String, Value>,
    pub utc_offset_seconds: Option<i32>,
    /// IANA name reported by the service, e.g. `Europe/London`.
    pub timezone: Option<String>,
    /// Unit per parameter, without the `time` entry.
    pub units: HashMap<String, String>,
}

impl RawPayload {
    pub fn time_mode(&self) -> TimeMode {
        TimeMode::from_zone_or_offset(self.timezone.as_deref(), self.utc_offset_seconds)
    }

    /// Normalizes the block and attaches the reported units.
    pub fn to_series(&self) -> Result<ObservationSeries, SeriesError> {
        let raw = RawBlock::from_json(self.resolution, &self.block)?;
        Ok(normalize(&raw, self.time_mode())?.with_units(self.units.clone()))
    }
}
