//! Runtime settings for [`MeteoPipeline`](crate::MeteoPipeline).

use crate::aggregate::reduction::ReductionTable;
use crate::types::parameter::{DEFAULT_DAILY_PARAMETERS, DEFAULT_HOURLY_PARAMETERS};
use bon::Builder;
use std::time::Duration;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_POSTCODE_URL: &str = "https://api.postcodes.io/postcodes/";

/// Every knob the pipeline reads. Build with [`PipelineConfig::builder`] and override only
/// what you need; unset fields take the defaults listed below.
///
/// | field | default |
/// |---|---|
/// | `forecast_url` | Open-Meteo forecast endpoint |
/// | `archive_url` | Open-Meteo archive endpoint |
/// | `geocoding_url` | Open-Meteo geocoding search |
/// | `postcode_url` | postcodes.io lookup (trailing `/`) |
/// | `daily_parameters` | the six default daily variables |
/// | `hourly_parameters` | the thirty default hourly variables |
/// | `reductions` | [`ReductionTable::default`] |
/// | `aliases` | `windspeed_10m_max` → `wind_speed_10m_max` |
/// | `max_hourly_days` | 31 |
/// | `request_timeout` | 30 s |
/// | `cache_responses` | `true` |
/// | `missing_warning_ratio` | 0.2 |
///
/// # Examples
///
/// ```
/// use meteo_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::builder().max_hourly_days(7).build();
/// assert_eq!(config.max_hourly_days, 7);
/// assert!(config.cache_responses);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PipelineConfig {
    #[builder(into, default = DEFAULT_FORECAST_URL.to_string())]
    pub forecast_url: String,
    #[builder(into, default = DEFAULT_ARCHIVE_URL.to_string())]
    pub archive_url: String,
    #[builder(into, default = DEFAULT_GEOCODING_URL.to_string())]
    pub geocoding_url: String,
    #[builder(into, default = DEFAULT_POSTCODE_URL.to_string())]
    pub postcode_url: String,

    /// Requested when a daily call does not name its own parameters.
    #[builder(default = owned(&DEFAULT_DAILY_PARAMETERS))]
    pub daily_parameters: Vec<String>,
    /// Requested when an hourly call does not name its own parameters.
    #[builder(default = owned(&DEFAULT_HOURLY_PARAMETERS))]
    pub hourly_parameters: Vec<String>,

    #[builder(default)]
    pub reductions: ReductionTable,

    /// `(as returned, canonical)` renames applied to every fetched series.
    #[builder(default = default_aliases())]
    pub aliases: Vec<(String, String)>,

    /// Longest hourly range, in days, a single request may cover. Zero disables the limit.
    #[builder(default = 31)]
    pub max_hourly_days: u32,

    #[builder(default = Duration::from_secs(30))]
    pub request_timeout: Duration,

    /// Reuse fetched payloads for identical requests within this pipeline's lifetime.
    #[builder(default = true)]
    pub cache_responses: bool,

    /// Fetched series with a larger share of missing cells are logged at `warn`.
    #[builder(default = 0.2)]
    pub missing_warning_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn default_aliases() -> Vec<(String, String)> {
    vec![("windspeed_10m_max".to_string(), "wind_speed_10m_max".to_string())]
}
