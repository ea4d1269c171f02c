//! The main entry point: fetches observations for a location and date range, normalizes them,
//! and hands them to the aggregation, charting and statistics stages.

use crate::aggregate::aggregator::{aggregate, AggregatedSeries};
use crate::aggregate::granularity::Granularity;
use crate::chart::chart_spec::select_chart;
use crate::config::PipelineConfig;
use crate::error::MeteoError;
use crate::export::chart_document::ChartDocument;
use crate::fetch::cache::ResponseCache;
use crate::fetch::client::OpenMeteoClient;
use crate::fetch::request::WeatherRequest;
use crate::geocode::geocoder::Geocoder;
use crate::series::error::SeriesError;
use crate::series::observation_series::ObservationSeries;
use crate::series::stats::{describe, Summary};
use crate::types::location::LocationCoordinate;
use crate::types::resolution::{Resolution, Source};
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

/// Fetches and processes Open-Meteo observations.
///
/// Holds no per-user state: every call names its own location and dates. Identical
/// requests are answered from an in-memory cache unless
/// [`PipelineConfig::cache_responses`] is off.
///
/// # Examples
///
/// ```no_run
/// # use meteo_pipeline::{LocationCoordinate, MeteoError, MeteoPipeline, Granularity};
/// # use chrono::NaiveDate;
/// # async fn run() -> Result<(), MeteoError> {
/// let pipeline = MeteoPipeline::new()?;
/// let london = LocationCoordinate::new(51.5074, -0.1278)?;
///
/// let daily = pipeline
///     .daily()
///     .location(london)
///     .start(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
///     .call()
///     .await?;
///
/// if let Some(series) = daily {
///     let monthly = pipeline.aggregate(&series, Granularity::Monthly)?;
///     println!("{} months", monthly.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MeteoPipeline {
    config: PipelineConfig,
    client: OpenMeteoClient,
    geocoder: Geocoder,
    cache: Option<ResponseCache>,
}

#[bon]
impl MeteoPipeline {
    /// A pipeline with [`PipelineConfig::default`].
    pub fn new() -> Result<Self, MeteoError> {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Result<Self, MeteoError> {
        let client = OpenMeteoClient::new(&config)?;
        let geocoder = Geocoder::new(&config)?;
        let cache = config.cache_responses.then(ResponseCache::new);
        Ok(Self {
            config,
            client,
            geocoder,
            cache,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Daily observations for `location` between `start` and `end` (inclusive).
    ///
    /// # Arguments
    ///
    /// * `.location(LocationCoordinate)`: **Required.**
    /// * `.start(NaiveDate)`, `.end(NaiveDate)`: **Required.** Inclusive range.
    /// * `.parameters(Vec<String>)`: Optional. Defaults to [`PipelineConfig::daily_parameters`].
    /// * `.source(Source)`: Optional. Defaults to [`Source::Archive`].
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the service has no rows for a valid request.
    ///
    /// # Errors
    ///
    /// Request validation and transport failures as [`MeteoError::Fetch`], malformed payloads
    /// as [`MeteoError::Series`].
    #[builder]
    pub async fn daily(
        &self,
        location: LocationCoordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: Option<Vec<String>>,
        source: Option<Source>,
    ) -> Result<Option<ObservationSeries>, MeteoError> {
        let parameters = parameters.unwrap_or_else(|| self.config.daily_parameters.clone());
        let request = WeatherRequest::builder()
            .location(location)
            .start(start)
            .end(end)
            .parameters(parameters)
            .resolution(Resolution::Daily)
            .maybe_source(source)
            .build();
        self.observations(request).await
    }

    /// Hourly observations for `location` between `start` and `end` (inclusive).
    ///
    /// Same arguments as [`MeteoPipeline::daily`], with parameters defaulting to
    /// [`PipelineConfig::hourly_parameters`]. Ranges longer than
    /// [`PipelineConfig::max_hourly_days`] are rejected before any request is sent.
    #[builder]
    pub async fn hourly(
        &self,
        location: LocationCoordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: Option<Vec<String>>,
        source: Option<Source>,
    ) -> Result<Option<ObservationSeries>, MeteoError> {
        let parameters = parameters.unwrap_or_else(|| self.config.hourly_parameters.clone());
        let request = WeatherRequest::builder()
            .location(location)
            .start(start)
            .end(end)
            .parameters(parameters)
            .resolution(Resolution::Hourly)
            .maybe_source(source)
            .build();
        self.observations(request).await
    }

    async fn observations(&self, request: WeatherRequest) -> Result<Option<ObservationSeries>, MeteoError> {
        request.validate(self.config.max_hourly_days)?;

        let payload = match &self.cache {
            Some(cache) => {
                cache
                    .get_or_fetch(request.cache_key(), || self.client.fetch(&request))
                    .await?
            }
            None => Arc::new(self.client.fetch(&request).await?),
        };

        let mut series = payload.to_series()?;
        for (from, to) in &self.config.aliases {
            // A payload carrying both names keeps the canonical column.
            series = if series.parameter(to).is_some() {
                series.drop_parameter(from)
            } else {
                series.rename_parameter(from, to)?
            };
        }

        if series.is_empty() {
            info!(
                "No {} rows for {} between {} and {}",
                request.resolution, request.location, request.start, request.end
            );
            return Ok(None);
        }

        let missing = series.missing_ratio();
        if missing > self.config.missing_warning_ratio {
            warn!(
                "{:.0}% of {} values for {} are missing",
                missing * 100.0,
                request.resolution,
                request.location
            );
        }
        info!(
            "Normalized {} {} rows with {} parameters",
            series.len(),
            request.resolution,
            series.columns().len()
        );
        Ok(Some(series))
    }

    /// Buckets `series` with the configured reduction table.
    pub fn aggregate(
        &self,
        series: &ObservationSeries,
        granularity: Granularity,
    ) -> Result<AggregatedSeries, MeteoError> {
        Ok(aggregate(series, granularity, &self.config.reductions)?)
    }

    /// Chart document for one parameter of a series.
    pub fn chart(
        &self,
        series: &ObservationSeries,
        parameter: &str,
        kind: &str,
    ) -> Result<ChartDocument, MeteoError> {
        let spec = select_chart(parameter, kind)?;
        Ok(ChartDocument::package(spec, series)?)
    }

    /// Chart document for one parameter of an aggregated series. The title names the period.
    pub fn chart_aggregated(
        &self,
        aggregated: &AggregatedSeries,
        parameter: &str,
        kind: &str,
    ) -> Result<ChartDocument, MeteoError> {
        let spec = select_chart(parameter, kind)?.for_granularity(aggregated.granularity());
        let series = aggregated.to_series()?;
        Ok(ChartDocument::package(spec, &series)?)
    }

    pub fn describe(&self, series: &ObservationSeries, parameter: &str) -> Result<Summary, MeteoError> {
        let values = series
            .parameter(parameter)
            .ok_or_else(|| SeriesError::UnknownParameter(parameter.to_string()))?;
        Ok(describe(values))
    }

    pub async fn search_city(&self, name: &str) -> Result<Option<LocationCoordinate>, MeteoError> {
        Ok(self.geocoder.search_city(name).await?)
    }

    pub async fn lookup_postcode(&self, postcode: &str) -> Result<Option<LocationCoordinate>, MeteoError> {
        Ok(self.geocoder.lookup_postcode(postcode).await?)
    }
}
