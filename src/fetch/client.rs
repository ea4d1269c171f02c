use crate::config::PipelineConfig;
use crate::fetch::error::FetchError;
use crate::fetch::payload::{ApiErrorBody, ApiResponse, RawPayload};
use crate::fetch::request::WeatherRequest;
use crate::types::resolution::Source;
use log::{info, warn};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};

/// HTTP client for the Open-Meteo forecast and archive endpoints.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: String,
    archive_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            forecast_url: config.forecast_url.clone(),
            archive_url: config.archive_url.clone(),
        })
    }

    pub fn endpoint(&self, source: Source) -> &str {
        match source {
            Source::Forecast => &self.forecast_url,
            Source::Archive => &self.archive_url,
        }
    }

    /// Sends one request and returns the matching `daily`/`hourly` block. Does not
    /// validate the request; callers run [`WeatherRequest::validate`] first.
    pub async fn fetch(&self, request: &WeatherRequest) -> Result<RawPayload, FetchError> {
        let url = self.endpoint(request.source).to_string();
        info!(
            "Requesting {} {} data for {} from {}",
            request.parameters.len(),
            request.resolution,
            request.location,
            url
        );

        let response = self
            .client
            .get(&url)
            .query(&request.query())
            .send()
            .await
            .map_err(|e| FetchError::UpstreamUnavailable {
                url: url.clone(),
                status: e.status(),
                source: e,
            })?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse().ok());
            warn!("Rate limited by {} (retry after {:?}s)", url, retry_after_seconds);
            return Err(FetchError::RateLimited {
                url,
                retry_after_seconds,
            });
        }

        if let Err(e) = response.error_for_status_ref().map(|_| ()) {
            let status = e.status();
            // Open-Meteo explains rejected parameters and ranges in a JSON body.
            let body = response.text().await.unwrap_or_default();
            if let Ok(ApiErrorBody { reason }) = serde_json::from_str(&body) {
                warn!("Request to {} rejected: {}", url, reason);
                return Err(FetchError::Rejected { url, reason });
            }
            warn!("HTTP error for {}: {:?}", url, e);
            return Err(FetchError::UpstreamUnavailable {
                url,
                status,
                source: e,
            });
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| FetchError::MalformedBody {
                url: url.clone(),
                source: e,
            })?;

        body.into_payload(request.resolution)
            .ok_or(FetchError::MissingBlock {
                url,
                block: request.resolution.block_name(),
            })
    }
}
