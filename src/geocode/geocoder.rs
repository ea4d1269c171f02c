//! Resolves a city name or UK postcode to a [`LocationCoordinate`].

use crate::config::PipelineConfig;
use crate::geocode::error::GeocodeError;
use crate::types::location::LocationCoordinate;
use log::{info, warn};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CitySearch {
    #[serde(default)]
    results: Vec<CityMatch>,
}

#[derive(Debug, Deserialize)]
struct CityMatch {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct PostcodeLookup {
    status: u16,
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    postcode: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug)]
pub struct Geocoder {
    client: Client,
    geocoding_url: String,
    postcode_url: Url,
}

impl Geocoder {
    pub fn new(config: &PipelineConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(GeocodeError::ClientBuild)?;
        let postcode_url = Url::parse(&config.postcode_url)
            .map_err(|_| GeocodeError::InvalidUrl(config.postcode_url.clone()))?;
        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            postcode_url,
        })
    }

    /// Best match for a place name, labelled with the name the service reports.
    /// `Ok(None)` when nothing matches.
    pub async fn search_city(&self, name: &str) -> Result<Option<LocationCoordinate>, GeocodeError> {
        let url = self.geocoding_url.clone();
        info!("Searching for city '{}'", name);
        let response = self
            .client
            .get(&url)
            .query(&[("name", name), ("count", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::UpstreamUnavailable {
                url: url.clone(),
                source: e,
            })?;
        let search: CitySearch = decode(response, &url).await?;

        let Some(found) = search.results.into_iter().next() else {
            warn!("City '{}' not found", name);
            return Ok(None);
        };
        let label = found.name.unwrap_or_else(|| name.to_string());
        coordinate(found.latitude, found.longitude).map(|c| Some(c.with_label(label)))
    }

    /// Coordinates of a UK postcode. `Ok(None)` for unknown or invalid postcodes.
    pub async fn lookup_postcode(&self, postcode: &str) -> Result<Option<LocationCoordinate>, GeocodeError> {
        let endpoint = self.postcode_endpoint(postcode.trim())?;
        let url = endpoint.to_string();
        info!("Looking up postcode '{}'", postcode);
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| GeocodeError::UpstreamUnavailable {
                url: url.clone(),
                source: e,
            })?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!("Postcode '{}' not found", postcode);
            return Ok(None);
        }
        let lookup: PostcodeLookup = decode(response, &url).await?;

        match (lookup.status, lookup.result) {
            (
                200,
                Some(PostcodeResult {
                    postcode: canonical,
                    latitude: Some(latitude),
                    longitude: Some(longitude),
                }),
            ) => {
                let label = canonical.unwrap_or_else(|| postcode.trim().to_uppercase());
                coordinate(latitude, longitude).map(|c| Some(c.with_label(label)))
            }
            // Terminated postcodes come back without coordinates.
            _ => {
                warn!("Postcode '{}' has no usable location", postcode);
                Ok(None)
            }
        }
    }

    /// The lookup URL with the postcode escaped as a single path segment.
    fn postcode_endpoint(&self, postcode: &str) -> Result<Url, GeocodeError> {
        let mut url = self.postcode_url.clone();
        url.path_segments_mut()
            .map_err(|_| GeocodeError::InvalidUrl(self.postcode_url.to_string()))?
            .pop_if_empty()
            .push(postcode);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, GeocodeError> {
    let response = response.error_for_status().map_err(|e| {
        warn!("HTTP error for {}: {:?}", url, e);
        GeocodeError::UpstreamUnavailable {
            url: url.to_string(),
            source: e,
        }
    })?;
    response.json().await.map_err(|e| GeocodeError::MalformedBody {
        url: url.to_string(),
        source: e,
    })
}

fn coordinate(latitude: f64, longitude: f64) -> Result<LocationCoordinate, GeocodeError> {
    LocationCoordinate::new(latitude, longitude).map_err(|_| GeocodeError::InvalidCoordinate {
        latitude,
        longitude,
    })
}
