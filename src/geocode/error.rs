use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding service unavailable for {url}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed geocoding response from {url}")]
    MalformedBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Geocoding returned out-of-range coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid geocoding endpoint {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
