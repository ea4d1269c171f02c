use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Weather service unavailable for {url}")]
    UpstreamUnavailable {
        url: String,
        status: Option<reqwest::StatusCode>,
        #[source]
        source: reqwest::Error,
    },

    // HTTP 429
    #[error("Weather service rate limit reached for {url}")]
    RateLimited {
        url: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("Weather service rejected the request for {url}: {reason}")]
    Rejected { url: String, reason: String },

    #[error("Malformed response body from {url}")]
    MalformedBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} has no '{block}' block")]
    MissingBlock { url: String, block: &'static str },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Requested {requested} days of hourly data but at most {max} are allowed")]
    DateRangeTooLong { requested: i64, max: u32 },

    #[error("No parameters requested")]
    NoParameters,

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
