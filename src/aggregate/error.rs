use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Hour windows of {0} hours do not divide a day evenly")]
    InvalidGranularity(u32),

    #[error("Bucket period {0} has no valid start time")]
    InvalidPeriod(String),
}
