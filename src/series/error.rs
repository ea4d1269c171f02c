use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Malformed timestamp {value:?} at row {index}")]
    MalformedTimestamp { index: usize, value: String },

    #[error("Parameter '{parameter}' has {found} values but the series has {expected} timestamps")]
    LengthMismatch {
        parameter: String,
        expected: usize,
        found: usize,
    },

    #[error("Parameter '{0}' appears more than once")]
    DuplicateParameter(String),

    #[error("Payload block has no 'time' column")]
    MissingTimeColumn,

    #[error("Column '{0}' in payload block is not an array")]
    NotAnArray(String),

    #[error("Parameter '{0}' not found in series")]
    UnknownParameter(String),
}
