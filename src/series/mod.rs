pub mod error;
pub mod normalizer;
pub mod observation_series;
pub mod stats;
