pub mod aggregator;
pub mod error;
pub mod granularity;
pub mod reduction;
