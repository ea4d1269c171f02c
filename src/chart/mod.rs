pub mod chart_spec;
pub mod error;
