pub mod location;
pub mod parameter;
pub mod period;
pub mod resolution;
