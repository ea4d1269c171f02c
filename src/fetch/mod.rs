pub mod cache;
pub mod client;
pub mod error;
pub mod payload;
pub mod request;
