pub mod chart_document;
pub mod csv;
pub mod error;
pub mod file_name;
pub mod frame;
