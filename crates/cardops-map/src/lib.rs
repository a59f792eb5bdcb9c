//! Maps spreadsheet rows onto a screen's canonical field names.

pub mod mapper;

pub use mapper::{HeaderLayout, map_rows};
