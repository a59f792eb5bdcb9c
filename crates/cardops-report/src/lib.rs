//! Generated files: staging table exports and sample spreadsheets.

pub mod common;
pub mod export;
pub mod template;

pub use common::{DELIMITER, ExportError, UTF8_BOM};
pub use export::{export_file_name, render_export, write_export};
pub use template::{render_template, write_template};
