#![deny(unsafe_code)]

pub mod error;
pub mod registry;
pub mod template;

pub use crate::error::StandardsError;
pub use crate::registry::ScreenRegistry;
pub use crate::template::{sample_file_name, sample_grid};
