//! Sample spreadsheet operators download and fill in.

use std::path::{Path, PathBuf};

use tracing::info;

use cardops_model::ScreenSpec;
use cardops_standards::{sample_file_name, sample_grid};

use crate::common::{ExportError, encode_rows, write_file};

pub fn render_template(screen: &ScreenSpec) -> Result<Vec<u8>, ExportError> {
    encode_rows(sample_grid(screen).into_rows())
}

pub fn write_template(dir: &Path, screen: &ScreenSpec) -> Result<PathBuf, ExportError> {
    let bytes = render_template(screen)?;
    let path = write_file(dir, &sample_file_name(screen), &bytes)?;
    info!(path = %path.display(), screen = %screen.id, "template written");
    Ok(path)
}
