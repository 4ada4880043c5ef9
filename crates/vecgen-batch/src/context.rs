//! State scoped to one batch run.

use std::path::Path;

use tempfile::TempDir;
use vecgen_core::{Result, VecgenError};
use vecgen_parser::{parse_color_resources, ColorTable};

use crate::options::GenerateOptions;

/// Resources owned by a single run.
///
/// The temporary directory holds normalized drawables and is removed when the
/// context is dropped, whichever way the run ends.
#[derive(Debug)]
pub struct RunContext {
    temp_dir: TempDir,
    colors: ColorTable,
}

impl RunContext {
    pub fn new(options: &GenerateOptions) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("vecgen-")
            .tempdir()
            .map_err(|e| VecgenError::io(std::env::temp_dir(), e))?;

        let colors = match &options.color_resources {
            Some(path) => load_colors(path)?,
            None => ColorTable::new(),
        };

        log::debug!(
            "run context in {} with {} color resources",
            temp_dir.path().display(),
            colors.len()
        );

        Ok(Self { temp_dir, colors })
    }

    /// Scratch directory for normalized files.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }
}

fn load_colors(path: &Path) -> Result<ColorTable> {
    let xml = std::fs::read_to_string(path).map_err(|e| VecgenError::io(path, e))?;
    parse_color_resources(&xml).map_err(|e| {
        VecgenError::Config(format!("color resources {}: {}", path.display(), e))
    })
}
