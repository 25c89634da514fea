//! CLI commands

pub mod config;
pub mod encode_secrets;
pub mod init;
pub mod interpolate;
pub mod list;
pub mod render;
pub mod scaffold;
pub mod show;
pub mod values;

use podplate_core::{FlatMapping, VariableDocument};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{CliError, Result};

/// Read, flatten and resolve a variables document
pub(crate) fn load_values(path: &Path) -> Result<FlatMapping> {
    let content = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let document = VariableDocument::from_yaml(&content)?;
    debug!(
        path = %path.display(),
        sections = document.sections().len(),
        definitions = document.definition_count(),
        "loaded variables"
    );

    let values = document.resolve()?;
    debug!(keys = values.len(), "resolved variables");
    Ok(values)
}

/// Write `content` to `path`, creating parent directories
pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CliError::create_dir(parent, e))?;
    }
    fs::write(path, content).map_err(|e| CliError::write(path, e))
}
