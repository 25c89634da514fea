//! Init command - write a project config with the defaults

use console::style;
use std::path::Path;

use super::write_file;
use crate::config::ProjectConfig;
use crate::display;
use crate::error::{CliError, Result};

const HEADER: &str = "# podplate project config. Command-line flags override these values.\n";

pub fn run(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(CliError::validation_with_help(
            format!("{} already exists", path.display()),
            "pass --overwrite to replace it",
        ));
    }

    let yaml = ProjectConfig::default()
        .to_yaml()
        .map_err(|e| CliError::serialize("project config", e))?;
    write_file(path, &format!("{HEADER}{yaml}"))?;

    display::wrote(path);
    println!(
        "{} Run {} to create the templates",
        style("✓").green().bold(),
        style("podplate scaffold").cyan()
    );
    Ok(())
}
