//! Config command - print the effective project config

use crate::config::ProjectConfig;
use crate::error::{CliError, Result};

pub fn run(config: &ProjectConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).map_err(|e| CliError::serialize("project config", e))?;
    println!("{}", json);
    Ok(())
}
