//! Values command - print the resolved variables

use std::path::Path;

use super::load_values;
use crate::error::{CliError, Result};

pub fn run(variables: &Path, json: bool) -> Result<()> {
    let values = load_values(variables)?;

    if json {
        let text = serde_json::to_string_pretty(&values).map_err(|e| CliError::serialize("values", e))?;
        println!("{}", text);
    } else {
        let text = serde_yaml::to_string(&values).map_err(|e| CliError::serialize("values", e))?;
        print!("{}", text);
    }

    Ok(())
}
