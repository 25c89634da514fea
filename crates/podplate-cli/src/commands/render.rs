//! Render command - substitute variables into one template file

use podplate_engine::{Engine, EngineError};
use std::fs;
use std::path::Path;

use super::{load_values, write_file};
use crate::display;
use crate::error::{CliError, Result};

pub fn run(variables: &Path, input: &Path, output: &Path, strict: bool) -> Result<()> {
    let template = fs::read_to_string(input).map_err(|e| CliError::read(input, e))?;

    // Nothing is written if the variables do not resolve
    let values = load_values(variables)?;

    let engine = Engine::builder().strict(strict).build();
    let template_name = input.display().to_string();

    let rendered = match engine.render_string(&template, &values, &template_name) {
        Ok(rendered) => rendered,
        Err(EngineError::Unresolved(report)) => {
            display::display_render_report(&report);
            return Err(EngineError::Unresolved(report).into());
        }
        Err(e) => return Err(e.into()),
    };

    write_file(output, &rendered)?;
    display::wrote(output);
    Ok(())
}
