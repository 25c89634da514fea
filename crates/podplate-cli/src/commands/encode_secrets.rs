//! Encode-secrets command - base64 encode a rendered secrets template

use podplate_engine::{encode_secret_document, encoded_output_path};
use std::fs;
use std::path::Path;

use super::write_file;
use crate::display;
use crate::error::{CliError, Result};

pub fn run(file: &Path) -> Result<()> {
    // Check the name first so nothing is read for a wrong file
    let output = encoded_output_path(file)?;

    let content = fs::read_to_string(file).map_err(|e| CliError::read(file, e))?;
    let encoded = encode_secret_document(&content)?;

    write_file(&output, &encoded)?;
    display::wrote(&output);
    Ok(())
}
