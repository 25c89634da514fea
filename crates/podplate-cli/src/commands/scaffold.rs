//! Scaffold command - write the built-in templates into a project

use console::style;
use podplate_engine::catalog::{DIRECTORIES, builtin_templates};
use std::fs;
use std::path::Path;

use super::write_file;
use crate::display;
use crate::error::{CliError, Result};

pub fn run(root: &Path, overwrite: bool) -> Result<()> {
    for dir in DIRECTORIES {
        let path = root.join(dir);
        if !path.is_dir() {
            fs::create_dir_all(&path).map_err(|e| CliError::create_dir(&path, e))?;
            display::created_dir(&path);
        }
    }

    let mut written = 0;
    for template in builtin_templates() {
        let path = template.template_path_in(root);
        if path.exists() && !overwrite {
            display::kept(&path);
            continue;
        }
        write_file(&path, template.data)?;
        display::wrote(&path);
        written += 1;
    }

    println!();
    println!(
        "{} Scaffolded {} of {} templates in {}",
        style("✓").green().bold(),
        written,
        builtin_templates().len(),
        root.display()
    );
    println!();
    println!("Next steps:");
    println!(
        "  1. Fill in {}",
        style(podplate_engine::catalog::DEFAULT_VARIABLES_FILE).cyan()
    );
    println!("  2. Run {}", style("podplate interpolate").cyan());

    Ok(())
}
