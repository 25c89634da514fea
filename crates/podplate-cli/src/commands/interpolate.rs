//! Interpolate command - render every scaffolded template of a project

use console::style;
use podplate_engine::{Engine, EngineError, RenderJob, catalog};
use std::fs;
use std::path::Path;

use super::{load_values, write_file};
use crate::config::UserTemplate;
use crate::display;
use crate::error::{CliError, Result};

pub fn run(root: &Path, variables: &Path, extra: &[UserTemplate], strict: bool) -> Result<()> {
    let values = load_values(variables)?;

    let mut jobs = catalog::jobs_from_disk(root)?;
    for user in extra {
        let path = root.join(&user.template);
        let template = fs::read_to_string(&path).map_err(|e| CliError::read(&path, e))?;
        jobs.push(RenderJob::new(
            user.template.display().to_string(),
            template,
            root.join(&user.output),
        ));
    }

    let engine = Engine::builder().strict(strict).build();
    let result = match engine.render_all(&jobs, &values) {
        Ok(result) => result,
        Err(EngineError::Unresolved(report)) => {
            display::display_render_report(&report);
            return Err(EngineError::Unresolved(report).into());
        }
        Err(e) => return Err(e.into()),
    };

    for rendered in &result.rendered {
        write_file(&rendered.output_path, &rendered.content)?;
        display::wrote(&rendered.output_path);
    }

    println!();
    display::display_render_report(&result.report);
    println!(
        "{} Rendered {} templates with {} variables",
        style("✓").green().bold(),
        result.rendered.len(),
        values.len()
    );
    Ok(())
}
