//! List command - list the built-in templates

use console::style;
use podplate_engine::TemplateKind;
use podplate_engine::catalog::builtin_templates;

use crate::error::Result;

pub fn run() -> Result<()> {
    println!("{}", style("Built-in templates").cyan().bold());
    println!();

    for template in builtin_templates() {
        match template.kind {
            TemplateKind::Variables => println!(
                "  {} {}",
                style(template.template_path).bold(),
                style("(variables)").dim()
            ),
            TemplateKind::Render => println!(
                "  {} {} {}",
                style(template.template_path).bold(),
                style("→").blue(),
                template.output_path
            ),
        }
    }

    Ok(())
}
