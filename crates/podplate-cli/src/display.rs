//! Display formatting for CLI output

use console::style;
use podplate_engine::RenderReport;
use std::path::Path;

/// A file was written
pub fn wrote(path: &Path) {
    println!("  {} {}", style("wrote").green(), path.display());
}

/// A file was left alone because it already exists
pub fn kept(path: &Path) {
    println!(
        "  {} {} (exists, use --overwrite to replace)",
        style("kept").yellow(),
        path.display()
    );
}

/// A directory was created
pub fn created_dir(path: &Path) {
    println!("  {} {}/", style("created").green(), path.display());
}

/// Summarise placeholders left in the output
///
/// Goes to stderr so rendered output piped from stdout stays clean.
pub fn display_render_report(report: &RenderReport) {
    if !report.has_unresolved() {
        return;
    }

    eprintln!(
        "  {} {}",
        style("⚠").yellow(),
        style(format!("Unresolved placeholders: {}", report.summary())).bold()
    );
    eprintln!();

    for (template_name, placeholders) in &report.unresolved_by_template {
        eprintln!(
            "  {} {} ({})",
            style("→").blue(),
            style(template_name).yellow(),
            placeholders.len()
        );

        for placeholder in placeholders {
            eprintln!(
                "    {} line {}: ${{{}}}",
                style("✗").red(),
                placeholder.line,
                placeholder.key
            );
            if let Some(suggestion) = &placeholder.suggestion {
                eprintln!("      {} {}", style("hint:").blue(), suggestion);
            }
        }
        eprintln!();
    }

    if !report.clean_templates.is_empty() {
        eprintln!(
            "  {} {} template(s) fully resolved",
            style("✓").green(),
            report.clean_templates.len()
        );
    }
}
