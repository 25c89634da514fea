//! Rendering engine over resolved variables

use podplate_core::FlatMapping;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{EngineError, RenderReport, Result, UnresolvedPlaceholder};
use crate::substitute::{substitute, unresolved_placeholders};
use crate::suggestions::suggest_key;

/// A template waiting to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Name used in reports and log lines
    pub name: String,
    /// Template text
    pub template: String,
    /// Where the rendered text should be written
    pub output_path: PathBuf,
}

impl RenderJob {
    pub fn new(name: impl Into<String>, template: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            output_path: output_path.into(),
        }
    }
}

/// A rendered template, not yet written anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub name: String,
    pub output_path: PathBuf,
    pub content: String,
}

/// Result of rendering several templates
#[derive(Debug)]
pub struct RenderResult {
    /// Rendered templates in job order
    pub rendered: Vec<RenderedTemplate>,

    /// Placeholders left unresolved, by template
    pub report: RenderReport,
}

/// Template engine builder
#[derive(Debug, Default)]
pub struct EngineBuilder {
    strict_mode: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode (fail on unresolved placeholders)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine::new(self.strict_mode)
    }
}

/// The template engine
///
/// Lenient by default: unresolved placeholders are kept in the output and
/// logged. A strict engine refuses to produce output that still contains
/// them.
#[derive(Debug, Default)]
pub struct Engine {
    strict_mode: bool,
}

impl Engine {
    pub fn new(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }

    /// Render a single template string
    pub fn render_string(&self, template: &str, values: &FlatMapping, template_name: &str) -> Result<String> {
        let (rendered, unresolved) = self.render_one(template, values, template_name);

        if self.strict_mode && !unresolved.is_empty() {
            let mut report = RenderReport::new();
            report.record(template_name, unresolved);
            return Err(EngineError::Unresolved(report));
        }

        Ok(rendered)
    }

    /// Render every job, collecting all unresolved placeholders
    ///
    /// In strict mode the error carries the problems of every template, not
    /// just the first one that had any.
    pub fn render_all(&self, jobs: &[RenderJob], values: &FlatMapping) -> Result<RenderResult> {
        let mut report = RenderReport::new();
        let mut rendered = Vec::with_capacity(jobs.len());

        for job in jobs {
            let (content, unresolved) = self.render_one(&job.template, values, &job.name);
            report.record(job.name.clone(), unresolved);
            rendered.push(RenderedTemplate {
                name: job.name.clone(),
                output_path: job.output_path.clone(),
                content,
            });
        }

        if self.strict_mode && report.has_unresolved() {
            return Err(EngineError::Unresolved(report));
        }

        Ok(RenderResult { rendered, report })
    }

    fn render_one(
        &self,
        template: &str,
        values: &FlatMapping,
        template_name: &str,
    ) -> (String, Vec<UnresolvedPlaceholder>) {
        debug!(template = template_name, "rendering");
        let rendered = substitute(template, values);

        let mut unresolved = unresolved_placeholders(&rendered, values);
        for placeholder in &mut unresolved {
            placeholder.suggestion = suggest_key(&placeholder.key, values.keys());
            if !self.strict_mode {
                warn!(
                    template = template_name,
                    line = placeholder.line,
                    "unresolved placeholder ${{{}}}",
                    placeholder.key
                );
            }
        }

        (rendered, unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values() -> FlatMapping {
        [("APP_NAME", "shop"), ("APP_PORT", "8000")].into_iter().collect()
    }

    #[test]
    fn test_builder_defaults_to_lenient() {
        assert!(!Engine::builder().build().is_strict());
        assert!(Engine::builder().strict(true).build().is_strict());
    }

    #[test]
    fn test_render_string() {
        let engine = Engine::default();
        let out = engine
            .render_string("bind = ':${APP_PORT}'", &values(), "gunicorn.conf")
            .unwrap();
        assert_eq!(out, "bind = ':8000'");
    }

    #[test]
    fn test_lenient_keeps_unresolved() {
        let engine = Engine::default();
        let out = engine
            .render_string("name=${APP_NAME} path=${PATH}", &values(), "Containerfile")
            .unwrap();
        assert_eq!(out, "name=shop path=${PATH}");
    }

    #[test]
    fn test_strict_fails_with_suggestion() {
        let engine = Engine::builder().strict(true).build();
        let err = engine
            .render_string("a\nname=${APP_NAM}", &values(), "t.conf")
            .unwrap_err();

        let EngineError::Unresolved(report) = err else {
            panic!("expected unresolved error");
        };
        let problems = &report.unresolved_by_template["t.conf"];
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].line, 2);
        assert_eq!(problems[0].suggestion.as_deref(), Some("did you mean `APP_NAME`?"));
    }

    #[test]
    fn test_render_all_collects_every_template() {
        let jobs = vec![
            RenderJob::new("one", "${APP_NAME} ${MISSING}", "out/one"),
            RenderJob::new("two", "${APP_PORT}", "out/two"),
            RenderJob::new("three", "${OTHER}\n${MISSING}", "out/three"),
        ];

        let lenient = Engine::default().render_all(&jobs, &values()).unwrap();
        let contents: Vec<&str> = lenient.rendered.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["shop ${MISSING}", "8000", "${OTHER}\n${MISSING}"]);
        assert_eq!(lenient.rendered[2].output_path, PathBuf::from("out/three"));
        assert_eq!(lenient.report.clean_templates, vec!["two".to_string()]);

        let err = Engine::builder()
            .strict(true)
            .build()
            .render_all(&jobs, &values())
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Unresolved placeholders: 3 placeholders in 2 templates");
    }

    #[test]
    fn test_render_all_strict_clean() {
        let jobs = vec![RenderJob::new("one", "${APP_NAME}", "one")];
        let result = Engine::builder()
            .strict(true)
            .build()
            .render_all(&jobs, &values())
            .unwrap();
        assert!(!result.report.has_unresolved());
        assert_eq!(result.rendered[0].content, "shop");
    }
}
