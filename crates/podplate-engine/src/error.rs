//! Engine error types

use indexmap::IndexMap;
use miette::Diagnostic;
use podplate_core::CoreError;
use std::fmt;
use thiserror::Error;

/// Main engine error type
#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    #[error("Cyclic variable reference: {}", chain.join(" -> "))]
    #[diagnostic(
        code(podplate::engine::cycle),
        help("give one of the variables in this loop a literal value")
    )]
    CyclicReference { chain: Vec<String> },

    #[error("{0}")]
    #[diagnostic(code(podplate::engine::variables))]
    Variables(CoreError),

    #[error("Unresolved placeholders: {}", .0.summary())]
    #[diagnostic(
        code(podplate::engine::unresolved),
        help("define the missing variables in the variables file, or render without --strict")
    )]
    Unresolved(RenderReport),

    #[error("Unknown template: {name}")]
    #[diagnostic(code(podplate::engine::unknown_template))]
    UnknownTemplate {
        name: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("Cannot read template {path}: {source}")]
    #[diagnostic(
        code(podplate::engine::template_file),
        help("run `podplate scaffold` to write the built-in templates")
    )]
    TemplateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret error: {message}")]
    #[diagnostic(code(podplate::engine::secret))]
    Secret {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(podplate::engine::io))]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    #[diagnostic(code(podplate::engine::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CyclicReference { chain } => Self::CyclicReference { chain },
            other => Self::Variables(other),
        }
    }
}

impl EngineError {
    pub(crate) fn secret(message: impl Into<String>) -> Self {
        Self::Secret {
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn secret_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Secret {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// A placeholder left in rendered output because its key is not defined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    /// The undefined key
    pub key: String,

    /// 1-based line in the rendered output
    pub line: usize,

    /// Closest defined key, if any is close enough
    pub suggestion: Option<String>,
}

impl fmt::Display for UnresolvedPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ${{{}}} is not defined", self.line, self.key)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Unresolved placeholders collected while rendering several templates
#[derive(Debug, Default, Clone)]
pub struct RenderReport {
    /// Unresolved placeholders grouped by template (IndexMap preserves insertion order)
    pub unresolved_by_template: IndexMap<String, Vec<UnresolvedPlaceholder>>,

    /// Templates rendered without leftovers
    pub clean_templates: Vec<String>,

    /// Total unresolved placeholder count
    pub total_unresolved: usize,
}

impl RenderReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one template
    pub fn record(&mut self, template_name: impl Into<String>, unresolved: Vec<UnresolvedPlaceholder>) {
        let template_name = template_name.into();
        if unresolved.is_empty() {
            self.clean_templates.push(template_name);
        } else {
            self.total_unresolved += unresolved.len();
            self.unresolved_by_template
                .entry(template_name)
                .or_default()
                .extend(unresolved);
        }
    }

    pub fn has_unresolved(&self) -> bool {
        self.total_unresolved > 0
    }

    /// Get count of templates with unresolved placeholders
    pub fn templates_with_unresolved(&self) -> usize {
        self.unresolved_by_template.len()
    }

    /// Generate summary message: "5 placeholders in 3 templates"
    pub fn summary(&self) -> String {
        let template_word = if self.templates_with_unresolved() == 1 {
            "template"
        } else {
            "templates"
        };
        let placeholder_word = if self.total_unresolved == 1 {
            "placeholder"
        } else {
            "placeholders"
        };
        format!(
            "{} {} in {} {}",
            self.total_unresolved,
            placeholder_word,
            self.templates_with_unresolved(),
            template_word
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
