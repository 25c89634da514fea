//! CLI error type with exit code mapping

use miette::Diagnostic;
use podplate_core::CoreError;
use podplate_engine::EngineError;
use std::path::Path;
use thiserror::Error;

use crate::exit_codes;

/// Every way a command can fail
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Invalid user input that is not a variables problem
    #[error("{message}")]
    #[diagnostic(code(podplate::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Project config could not be loaded
    #[error("Invalid project config {path}: {message}")]
    #[diagnostic(
        code(podplate::cli::config),
        help("run `podplate init --overwrite` to write a fresh podplate.yaml")
    )]
    Config { path: String, message: String },

    /// Reading or writing a file failed
    #[error("{action} {path}: {source}")]
    #[diagnostic(code(podplate::cli::io))]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialized
    #[error("Failed to serialize {what}: {message}")]
    #[diagnostic(code(podplate::cli::serialize))]
    Serialize { what: &'static str, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } | CliError::Config { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Serialize { .. } => exit_codes::ERROR,
            CliError::Engine(err) => engine_exit_code(err),
        }
    }

    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn serialize(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Serialize {
            what,
            message: err.to_string(),
        }
    }

    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action: "Cannot read",
            path: path.display().to_string(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action: "Cannot write",
            path: path.display().to_string(),
            source,
        }
    }

    pub fn create_dir(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action: "Cannot create directory",
            path: path.display().to_string(),
            source,
        }
    }
}

fn engine_exit_code(err: &EngineError) -> i32 {
    match err {
        EngineError::CyclicReference { .. } => exit_codes::TEMPLATE_ERROR,
        EngineError::Variables(CoreError::Io(_)) => exit_codes::IO_ERROR,
        EngineError::Variables(_) => exit_codes::VALIDATION_ERROR,
        EngineError::Unresolved(_) => exit_codes::VALIDATION_ERROR,
        EngineError::UnknownTemplate { .. } => exit_codes::VALIDATION_ERROR,
        EngineError::Secret { .. } | EngineError::Yaml(_) => exit_codes::VALIDATION_ERROR,
        EngineError::TemplateFile { .. } | EngineError::Io(_) => exit_codes::IO_ERROR,
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Engine(err.into())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
