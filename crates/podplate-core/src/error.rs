//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cyclic variable reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("Invalid variable document: {message}")]
    InvalidInput { message: String },

    #[error("Failed to parse variable document: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// The key chain of a cyclic reference, first key repeated at the end
    pub fn cycle_chain(&self) -> Option<&[String]> {
        match self {
            Self::CyclicReference { chain } => Some(chain),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
