//! Podplate Engine - `${KEY}` templating for container deployments
//!
//! This crate renders templates from a resolved [`FlatMapping`] with:
//! - Non-strict substitution (unknown placeholders survive verbatim)
//! - Strict mode with multi-template error reports and key suggestions
//! - A built-in catalog of Django/Postgres/Nginx deployment templates
//! - Base64 encoding of rendered Secret documents
//!
//! [`FlatMapping`]: podplate_core::FlatMapping

pub mod catalog;
pub mod engine;
pub mod error;
pub mod secrets;
pub mod substitute;
pub mod suggestions;

pub use catalog::{BuiltinTemplate, TemplateKind};
pub use engine::{Engine, EngineBuilder, RenderJob, RenderResult, RenderedTemplate};
pub use error::{EngineError, RenderReport, Result, UnresolvedPlaceholder};
pub use secrets::{encode_secret_document, encoded_output_path};
pub use substitute::substitute;
