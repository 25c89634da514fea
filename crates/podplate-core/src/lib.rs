//! Podplate Core - variable documents and placeholder resolution
//!
//! This crate provides the data model and the resolution engine:
//! - `VariableDocument`/`Section`: sectioned `KEY: "value"` definitions
//! - `FlatMapping`: every section merged into one namespace
//! - `resolve`: flatten sections and collapse `${KEY}` chains
//! - `placeholder`: the `${KEY}` scanner shared with the template engine

pub mod document;
pub mod error;
pub mod mapping;
pub mod placeholder;
pub mod resolver;

pub use document::{Section, VariableDocument};
pub use error::{CoreError, Result};
pub use mapping::{DanglingReference, FlatMapping};
pub use resolver::{flatten, resolve, resolve_mapping};

