//! Sectioned variable documents
//!
//! A document is an ordered list of named sections, each an ordered mapping
//! of variable name to string value:
//!
//! ```yaml
//! GENERAL:
//!   APP_NAME: "shop"
//! POSTGRES:
//!   POSTGRES_DB: "${APP_NAME}"
//! ```
//!
//! Sections only group variables for the reader. All keys end up in one flat
//! namespace when the document is resolved.

use indexmap::IndexMap;
use serde_yaml::Value as YamlValue;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::mapping::FlatMapping;
use crate::placeholder::is_valid_key;
use crate::resolver;

/// A named group of variable definitions, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: IndexMap<String, String>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a variable
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Check that every key in every section is a valid variable name
pub fn validate_sections(sections: &[Section]) -> Result<()> {
    for section in sections {
        for key in section.entries.keys() {
            if !is_valid_key(key) {
                return Err(CoreError::invalid(format!(
                    "'{}.{}' is not a valid variable name (expected letters, digits and '_', not starting with a digit)",
                    section.name, key
                )));
            }
        }
    }
    Ok(())
}

/// An ordered list of sections loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableDocument {
    sections: Vec<Section>,
}

impl VariableDocument {
    /// Build a document from sections, validating variable names
    pub fn new(sections: Vec<Section>) -> Result<Self> {
        validate_sections(&sections)?;
        Ok(Self { sections })
    }

    /// Load a document from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse a document from YAML text
    ///
    /// Every variable value must be a YAML string; write `PORT: "8080"`,
    /// not `PORT: 8080`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if is_blank_yaml(yaml) {
            return Ok(Self::default());
        }

        let root: YamlValue = serde_yaml::from_str(yaml)?;

        let mapping = match root {
            YamlValue::Null => return Ok(Self::default()),
            YamlValue::Mapping(mapping) => mapping,
            other => {
                return Err(CoreError::invalid(format!(
                    "top level must be a mapping of sections, found {}",
                    describe(&other)
                )));
            }
        };

        let mut sections = Vec::with_capacity(mapping.len());
        for (name, body) in mapping {
            let name = match name {
                YamlValue::String(name) => name,
                other => {
                    return Err(CoreError::invalid(format!(
                        "section names must be strings, found {}",
                        describe(&other)
                    )));
                }
            };
            sections.push(parse_section(name, body)?);
        }

        Self::new(sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Total number of variable definitions, duplicates included
    pub fn definition_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Flatten and resolve this document
    pub fn resolve(&self) -> Result<FlatMapping> {
        resolver::resolve(&self.sections)
    }
}

fn parse_section(name: String, body: YamlValue) -> Result<Section> {
    let mut section = Section::new(name);

    let mapping = match body {
        YamlValue::Null => return Ok(section),
        YamlValue::Mapping(mapping) => mapping,
        other => {
            return Err(CoreError::invalid(format!(
                "section '{}' must be a mapping of variables, found {}",
                section.name,
                describe(&other)
            )));
        }
    };

    for (key, value) in mapping {
        let key = match key {
            YamlValue::String(key) => key,
            other => {
                return Err(CoreError::invalid(format!(
                    "variable names in section '{}' must be strings, found {}",
                    section.name,
                    describe(&other)
                )));
            }
        };

        match value {
            YamlValue::String(value) => {
                section.insert(key, value);
            }
            other => {
                return Err(CoreError::invalid(format!(
                    "'{}.{}' must be a quoted string, found {}",
                    section.name,
                    key,
                    describe(&other)
                )));
            }
        }
    }

    Ok(section)
}

/// Only whitespace and comments
fn is_blank_yaml(yaml: &str) -> bool {
    yaml.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn describe(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a list",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_yaml_keeps_document_order() {
        let doc = VariableDocument::from_yaml(
            r#"
GENERAL:
  APP_NAME: "shop"
  APP_PORT: "8000"
POSTGRES:
  POSTGRES_DB: "${APP_NAME}"
"#,
        )
        .unwrap();

        let names: Vec<&str> = doc.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GENERAL", "POSTGRES"]);

        let general = doc.section("GENERAL").unwrap();
        let keys: Vec<&str> = general.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["APP_NAME", "APP_PORT"]);
        assert_eq!(doc.section("POSTGRES").unwrap().get("POSTGRES_DB"), Some("${APP_NAME}"));
        assert_eq!(doc.definition_count(), 3);
    }

    #[test]
    fn test_empty_section_and_document() {
        let doc = VariableDocument::from_yaml("GENERAL:\nDJANGO:\n  X: \"1\"\n").unwrap();
        assert!(doc.section("GENERAL").unwrap().is_empty());
        assert_eq!(doc.section("DJANGO").unwrap().len(), 1);

        assert!(VariableDocument::from_yaml("").unwrap().is_empty());
        assert!(VariableDocument::from_yaml("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_unquoted_number_is_rejected() {
        let err = VariableDocument::from_yaml("NGINX:\n  WORKER_PROCESSES: 5\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
        assert!(err.to_string().contains("NGINX.WORKER_PROCESSES"));
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_null_value_is_rejected() {
        let err = VariableDocument::from_yaml("GENERAL:\n  TIMESTAMP: null\n").unwrap_err();
        assert!(err.to_string().contains("GENERAL.TIMESTAMP"));
    }

    #[test]
    fn test_non_mapping_section_is_rejected() {
        let err = VariableDocument::from_yaml("GENERAL: [a, b]\n").unwrap_err();
        assert!(err.to_string().contains("section 'GENERAL'"));
    }

    #[test]
    fn test_top_level_list_is_rejected() {
        let err = VariableDocument::from_yaml("- a\n- b\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let err = VariableDocument::from_yaml("GENERAL:\n  APP-NAME: \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("'GENERAL.APP-NAME' is not a valid variable name"));

        let sections = vec![Section::new("S").with("1BAD", "x")];
        assert!(VariableDocument::new(sections).is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = VariableDocument::from_yaml("GENERAL:\n  A: \"unterminated\n").unwrap_err();
        assert!(matches!(err, CoreError::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.yaml");
        std::fs::write(&path, "GENERAL:\n  APP_NAME: \"shop\"\n").unwrap();

        let doc = VariableDocument::from_file(&path).unwrap();
        assert_eq!(doc.section("GENERAL").unwrap().get("APP_NAME"), Some("shop"));

        let missing = VariableDocument::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, CoreError::Io(_)));
    }
}
