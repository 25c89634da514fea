//! Base64 encoding of rendered Kubernetes Secret documents
//!
//! The secret templates are written with plain-text values so they can be
//! rendered like any other template. Before the document is handed to the
//! container runtime every value under `data` must be base64 encoded.

use base64::Engine as _;
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// File name suffix of a rendered, not yet encoded, secret document
pub const TEMPLATE_SUFFIX: &str = "-secrets-template.yaml";

/// File name suffix of an encoded secret document
pub const ENCODED_SUFFIX: &str = "-secrets.yaml";

/// Base64 encode every value under `data` and serialize the document back
pub fn encode_secret_document(yaml: &str) -> Result<String> {
    let mut document: YamlValue = serde_yaml::from_str(yaml)?;

    let data = document
        .get_mut("data")
        .ok_or_else(|| EngineError::secret("document has no `data` section"))?;

    match data {
        YamlValue::Mapping(entries) => {
            for (key, value) in entries.iter_mut() {
                let plain = scalar_text(value).ok_or_else(|| {
                    EngineError::secret(format!(
                        "value of `{}` must be a scalar",
                        key.as_str().unwrap_or("<non-string key>")
                    ))
                })?;
                *value = YamlValue::String(base64::engine::general_purpose::STANDARD.encode(plain.as_bytes()));
            }
        }
        // `data:` with nothing under it
        YamlValue::Null => {}
        _ => return Err(EngineError::secret("`data` must be a mapping of names to values")),
    }

    Ok(serde_yaml::to_string(&document)?)
}

/// Where the encoded form of a `*-secrets-template.yaml` file goes
pub fn encoded_output_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    match file_name.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stem) if !stem.is_empty() => Ok(path.with_file_name(format!("{stem}{ENCODED_SUFFIX}"))),
        _ => Err(EngineError::secret_with_help(
            format!("{} is not a secrets template", path.display()),
            format!("the file name must look like <name>{TEMPLATE_SUFFIX}"),
        )),
    }
}

fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Null => Some(String::new()),
        _ => None,
    }
}
