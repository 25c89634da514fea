//! Project configuration (`podplate.yaml`)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "podplate.yaml";

/// Settings shared by every command; flags override them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Variables document, relative to `root` unless absolute
    #[serde(default = "default_variables")]
    pub variables: PathBuf,

    /// Project root that catalog paths are relative to
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Fail instead of keeping unresolved placeholders
    #[serde(default)]
    pub strict: bool,

    /// Extra templates rendered by `interpolate` after the built-in ones
    #[serde(default)]
    pub templates: Vec<UserTemplate>,
}

/// A user template and where its rendered form goes, both relative to `root`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTemplate {
    pub template: PathBuf,
    pub output: PathBuf,
}

fn default_variables() -> PathBuf {
    PathBuf::from(podplate_engine::catalog::DEFAULT_VARIABLES_FILE)
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            variables: default_variables(),
            root: default_root(),
            strict: false,
            templates: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Load the project config
    ///
    /// An explicit path must exist. Without one, `podplate.yaml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| CliError::read(&path, e))?;
        Self::from_yaml(&content).map_err(|e| CliError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// The project root, with an optional command-line override
    pub fn root_or<'a>(&'a self, flag: Option<&'a Path>) -> &'a Path {
        flag.unwrap_or(&self.root)
    }

    /// The variables document under `root`
    pub fn variables_in(&self, root: &Path) -> PathBuf {
        root.join(&self.variables)
    }
}
