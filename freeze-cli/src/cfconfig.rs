//! Codefresh CLI credentials file
//!
//! The official Codefresh CLI keeps its authentication contexts in a YAML
//! file, `~/.cfconfig` by default:
//!
//! ```yaml
//! current-context: default
//! contexts:
//!   default:
//!     type: APIKey
//!     name: default
//!     url: https://g.codefresh.io
//!     token: <api key>
//!     beta: false
//!     onPrem: false
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{CliError, Result};

pub const DEFAULT_FILE_NAME: &str = ".cfconfig";

/// One authentication context
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CfContext {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    pub token: String,
    pub beta: bool,
    #[serde(rename = "onPrem")]
    pub on_prem: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CfConfig {
    #[serde(rename = "current-context")]
    pub current_context: String,
    pub contexts: HashMap<String, CfContext>,
}

impl CfConfig {
    /// Loads the credentials file at `path`, or at the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                info!("Path to CLI config was not set. Using default path");
                default_path(dirs::home_dir())?
            }
        };

        info!("Loading CLI config from \"{}\"", path.display());
        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CliError::NotFound(format!("CLI config was not found at \"{}\"", path.display()))
            } else {
                CliError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let config = Self::parse(&content)?;
        info!("CLI config was successfully loaded");
        Ok(config)
    }

    /// Parses the file content
    ///
    /// A file is valid when `current-context` is a non-empty string and
    /// `contexts` is a mapping.
    pub fn parse(content: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| CliError::Validation(format!("Invalid CLI config: {}", e)))?;

        let has_current = value
            .get("current-context")
            .and_then(serde_yaml::Value::as_str)
            .is_some_and(|name| !name.is_empty());
        let has_contexts = value.get("contexts").is_some_and(serde_yaml::Value::is_mapping);
        if !has_current || !has_contexts {
            return Err(invalid());
        }

        serde_yaml::from_value(value).map_err(|_| invalid())
    }

    pub fn context(&self, name: &str) -> Option<&CfContext> {
        self.contexts.get(name)
    }
}

fn invalid() -> CliError {
    CliError::Validation("Invalid CLI config".to_string())
}

/// Default file location under the given home directory
pub fn default_path(home: Option<PathBuf>) -> Result<PathBuf> {
    home.map(|home| home.join(DEFAULT_FILE_NAME)).ok_or_else(|| {
        CliError::Environment(
            "Unable to resolve path to HOME in order to load default CLI config".to_string(),
        )
    })
}
