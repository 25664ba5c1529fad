//! Settings file parsing
//!
//! Settings come from an optional TOML file; command-line flags override them.
//!
//! ```toml
//! gitlab_url = "https://gitlab.example.com"
//! exclude = ["vendor", "third_party"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directories removed from the snapshot unless configured otherwise
pub const DEFAULT_EXCLUDES: &[&str] = &["vendor"];

/// Workflow settings loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the GitLab instance; gitlab.com when unset
    pub gitlab_url: Option<String>,

    /// Directories removed before the local snapshot is published
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gitlab_url: None,
            exclude: DEFAULT_EXCLUDES.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
