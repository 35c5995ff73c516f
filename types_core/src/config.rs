use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "types_editor.toml";

/// Editor settings loaded from TOML
///
/// Every key is optional:
///   indent = 4
///   [suggestions]
///   categories = ["weapons", ...]
///   usages = ["Town", ...]
///   values = ["Tier1", ...]
///   tags = ["floor", ...]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Spaces per nesting level in exported documents
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            indent: default_indent(),
            suggestions: SuggestionConfig::default(),
        }
    }
}

fn default_indent() -> usize {
    4
}

/// Pick lists offered by the editor form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Baseline categories, always offered and merged into every import
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_usages")]
    pub usages: Vec<String>,
    #[serde(default = "default_values")]
    pub values: Vec<String>,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            categories: default_categories(),
            usages: default_usages(),
            values: default_values(),
            tags: default_tags(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_categories() -> Vec<String> {
    to_strings(&[
        "weapons",
        "food",
        "tools",
        "clothes",
        "books",
        "containers",
        "explosives",
        "lootdispatch",
    ])
}

fn default_usages() -> Vec<String> {
    to_strings(&[
        "coast",
        "farm",
        "firefighter",
        "hunting",
        "industrial",
        "medic",
        "military",
        "office",
        "police",
        "prison",
        "school",
        "town",
        "village",
        "lunapark",
        "seasonalevent",
        "contaminated area",
    ])
}

fn default_values() -> Vec<String> {
    to_strings(&["Tier1", "Tier2", "Tier3", "Tier4"])
}

fn default_tags() -> Vec<String> {
    to_strings(&["none", "shelves", "floor", "ground"])
}

impl EditorConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        let config = Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.to_path_buf(),
        })?;
        tracing::info!("loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error with optional file path
    #[error("IO error{}: {error}", path_suffix(.path.as_deref()))]
    Io {
        #[source]
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    /// TOML parse error with file path and location details
    #[error("Parse error in '{}': {error}", .path.display())]
    Parse {
        #[source]
        error: toml::de::Error,
        path: PathBuf,
    },
}

fn path_suffix(path: Option<&Path>) -> String {
    path.map(|p| format!(" in '{}'", p.display()))
        .unwrap_or_default()
}

impl ConfigError {
    /// Get the file path associated with this error, if any
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => path.as_deref(),
            ConfigError::Parse { path, .. } => Some(path),
        }
    }
}
