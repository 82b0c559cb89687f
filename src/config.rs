use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::categories::{CATEGORIES_KEY, DEFAULT_CATEGORIES};
use crate::error::{FinancerError, Result};

/// Config file looked for in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "financer.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSection,
    pub import: ImportSection,
    pub categories: CategoriesSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Category store file. Defaults to `$HOME/.financer/store.json`.
    pub path: Option<PathBuf>,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesSection {
    /// Seed list for a fresh store
    pub defaults: Vec<String>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: None,
            key: CATEGORIES_KEY.to_string(),
        }
    }
}

impl Default for ImportSection {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl Default for CategoriesSection {
    fn default() -> Self {
        Self {
            defaults: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.delimiter_byte()?;
        Ok(config)
    }

    pub fn store_path(&self) -> PathBuf {
        match &self.store.path {
            Some(path) => path.clone(),
            None => default_home().join(".financer").join("store.json"),
        }
    }

    /// Delimiter as the single byte the tokenizer wants
    pub fn delimiter_byte(&self) -> Result<u8> {
        let delimiter = self.import.delimiter;
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(FinancerError::InvalidConfig(format!(
                "delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                delimiter
            )));
        }
        Ok(delimiter as u8)
    }
}

fn default_home() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
