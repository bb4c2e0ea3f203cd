//! CLI settings
//!
//! The library configuration plus where the JSON data file lives and how logs
//! are written. Read from TOML, then overridden by command-line flags.

use anyhow::Context;
use folio_core::FolioConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default data file, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "folio.json";

/// Log line format on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings for one CLI invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub folio: FolioConfig,
    /// JSON file holding every student's documents
    pub data_path: PathBuf,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            folio: FolioConfig::default(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Settings {
    /// Parse TOML
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(source).context("invalid settings TOML")?;
        settings.folio.validate()?;
        Ok(settings)
    }

    /// Load from a file, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("loading settings {}", path.display()))
    }

    /// With data path
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// With student scope
    #[must_use]
    pub fn with_student(mut self, student: impl Into<String>) -> Self {
        self.folio = self.folio.with_student(student);
        self
    }
}
