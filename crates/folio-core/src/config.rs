//! Folio configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! student = "ada"
//! palette = ["#E57373", "#64B5F6"]
//! cache_enabled = true
//! ```
//!
//! Missing keys fall back to [`FolioConfig::default`].

use crate::error::FolioError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Preset colors assigned to new values, cycled by value count
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#E57373", "#64B5F6", "#81C784", "#FFB74D", "#BA68C8", "#4DB6AC", "#F06292", "#A1887F",
];

/// Portfolio configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Student scope key; every document lives under it
    pub student: String,
    /// Colors for new values, `palette[count % palette.len()]`
    pub palette: Vec<String>,
    /// Keep a read-your-writes session cache in front of the store
    pub cache_enabled: bool,
}

impl FolioConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With student scope
    #[inline]
    #[must_use]
    pub fn with_student(mut self, student: impl Into<String>) -> Self {
        self.student = student.into();
        self
    }

    /// With value palette
    #[inline]
    #[must_use]
    pub fn with_palette<I, S>(mut self, palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = palette.into_iter().map(Into::into).collect();
        self
    }

    /// With session cache on or off
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `FolioError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(source: &str) -> Result<Self, FolioError> {
        let config: Self =
            toml::from_str(source).map_err(|e| FolioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// `FolioError::Config` if the file cannot be read or is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| FolioError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Check invariants
    ///
    /// # Errors
    /// `FolioError::Config` for an empty student scope or palette
    pub fn validate(&self) -> Result<(), FolioError> {
        if self.student.trim().is_empty() {
            return Err(FolioError::Config("student scope must not be empty".into()));
        }
        if self.palette.is_empty() {
            return Err(FolioError::Config("palette must list at least one color".into()));
        }
        Ok(())
    }

    /// Color for the value created when `count` values already exist
    #[inline]
    #[must_use]
    pub fn color_for(&self, count: usize) -> &str {
        &self.palette[count % self.palette.len()]
    }
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            student: "default".to_string(),
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            cache_enabled: true,
        }
    }
}
