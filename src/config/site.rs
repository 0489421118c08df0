//! Site configuration (_config.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigurationError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub guide_dir: String,

    // Writing
    pub render_drafts: bool,
    /// Abort the build on the first malformed document instead of
    /// reporting it and excluding the document from the output set
    pub strict: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Navigation menu in declaration order (label -> path). The About
    /// link is appended automatically when source/about.md exists.
    #[serde(default)]
    pub menu: IndexMap<String, String>,

    // Date format for rendered pages
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Guidebook".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            guide_dir: "_guides".to_string(),

            render_drafts: false,
            strict: false,
            highlight: HighlightConfig::default(),

            menu: IndexMap::new(),

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigurationError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a build
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.title.trim().is_empty() {
            return Err(ConfigurationError::MissingTitle);
        }
        Ok(())
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
