//! Document models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// An ordered guide document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document title
    pub title: String,

    /// Declared date
    pub date: NaiveDate,

    /// Position in the reading order (lower comes first)
    pub order: i64,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Short description for listings, when declared
    pub description: Option<String>,

    /// Source file path (relative to the source dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Slug (URL-friendly name, derived from the filename)
    pub slug: String,

    /// Whether the document is a draft
    pub draft: bool,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Document {
    /// Create a new document with minimal required fields
    pub fn new(title: String, date: NaiveDate, order: i64, source: String) -> Self {
        let slug = slug::slugify(
            PathBuf::from(&source)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled"),
        );
        Self {
            title,
            date,
            order,
            raw: String::new(),
            content: String::new(),
            description: None,
            source: source.clone(),
            full_source: PathBuf::from(&source),
            slug,
            draft: false,
            extra: HashMap::new(),
        }
    }
}

/// A standalone page (about, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandalonePage {
    /// Page title
    pub title: String,

    /// Declared date, if any
    pub date: Option<NaiveDate>,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Layout template to use
    pub layout: String,

    /// Source file path (relative to the source dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without root)
    pub path: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_filename() {
        let doc = Document::new(
            "General Advice".to_string(),
            NaiveDate::from_ymd_opt(2014, 5, 1).unwrap(),
            4,
            "_guides/General_Advice.md".to_string(),
        );
        assert_eq!(doc.slug, "general-advice");
    }
}
