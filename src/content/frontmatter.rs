//! Front-matter parsing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::MalformedMetadataError;

/// Parsed front-matter of a guide document
///
/// Guides are strict: `title`, `date`, and `order` are required and the
/// date must be a real calendar date. Unknown keys are carried through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Front-matter of a standalone page (about, etc.)
///
/// Everything is optional; a page without a front-matter block at all is
/// also fine and falls back to filename-derived defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub layout: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Deserialization shape before required-field validation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    order: Option<i64>,
    description: Option<String>,
    draft: bool,
    #[serde(flatten)]
    extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse strict guide front-matter from raw document text
    ///
    /// Returns the metadata and the remaining body. Pure function.
    pub fn parse(content: &str) -> Result<(Self, &str), MalformedMetadataError> {
        let (yaml, body) = split_front_matter(content)?;
        let raw: RawFrontMatter = serde_yaml::from_str(yaml)?;

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(MalformedMetadataError::MissingField { field: "title" })?;
        let date_str = raw
            .date
            .ok_or(MalformedMetadataError::MissingField { field: "date" })?;
        let date = parse_date(&date_str)?;
        let order = raw
            .order
            .ok_or(MalformedMetadataError::MissingField { field: "order" })?;

        Ok((
            Self {
                title,
                date,
                order,
                description: raw.description,
                draft: raw.draft,
                extra: raw.extra,
            },
            body,
        ))
    }

    /// Serialize the metadata back into a `---`-delimited block
    ///
    /// Parsing the result yields the same metadata values.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

impl PageMatter {
    /// Parse loose page front-matter from raw document text
    ///
    /// A document without any front-matter block parses as empty metadata
    /// with the full text as body.
    pub fn parse(content: &str) -> Result<(Self, &str), MalformedMetadataError> {
        match split_front_matter(content) {
            Ok((yaml, body)) => {
                let matter: PageMatter = serde_yaml::from_str(yaml)?;
                Ok((matter, body))
            }
            Err(MalformedMetadataError::MissingBlock) => Ok((PageMatter::default(), content)),
            Err(e) => Err(e),
        }
    }

    /// Parse the optional date field
    pub fn parse_date(&self) -> Result<Option<NaiveDate>, MalformedMetadataError> {
        self.date.as_deref().map(parse_date).transpose()
    }
}

/// Split raw text into the YAML metadata block and the body
fn split_front_matter(content: &str) -> Result<(&str, &str), MalformedMetadataError> {
    let trimmed = content.trim_start_matches('\u{feff}');
    let rest = trimmed
        .strip_prefix("---")
        .ok_or(MalformedMetadataError::MissingBlock)?;
    let rest = rest.strip_prefix(['\r', '\n']).unwrap_or(rest);

    let end = rest
        .find("\n---")
        .ok_or(MalformedMetadataError::Unterminated)?;
    let yaml = &rest[..end];
    let body = &rest[end + 4..];
    let body = body.trim_start_matches(['\n', '\r']);

    Ok((yaml, body))
}

/// Parse an ISO date string into a calendar date
fn parse_date(s: &str) -> Result<NaiveDate, MalformedMetadataError> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Full datetime forms keep the date part
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(MalformedMetadataError::InvalidDate {
        value: s.to_string(),
    })
}
