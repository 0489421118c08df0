//! Typed build errors
//!
//! Each externally meaningful failure mode gets its own `thiserror` enum;
//! [`BuildError`] aggregates them and attaches the offending file path to
//! metadata failures.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or missing front-matter metadata in a document.
#[derive(Debug, Error)]
pub enum MalformedMetadataError {
    /// The document has no `---`-delimited front-matter block.
    #[error("missing front-matter block")]
    MissingBlock,

    /// The front-matter block opened but was never terminated.
    #[error("unterminated front-matter block")]
    Unterminated,

    /// A required field was absent or empty.
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// A date field could not be parsed.
    #[error("invalid date `{value}`")]
    InvalidDate { value: String },

    /// The YAML block could not be deserialized.
    #[error("invalid front-matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Two documents resolve to the same route.
#[derive(Debug, Error)]
#[error("duplicate route `{route}` from {first:?} and {second:?}")]
pub struct DuplicateRouteError {
    /// The route both documents produced.
    pub route: String,
    /// The first source to claim the route.
    pub first: PathBuf,
    /// The second source that collided with the first.
    pub second: PathBuf,
}

/// The site configuration cannot drive a build.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The config file could not be read.
    #[error("could not read config {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid YAML.
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The site title is missing or empty.
    #[error("site configuration is missing a title")]
    MissingTitle,
}

/// Aggregate error for the build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An I/O error while reading a source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document's metadata was malformed, with the offending path attached.
    #[error("metadata error in {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        source: MalformedMetadataError,
    },

    /// A routing collision between two documents.
    #[error(transparent)]
    DuplicateRoute(#[from] DuplicateRouteError),

    /// The site configuration was invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
