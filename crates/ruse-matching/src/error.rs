//! Configuration-time errors.
//!
//! Every pattern compiles when a matcher or specification is built, so
//! a bad pattern can never surface while requests are being evaluated.

use thiserror::Error;

/// Error raised when a matcher pattern fails to compile.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Regular expression failed to parse.
    #[error("invalid regex pattern {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Wildcard pattern failed to parse.
    #[error("invalid wildcard pattern {pattern:?}: {source}")]
    Wildcard {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// XPath query failed to parse.
    #[error("invalid xpath query {query:?}: {reason}")]
    Xpath { query: String, reason: String },

    /// JSONPath query failed to parse.
    #[error("invalid jsonpath query {query:?}: {source}")]
    JsonPath {
        query: String,
        #[source]
        source: serde_json_path::ParseError,
    },
}
