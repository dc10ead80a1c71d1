// src/error.rs
// =============================================================================
// Typed errors for the extraction library.
//
// The CLI and the network layers use anyhow::Result (see main.rs and
// fetch/), but the library pieces report errors that callers may want to
// match on, so they get proper enums built with `thiserror`.
// =============================================================================

use thiserror::Error;

/// Errors from the parse/select boundary
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The CSS selector could not be parsed
    #[error("Parse error on '{selector}' - {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Errors from splitting a URI into protocol and path
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// No "://" separator in the URI
    #[error("No protocol separator in '{0}'")]
    MissingSeparator(String),

    /// Nothing before the "://" separator
    #[error("Empty protocol in '{0}'")]
    EmptyProtocol(String),
}

/// Errors loading a web search service configuration
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to read service config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service config: {0}")]
    Json(#[from] serde_json::Error),

    /// A required value is present but empty
    #[error("Failed to get {0} value")]
    MissingValue(&'static str),

    #[error("Invalid service uri '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },
}
