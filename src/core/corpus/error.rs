//! Error types for the corpus layer.
//!
//! Only genuine failures live here. An empty record collection, a zeroed
//! aggregate or a meaning that cannot be found are ordinary values, not
//! errors, so the UI can tell "no data" apart from "connection problem".

use std::time::Duration;

use thiserror::Error;

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Error enum for data-source access, decoding and identifier handling.
#[derive(Error, Debug)]
pub enum CorpusError {
    // =========================================================================
    // Source Errors
    // =========================================================================

    /// A remote source kept failing after every retry was spent.
    ///
    /// `reason` is the rendering of the last per-attempt failure.
    #[error("Source unavailable: {url} (after {attempts} attempts): {reason}")]
    SourceUnavailable {
        /// The request URL
        url: String,
        /// Number of attempts made, including the first
        attempts: u32,
        /// Last failure reason
        reason: String,
    },

    /// Non-2xx response for a single attempt.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// The request URL
        url: String,
    },

    /// A single attempt exceeded the configured timeout.
    #[error("Request to {url} timed out after {elapsed:?}")]
    Timeout {
        /// The request URL
        url: String,
        /// Configured timeout ceiling
        elapsed: Duration,
    },

    /// Transport-level failure for a single attempt.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The source answered but its body could not be decoded.
    #[error("Failed to decode {what}: {reason}")]
    Decode {
        /// What was being decoded (e.g. "dataset page", "latin.json")
        what: String,
        /// Decoder message
        reason: String,
    },

    /// Local static file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // =========================================================================
    // Capability / Identifier Errors
    // =========================================================================

    /// The configured source variant does not offer this operation.
    #[error("Source '{source_kind}' does not support {operation}")]
    Unsupported {
        /// Source variant name
        source_kind: &'static str,
        /// Operation name
        operation: &'static str,
    },

    /// A meaning ID could not be split into `{preverb}_{lemma}_{language}`.
    #[error("Malformed meaning ID: '{id}'")]
    MalformedMeaningId {
        /// The offending identifier
        id: String,
    },

    /// Unknown language name.
    #[error("Unknown language: '{0}'")]
    UnknownLanguage(String),

    /// Invalid URL built from configuration.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CorpusError {
    /// Whether the fetch wrapper should try again after this error.
    ///
    /// Decode failures are not retried: the server answered, the body was bad.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CorpusError::HttpStatus { .. } | CorpusError::Timeout { .. } | CorpusError::Network(_)
        )
    }

    /// Taxonomy (a): the backing source could not be reached.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(
            self,
            CorpusError::SourceUnavailable { .. }
                | CorpusError::HttpStatus { .. }
                | CorpusError::Timeout { .. }
                | CorpusError::Network(_)
                | CorpusError::Io(_)
        )
    }

    pub(crate) fn decode(what: impl Into<String>, reason: impl ToString) -> Self {
        CorpusError::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<figment::Error> for CorpusError {
    fn from(err: figment::Error) -> Self {
        CorpusError::Config(err.to_string())
    }
}
