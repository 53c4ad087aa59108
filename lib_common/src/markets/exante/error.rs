//! Error type shared by every [`ExanteClient`](super::ExanteClient) operation.

use thiserror::Error;

use crate::configs::config_exante::ConfigError;
use crate::retrieve::ky_http::RetrieveError;

/// Errors surfaced by [`ExanteClient`](super::ExanteClient) operations.
#[derive(Debug, Error)]
pub enum ExanteError {
    /// Invalid configuration (host, prefix or policy).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A request URL could not be built, or a path parameter is empty, `.` or `..`.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The token cannot be sent as an HTTP header.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// Network, DNS, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Raw response body (may be empty).
        body: String,
    },

    /// The body of a successful response is not valid JSON.
    #[error("Unparsable response from {url}: {source}")]
    Parse {
        /// Requested URL.
        url: String,
        /// Raw response body.
        body: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The response does not contain the requested field.
    #[error("Field {field:?} not found in response from {url}")]
    FieldNotFound {
        /// Requested field name.
        field: String,
        /// Requested URL.
        url: String,
    },

    /// An array response carried no elements.
    #[error("Empty result from {url}")]
    EmptyResult {
        /// Requested URL.
        url: String,
    },

    /// The response is valid JSON but not of the expected shape.
    #[error("Unexpected response from {url}: expected {expected}")]
    UnexpectedShape {
        /// Requested URL.
        url: String,
        /// Description of the expected shape.
        expected: &'static str,
    },
}

impl ExanteError {
    /// HTTP status for [`ExanteError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExanteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for an absent field or an empty result set.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, ExanteError::FieldNotFound { .. } | ExanteError::EmptyResult { .. })
    }
}

impl From<RetrieveError> for ExanteError {
    fn from(err: RetrieveError) -> Self {
        match err {
            RetrieveError::InvalidUrl(e) => ExanteError::InvalidUrl(e.to_string()),
            RetrieveError::CannotBeABase(url) => ExanteError::InvalidUrl(url),
            RetrieveError::InvalidToken(e) => ExanteError::InvalidToken(e.to_string()),
            RetrieveError::Transport(e) => ExanteError::Transport(e),
            RetrieveError::Decode { url, body, source } => ExanteError::Parse { url, body, source },
        }
    }
}
