//! Error types for content fetching and rendering

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for all library operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure talking to the content API.
    #[error("fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// No document of the given type carries the requested uid.
    #[error("{doc_type} not found: {uid}")]
    NotFound { doc_type: String, uid: String },

    /// The response body did not have the expected shape.
    #[error("schema error: {0}")]
    Schema(String),

    /// A pagination cursor pointing outside the configured API.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// Invalid site configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Template rendering failure.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// IO error when reading or writing files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used by the views to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or upstream failure; the caller may retry.
    FetchError,
    /// The requested post does not exist.
    NotFoundError,
    /// The upstream payload is malformed.
    SchemaError,
    /// Everything else (configuration, templates, local IO).
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Fetch(_) | Error::Status { .. } | Error::InvalidCursor(_) => {
                ErrorKind::FetchError
            }
            Error::NotFound { .. } => ErrorKind::NotFoundError,
            Error::Schema(_) => ErrorKind::SchemaError,
            Error::Config(_) | Error::Template(_) | Error::Io(_) => ErrorKind::Other,
        }
    }

    /// Whether a retry affordance makes sense for this error.
    ///
    /// Schema errors are only recoverable outside strict mode, where a
    /// malformed page is treated like any other failed fetch.
    pub fn is_recoverable(&self, strict_schema: bool) -> bool {
        match self.kind() {
            ErrorKind::FetchError => true,
            ErrorKind::SchemaError => !strict_schema,
            ErrorKind::NotFoundError | ErrorKind::Other => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Schema(e.to_string())
    }
}

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;
