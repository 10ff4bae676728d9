//! Gateway failures.

use std::path::PathBuf;

use folio_model::ModelError;
use thiserror::Error;

/// A failed gateway call. Every failure is scoped to the call that raised it.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// No document under the given key.
    #[error("{collection}/{key} not found")]
    NotFound {
        /// Collection searched.
        collection: String,
        /// Slug or id looked up.
        key: String,
    },

    /// The credentials were missing, expired or rejected (HTTP 401/403).
    #[error("not authorized (HTTP {0})")]
    Unauthorized(u16),

    /// Any other non-success response.
    #[error("content API returned HTTP {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),

    /// A stored document did not decode into its typed form.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The local content directory could not be read or written.
    #[error("content store I/O on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Shorthand for [`GatewayError::NotFound`].
    pub fn not_found(collection: &str, key: &str) -> Self {
        GatewayError::NotFound {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    /// Maps an HTTP status code to the matching error.
    #[must_use]
    pub fn from_status(code: u16, body: String) -> Self {
        match code {
            401 | 403 => GatewayError::Unauthorized(code),
            _ => GatewayError::Status { code, body },
        }
    }

    /// Returns true when the failure means the admin session is no longer
    /// valid. Callers expire the session instead of reporting a generic
    /// failure.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, GatewayError::Unauthorized(_))
    }

    /// Returns true for a missing document.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
            || matches!(self, GatewayError::Status { code: 404, .. })
    }
}
