/// Client error taxonomy
///
/// Mirrors the server's error mapping: 401 means re-authenticate (the UI
/// redirects to login), 403 is a permission error, 422/400 carry a
/// validation message shown inline, 404 is not-found, anything else is a
/// generic failure. A failed optimistic mutation is always rolled back
/// before the error is surfaced; no automatic retries.

use serde::Deserialize;

/// Error body returned by the API on every failure
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable error message
    pub detail: String,
}

/// Error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No session token held; login first
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Authentication failure (401): missing/invalid/expired token
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Authorization failure (403): subject does not own the target scope
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation failure (400/422), message shown inline
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other API failure
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided detail message
        detail: String,
    },

    /// Network or protocol failure before a response was obtained
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Maps an HTTP status and detail body to the typed taxonomy
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 => ClientError::Unauthorized(detail),
            403 => ClientError::Forbidden(detail),
            404 => ClientError::NotFound(detail),
            400 | 422 => ClientError::Validation(detail),
            _ => ClientError::Api { status, detail },
        }
    }

    /// True if the failure means the session is gone and the user must
    /// re-authenticate
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::Unauthorized(_)
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(401, "x".into()),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(403, "x".into()),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(404, "x".into()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(422, "x".into()),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            ClientError::from_status(500, "x".into()),
            ClientError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_requires_login() {
        assert!(ClientError::NotAuthenticated.requires_login());
        assert!(ClientError::Unauthorized("expired".into()).requires_login());
        assert!(!ClientError::Forbidden("nope".into()).requires_login());
        assert!(!ClientError::Transport("offline".into()).requires_login());
    }
}
