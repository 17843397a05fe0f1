// ── Core error types ──
//
// User-facing errors from wishstore-core. Consumers never see raw HTTP
// plumbing; the `From<wishstore_api::Error>` impl translates transport
// failures into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Access to '{state}' requires {required}")]
    Forbidden { state: String, required: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Server translation key from `X-{app}-error`, if any.
        error_key: Option<String>,
        status: Option<u16>,
    },

    // ── Navigation errors ────────────────────────────────────────────
    #[error("Unknown state: {name}")]
    UnknownState { name: String },

    #[error("State '{state}' needs parameter '{param}'")]
    MissingParam { state: String, param: &'static str },

    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wishstore_api::Error> for CoreError {
    fn from(err: wishstore_api::Error) -> Self {
        match err {
            wishstore_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            wishstore_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        error_key: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wishstore_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wishstore_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wishstore_api::Error::Http {
                status,
                message,
                error_key,
            } => CoreError::Api {
                message,
                error_key,
                status: Some(status),
            },
            wishstore_api::Error::NotFound { resource, id } => CoreError::NotFound {
                entity_type: resource.into(),
                identifier: id.to_string(),
            },
            wishstore_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            wishstore_api::Error::InvalidDate { value } => {
                CoreError::Internal(format!("Server sent malformed date '{value}'"))
            }
            wishstore_api::Error::MissingId { resource } => CoreError::ValidationFailed {
                message: format!("{resource} has not been saved yet"),
            },
        }
    }
}

impl CoreError {
    /// Server-side translation key attached to the failure, if any.
    pub fn error_key(&self) -> Option<&str> {
        match self {
            Self::Api { error_key, .. } => error_key.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_error_key() {
        let err: CoreError = wishstore_api::Error::Http {
            status: 400,
            message: "bad".into(),
            error_key: Some("error.idexists".into()),
        }
        .into();
        assert_eq!(err.error_key(), Some("error.idexists"));
    }

    #[test]
    fn not_found_carries_entity_and_id() {
        let err: CoreError = wishstore_api::Error::NotFound {
            resource: "wishlist",
            id: 4,
        }
        .into();
        assert_eq!(err.to_string(), "Entity not found: wishlist with id 4");
    }
}
