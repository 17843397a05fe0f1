use thiserror::Error;

/// Top-level error type for the `wishstore-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, server-reported HTTP failures, and payload decoding.
/// `wishstore-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or a request came back 401.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-success status. `error_key` carries the `X-{app}-error`
    /// translation key when the server sent one.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        error_key: Option<String>,
    },

    /// 404 on a single-entity lookup.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A wire date did not match `yyyy-MM-dd`.
    #[error("Invalid date '{value}': expected yyyy-MM-dd")]
    InvalidDate { value: String },

    /// The operation needs an identifier the entity does not have yet.
    #[error("{resource} has no identifier")]
    MissingId { resource: &'static str },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Http { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Authentication { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
