// ── Runtime connection configuration ──
//
// These types describe how to reach a wishstore server. They carry
// credentials and connection tuning but never touch disk; the CLI/TUI
// builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default value of the `{app}` prefix in alert headers and event names.
pub const DEFAULT_APP_NAME: &str = "storeApp";

/// How to authenticate with the server.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// A pre-issued JWT.
    Token(SecretString),
    /// Username/password exchanged for a JWT at `api/authenticate`.
    Password {
        username: String,
        password: SecretString,
    },
    /// No credentials; only useful against an open development server.
    Anonymous,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for one server connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8080`.
    pub url: Url,
    /// Application name used in `X-{app}-*` headers and `{app}:*` events.
    pub app_name: String,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            app_name: DEFAULT_APP_NAME.into(),
            auth: AuthCredentials::Anonymous,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> wishstore_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => wishstore_api::TlsMode::System,
            TlsVerification::CustomCa(path) => wishstore_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => wishstore_api::TlsMode::DangerAcceptInvalid,
        };
        wishstore_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
