//! CLI-side configuration: `GlobalOpts`-aware wrappers over
//! `wishstore_config`.
//!
//! Core never sees these types; it receives a pre-built `ClientConfig`.

use std::time::Duration;

use secrecy::SecretString;

use wishstore_config::{Config, Profile};
use wishstore_core::{AuthCredentials, ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use wishstore_config::{config_path, load_config_or_default, save_config};

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Application name for route and alert rendering, without a connection.
pub fn app_name(global: &GlobalOpts) -> String {
    if let Some(ref app) = global.app_name {
        return app.clone();
    }
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);
    cfg.profiles
        .get(&name)
        .map_or_else(|| wishstore_core::DEFAULT_APP_NAME.into(), |p| p.app_name.clone())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg, global);
    }

    // An explicitly named profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile: build from flags / env alone.
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_url(url_str)?;

    let auth = flag_credentials(global)?.unwrap_or(AuthCredentials::Anonymous);

    let mut config = ClientConfig::new(url);
    if let Some(ref app) = global.app_name {
        config.app_name.clone_from(app);
    }
    config.auth = auth;
    if global.insecure || cfg.defaults.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    Ok(config)
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    // 1. URL (flag > env > profile)
    let url = parse_url(global.url.as_deref().unwrap_or(&profile.url))?;

    // 2. Credentials (flags > profile chain)
    let auth = match flag_credentials(global)? {
        Some(auth) => auth,
        None => wishstore_config::resolve_auth(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(cfg.defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (flag > profile > defaults)
    let secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    let mut config = ClientConfig::new(url);
    config.app_name = global
        .app_name
        .clone()
        .unwrap_or_else(|| profile.app_name.clone());
    config.auth = auth;
    config.tls = tls;
    config.timeout = Duration::from_secs(secs);
    Ok(config)
}

// ── Credential helpers ───────────────────────────────────────────────

/// Credentials given directly on the command line, if any.
///
/// `--username` without `WISHSTORE_PASSWORD` prompts for the password.
fn flag_credentials(global: &GlobalOpts) -> Result<Option<AuthCredentials>, CliError> {
    if let Some(ref token) = global.token {
        return Ok(Some(AuthCredentials::Token(SecretString::from(token.clone()))));
    }
    let Some(ref username) = global.username else {
        return Ok(None);
    };
    let password = match std::env::var("WISHSTORE_PASSWORD") {
        Ok(pw) => pw,
        Err(_) => rpassword::prompt_password(format!("Password for {username}: "))?,
    };
    Ok(Some(AuthCredentials::Password {
        username: username.clone(),
        password: SecretString::from(password),
    }))
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
