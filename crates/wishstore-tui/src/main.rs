//! `wishstore-tui`: terminal front end for a wishstore server.
//!
//! One tab per entity (wishlists, wishes). Each tab lists the collection,
//! opens a detail view per row, and hosts the create/edit and delete
//! dialogs over it. Navigation goes through the same authorized state
//! table the CLI exposes under `wishstore routes`.
//!
//! Logs are written to a file (default `/tmp/wishstore-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod record;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use wishstore_core::{AuthCredentials, ClientConfig, Storefront};

use crate::app::App;

/// Terminal UI for browsing and editing wishlists.
#[derive(Parser, Debug)]
#[command(name = "wishstore-tui", version, about)]
struct Cli {
    /// Config profile to connect with
    #[arg(short = 'p', long, env = "WISHSTORE_PROFILE")]
    profile: Option<String>,

    /// Server URL, bypassing the config file (e.g., http://localhost:8080)
    #[arg(short = 'u', long, env = "WISHSTORE_URL")]
    url: Option<String>,

    /// Pre-issued JWT to use with --url
    #[arg(long, env = "WISHSTORE_TOKEN", hide_env = true)]
    token: Option<String>,

    /// Application name used in alert headers and event topics
    #[arg(long, env = "WISHSTORE_APP_NAME")]
    app_name: Option<String>,

    /// State URL to open after signing in (e.g., /wishlist/3/edit)
    #[arg(long, value_name = "URL")]
    open: Option<String>,

    /// Log file path (defaults to /tmp/wishstore-tui.log)
    #[arg(long, default_value = "/tmp/wishstore-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Logging to stdout/stderr would corrupt the
/// TUI, so everything goes to `--log-file`. Hold the returned guard for the
/// lifetime of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wishstore_tui={log_level},wishstore_core={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wishstore-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Priority: `--url` flags, then the selected config profile.
fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match cli.url.as_deref() {
        Some(raw) => {
            let url = Url::parse(raw).wrap_err_with(|| format!("invalid server URL: {raw}"))?;
            let mut config = ClientConfig::new(url);
            if let Some(token) = &cli.token {
                config.auth = AuthCredentials::Token(SecretString::from(token.clone()));
            }
            config
        }
        None => {
            let cfg = wishstore_config::load_config()?;
            let (name, profile) = cfg.profile(cli.profile.as_deref())?;
            wishstore_config::profile_to_client_config(profile, name, &cfg.defaults)?
        }
    };
    if let Some(app_name) = &cli.app_name {
        config.app_name.clone_from(app_name);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = client_config(&cli)?;
    info!(url = %config.url, app = %config.app_name, "starting wishstore-tui");

    let store = Storefront::new(config)?;
    let mut app = App::new(store, cli.open);
    app.run().await?;

    Ok(())
}
