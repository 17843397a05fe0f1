//! Config subcommand handlers.

use dialoguer::{Input, Select};

use wishstore_config::Profile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Ask whether to keep a secret in the keyring (`true`) or the config file.
fn prefer_keyring(what: &str) -> Result<bool, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {what}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(selection == 0)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |c| c.active_profile_name().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let prof = cfg
                .profiles
                .get(&profile_name)
                .ok_or_else(|| CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available: config::available_profiles(&cfg),
                })?;

            if prof.auth_mode == "token" {
                let token = prompt_secret("Token: ")?;
                wishstore_config::store_token(&profile_name, &token)?;
            } else {
                let password = prompt_secret("Password: ")?;
                wishstore_config::store_password(&profile_name, &password)?;
            }

            eprintln!("✓ Secret stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("wishstore configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let url: String = Input::new()
        .with_prompt("Server URL")
        .default("http://localhost:8080".into())
        .interact_text()
        .map_err(prompt_err)?;

    let app_name: String = Input::new()
        .with_prompt("Application name")
        .default(wishstore_core::DEFAULT_APP_NAME.into())
        .interact_text()
        .map_err(prompt_err)?;

    let auth_choices = &["Username/Password", "Pre-issued token"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile::new(url);
    profile.app_name = app_name;

    if auth_selection == 0 {
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let password = prompt_secret("Password: ")?;

        profile.auth_mode = "password".into();
        profile.username = Some(username);
        if prefer_keyring("password")? {
            wishstore_config::store_password(&profile_name, &password)?;
            eprintln!("   ✓ Password stored in system keyring");
        } else {
            profile.password = Some(password);
        }
    } else {
        let token = prompt_secret("Token: ")?;

        profile.auth_mode = "token".into();
        if prefer_keyring("token")? {
            wishstore_config::store_token(&profile_name, &token)?;
            eprintln!("   ✓ Token stored in system keyring");
        } else {
            profile.token = Some(token);
        }
    }

    // Keep any other profiles already on disk.
    let mut cfg = config::load_config_or_default();
    cfg.default_profile = Some(profile_name.clone());
    cfg.profiles.insert(profile_name.clone(), profile);
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: wishstore wishlists list");
    Ok(())
}
