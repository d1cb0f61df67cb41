//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use blinkly_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of the config safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    cfg
}

fn target_profile(cfg: &Config, global: &GlobalOpts) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| cfg.active_profile_name().to_owned())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redacted(&blinkly_config::load_config()?);
            let out = output::render_single(
                &global.output,
                &cfg,
                output::render_yaml,
                |c| c.active_profile_name().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = blinkly_config::load_config()?;
            let profile_name = target_profile(&cfg, global);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: util::available_profiles(&cfg),
                });
            }

            let password = rpassword::prompt_password(format!("Password for '{profile_name}': "))
                .map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            blinkly_config::store_password(&profile_name, &SecretString::from(password))?;
            eprintln!("✓ Password for '{profile_name}' stored in system keyring");
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", blinkly_config::config_path().display());
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = blinkly_config::load_config()?;
    let config_path = blinkly_config::config_path();
    eprintln!("blinkly configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(target_profile(&cfg, global))
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Blink account email")
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if email.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "email and password cannot be empty".into(),
        });
    }

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let plaintext = if store_selection == 0 {
        blinkly_config::store_password(&profile_name, &SecretString::from(password))?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    } else {
        Some(password)
    };

    let network: String = Input::new()
        .with_prompt("Network id or name (empty for all)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            email: email.trim().to_owned(),
            password: plaintext,
            network: Some(network.trim().to_owned()).filter(|n| !n.is_empty()),
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());

    let path = blinkly_config::save_config(&cfg)?;
    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: blinkly cameras list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                email: "foo@example.com".into(),
                password: Some("deadbeef".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert(
            "cabin".into(),
            Profile {
                email: "bar@example.com".into(),
                ..Profile::default()
            },
        );

        let shown = redacted(&cfg);

        assert_eq!(shown.profiles["home"].password.as_deref(), Some("********"));
        assert_eq!(shown.profiles["cabin"].password, None);
        assert_eq!(cfg.profiles["home"].password.as_deref(), Some("deadbeef"));
    }
}
