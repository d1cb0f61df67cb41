mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blinkly_config::Profile;
use blinkly_core::{ClientConfig, Controller};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "blinkly", &mut std::io::stdout());
            Ok(())
        }

        Command::Watch(args) => {
            let mut config = build_client_config(&cli.global)?;
            if let Some(secs) = args.interval {
                config.refresh_interval_secs = secs;
            }
            commands::watch::handle(config, &cli.global).await
        }

        cmd => {
            let mut config = build_client_config(&cli.global)?;
            config.refresh_interval_secs = 0;
            let controller = Controller::new(config);
            controller.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &controller, &cli.global).await;
            controller.disconnect().await;
            result
        }
    }
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = blinkly_config::load_config()?;
    let profile_name = global
        .profile
        .clone()
        .unwrap_or_else(|| cfg.active_profile_name().to_owned());

    let mut config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref email) = global.email {
            profile.email.clone_from(email);
        }
        blinkly_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)?
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: commands::util::available_profiles(&cfg),
        });
    } else {
        // No profile -- build from flags and env alone
        let email = global.email.clone().ok_or_else(|| CliError::NoConfig {
            path: blinkly_config::config_path().display().to_string(),
        })?;
        let profile = Profile {
            email,
            ..Profile::default()
        };
        blinkly_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)?
    };

    if let Some(ref network) = global.network {
        config.network = Some(network.clone());
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}
