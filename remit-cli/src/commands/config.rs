//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use remit_store::{Config, default_config_dir, default_preferences_path, default_storage_path};
use tracing::info;

use crate::Cli;
use crate::app::load_config;
use crate::output::emit;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set a configuration value.
    Set {
        /// Key, e.g. `gateway_url` or `token_backend`.
        key: String,
        /// New value.
        value: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => {
            let config = load_config(cli)?;
            emit(cli, &config, |t| t.format_config(&config))
        }
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Set { key, value } => {
            // File values only; environment and flag overrides stay out of the file.
            let mut config = Config::load_from(&Config::default_path())?;
            config.set(key, value)?;
            config.save()?;
            info!(key = %key, "Configuration updated");
            println!("Set {key} = {value}");
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
            Ok(())
        }
    }
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = Config::default_path();
    let preferences_path = default_preferences_path();
    let storage_path = default_storage_path();

    let paths = serde_json::json!({
        "config_dir": config_dir.display().to_string(),
        "config_file": config_path.display().to_string(),
        "preferences_file": preferences_path.display().to_string(),
        "storage_file": storage_path.display().to_string(),
    });

    emit(cli, &paths, |_| {
        [
            "Configuration Paths".to_string(),
            "─".repeat(40),
            format!("Config dir:       {}", config_dir.display()),
            format!("Config file:      {}", config_path.display()),
            format!("Preferences file: {}", preferences_path.display()),
            format!("Storage file:     {}", storage_path.display()),
        ]
        .join("\n")
    })
}
