//! Prefs command - view and change preferences.

use anyhow::Result;
use clap::{Args, Subcommand};
use remit_store::PreferencesStore;

use crate::Cli;
use crate::output::emit;

/// Arguments for the prefs command.
#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub action: PrefsAction,
}

/// Prefs subcommands.
#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show preferences.
    Show,

    /// Set a preference, e.g. `theme dark` or `notifications.sms off`.
    Set {
        /// Dotted key.
        key: String,
        /// New value.
        value: String,
    },
}

/// Runs the prefs command.
pub async fn run(args: &PrefsArgs, cli: &Cli) -> Result<()> {
    let store = PreferencesStore::load_default().await;

    match &args.action {
        PrefsAction::Show => {
            let prefs = store.get().await;
            emit(cli, &prefs, |t| t.format_preferences(&prefs))
        }
        PrefsAction::Set { key, value } => {
            store.set_value(key, value).await?;
            store.save().await?;
            println!("Set {key} = {value}");
            Ok(())
        }
    }
}
