//! Forex commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use remit_core::ForexCalculateRequest;
use remit_fetch::api::HistoryQuery;

use crate::Cli;
use crate::app::App;
use crate::output::emit;

/// Arguments for the forex command.
#[derive(Args)]
pub struct ForexArgs {
    #[command(subcommand)]
    pub action: ForexAction,
}

/// Forex subcommands.
#[derive(Subcommand)]
pub enum ForexAction {
    /// Current rate for a currency pair.
    Rate {
        /// Source currency.
        from: String,
        /// Target currency.
        to: String,
    },

    /// Quote a conversion, fees included.
    Calculate {
        /// Source currency.
        #[arg(long)]
        from: String,
        /// Target currency.
        #[arg(long)]
        to: String,
        /// Amount in the source currency.
        #[arg(long)]
        amount: f64,
    },

    /// Rate history.
    History {
        /// Source currency.
        #[arg(long)]
        from: Option<String>,
        /// Target currency.
        #[arg(long)]
        to: Option<String>,
        /// Days back.
        #[arg(long)]
        days: Option<u32>,
    },
}

/// Runs the forex command.
pub async fn run(args: &ForexArgs, cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    let forex = app.client.forex();

    match &args.action {
        ForexAction::Rate { from, to } => {
            let rate = forex.rate(from, to).await?;
            emit(cli, &rate, |t| t.format_rate(&rate))
        }
        ForexAction::Calculate { from, to, amount } => {
            if *amount <= 0.0 {
                bail!("Amount must be positive");
            }
            let request = ForexCalculateRequest {
                from: from.to_ascii_uppercase(),
                to: to.to_ascii_uppercase(),
                amount: *amount,
            };
            let quote = forex.calculate(&request).await?;
            emit(cli, &quote, |t| t.format_quote(&quote))
        }
        ForexAction::History { from, to, days } => {
            let query = HistoryQuery {
                from: from.as_deref().map(str::to_ascii_uppercase),
                to: to.as_deref().map(str::to_ascii_uppercase),
                days: *days,
            };
            let points = forex.history(&query).await?;
            emit(cli, &points, |t| t.format_history(&points))
        }
    }
}
