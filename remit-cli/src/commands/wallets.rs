//! Wallet commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use futures::future::join_all;
use remit_core::{DepositRequest, Wallet};
use remit_fetch::ApiError;
use remit_store::PreferencesStore;
use tracing::{debug, warn};

use crate::Cli;
use crate::app::App;
use crate::output::emit;

/// Arguments for the wallets command.
#[derive(Args)]
pub struct WalletsArgs {
    #[command(subcommand)]
    pub action: WalletsAction,
}

/// Wallet subcommands.
#[derive(Subcommand)]
pub enum WalletsAction {
    /// List wallets.
    List,

    /// Fetch fresh balances, all wallets at once.
    Balance {
        /// Wallet ids; all wallets if omitted.
        ids: Vec<String>,
    },

    /// Deposit into a wallet.
    Deposit {
        /// Wallet id.
        id: String,
        /// Amount in the wallet currency.
        #[arg(long)]
        amount: f64,
        /// Funding method, e.g. `mobile_money`.
        #[arg(long)]
        method: Option<String>,
        /// Caller reference.
        #[arg(long)]
        reference: Option<String>,
    },

    /// Look up the owner of a wallet address.
    Lookup {
        /// Wallet address.
        address: String,
    },

    /// Search wallets by owner name or address fragment.
    Search {
        /// Search text.
        query: String,
    },
}

/// Runs the wallets command.
pub async fn run(args: &WalletsArgs, cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    app.require_user()?;

    match &args.action {
        WalletsAction::List => {
            let wallets = app.client.wallets().list().await?;
            print_wallets(cli, &wallets).await
        }
        WalletsAction::Balance { ids } => {
            let wallets = fetch_balances(&app, ids).await?;
            print_wallets(cli, &wallets).await
        }
        WalletsAction::Deposit {
            id,
            amount,
            method,
            reference,
        } => {
            if *amount <= 0.0 {
                bail!("Deposit amount must be positive");
            }
            let request = DepositRequest {
                amount: *amount,
                method: method.clone(),
                reference: reference.clone(),
            };
            let wallet = app.client.wallets().deposit(id, &request).await?;
            print_wallets(cli, std::slice::from_ref(&wallet)).await
        }
        WalletsAction::Lookup { address } => {
            let result = app.client.wallets().lookup(address).await?;
            emit(cli, &result, |t| t.format_lookups(std::slice::from_ref(&result)))
        }
        WalletsAction::Search { query } => {
            let results = app.client.wallets().search(query).await?;
            emit(cli, &results, |t| t.format_lookups(&results))
        }
    }
}

/// Fetches wallets concurrently.
///
/// A wallet that fails is skipped with a warning unless every fetch failed.
async fn fetch_balances(app: &App, ids: &[String]) -> Result<Vec<Wallet>> {
    let ids: Vec<String> = if ids.is_empty() {
        app.client
            .wallets()
            .list()
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect()
    } else {
        ids.to_vec()
    };

    debug!(count = ids.len(), "Fetching balances");
    let wallets = app.client.wallets();
    let results = join_all(ids.iter().map(|id| wallets.get(id))).await;

    let mut fetched = Vec::with_capacity(results.len());
    let mut last_error: Option<ApiError> = None;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(wallet) => fetched.push(wallet),
            Err(e) => {
                warn!(wallet = %id, error = %e, "Failed to fetch wallet");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if fetched.is_empty() => Err(e.into()),
        _ => Ok(fetched),
    }
}

async fn print_wallets(cli: &Cli, wallets: &[Wallet]) -> Result<()> {
    let hide_balances = PreferencesStore::load_default().await.get().await.hide_balances;
    emit(cli, wallets, |t| t.format_wallets(wallets, hide_balances))
}
