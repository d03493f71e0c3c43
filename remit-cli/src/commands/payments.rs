//! Payment commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use remit_core::PaymentRequest;
use remit_fetch::api::PaymentDraft;
use tracing::info;

use super::prompt_line;
use crate::Cli;
use crate::app::App;
use crate::output::emit;

/// Arguments for the payments command.
#[derive(Args)]
pub struct PaymentsArgs {
    #[command(subcommand)]
    pub action: PaymentsAction,
}

/// Payment subcommands.
#[derive(Subcommand)]
pub enum PaymentsAction {
    /// List payments.
    List,

    /// Review and send a transfer.
    Send {
        /// Source wallet id.
        #[arg(long)]
        from: String,
        /// Recipient wallet address.
        #[arg(long)]
        to: String,
        /// Amount in the source currency.
        #[arg(long)]
        amount: f64,
        /// Source currency.
        #[arg(long)]
        currency: String,
        /// Currency the recipient receives.
        #[arg(long)]
        target: Option<String>,
        /// Note for the recipient.
        #[arg(long)]
        note: Option<String>,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show the receipt of a completed payment.
    Receipt {
        /// Payment id.
        id: String,
    },
}

/// Runs the payments command.
pub async fn run(args: &PaymentsArgs, cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    app.require_user()?;

    match &args.action {
        PaymentsAction::List => {
            let payments = app.client.payments().list().await?;
            emit(cli, &payments, |t| t.format_payments(&payments))
        }
        PaymentsAction::Send {
            from,
            to,
            amount,
            currency,
            target,
            note,
            yes,
        } => {
            if *amount <= 0.0 {
                bail!("Amount must be positive");
            }

            let request = PaymentRequest {
                from_wallet_id: from.clone(),
                to_address: to.clone(),
                amount: *amount,
                currency: currency.to_ascii_uppercase(),
                target_currency: target.as_deref().map(str::to_ascii_uppercase),
                note: note.clone(),
            };

            let review = app.client.payments().initiate(&request).await?;
            if !*yes {
                eprintln!("{}", crate::output::TextFormatter::new(!cli.no_color).format_payment(&review));
                let answer = prompt_line("Send this payment? [y/N] ")?;
                if !matches!(answer.trim(), "y" | "Y" | "yes") {
                    println!("Cancelled");
                    return Ok(());
                }
            }

            let draft = PaymentDraft::new(request);
            let payment = app.client.payments().submit(&draft).await?;
            info!(payment = %payment.id, status = %payment.status, "Payment submitted");
            emit(cli, &payment, |t| t.format_payment(&payment))
        }
        PaymentsAction::Receipt { id } => {
            let receipt = app.client.payments().receipt(id).await?;
            emit(cli, &receipt, |t| t.format_receipt(&receipt))
        }
    }
}
