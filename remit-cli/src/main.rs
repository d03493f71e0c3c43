// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Remit CLI - wallets, transfers, and rates from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Sign in
//! remit login --email chisomo@example.com
//!
//! # Wallets with fresh balances
//! remit wallets balance
//!
//! # Quote and send a transfer
//! remit payments send --from w_123 --to CN-88412 --amount 25000 --currency MWK --target CNY
//!
//! # JSON output
//! remit --format json --pretty forex rate MWK CNY
//! ```

mod app;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use remit_fetch::ApiError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{auth, config, device, forex, payments, prefs, wallets};

// ============================================================================
// CLI Definition
// ============================================================================

/// Remit CLI - cross-border wallet client.
#[derive(Parser)]
#[command(name = "remit")]
#[command(about = "Cross-border wallet and remittance client")]
#[command(long_about = r#"
Remit talks to the wallet gateway on your behalf.

Sessions, the device identifier, and preferences are kept in your
platform's config and data directories.

Examples:
  remit login --email you@example.com
  remit whoami
  remit wallets list
  remit forex calculate --from MWK --to CNY --amount 50000
  remit --format json payments list
"#)]
#[command(version)]
#[command(author = "Remit Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Gateway root URL for this invocation.
    #[arg(long, global = true)]
    pub gateway: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in.
    Login(auth::LoginArgs),

    /// Sign out and forget the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami(auth::WhoamiArgs),

    /// Create an account.
    Register(auth::RegisterArgs),

    /// Request or confirm a password reset.
    PasswordReset(auth::PasswordResetArgs),

    /// Wallets and balances.
    #[command(visible_alias = "w")]
    Wallets(wallets::WalletsArgs),

    /// Transfers and receipts.
    #[command(visible_alias = "p")]
    Payments(payments::PaymentsArgs),

    /// Exchange rates and quotes.
    #[command(visible_alias = "fx")]
    Forex(forex::ForexArgs),

    /// Show the device identifier and country.
    Device,

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Manage preferences.
    Prefs(prefs::PrefsArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// The session expired or no one is signed in.
    SessionExpired = 2,
    /// The gateway could not be reached.
    Unreachable = 3,
}

impl ExitCode {
    /// Picks the exit code for an error.
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<ApiError>() {
            Some(e) if e.is_session_expired() => ExitCode::SessionExpired,
            Some(e) if e.is_transport() => ExitCode::Unreachable,
            _ if error.downcast_ref::<app::NotSignedIn>().is_some() => ExitCode::SessionExpired,
            _ => ExitCode::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("remit=debug,info")
    } else {
        EnvFilter::new("remit=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Login(args) => auth::login(args, &cli).await,
        Commands::Logout => auth::logout(&cli),
        Commands::Whoami(args) => auth::whoami(args, &cli).await,
        Commands::Register(args) => auth::register(args, &cli).await,
        Commands::PasswordReset(args) => auth::password_reset(args, &cli).await,
        Commands::Wallets(args) => wallets::run(args, &cli).await,
        Commands::Payments(args) => payments::run(args, &cli).await,
        Commands::Forex(args) => forex::run(args, &cli).await,
        Commands::Device => device::run(&cli).await,
        Commands::Config(args) => config::run(args, &cli),
        Commands::Prefs(args) => prefs::run(args, &cli).await,
    };

    if let Err(e) = result {
        let code = ExitCode::for_error(&e);
        if !cli.quiet {
            eprintln!("Error: {e}");
            match code {
                ExitCode::SessionExpired => eprintln!("Run `remit login` to sign in again."),
                ExitCode::Unreachable
                    if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_timeout) =>
                {
                    eprintln!(
                        "The gateway did not answer in time; raise `request_timeout_secs` with `remit config set`."
                    );
                }
                _ => {}
            }
        }
        std::process::exit(code as i32);
    }

    Ok(())
}
