//! Session commands: login, logout, whoami, register, password reset.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use remit_core::{LoginRequest, PasswordResetConfirm, RegisterRequest, UserProfile, UserType};
use remit_fetch::session;
use tracing::info;

use super::value_or_prompt;
use crate::Cli;
use crate::app::App;
use crate::output::emit;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account e-mail.
    #[arg(long, short)]
    pub email: Option<String>,

    /// Password. Prompted for if omitted.
    #[arg(long)]
    pub password: Option<String>,

    /// Current TOTP code, if two-factor auth is enabled.
    #[arg(long)]
    pub totp: Option<String>,

    /// Send a magic sign-in link instead of using a password.
    #[arg(long, conflicts_with_all = ["password", "totp"])]
    pub magic_link: bool,
}

/// Arguments for the whoami command.
#[derive(Args)]
pub struct WhoamiArgs {
    /// Re-fetch the profile from the gateway.
    #[arg(long)]
    pub refresh: bool,
}

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Account e-mail.
    #[arg(long, short)]
    pub email: String,

    /// Password. Prompted for if omitted.
    #[arg(long)]
    pub password: Option<String>,

    /// Given name.
    #[arg(long)]
    pub first_name: Option<String>,

    /// Family name.
    #[arg(long)]
    pub last_name: Option<String>,

    /// Phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Two-letter country code.
    #[arg(long)]
    pub country: Option<String>,

    /// Account type: individual, merchant, or agent.
    #[arg(long, default_value = "individual")]
    pub user_type: String,
}

/// Arguments for the password-reset command.
#[derive(Args)]
pub struct PasswordResetArgs {
    #[command(subcommand)]
    pub action: PasswordResetAction,
}

/// Password reset steps.
#[derive(Subcommand)]
pub enum PasswordResetAction {
    /// E-mail a reset link.
    Request {
        /// Account e-mail.
        email: String,
    },
    /// Set a new password with the token from the e-mail.
    Confirm {
        /// Reset token.
        token: String,
        /// New password. Prompted for if omitted.
        #[arg(long)]
        password: Option<String>,
    },
}

/// Runs the login command.
pub async fn login(args: &LoginArgs, cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    let email = value_or_prompt(args.email.as_ref(), "E-mail: ")?;

    if args.magic_link {
        app.client.auth().request_magic_link(&email).await?;
        println!("Sign-in link sent to {email}");
        return Ok(());
    }

    let password = value_or_prompt(args.password.as_ref(), "Password: ")?;
    let mut request = LoginRequest::new(email, password);
    if let Some(code) = &args.totp {
        request = request.with_totp(code.clone());
    }

    let profile = session::login(&app.client, &app.auth, &request).await?;
    info!(label = %profile.account_label, "Logged in");
    emit(cli, &profile, |t| format!("Signed in as\n{}", t.format_profile(&profile)))
}

/// Runs the logout command.
pub fn logout(cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    session::logout(&app.client, &app.auth);
    if !cli.quiet {
        println!("Signed out");
    }
    Ok(())
}

/// Runs the whoami command.
pub async fn whoami(args: &WhoamiArgs, cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    let profile: UserProfile = if args.refresh {
        app.require_user()?;
        session::refresh_profile(&app.client, &app.auth).await?
    } else {
        app.require_user()?
    };

    emit(cli, &profile, |t| t.format_profile(&profile))
}

/// Runs the register command.
pub async fn register(args: &RegisterArgs, cli: &Cli) -> Result<()> {
    let Some(user_type) = UserType::parse(&args.user_type) else {
        bail!("Unknown account type: {}", args.user_type);
    };

    let app = App::init(cli)?;
    let password = value_or_prompt(args.password.as_ref(), "Choose a password: ")?;

    let request = RegisterRequest {
        email: args.email.clone(),
        password,
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        phone: args.phone.clone(),
        country_code: args.country.as_deref().map(str::to_ascii_uppercase),
        user_type: Some(user_type.as_str().to_string()),
    };

    let user = app.client.auth().register(&request).await?;
    match user {
        Some(raw) => {
            let profile = UserProfile::from_raw(&raw);
            emit(cli, &profile, |t| {
                format!(
                    "Account created. Check {} for a verification link.\n{}",
                    args.email,
                    t.format_profile(&profile)
                )
            })
        }
        None => {
            println!("Account created. Check {} for a verification link.", args.email);
            Ok(())
        }
    }
}

/// Runs the password-reset command.
pub async fn password_reset(args: &PasswordResetArgs, cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;

    match &args.action {
        PasswordResetAction::Request { email } => {
            app.client.auth().request_password_reset(email).await?;
            println!("If {email} has an account, a reset link is on its way.");
        }
        PasswordResetAction::Confirm { token, password } => {
            let password = value_or_prompt(password.as_ref(), "New password: ")?;
            app.client
                .auth()
                .confirm_password_reset(&PasswordResetConfirm {
                    token: token.clone(),
                    password,
                })
                .await?;
            println!("Password updated. You can sign in now.");
        }
    }

    Ok(())
}
