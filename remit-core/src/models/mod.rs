//! Domain models for Remit.
//!
//! These types mirror the JSON exchanged with the gateway. Field names accept
//! both `snake_case` and `camelCase` spellings since the gateway has shipped
//! both over time.
//!
//! ## Submodules
//!
//! - [`user`] - Raw and derived user types, account labels
//! - [`auth`] - Login, registration, password and TOTP payloads
//! - [`wallet`] - Wallets, deposits, lookups
//! - [`payment`] - Payments and receipts
//! - [`forex`] - Rates, quotes, and rate history

mod auth;
mod forex;
mod payment;
mod user;
mod wallet;

// Re-export everything at the models level
pub use auth::{
    EmailRequest, LoginRequest, LoginResponse, PasswordChangeRequest, PasswordResetConfirm,
    RegisterRequest, TotpCodeRequest, TotpSetup, TotpStatus, VerifyEmailRequest,
};
pub use forex::{ForexCalculateRequest, ForexQuote, ForexRate, RatePoint};
pub use payment::{Payment, PaymentRequest, PaymentStatus, Receipt};
pub use user::{AccountLabel, KycStatus, RawUser, UserProfile, UserType};
pub use wallet::{DepositRequest, Wallet, WalletLookup};
