// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Remit Core
//!
//! Core types, models, and traits shared by every Remit crate.
//!
//! This crate provides the foundational abstractions used across the
//! workspace, including:
//!
//! - Domain models for users, wallets, payments, and forex
//! - Error types
//! - The [`SessionStore`] trait injected into the API client and auth context
//!
//! ## Key Types
//!
//! ### User Types
//! - [`RawUser`] - The backend user object as cached on disk
//! - [`UserProfile`] - Display snapshot derived from a [`RawUser`]
//! - [`AccountLabel`] - Account label derived from country and user type
//! - [`UserType`] - Individual, merchant, or agent
//!
//! ### Wallet & Payment Types
//! - [`Wallet`] - A currency wallet owned by the user
//! - [`Payment`] - A transfer between wallets
//! - [`PaymentRequest`] - Payload for creating a payment
//!
//! ### Forex
//! - [`ForexQuote`] - Result of a conversion calculation
//! - [`ForexRate`] - A single currency pair rate

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // User types
    AccountLabel,
    KycStatus,
    RawUser,
    UserProfile,
    UserType,
    // Auth payloads
    EmailRequest,
    LoginRequest,
    LoginResponse,
    PasswordChangeRequest,
    PasswordResetConfirm,
    RegisterRequest,
    TotpCodeRequest,
    TotpSetup,
    TotpStatus,
    VerifyEmailRequest,
    // Wallets
    DepositRequest,
    Wallet,
    WalletLookup,
    // Payments
    Payment,
    PaymentRequest,
    PaymentStatus,
    Receipt,
    // Forex
    ForexCalculateRequest,
    ForexQuote,
    ForexRate,
    RatePoint,
};

// Re-export traits
pub use traits::SessionStore;
