//! Text output formatting with colors.

use chrono::{DateTime, Utc};
use remit_core::{
    ForexQuote, ForexRate, KycStatus, Payment, PaymentStatus, RatePoint, Receipt, UserProfile,
    Wallet, WalletLookup,
};
use remit_store::{Config, Preferences};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Rate history bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Shown instead of balances when they are hidden.
const MASKED: &str = "••••••";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 20,
        }
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Formats the signed-in user.
    pub fn format_profile(&self, profile: &UserProfile) -> String {
        let mut lines = vec![format!(
            "{}  {}",
            self.bold(&profile.name),
            self.colorize(&format!("[{}]", profile.account_label), CYAN)
        )];

        if let Some(email) = &profile.email {
            lines.push(format!("  Email:   {email}"));
        }
        if let Some(phone) = &profile.phone {
            lines.push(format!("  Phone:   {phone}"));
        }
        if let Some(country) = &profile.country_code {
            lines.push(format!("  Country: {country}"));
        }
        lines.push(format!("  KYC:     {}", self.format_kyc(profile.kyc_status)));

        lines.join("\n")
    }

    fn format_kyc(&self, status: KycStatus) -> String {
        let color = match status {
            KycStatus::Verified => GREEN,
            KycStatus::Pending => YELLOW,
            KycStatus::Rejected => RED,
            KycStatus::NotStarted => DIM,
        };
        self.colorize(&status.to_string(), color)
    }

    // ========================================================================
    // Wallets
    // ========================================================================

    /// Formats a wallet list.
    pub fn format_wallets(&self, wallets: &[Wallet], hide_balances: bool) -> String {
        if wallets.is_empty() {
            return self.dim("No wallets");
        }

        wallets
            .iter()
            .map(|w| {
                let balance = if hide_balances {
                    format!("{MASKED} {}", w.currency)
                } else {
                    format_amount(w.balance, &w.currency)
                };
                let mut line = format!("{:<14} {:>24}", w.id, self.bold(&balance));
                if let Some(address) = &w.address {
                    line.push_str(&format!("  {}", self.dim(address)));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats wallet lookup results.
    pub fn format_lookups(&self, results: &[WalletLookup]) -> String {
        if results.is_empty() {
            return self.dim("No matching wallets");
        }

        results
            .iter()
            .map(|r| {
                let owner = r.owner_name.as_deref().unwrap_or("Unknown");
                let mut line = format!("{}  {} ({})", r.address, self.bold(owner), r.currency);
                if let Some(label) = &r.account_label {
                    line.push_str(&format!("  {}", self.colorize(label, CYAN)));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Payments
    // ========================================================================

    /// Formats one payment.
    pub fn format_payment(&self, payment: &Payment) -> String {
        let mut line = format!(
            "{:<14} {:>20}",
            payment.id,
            format_amount(payment.amount, &payment.currency)
        );

        if let (Some(amount), Some(currency)) = (payment.target_amount, &payment.target_currency) {
            line.push_str(&format!(" → {}", format_amount(amount, currency)));
        }
        line.push_str(&format!("  {}", self.format_status(payment.status)));
        if let Some(name) = &payment.recipient_name {
            line.push_str(&format!("  {name}"));
        }
        if let Some(at) = payment.created_at {
            line.push_str(&format!("  {}", self.dim(&format_time(at))));
        }
        line
    }

    /// Formats a payment list.
    pub fn format_payments(&self, payments: &[Payment]) -> String {
        if payments.is_empty() {
            return self.dim("No payments");
        }

        payments
            .iter()
            .map(|p| self.format_payment(p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_status(&self, status: PaymentStatus) -> String {
        let color = match status {
            PaymentStatus::Completed => GREEN,
            PaymentStatus::Pending | PaymentStatus::Processing => YELLOW,
            PaymentStatus::Failed | PaymentStatus::Cancelled => RED,
        };
        self.colorize(&status.to_string(), color)
    }

    /// Formats a receipt.
    pub fn format_receipt(&self, receipt: &Receipt) -> String {
        let mut lines = vec![
            self.bold(&format!("Receipt for {}", receipt.payment_id)),
            format!("  Amount:    {}", format_amount(receipt.amount, &receipt.currency)),
        ];

        if let Some(rate) = receipt.exchange_rate {
            lines.push(format!("  Rate:      {rate}"));
        }
        if let Some(fee) = receipt.fee {
            lines.push(format!("  Fee:       {}", format_amount(fee, &receipt.currency)));
        }
        if let Some(reference) = &receipt.reference {
            lines.push(format!("  Reference: {reference}"));
        }
        if let Some(at) = receipt.completed_at {
            lines.push(format!("  Completed: {}", format_time(at)));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Forex
    // ========================================================================

    /// Formats a conversion quote.
    pub fn format_quote(&self, quote: &ForexQuote) -> String {
        let mut lines = vec![format!(
            "{} → {}",
            format_amount(quote.amount, &quote.from),
            self.bold(&format_amount(quote.converted_amount, &quote.to))
        )];
        lines.push(self.dim(&format!("  1 {} = {} {}", quote.from, quote.rate, quote.to)));
        if quote.fee > 0.0 {
            lines.push(format!("  Fee: {}", format_amount(quote.fee, &quote.from)));
        }
        lines.join("\n")
    }

    /// Formats a rate.
    pub fn format_rate(&self, rate: &ForexRate) -> String {
        let mut line = format!("1 {} = {} {}", rate.from, self.bold(&rate.rate.to_string()), rate.to);
        if let Some(at) = rate.updated_at {
            line.push_str(&format!("  {}", self.dim(&format!("as of {}", format_time(at)))));
        }
        line
    }

    /// Formats rate history with a bar scaled between the lowest and
    /// highest rate.
    pub fn format_history(&self, points: &[RatePoint]) -> String {
        if points.is_empty() {
            return self.dim("No rate history");
        }

        let min = points.iter().map(|p| p.rate).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.rate).fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        points
            .iter()
            .map(|p| {
                let ratio = if span > 0.0 { (p.rate - min) / span } else { 1.0 };
                format!(
                    "{}  {:>12.4}  {}",
                    p.timestamp.format("%Y-%m-%d"),
                    p.rate,
                    self.bar(ratio)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders a bar filled to `ratio` (0.0 to 1.0).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn bar(&self, ratio: f64) -> String {
        let filled = ((ratio.clamp(0.0, 1.0) * self.bar_width as f64).round() as usize).max(1);
        let empty = self.bar_width - filled;
        format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        )
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Formats the configuration.
    pub fn format_config(&self, config: &Config) -> String {
        [
            self.bold("Remit Configuration"),
            "─".repeat(40),
            format!("Gateway:         {}{}", config.gateway_url, config.api_prefix),
            format!("Retry backoff:   {} ms", config.retry_backoff_ms),
            format!("Request timeout: {} s", config.request_timeout_secs),
            format!("CSRF cookie:     {}", config.csrf_cookie),
            format!("Geolocation:     {}", config.geolocation_url),
            format!("Token backend:   {:?}", config.token_backend),
        ]
        .join("\n")
    }

    /// Formats preferences.
    pub fn format_preferences(&self, prefs: &Preferences) -> String {
        let toggle = |on: bool| if on { self.colorize("on", GREEN) } else { self.dim("off") };
        [
            format!("Theme:            {}", prefs.theme),
            format!("Language:         {}", prefs.language),
            format!("Hide balances:    {}", toggle(prefs.hide_balances)),
            format!(
                "Default currency: {}",
                prefs.default_currency.as_deref().unwrap_or("-")
            ),
            format!("Email alerts:     {}", toggle(prefs.notifications.email)),
            format!("SMS alerts:       {}", toggle(prefs.notifications.sms)),
            format!("Push alerts:      {}", toggle(prefs.notifications.push)),
            format!("Marketing:        {}", toggle(prefs.notifications.marketing)),
        ]
        .join("\n")
    }

    /// Formats device details.
    pub fn format_device(&self, device_id: &str, country: &str) -> String {
        let country = if country.is_empty() {
            self.dim("unknown")
        } else {
            country.to_string()
        };
        format!("Device:  {}\nCountry: {country}", self.bold(device_id))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.colorize(text, BOLD)
    }

    fn dim(&self, text: &str) -> String {
        self.colorize(text, DIM)
    }
}

/// Formats an amount with thousands separators and two decimals.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction} {currency}")
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
