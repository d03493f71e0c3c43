//! CLI output formatting tests.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, format_amount};
    use remit_core::{ForexQuote, Payment, PaymentStatus, RatePoint, RawUser, UserProfile, Wallet};

    fn wallet(id: &str, balance: f64, currency: &str) -> Wallet {
        Wallet {
            id: id.into(),
            currency: currency.into(),
            balance,
            address: None,
            owner_name: None,
            created_at: None,
        }
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0, "MWK"), "0.00 MWK");
        assert_eq!(format_amount(999.5, "CNY"), "999.50 CNY");
        assert_eq!(format_amount(1_234_567.891, "MWK"), "1,234,567.89 MWK");
        assert_eq!(format_amount(-25_000.0, "USD"), "-25,000.00 USD");
    }

    #[test]
    fn test_bar_bounds() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.bar(1.0), "█".repeat(20));
        assert_eq!(formatter.bar(0.5), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        // The lowest point still shows a sliver.
        assert_eq!(formatter.bar(0.0), format!("█{}", "░".repeat(19)));
    }

    #[test]
    fn test_profile_shows_label() {
        let raw = RawUser {
            email: Some("chisomo@example.com".into()),
            country_code: Some("mw".into()),
            user_type: Some("individual".into()),
            ..RawUser::named("Chisomo Banda")
        };
        let output = TextFormatter::new(false).format_profile(&UserProfile::from_raw(&raw));

        assert!(output.starts_with("Chisomo Banda  [Sender (Malawi)]"), "{output}");
        assert!(output.contains("Email:   chisomo@example.com"));
        assert!(output.contains("Country: MW"));
    }

    #[test]
    fn test_wallets_hide_balances() {
        let wallets = [wallet("w1", 25_000.0, "MWK"), wallet("w2", 310.4, "CNY")];
        let formatter = TextFormatter::new(false);

        let shown = formatter.format_wallets(&wallets, false);
        assert!(shown.contains("25,000.00 MWK"));
        assert!(shown.contains("310.40 CNY"));

        let hidden = formatter.format_wallets(&wallets, true);
        assert!(!hidden.contains("25,000.00"));
        assert!(hidden.contains("•••••• MWK"));
    }

    #[test]
    fn test_empty_lists() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_wallets(&[], false), "No wallets");
        assert_eq!(formatter.format_payments(&[]), "No payments");
        assert_eq!(formatter.format_history(&[]), "No rate history");
    }

    #[test]
    fn test_payment_status_colors() {
        let payment = Payment {
            id: "p1".into(),
            amount: 50_000.0,
            currency: "MWK".into(),
            target_amount: Some(205.0),
            target_currency: Some("CNY".into()),
            status: PaymentStatus::Failed,
            recipient_name: Some("Li Wei".into()),
            created_at: None,
        };

        let plain = TextFormatter::new(false).format_payment(&payment);
        assert!(plain.contains("50,000.00 MWK → 205.00 CNY"));
        assert!(plain.contains("failed"));
        assert!(plain.contains("Li Wei"));

        let colored = TextFormatter::new(true).format_payment(&payment);
        assert!(colored.contains("\x1b[31mfailed"));
    }

    #[test]
    fn test_quote_hides_zero_fee() {
        let quote = ForexQuote {
            from: "MWK".into(),
            to: "CNY".into(),
            amount: 10_000.0,
            converted_amount: 41.0,
            rate: 0.0041,
            fee: 0.0,
        };
        let output = TextFormatter::new(false).format_quote(&quote);
        assert!(output.contains("10,000.00 MWK → 41.00 CNY"));
        assert!(output.contains("1 MWK = 0.0041 CNY"));
        assert!(!output.contains("Fee"));
    }

    #[test]
    fn test_history_flat_series() {
        let points: Vec<RatePoint> = ["2026-01-01T00:00:00Z", "2026-01-02T00:00:00Z"]
            .iter()
            .map(|ts| RatePoint {
                timestamp: ts.parse().unwrap(),
                rate: 0.0041,
            })
            .collect();

        let output = TextFormatter::new(false).format_history(&points);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2026-01-01"));
        assert!(lines[1].ends_with(&"█".repeat(20)));
    }

    #[test]
    fn test_device_unknown_country() {
        let output = TextFormatter::new(false).format_device("dev-1", "");
        assert_eq!(output, "Device:  dev-1\nCountry: unknown");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use remit_core::{RawUser, UserProfile};
    use serde_json::Value;

    #[test]
    fn test_compact_and_pretty() {
        let data = serde_json::json!({"a": 1});
        assert_eq!(JsonFormatter::new(false).format(&data).unwrap(), r#"{"a":1}"#);
        assert!(JsonFormatter::new(true).format(&data).unwrap().contains('\n'));
    }

    #[test]
    fn test_profile_json_uses_display_label() {
        let raw = RawUser {
            country_code: Some("CN".into()),
            user_type: Some("agent".into()),
            ..RawUser::named("Wang Fang")
        };
        let json = JsonFormatter::new(false)
            .format(&UserProfile::from_raw(&raw))
            .unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Wang Fang");
        assert_eq!(value["accountLabel"], "Receiver (China)");
        assert_eq!(value["countryCode"], "CN");
    }
}
