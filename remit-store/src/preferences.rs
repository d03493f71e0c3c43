//! User preferences store.
//!
//! Manages UI preference flags with persistence and change notification.
//! Values are stored and re-read verbatim; nothing here has invariants
//! beyond that.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_preferences_path, load_json, save_json};

// ============================================================================
// Preference Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Theme mode preference.
    pub theme: ThemeMode,

    /// BCP 47 language tag.
    pub language: String,

    /// Notification channel toggles.
    pub notifications: NotificationPreferences,

    /// Mask balances in listings.
    pub hide_balances: bool,

    /// Currency pre-selected in transfer forms.
    pub default_currency: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            language: "en".to_string(),
            notifications: NotificationPreferences::default(),
            hide_balances: false,
            default_currency: None,
        }
    }
}

/// Notification channel toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct NotificationPreferences {
    /// E-mail notifications.
    pub email: bool,
    /// SMS notifications.
    pub sms: bool,
    /// Push notifications.
    pub push: bool,
    /// Marketing messages.
    pub marketing: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: true,
            push: true,
            marketing: false, // Opt-in only
        }
    }
}

/// Theme mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    /// Always use light theme.
    Light,
    /// Always use dark theme.
    Dark,
    /// Follow system appearance.
    #[default]
    System,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::System => write!(f, "system"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" | "auto" => Ok(ThemeMode::System),
            other => Err(StoreError::Config(format!("unknown theme: {other}"))),
        }
    }
}

// ============================================================================
// Preferences Store
// ============================================================================

/// Persistent preferences store with change notifications.
pub struct PreferencesStore {
    preferences: Arc<RwLock<Preferences>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl PreferencesStore {
    /// Creates a store with defaults, persisting to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::with_preferences(path, Preferences::default())
    }

    fn with_preferences(path: PathBuf, preferences: Preferences) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            preferences: Arc::new(RwLock::new(preferences)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads preferences from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_preferences_path()).await
    }

    /// Loads preferences from a path.
    ///
    /// A missing or unreadable file yields defaults.
    pub async fn load(path: PathBuf) -> Self {
        let preferences = if path.exists() {
            info!(path = %path.display(), "Loading preferences");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load preferences, using defaults");
                Preferences::default()
            })
        } else {
            debug!(path = %path.display(), "Preferences file not found, using defaults");
            Preferences::default()
        };

        Self::with_preferences(path, preferences)
    }

    /// Gets a copy of the current preferences.
    pub async fn get(&self) -> Preferences {
        self.preferences.read().await.clone()
    }

    /// Updates preferences and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Preferences),
    {
        {
            let mut preferences = self.preferences.write().await;
            f(&mut preferences);
        }
        self.notify_change().await;
    }

    /// Saves preferences to disk.
    ///
    /// # Errors
    ///
    /// Returns error if preferences cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let preferences = self.preferences.read().await;
        save_json(&self.path, &*preferences).await?;
        info!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }

    /// Subscribes to preference changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the theme mode.
    pub async fn theme(&self) -> ThemeMode {
        self.preferences.read().await.theme
    }

    /// Sets the theme mode.
    pub async fn set_theme(&self, theme: ThemeMode) {
        self.update(|p| p.theme = theme).await;
    }

    /// Gets the language tag.
    pub async fn language(&self) -> String {
        self.preferences.read().await.language.clone()
    }

    /// Sets the language tag.
    pub async fn set_language(&self, language: impl Into<String>) {
        let language = language.into();
        self.update(|p| p.language = language).await;
    }

    /// Gets the notification toggles.
    pub async fn notifications(&self) -> NotificationPreferences {
        self.preferences.read().await.notifications
    }

    /// Sets the notification toggles.
    pub async fn set_notifications(&self, notifications: NotificationPreferences) {
        self.update(|p| p.notifications = notifications).await;
    }

    /// Sets a single preference from its dotted key.
    ///
    /// Supported keys: `theme`, `language`, `hide_balances`,
    /// `default_currency`, `notifications.email`, `notifications.sms`,
    /// `notifications.push`, `notifications.marketing`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for unknown keys or unparsable values.
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.get().await;

        match key {
            "theme" => next.theme = value.parse()?,
            "language" => next.language = value.to_string(),
            "hide_balances" => next.hide_balances = parse_bool(value)?,
            "default_currency" => {
                next.default_currency =
                    (!value.is_empty()).then(|| value.to_ascii_uppercase());
            }
            "notifications.email" => next.notifications.email = parse_bool(value)?,
            "notifications.sms" => next.notifications.sms = parse_bool(value)?,
            "notifications.push" => next.notifications.push = parse_bool(value)?,
            "notifications.marketing" => next.notifications.marketing = parse_bool(value)?,
            other => return Err(StoreError::Config(format!("unknown preference: {other}"))),
        }

        self.update(|p| *p = next).await;
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, StoreError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(StoreError::Config(format!("expected a boolean, got {other}"))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, ThemeMode::System);
        assert_eq!(prefs.language, "en");
        assert!(prefs.notifications.email);
        assert!(!prefs.notifications.marketing);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!("auto".parse::<ThemeMode>().unwrap(), ThemeMode::System);
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[tokio::test]
    async fn test_set_value() {
        let store = PreferencesStore::new(PathBuf::from("/tmp/remit_test_prefs.json"));
        let rx = store.subscribe();

        store.set_value("notifications.marketing", "on").await.unwrap();
        store.set_value("default_currency", "mwk").await.unwrap();

        let prefs = store.get().await;
        assert!(prefs.notifications.marketing);
        assert_eq!(prefs.default_currency.as_deref(), Some("MWK"));
        assert!(rx.has_changed().unwrap());

        assert!(store.set_value("hide_balances", "maybe").await.is_err());
        assert!(store.set_value("font_size", "12").await.is_err());
    }
}
