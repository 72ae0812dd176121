use crate::config;
use crate::types::SidechainId;
use crate::units::{AmountUnit, UnitProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

const SETTINGS_FILE: &str = "wtview_settings.json";

/// User settings that persist between sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    /// Unit used to render withdrawal amounts
    #[serde(default)]
    pub display_unit: AmountUnit,
    /// JSON-RPC endpoint of the sidechain node
    #[serde(default = "default_rpc_url")]
    pub node_rpc_url: String,
    /// RPC basic-auth user, if the node requires one
    #[serde(default)]
    pub rpc_user: Option<String>,
    /// RPC basic-auth password
    #[serde(default)]
    pub rpc_password: Option<String>,
    /// Sidechain slot to show withdrawal-bundle history for
    #[serde(default)]
    pub sidechain_slot: u8,
    /// Seconds between chain-tip polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Use the built-in demo store instead of connecting to a node
    #[serde(default)]
    pub demo_mode: bool,
}

fn default_rpc_url() -> String {
    config::DEFAULT_RPC_URL.to_string()
}

fn default_poll_interval() -> u64 {
    config::DEFAULT_POLL_INTERVAL_SECS
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            display_unit: AmountUnit::default(),
            node_rpc_url: default_rpc_url(),
            rpc_user: None,
            rpc_password: None,
            sidechain_slot: 0,
            poll_interval_secs: default_poll_interval(),
            demo_mode: false,
        }
    }
}

impl UserSettings {
    /// Get the settings file path
    fn settings_path() -> PathBuf {
        // Try to use the app data directory, fall back to current directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("wtview");
            if !app_dir.exists() {
                let _ = fs::create_dir_all(&app_dir);
            }
            app_dir.join(SETTINGS_FILE)
        } else {
            PathBuf::from(SETTINGS_FILE)
        }
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::settings_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file: {}", e);
                }
            }
        }
        tracing::info!("Using default settings");
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Get the settings file path for display
    pub fn settings_path_display() -> String {
        Self::settings_path().display().to_string()
    }

    pub const fn sidechain_id(&self) -> SidechainId {
        SidechainId(self.sidechain_slot)
    }

    /// RPC credentials, if both halves are set and non-empty
    pub fn rpc_credentials(&self) -> Option<(&str, &str)> {
        match (self.rpc_user.as_deref(), self.rpc_password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() => Some((user, password)),
            _ => None,
        }
    }
}

/// Shared, lock-guarded settings handle.
///
/// The GUI mutates it through [`SharedSettings::update`]; the history
/// projection reads the display unit through the [`UnitProvider`] trait
/// behind a weak handle.
pub struct SharedSettings {
    inner: RwLock<UserSettings>,
}

impl SharedSettings {
    pub fn new(settings: UserSettings) -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(settings),
        })
    }

    /// Snapshot the current settings
    pub fn get(&self) -> UserSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mutate the settings in place
    pub fn update(&self, mutate: impl FnOnce(&mut UserSettings)) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut inner);
    }
}

impl UnitProvider for SharedSettings {
    fn display_unit(&self) -> AmountUnit {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .display_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== UserSettings::default tests ====================

    #[test]
    fn test_user_settings_default_values() {
        let settings = UserSettings::default();
        assert_eq!(settings.display_unit, AmountUnit::Btc);
        assert_eq!(settings.node_rpc_url, config::DEFAULT_RPC_URL);
        assert!(settings.rpc_user.is_none());
        assert_eq!(settings.sidechain_slot, 0);
        assert_eq!(settings.poll_interval_secs, config::DEFAULT_POLL_INTERVAL_SECS);
        assert!(!settings.demo_mode);
    }

    // ==================== serde tests ====================

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, UserSettings::default());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = UserSettings::default();
        settings.display_unit = AmountUnit::Sat;
        settings.sidechain_slot = 9;
        settings.demo_mode = true;

        let json = serde_json::to_string(&settings).unwrap();
        let back: UserSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    // ==================== rpc_credentials tests ====================

    #[test]
    fn test_rpc_credentials_require_both_halves() {
        let mut settings = UserSettings::default();
        assert!(settings.rpc_credentials().is_none());

        settings.rpc_user = Some("user".to_string());
        assert!(settings.rpc_credentials().is_none());

        settings.rpc_password = Some("pass".to_string());
        assert_eq!(settings.rpc_credentials(), Some(("user", "pass")));
    }

    #[test]
    fn test_rpc_credentials_reject_empty_user() {
        let mut settings = UserSettings::default();
        settings.rpc_user = Some(String::new());
        settings.rpc_password = Some("pass".to_string());
        assert!(settings.rpc_credentials().is_none());
    }

    // ==================== SharedSettings tests ====================

    #[test]
    fn test_shared_settings_update_visible_through_provider() {
        let shared = SharedSettings::new(UserSettings::default());
        assert_eq!(shared.display_unit(), AmountUnit::Btc);

        shared.update(|s| s.display_unit = AmountUnit::MilliBtc);
        assert_eq!(shared.display_unit(), AmountUnit::MilliBtc);
        assert_eq!(shared.get().display_unit, AmountUnit::MilliBtc);
    }
}
