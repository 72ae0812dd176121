//! Static configuration: known sidechain slots, defaults, and the runtime
//! config assembled from user settings and environment overrides.

use crate::types::SidechainId;
use crate::user_settings::UserSettings;
use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Default JSON-RPC endpoint of a locally-running sidechain node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8332";

/// Default seconds between chain-tip polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// A known sidechain slot with its display label.
#[derive(Clone, Debug)]
pub struct Sidechain {
    pub label: &'static str,
    pub id: u8,
}

impl Sidechain {
    pub const fn new(label: &'static str, id: u8) -> Self {
        Self { label, id }
    }
}

/// Sidechain slots this build knows labels for. Any other slot id still
/// works; it just renders as a bare number.
pub const SIDECHAINS: &[Sidechain] = &[
    Sidechain::new("Testchain", 0),
    Sidechain::new("BitNames", 2),
    Sidechain::new("BitAssets", 4),
    Sidechain::new("zSide", 5),
    Sidechain::new("Thunder", 9),
];

/// Find a known sidechain by slot id.
pub fn find_sidechain(id: u8) -> Option<&'static Sidechain> {
    SIDECHAINS.iter().find(|s| s.id == id)
}

/// Display label for a slot id, known or not.
pub fn sidechain_label(id: SidechainId) -> String {
    match find_sidechain(id.0) {
        Some(sidechain) => format!("{} (slot {})", sidechain.label, sidechain.id),
        None => format!("Sidechain slot {}", id.0),
    }
}

/// Validate an RPC endpoint URL: http(s) scheme with a host.
pub fn validate_rpc_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| anyhow!("invalid RPC URL {raw:?}: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("RPC URL must use http or https, got {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err(anyhow!("RPC URL has no host: {raw:?}"));
    }
    Ok(url)
}

/// Runtime configuration the GUI is launched with.
#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
    pub sidechain: SidechainId,
    pub poll_interval: Duration,
    /// Use the built-in demo store instead of a node.
    pub demo_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_user: None,
            rpc_password: None,
            sidechain: SidechainId(0),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            demo_mode: false,
        }
    }
}

impl Config {
    pub fn from_settings(settings: &UserSettings) -> Self {
        Self {
            rpc_url: settings.node_rpc_url.clone(),
            rpc_user: settings.rpc_user.clone(),
            rpc_password: settings.rpc_password.clone(),
            sidechain: settings.sidechain_id(),
            poll_interval: Duration::from_secs(settings.poll_interval_secs.max(1)),
            demo_mode: settings.demo_mode,
        }
    }

    /// Apply `WTVIEW_RPC_URL` / `WTVIEW_DEMO` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("WTVIEW_RPC_URL") {
            if !url.trim().is_empty() {
                self.rpc_url = url.trim().to_string();
            }
        }
        if let Ok(demo) = env::var("WTVIEW_DEMO") {
            self.demo_mode = matches!(demo.trim(), "1" | "true" | "yes");
        }
    }
}
