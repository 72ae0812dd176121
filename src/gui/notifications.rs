//! Notification feed shown at the bottom of the window.

use crate::config;
use crate::types::ChainTip;

/// A notification entry with message and timestamp
#[derive(Clone)]
pub struct NotificationEntry {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Local::now(),
        }
    }

    /// Entry describing a new sidechain tip.
    pub fn tip_advanced(tip: &ChainTip, sidechain: crate::types::SidechainId) -> Self {
        let mut message = format!(
            "{}: tip now at block #{}",
            config::sidechain_label(sidechain),
            tip.height
        );
        if tip.header_only {
            message.push_str(" (still syncing)");
        } else if tip.verification_progress < 0.9999 {
            message.push_str(&format!(
                " ({:.2}% verified)",
                tip.verification_progress * 100.0
            ));
        }
        Self::new(message)
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}
