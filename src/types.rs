//! Common types shared across modules.

use bitcoin::{Amount, Txid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a sidechain slot on the parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidechainId(pub u8);

impl fmt::Display for SidechainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a withdrawal bundle.
///
/// A bundle starts out `Created`, and ends up either `Spent` (paid out on
/// the parent chain) or `Failed` (rejected or expired).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleStatus {
    Created,
    Failed,
    Spent,
}

impl BundleStatus {
    /// Short human-readable label shown in the history table.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Failed => "Failed",
            Self::Spent => "Spent",
        }
    }
}

impl fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BundleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "pending" => Ok(Self::Created),
            "failed" => Ok(Self::Failed),
            "spent" => Ok(Self::Spent),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Error for a status label outside the known lifecycle set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown bundle status: {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// A withdrawal bundle (WT-prime) as reported by the record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalBundle {
    /// Hash of the bundle transaction.
    pub txid: Txid,
    /// Total value withdrawn by the bundle's outputs.
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub total_value: Amount,
    /// Current lifecycle status.
    pub status: BundleStatus,
    /// Sidechain block height the bundle was created at.
    pub height: u32,
}

/// Current best-known tip of the observed sidechain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainTip {
    pub height: u32,
    /// Block time as a unix timestamp.
    pub time: i64,
    /// Verification progress reported by the node, in `[0, 1]`.
    pub verification_progress: f64,
    /// True while the node is still syncing headers/blocks.
    pub header_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== BundleStatus tests ====================

    #[test]
    fn test_status_labels() {
        assert_eq!(BundleStatus::Created.label(), "Created");
        assert_eq!(BundleStatus::Failed.label(), "Failed");
        assert_eq!(BundleStatus::Spent.label(), "Spent");
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("Created".parse::<BundleStatus>(), Ok(BundleStatus::Created));
        assert_eq!("SPENT".parse::<BundleStatus>(), Ok(BundleStatus::Spent));
        assert_eq!(" failed ".parse::<BundleStatus>(), Ok(BundleStatus::Failed));
    }

    #[test]
    fn test_status_parse_pending_alias() {
        // Some nodes report freshly created bundles as "pending"
        assert_eq!("pending".parse::<BundleStatus>(), Ok(BundleStatus::Created));
    }

    #[test]
    fn test_status_parse_unknown_fails() {
        assert!("gone".parse::<BundleStatus>().is_err());
    }

    // ==================== WithdrawalBundle serde tests ====================

    #[test]
    fn test_bundle_round_trips_amount_as_sats() {
        let bundle = WithdrawalBundle {
            txid: format!("{:064x}", 7u8).parse().unwrap(),
            total_value: Amount::from_sat(123_456_789),
            status: BundleStatus::Created,
            height: 42,
        };
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["total_value"], 123_456_789u64);
        let back: WithdrawalBundle = serde_json::from_value(json).unwrap();
        assert_eq!(back, bundle);
    }
}
