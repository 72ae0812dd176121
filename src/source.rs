//! Record-source seam between the history projection and chain state.
//!
//! The projection never owns bundle records; it pulls them through the
//! [`BundleSource`] trait. The real implementation talks JSON-RPC to a
//! sidechain node (see [`crate::rpc`]); [`MemoryBundleStore`] backs demo
//! mode and tests.

use crate::types::{ChainTip, SidechainId, WithdrawalBundle};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("node request failed: {0}")]
    Transport(String),
    #[error("node returned an error: {0}")]
    Node(String),
    #[error("no chain tip known yet")]
    NoTip,
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Read-only query interface over external chain state.
pub trait BundleSource: Send + Sync {
    /// All currently-known withdrawal bundles for the given sidechain.
    fn withdrawal_bundles(&self, sidechain: SidechainId) -> SourceResult<Vec<WithdrawalBundle>>;

    /// Best-known tip of the observed sidechain.
    fn chain_tip(&self) -> SourceResult<ChainTip>;
}

/// Thread-safe in-memory bundle store, for demo mode and tests.
#[derive(Default)]
pub struct MemoryBundleStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    bundles: HashMap<SidechainId, Vec<WithdrawalBundle>>,
    tip: Option<ChainTip>,
}

impl MemoryBundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a plausible history, for demo mode.
    pub fn seeded_demo(sidechain: SidechainId) -> Self {
        use crate::types::BundleStatus::{Created, Failed, Spent};

        let store = Self::new();
        let seed = [
            (12u32, 4_150_000_000u64, Spent),
            (47, 180_250_000, Spent),
            (103, 25_000_000_000, Failed),
            (103, 1_000_000, Spent),
            (210, 732_000_500, Spent),
            (388, 9_999_999_999, Created),
        ];
        for (i, (height, sats, status)) in seed.into_iter().enumerate() {
            store.insert_bundle(
                sidechain,
                WithdrawalBundle {
                    txid: demo_txid(i as u8, height),
                    total_value: bitcoin::Amount::from_sat(sats),
                    status,
                    height,
                },
            );
        }
        store.set_tip(ChainTip {
            height: 391,
            time: chrono::Utc::now().timestamp(),
            verification_progress: 1.0,
            header_only: false,
        });
        store
    }

    pub fn insert_bundle(&self, sidechain: SidechainId, bundle: WithdrawalBundle) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.bundles.entry(sidechain).or_default().push(bundle);
    }

    pub fn clear_bundles(&self, sidechain: SidechainId) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.bundles.remove(&sidechain);
    }

    pub fn set_tip(&self, tip: ChainTip) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.tip = Some(tip);
    }
}

impl BundleSource for MemoryBundleStore {
    fn withdrawal_bundles(&self, sidechain: SidechainId) -> SourceResult<Vec<WithdrawalBundle>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.bundles.get(&sidechain).cloned().unwrap_or_default())
    }

    fn chain_tip(&self) -> SourceResult<ChainTip> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.tip.ok_or(SourceError::NoTip)
    }
}

/// Deterministic throwaway txid for seeded demo rows.
fn demo_txid(index: u8, height: u32) -> bitcoin::Txid {
    format!("{:056x}{:04x}{:04x}", 0u8, height, index as u32)
        .parse()
        .expect("fixed-width hex is a valid txid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BundleStatus;
    use bitcoin::Amount;

    fn bundle(height: u32) -> WithdrawalBundle {
        WithdrawalBundle {
            txid: format!("{height:064x}").parse().unwrap(),
            total_value: Amount::from_sat(1_000),
            status: BundleStatus::Created,
            height,
        }
    }

    #[test]
    fn test_memory_store_empty_sidechain_returns_empty() {
        let store = MemoryBundleStore::new();
        let bundles = store.withdrawal_bundles(SidechainId(0)).unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn test_memory_store_isolates_sidechains() {
        let store = MemoryBundleStore::new();
        store.insert_bundle(SidechainId(0), bundle(10));
        store.insert_bundle(SidechainId(1), bundle(20));

        assert_eq!(store.withdrawal_bundles(SidechainId(0)).unwrap().len(), 1);
        assert_eq!(store.withdrawal_bundles(SidechainId(1)).unwrap().len(), 1);
        assert!(store.withdrawal_bundles(SidechainId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_tip_missing_then_set() {
        let store = MemoryBundleStore::new();
        assert!(matches!(store.chain_tip(), Err(SourceError::NoTip)));

        let tip = ChainTip {
            height: 5,
            time: 1_700_000_000,
            verification_progress: 0.5,
            header_only: true,
        };
        store.set_tip(tip);
        assert_eq!(store.chain_tip().unwrap(), tip);
    }

    #[test]
    fn test_seeded_demo_has_rows_and_tip() {
        let store = MemoryBundleStore::seeded_demo(SidechainId(0));
        let bundles = store.withdrawal_bundles(SidechainId(0)).unwrap();
        assert!(!bundles.is_empty());
        assert!(store.chain_tip().is_ok());
        // All demo txids must be distinct
        let mut txids: Vec<_> = bundles.iter().map(|b| b.txid).collect();
        txids.sort();
        txids.dedup();
        assert_eq!(txids.len(), bundles.len());
    }
}
