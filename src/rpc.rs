//! JSON-RPC record source backed by a sidechain node.
//!
//! Speaks the bitcoind-style JSON-RPC 1.0 dialect: `listwithdrawalbundles`
//! for the bundle set and `getblockchaininfo` for the tip. Rows the node
//! reports that fail to parse (bad txid, unknown status) are dropped with a
//! warning rather than failing the whole fetch; the node is authoritative
//! and the viewer only shows what it can understand.

use crate::source::{BundleSource, SourceError, SourceResult};
use crate::types::{ChainTip, SidechainId, WithdrawalBundle};
use anyhow::{Context, Result};
use bitcoin::Amount;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

const RPC_TIMEOUT: Duration = Duration::from_secs(15);

/// Record source that queries a sidechain node over JSON-RPC.
pub struct RpcBundleSource {
    client: reqwest::Client,
    url: Url,
    auth: Option<(String, String)>,
}

/// One bundle row as the node reports it.
#[derive(Debug, Deserialize)]
struct RawBundle {
    txid: String,
    #[serde(rename = "amountsat")]
    amount_sat: u64,
    status: String,
    height: u32,
}

/// Subset of `getblockchaininfo` the viewer cares about.
#[derive(Debug, Deserialize)]
struct RawChainInfo {
    blocks: u32,
    #[serde(default)]
    time: i64,
    #[serde(rename = "verificationprogress")]
    verification_progress: f64,
    #[serde(rename = "initialblockdownload", default)]
    initial_block_download: bool,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

impl RpcBundleSource {
    pub fn new(url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url,
            auth: None,
        })
    }

    /// Attach basic auth credentials (bitcoind-style rpcuser/rpcpassword).
    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((user.into(), password.into()));
        self
    }

    fn call(&self, method: &str, params: serde_json::Value) -> SourceResult<serde_json::Value> {
        let body = serde_json::json!({
            "jsonrpc": "1.0",
            "id": "wtview",
            "method": method,
            "params": params,
        });
        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }

        Self::block_on_async(async move {
            let response = request
                .send()
                .await
                .map_err(|e| SourceError::Transport(e.to_string()))?;
            let response: RpcResponse = response
                .json()
                .await
                .map_err(|e| SourceError::Transport(e.to_string()))?;
            if let Some(error) = response.error {
                if !error.is_null() {
                    return Err(SourceError::Node(error.to_string()));
                }
            }
            response
                .result
                .ok_or_else(|| SourceError::Node("missing result".to_string()))
        })
    }

    /// Run a future to completion from sync code, whether or not a tokio
    /// runtime is already on this thread.
    fn block_on_async<T>(
        fut: impl Future<Output = SourceResult<T>>,
    ) -> SourceResult<T> {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(move || handle.block_on(fut))
        } else {
            match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(fut),
                Err(e) => Err(SourceError::Transport(format!(
                    "failed to create async runtime: {e}"
                ))),
            }
        }
    }
}

impl BundleSource for RpcBundleSource {
    fn withdrawal_bundles(&self, sidechain: SidechainId) -> SourceResult<Vec<WithdrawalBundle>> {
        let result = self.call(
            "listwithdrawalbundles",
            serde_json::json!([sidechain.0]),
        )?;
        let rows: Vec<RawBundle> = serde_json::from_value(result)
            .map_err(|e| SourceError::Node(format!("malformed bundle list: {e}")))?;
        Ok(parse_bundles(rows))
    }

    fn chain_tip(&self) -> SourceResult<ChainTip> {
        let result = self.call("getblockchaininfo", serde_json::json!([]))?;
        let info: RawChainInfo = serde_json::from_value(result)
            .map_err(|e| SourceError::Node(format!("malformed chain info: {e}")))?;
        Ok(ChainTip {
            height: info.blocks,
            time: info.time,
            verification_progress: info.verification_progress,
            header_only: info.initial_block_download,
        })
    }
}

/// Convert raw node rows, silently dropping any that fail to parse.
fn parse_bundles(rows: Vec<RawBundle>) -> Vec<WithdrawalBundle> {
    rows.into_iter()
        .filter_map(|row| {
            let txid = match row.txid.parse() {
                Ok(txid) => txid,
                Err(e) => {
                    tracing::warn!("dropping bundle row with bad txid {:?}: {e}", row.txid);
                    return None;
                }
            };
            let status = match row.status.parse() {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!("dropping bundle row at height {}: {e}", row.height);
                    return None;
                }
            };
            Some(WithdrawalBundle {
                txid,
                total_value: Amount::from_sat(row.amount_sat),
                status,
                height: row.height,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BundleStatus;

    fn raw(txid: &str, amount_sat: u64, status: &str, height: u32) -> RawBundle {
        RawBundle {
            txid: txid.to_string(),
            amount_sat,
            status: status.to_string(),
            height,
        }
    }

    // ==================== parse_bundles tests ====================

    #[test]
    fn test_parse_bundles_converts_valid_rows() {
        let txid = format!("{:064x}", 0xabcdu32);
        let bundles = parse_bundles(vec![raw(&txid, 500_000, "spent", 120)]);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].txid.to_string(), txid);
        assert_eq!(bundles[0].total_value, Amount::from_sat(500_000));
        assert_eq!(bundles[0].status, BundleStatus::Spent);
        assert_eq!(bundles[0].height, 120);
    }

    #[test]
    fn test_parse_bundles_drops_bad_txid_silently() {
        let good = format!("{:064x}", 1u8);
        let bundles = parse_bundles(vec![
            raw("not-a-txid", 1, "created", 1),
            raw(&good, 2, "created", 2),
        ]);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].height, 2);
    }

    #[test]
    fn test_parse_bundles_drops_unknown_status_silently() {
        let txid = format!("{:064x}", 2u8);
        let bundles = parse_bundles(vec![
            raw(&txid, 1, "vanished", 7),
            raw(&txid, 1, "failed", 8),
        ]);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].status, BundleStatus::Failed);
    }

    #[test]
    fn test_parse_bundles_empty_input() {
        assert!(parse_bundles(Vec::new()).is_empty());
    }

    // ==================== wire-format tests ====================

    #[test]
    fn test_raw_bundle_deserializes_node_fields() {
        let json = serde_json::json!({
            "txid": format!("{:064x}", 9u8),
            "amountsat": 750_000_000u64,
            "status": "created",
            "height": 301,
        });
        let row: RawBundle = serde_json::from_value(json).unwrap();
        assert_eq!(row.amount_sat, 750_000_000);
        assert_eq!(row.height, 301);
    }

    #[test]
    fn test_raw_chain_info_maps_node_fields() {
        let json = serde_json::json!({
            "blocks": 12345,
            "time": 1_700_000_123i64,
            "verificationprogress": 0.995,
            "initialblockdownload": true,
            "chain": "main",
        });
        let info: RawChainInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.blocks, 12345);
        assert_eq!(info.time, 1_700_000_123);
        assert!(info.initial_block_download);
    }

    #[test]
    fn test_raw_chain_info_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "blocks": 10,
            "verificationprogress": 1.0,
        });
        let info: RawChainInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.time, 0);
        assert!(!info.initial_block_download);
    }
}
