//! The withdrawal-bundle history projection behind the GUI table.
//!
//! Holds an ordered snapshot of display rows and answers the table
//! contract: row count, four fixed columns, cell text by (row, column),
//! and a row-to-hash lookup. The snapshot is rebuilt wholesale on every
//! refresh and swapped in as a unit; readers holding a clone of the
//! previous snapshot never see a half-built row set.

use crate::source::BundleSource;
use crate::types::{ChainTip, SidechainId};
use crate::units::{self, SeparatorStyle, UnitProvider};
use bitcoin::{Amount, Txid};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Weak};

pub const COLUMN_COUNT: usize = 4;
pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] =
    ["Sidechain block #", "Hash", "Amount", "Status"];

/// One display row of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub height: u32,
    pub txid: Txid,
    pub amount: Amount,
    pub status: &'static str,
}

/// Callback invoked after every snapshot replacement, with the new row count.
pub type ResetObserver = Box<dyn Fn(usize) + Send>;

pub struct WithdrawalHistoryModel {
    sidechain: SidechainId,
    source: Arc<dyn BundleSource>,
    rows: Arc<Vec<HistoryRow>>,
    unit_provider: Option<Weak<dyn UnitProvider>>,
    tip_events: Option<Receiver<ChainTip>>,
    reset_observers: Vec<ResetObserver>,
}

impl WithdrawalHistoryModel {
    /// A new, empty projection over the given source and sidechain slot.
    pub fn new(source: Arc<dyn BundleSource>, sidechain: SidechainId) -> Self {
        Self {
            sidechain,
            source,
            rows: Arc::new(Vec::new()),
            unit_provider: None,
            tip_events: None,
            reset_observers: Vec::new(),
        }
    }

    pub fn sidechain(&self) -> SidechainId {
        self.sidechain
    }

    /// Bind (or unbind, with `None`) the display-unit preference source.
    ///
    /// The handle is weak: the provider's owner may drop it at any time,
    /// after which amount cells simply yield no value.
    pub fn bind_unit_provider(&mut self, provider: Option<Weak<dyn UnitProvider>>) {
        self.unit_provider = provider;
    }

    /// Bind (or unbind) the chain-tip event subscription that drives
    /// automatic refreshes via [`Self::poll_notifier`].
    pub fn bind_notifier(&mut self, events: Option<Receiver<ChainTip>>) {
        self.tip_events = events;
    }

    /// Register an observer called after every snapshot replacement.
    pub fn subscribe_reset(&mut self, observer: ResetObserver) {
        self.reset_observers.push(observer);
    }

    /// Drain pending tip events and refresh once if any arrived.
    ///
    /// Returns the most recent tip that triggered the refresh, if one did.
    /// Call once per GUI frame.
    pub fn poll_notifier(&mut self) -> Option<ChainTip> {
        let mut latest = None;
        let mut disconnected = false;
        if let Some(events) = &self.tip_events {
            loop {
                match events.try_recv() {
                    Ok(tip) => latest = Some(tip),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected {
            tracing::debug!("tip notifier disconnected, unbinding");
            self.tip_events = None;
        }
        if latest.is_some() {
            self.refresh();
        }
        latest
    }

    /// Rebuild the snapshot from the record source.
    ///
    /// Fetches all bundles for the bound sidechain, sorts them ascending by
    /// height, and replaces the snapshot as a unit. A failed or empty fetch
    /// leaves an empty, still-valid projection.
    pub fn refresh(&mut self) {
        let mut bundles = match self.source.withdrawal_bundles(self.sidechain) {
            Ok(bundles) => bundles,
            Err(e) => {
                tracing::warn!("withdrawal bundle fetch failed: {e}");
                Vec::new()
            }
        };

        bundles.sort_by_key(|bundle| bundle.height);

        let rows: Vec<HistoryRow> = bundles
            .into_iter()
            .map(|bundle| HistoryRow {
                height: bundle.height,
                txid: bundle.txid,
                amount: bundle.total_value,
                status: bundle.status.label(),
            })
            .collect();

        let count = rows.len();
        self.rows = Arc::new(rows);
        tracing::debug!(rows = count, sidechain = %self.sidechain, "history snapshot replaced");
        for observer in &self.reset_observers {
            observer(count);
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub const fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn header(&self, column: usize) -> Option<&'static str> {
        COLUMN_HEADERS.get(column).copied()
    }

    /// Cell text for (row, column), or `None` for an out-of-range row or
    /// column, or when no unit provider is currently bound.
    pub fn cell_value(&self, row: usize, column: usize) -> Option<String> {
        let unit = self.unit_provider.as_ref()?.upgrade()?.display_unit();
        let record = self.rows.get(row)?;
        match column {
            0 => Some(record.height.to_string()),
            1 => Some(record.txid.to_string()),
            2 => Some(units::format_with_unit(
                unit,
                record.amount,
                false,
                SeparatorStyle::Always,
            )),
            3 => Some(record.status.to_string()),
            _ => None,
        }
    }

    /// Hash of the bundle displayed at `row`, or `None` past the end.
    pub fn hash_at_row(&self, row: usize) -> Option<Txid> {
        self.rows.get(row).map(|record| record.txid)
    }

    /// Cheap cloneable handle to the current snapshot, for consumers that
    /// iterate outside the table contract (e.g. CSV export).
    pub fn snapshot(&self) -> Arc<Vec<HistoryRow>> {
        Arc::clone(&self.rows)
    }
}
