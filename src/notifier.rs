//! Chain-tip change notifications.
//!
//! A [`ChainTipNotifier`] fans chain-tip events out to any number of
//! subscriber channels. [`ChainTipNotifier::spawn_poller`] runs a
//! background thread that polls the record source and announces whenever
//! the tip height changes; tests and other drivers can call
//! [`ChainTipNotifier::announce`] directly.

use crate::source::BundleSource;
use crate::types::ChainTip;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

pub struct ChainTipNotifier {
    subscribers: Arc<Mutex<Vec<Sender<ChainTip>>>>,
    stop: Arc<AtomicBool>,
}

impl ChainTipNotifier {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open a new subscription. Dropping the receiver ends it; the dead
    /// sender is pruned on the next announcement.
    pub fn subscribe(&self) -> Receiver<ChainTip> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Broadcast a tip event to all live subscribers.
    pub fn announce(&self, tip: ChainTip) {
        broadcast(&self.subscribers, tip);
    }

    /// Start a background thread that polls the source's tip every
    /// `interval` and announces height changes.
    pub fn spawn_poller(&self, source: Arc<dyn BundleSource>, interval: Duration) {
        let subscribers = Arc::clone(&self.subscribers);
        let stop = Arc::clone(&self.stop);

        thread::Builder::new()
            .name("tip-poller".to_string())
            .spawn(move || {
                let mut last_height: Option<u32> = None;
                while !stop.load(Ordering::Relaxed) {
                    match source.chain_tip() {
                        Ok(tip) => {
                            if last_height != Some(tip.height) {
                                tracing::debug!(height = tip.height, "sidechain tip changed");
                                last_height = Some(tip.height);
                                broadcast(&subscribers, tip);
                            }
                        }
                        Err(e) => {
                            tracing::debug!("tip poll failed: {e}");
                        }
                    }
                    // Sleep in short slices so stop() takes effect promptly
                    let mut slept = Duration::ZERO;
                    while slept < interval && !stop.load(Ordering::Relaxed) {
                        let slice = Duration::from_millis(200).min(interval - slept);
                        thread::sleep(slice);
                        slept += slice;
                    }
                }
                tracing::debug!("tip poller stopped");
            })
            .ok();
    }

    /// Ask the poller thread to exit after its current iteration.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Default for ChainTipNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ChainTipNotifier {
    fn drop(&mut self) {
        self.stop();
    }
}

fn broadcast(subscribers: &Mutex<Vec<Sender<ChainTip>>>, tip: ChainTip) {
    let mut subscribers = subscribers.lock().unwrap_or_else(PoisonError::into_inner);
    subscribers.retain(|tx| tx.send(tip).is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryBundleStore;

    fn tip(height: u32) -> ChainTip {
        ChainTip {
            height,
            time: 1_700_000_000,
            verification_progress: 1.0,
            header_only: false,
        }
    }

    #[test]
    fn test_announce_reaches_all_subscribers() {
        let notifier = ChainTipNotifier::new();
        let rx1 = notifier.subscribe();
        let rx2 = notifier.subscribe();

        notifier.announce(tip(7));

        assert_eq!(rx1.try_recv().map(|t| t.height), Ok(7));
        assert_eq!(rx2.try_recv().map(|t| t.height), Ok(7));
    }

    #[test]
    fn test_dead_subscriber_is_pruned() {
        let notifier = ChainTipNotifier::new();
        let rx1 = notifier.subscribe();
        let rx2 = notifier.subscribe();
        drop(rx1);

        notifier.announce(tip(1));
        notifier.announce(tip(2));

        assert_eq!(rx2.try_recv().map(|t| t.height), Ok(1));
        assert_eq!(rx2.try_recv().map(|t| t.height), Ok(2));
    }

    #[test]
    fn test_poller_announces_tip_changes() {
        let store = Arc::new(MemoryBundleStore::new());
        store.set_tip(tip(100));

        let notifier = ChainTipNotifier::new();
        let rx = notifier.subscribe();
        notifier.spawn_poller(
            Arc::clone(&store) as Arc<dyn BundleSource>,
            Duration::from_millis(10),
        );

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.height, 100);

        store.set_tip(tip(101));
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(second.height, 101);

        notifier.stop();
    }

    #[test]
    fn test_poller_is_silent_while_height_unchanged() {
        let store = Arc::new(MemoryBundleStore::new());
        store.set_tip(tip(50));

        let notifier = ChainTipNotifier::new();
        let rx = notifier.subscribe();
        notifier.spawn_poller(
            Arc::clone(&store) as Arc<dyn BundleSource>,
            Duration::from_millis(5),
        );

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)).map(|t| t.height),
            Ok(50)
        );
        // Height never changes again, so no further events show up
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        notifier.stop();
    }
}
