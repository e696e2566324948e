//! Immutable snapshots and their publication.
//!
//! # Responsibilities
//! - Freeze the status table and derived signals once per cycle
//! - Publish for pull readers (lock-free `current()`)
//! - Publish for push readers (watch channel, latest value wins)
//!
//! Readers only ever hold an `Arc<Snapshot>`; the table itself never leaves
//! the aggregator. Once `halt()` returns, no further snapshot is published.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::watch;

use crate::aggregator::signals::DerivedSignals;
use crate::health::state::{CanonicalStatus, StatusRecord};

/// Point-in-time view of every service plus derived signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// 0 for the initial snapshot, +1 per publication.
    pub sequence: u64,
    /// Unix milliseconds.
    pub taken_at: u64,
    /// Records in configuration order.
    pub records: Vec<StatusRecord>,
    pub signals: DerivedSignals,
}

impl Snapshot {
    pub fn record(&self, identity: &str) -> Option<&StatusRecord> {
        self.records.iter().find(|r| r.identity.as_str() == identity)
    }

    pub fn count(&self, status: CanonicalStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

/// Shared handle to the latest published snapshot.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<ArcSwap<Snapshot>>,
    updates: Arc<watch::Sender<Arc<Snapshot>>>,
    /// Held across every publication so a halt cannot interleave with one.
    halted: Arc<Mutex<bool>>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        let initial = Arc::new(initial);
        let (updates, _) = watch::channel(Arc::clone(&initial));
        Self {
            current: Arc::new(ArcSwap::new(initial)),
            updates: Arc::new(updates),
            halted: Arc::new(Mutex::new(false)),
        }
    }

    /// Latest snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Receiver that yields every subsequent publication. The latest
    /// snapshot is immediately available through `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.updates.subscribe()
    }

    /// Publish unless halted. Returns whether the snapshot went out.
    pub(crate) fn publish(&self, snapshot: Arc<Snapshot>) -> bool {
        let halted = self.halted.lock().unwrap_or_else(PoisonError::into_inner);
        if *halted {
            return false;
        }
        self.current.store(Arc::clone(&snapshot));
        self.updates.send_replace(snapshot);
        true
    }

    /// Refuse every later publication. Waits for one already underway.
    pub(crate) fn halt(&self) {
        *self.halted.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub(crate) fn is_halted(&self) -> bool {
        *self.halted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wall clock in Unix milliseconds.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
