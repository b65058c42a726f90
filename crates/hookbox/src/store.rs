//! Time-expiring, identity-keyed store for captured requests.
//!
//! The store is an owned component constructed once at startup and handed to
//! both listeners as an `Arc`. The ingestion loop is the sole writer that
//! inserts entries; the sweeper and the management API delete concurrently
//! with reads, serialized by the internal lock.

use crate::snapshot::CapturedRequest;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Capacity of the capture queue. Producers await `send` when it fills up,
/// so captures back-pressure instead of being dropped.
pub const CAPTURE_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no captured request with id {0}")]
    NotFound(Uuid),
}

/// A captured snapshot plus its store-assigned identity and deadline.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub id: Uuid,
    pub request: Arc<CapturedRequest>,
    deadline: Instant,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline <= now
    }
}

pub struct RequestStore {
    entries: RwLock<HashMap<Uuid, StoredEntry>>,
    ttl: Duration,
}

impl RequestStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert a snapshot under a fresh identity and return it.
    ///
    /// Identities are random v4 UUIDs and never reused; deleting or expiring
    /// an entry permanently retires its id.
    pub fn put(&self, request: CapturedRequest) -> Uuid {
        let id = Uuid::new_v4();
        let entry = StoredEntry {
            id,
            request: Arc::new(request),
            deadline: Instant::now() + self.ttl,
        };
        self.entries.write().insert(id, entry);
        id
    }

    /// Look up a live entry. An entry at or past its deadline is absent even
    /// before the sweeper has purged it, so a lookup racing an expiration
    /// resolves to one consistent outcome.
    pub fn get(&self, id: Uuid) -> Result<StoredEntry, StoreError> {
        let now = Instant::now();
        self.entries
            .read()
            .get(&id)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// All live entries, keyed by identity.
    pub fn list(&self) -> HashMap<Uuid, Arc<CapturedRequest>> {
        let now = Instant::now();
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(id, entry)| (*id, Arc::clone(&entry.request)))
            .collect()
    }

    /// Remove an entry. Returns whether it was present; deleting an unknown
    /// id is not an error.
    pub fn delete(&self, id: Uuid) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    /// Remove every entry immediately.
    pub fn flush(&self) {
        self.entries.write().clear();
    }

    /// Drop entries past their deadline, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Drain the capture queue into the store.
///
/// The sole consumer: suspends on `recv` until a snapshot arrives and exits
/// when every producer handle is gone. Each capture is written to the console
/// log before it is stored.
pub async fn run_ingest(store: Arc<RequestStore>, mut rx: mpsc::Receiver<CapturedRequest>) {
    while let Some(request) = rx.recv().await {
        info!("captured request at {}\n{}", request.received_at, request);
        let id = store.put(request);
        debug!(%id, "captured request stored");
    }
    debug!("capture queue closed, ingest loop exiting");
}

/// Periodically purge expired entries.
pub async fn run_sweeper(store: Arc<RequestStore>, interval: Duration) {
    let mut tick = tokio::time::interval(interval);
    loop {
        tick.tick().await;
        let purged = store.purge_expired();
        if purged > 0 {
            debug!(purged, "expired captured requests purged");
        }
    }
}
