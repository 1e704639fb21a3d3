//! Shared record store.
//!
//! The store holds the whole catalog as an immutable snapshot that is swapped on every
//! append. Readers clone the snapshot `Arc` and never hold the lock while filtering.
//! Every append bumps a version published on a `watch` channel so that subscribers
//! (the catalog worker) can refresh their views.

use crate::catalog::record::{ConferenceId, PaperRecord};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of the catalog, sorted by rating descending.
pub type CatalogSnapshot = Arc<Vec<Arc<PaperRecord>>>;

/// Cloneable handle to the process-wide record list.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    records: RwLock<CatalogSnapshot>,
    version: watch::Sender<u64>,
}

impl RecordStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                records: RwLock::new(Arc::new(Vec::new())),
                version,
            }),
        }
    }

    /// Append a batch and re-sort the full set by rating, highest first.
    ///
    /// The sort is stable: records with equal ratings keep their prior relative order,
    /// and a batch's records stay behind previously stored ones of the same rating.
    /// Returns the new catalog size.
    pub fn append_and_resort(&self, batch: Vec<PaperRecord>) -> usize {
        let size = {
            let mut guard = self.inner.records.write();
            let mut records = Vec::with_capacity(guard.len() + batch.len());
            records.extend(guard.iter().cloned());
            records.extend(batch.into_iter().map(Arc::new));
            records.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(Ordering::Equal)
            });
            let size = records.len();
            *guard = Arc::new(records);
            size
        };
        self.inner.version.send_modify(|version| *version += 1);
        size
    }

    /// Current catalog contents.
    pub fn snapshot(&self) -> CatalogSnapshot {
        Arc::clone(&*self.inner.records.read())
    }

    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of appends performed so far.
    pub fn version(&self) -> u64 {
        *self.inner.version.borrow()
    }

    /// Subscribe to change notifications. The received value is the store version.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Count records per conference.
pub fn conference_counts(records: &[Arc<PaperRecord>]) -> HashMap<ConferenceId, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.conference.clone()).or_insert(0) += 1;
    }
    counts
}
