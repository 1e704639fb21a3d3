//! Protocol definitions shared between the render coordinator and the catalog worker.

use crate::catalog::{ConferenceId, PaperRecord};
use crate::error::ScreenerError;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier attached to cross-task requests so responses can be correlated.
pub type RequestId = u64;

/// Shared allocator of request identifiers.
///
/// Both the render loop and the sentinel observer issue commands, so the counter is
/// shared between them.
#[derive(Debug, Clone, Default)]
pub struct RequestIds(Arc<AtomicU64>);

impl RequestIds {
    pub fn next(&self) -> RequestId {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Commands sent from the render coordinator to the catalog worker.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCommand {
    /// Replace the filter; the visible window restarts at one page if anything changed
    SetFilter {
        request_id: RequestId,
        query: String,
        conferences: BTreeSet<ConferenceId>,
    },
    /// Grow the visible window by one page
    LoadMore { request_id: RequestId },
    /// Recompute the view without changing the filter
    Refresh { request_id: RequestId },
    Shutdown,
}

/// Filtered, paginated view of the catalog.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// Records inside the visible window, in rating order
    pub rows: Vec<Arc<PaperRecord>>,
    /// Number of records matching the filter
    pub total_matches: usize,
    pub visible_count: usize,
    /// Number of records in the whole catalog
    pub catalog_size: usize,
    pub conference_counts: HashMap<ConferenceId, usize>,
}

impl ViewSnapshot {
    /// Whether matches exist beyond the visible window.
    pub fn has_more(&self) -> bool {
        self.total_matches > self.rows.len()
    }
}

/// Responses emitted by the catalog worker back to the coordinator.
#[derive(Debug)]
pub enum CatalogResponse {
    ViewLoaded {
        request_id: RequestId,
        view: ViewSnapshot,
    },
    /// Unsolicited refresh after the store changed
    CatalogUpdated { view: ViewSnapshot },
    Error {
        request_id: RequestId,
        error: ScreenerError,
    },
}
