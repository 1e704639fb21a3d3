//! Query and conference filtering.
//!
//! Filtering never reorders: results keep the store's rating order.

use crate::catalog::{ConferenceId, PaperRecord};
use crate::error::{Result, ScreenerError};
use crate::search::paginator::{Paginator, PAGE_SIZE};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Records whose title or abstract contains `query`, case-insensitively, and whose
/// conference is in `conferences` (an empty set admits every conference).
pub fn filter(
    records: &[Arc<PaperRecord>],
    query: &str,
    conferences: &BTreeSet<ConferenceId>,
) -> Vec<Arc<PaperRecord>> {
    let folded = query.to_lowercase();
    records
        .iter()
        .filter(|record| matches_query(record, &folded))
        .filter(|record| matches_conference(record, conferences))
        .cloned()
        .collect()
}

/// Substring predicate over an already-lowercased query. Empty queries match everything.
pub fn matches_query(record: &PaperRecord, folded_query: &str) -> bool {
    folded_query.is_empty() || record.contains_folded(folded_query)
}

pub fn matches_conference(record: &PaperRecord, conferences: &BTreeSet<ConferenceId>) -> bool {
    conferences.is_empty() || conferences.contains(&record.conference)
}

/// Queries are a single line of text.
pub fn validate_query(query: &str) -> Result<()> {
    if query.contains(|c| c == '\n' || c == '\r') {
        return Err(ScreenerError::invalid_argument(
            "query must be a single line of text",
        ));
    }
    Ok(())
}

/// User-controlled filter: query text, selected conferences and the visible window.
///
/// Any change to the query or the conference selection resets the window to the first
/// page. Assigning an identical value is not a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    conferences: BTreeSet<ConferenceId>,
    paginator: Paginator,
}

impl FilterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            conferences: BTreeSet::new(),
            paginator: Paginator::new(page_size),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn conferences(&self) -> &BTreeSet<ConferenceId> {
        &self.conferences
    }

    pub fn visible_count(&self) -> usize {
        self.paginator.visible_count()
    }

    pub fn page_size(&self) -> usize {
        self.paginator.page_size()
    }

    /// Returns true when the query actually changed.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.query {
            return false;
        }
        self.query = query;
        self.paginator.reset();
        true
    }

    /// Returns true when the selection actually changed.
    pub fn set_conferences(&mut self, conferences: BTreeSet<ConferenceId>) -> bool {
        if conferences == self.conferences {
            return false;
        }
        self.conferences = conferences;
        self.paginator.reset();
        true
    }

    /// Add or remove one conference from the selection.
    pub fn toggle_conference(&mut self, conference: ConferenceId) {
        if !self.conferences.remove(&conference) {
            self.conferences.insert(conference);
        }
        self.paginator.reset();
    }

    pub fn load_more(&mut self) {
        self.paginator.load_more();
    }

    /// Filter `records` and cut the visible window.
    pub fn apply(&self, records: &[Arc<PaperRecord>]) -> FilteredView {
        let matches = filter(records, &self.query, &self.conferences);
        let total = matches.len();
        let shown = self.paginator.window(&matches).len();
        let mut visible = matches;
        visible.truncate(shown);
        FilteredView {
            has_more: self.paginator.has_more(total),
            visible,
            total,
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

/// Result of applying a [`FilterState`] to the catalog.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub visible: Vec<Arc<PaperRecord>>,
    pub total: usize,
    pub has_more: bool,
}
