//! UI state management structures
//!
//! `ViewState` holds everything the renderer draws: the latest view from the catalog
//! worker, the selection and scroll position inside it, the conference sidebar and the
//! per-record display modes.

use crate::catalog::{ConferenceId, PaperRecord};
use crate::render::protocol::ViewSnapshot;
use crate::search::{QueryMatcher, Span};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Rows taken by the search bar.
pub const SEARCH_BAR_HEIGHT: u16 = 1;
/// Rows taken by the status line.
pub const STATUS_LINE_HEIGHT: u16 = 1;
/// Rows taken by the column header above the list.
pub const HEADER_HEIGHT: u16 = 1;
/// Upper bound for the detail pane, borders included.
pub const MAX_DETAIL_HEIGHT: u16 = 10;
/// Width of the conference sidebar, borders included.
pub const SIDEBAR_WIDTH: u16 = 26;

/// How a record's title and abstract are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Literal text, highlighted when a query is active
    Markup,
    /// Typeset math; highlighting no longer applies
    Rendered,
}

/// Typeset title and abstract of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedText {
    pub title: Arc<str>,
    pub abstract_text: Arc<str>,
}

/// Text field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Abstract,
}

/// What the renderer should draw for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState<'a> {
    /// No query; the text as-is
    Plain(&'a str),
    /// Query present; text split into match spans
    Highlighted(Vec<Span<'a>>),
    /// Typesetter output
    Rendered(Arc<str>),
}

/// Key identifying a record across partitions.
pub fn record_key(record: &PaperRecord) -> String {
    format!("{}/{}", record.conference, record.id)
}

/// View state for rendering
#[derive(Debug)]
pub struct ViewState {
    /// Records inside the visible window
    pub rows: Vec<Arc<PaperRecord>>,

    /// Index of the selected row
    pub selected: usize,

    /// Index of the first row on screen
    pub scroll_top: usize,

    pub total_matches: usize,
    pub catalog_size: usize,

    /// Sidebar entries, in the order they are numbered
    pub conferences: Vec<ConferenceId>,
    pub selected_conferences: BTreeSet<ConferenceId>,
    pub conference_counts: HashMap<ConferenceId, usize>,

    /// Active query and whether the search bar has focus
    pub query: String,
    pub editing_query: bool,
    matcher: Option<QueryMatcher>,

    /// Records switched to rendered math, by `record_key`
    pub rendered: HashMap<String, RenderedText>,

    pub status_line: StatusLine,

    /// Terminal dimensions
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl ViewState {
    pub fn new(viewport_width: u16, viewport_height: u16) -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            scroll_top: 0,
            total_matches: 0,
            catalog_size: 0,
            conferences: Vec::new(),
            selected_conferences: BTreeSet::new(),
            conference_counts: HashMap::new(),
            query: String::new(),
            editing_query: false,
            matcher: None,
            rendered: HashMap::new(),
            status_line: StatusLine::new(),
            viewport_width,
            viewport_height,
        }
    }

    /// Seed the sidebar with known conferences, in order.
    pub fn with_conferences(mut self, conferences: Vec<ConferenceId>) -> Self {
        self.conferences = conferences;
        self
    }

    /// Seed the filter shown before the first view arrives.
    pub fn with_filter(mut self, query: &str, conferences: BTreeSet<ConferenceId>) -> Self {
        self.set_query(query);
        for conference in &conferences {
            self.add_conference(conference);
        }
        self.selected_conferences = conferences;
        self
    }

    /// Height of the detail pane for the current terminal size.
    pub fn detail_height(&self) -> u16 {
        (self.viewport_height / 3).min(MAX_DETAIL_HEIGHT)
    }

    /// Number of result rows that fit on screen, the sentinel row included.
    pub fn list_height(&self) -> usize {
        let chrome = SEARCH_BAR_HEIGHT + STATUS_LINE_HEIGHT + HEADER_HEIGHT + self.detail_height();
        self.viewport_height.saturating_sub(chrome).max(1) as usize
    }

    /// Whether matches exist beyond the visible window.
    pub fn has_more(&self) -> bool {
        self.total_matches > self.rows.len()
    }

    /// Whether the row after the last visible record is on screen.
    pub fn sentinel_visible(&self) -> bool {
        self.has_more() && self.rows.len() < self.scroll_top + self.list_height()
    }

    pub fn selected_record(&self) -> Option<&Arc<PaperRecord>> {
        self.rows.get(self.selected)
    }

    /// Replace the displayed view, keeping the selection where possible.
    pub fn apply_view(&mut self, view: ViewSnapshot) {
        self.rows = view.rows;
        self.total_matches = view.total_matches;
        self.catalog_size = view.catalog_size;

        let mut discovered: Vec<&ConferenceId> = view
            .conference_counts
            .keys()
            .filter(|id| !self.conferences.contains(id))
            .collect();
        discovered.sort();
        let discovered: Vec<ConferenceId> = discovered.into_iter().cloned().collect();
        self.conferences.extend(discovered);
        self.conference_counts = view.conference_counts;

        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.scroll_top = self
            .scroll_top
            .min(self.rows.len().saturating_sub(self.list_height()));
        self.ensure_selection_visible();
    }

    pub fn move_selection(&mut self, delta: i64) {
        let last = self.rows.len().saturating_sub(1) as i64;
        let target = (self.selected as i64).saturating_add(delta).clamp(0, last);
        self.selected = target as usize;
        self.ensure_selection_visible();
    }

    pub fn page_down(&mut self) {
        self.move_selection(self.list_height() as i64);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-(self.list_height() as i64));
    }

    pub fn go_to_start(&mut self) {
        self.selected = 0;
        self.scroll_top = 0;
    }

    pub fn go_to_end(&mut self) {
        self.move_selection(i64::MAX);
    }

    fn ensure_selection_visible(&mut self) {
        let height = self.list_height();
        // Selecting the last row also brings the sentinel row into view
        let bottom = if height > 1 && self.has_more() && self.selected + 1 == self.rows.len() {
            self.selected + 1
        } else {
            self.selected
        };
        if self.selected < self.scroll_top {
            self.scroll_top = self.selected;
        } else if bottom >= self.scroll_top + height {
            self.scroll_top = bottom + 1 - height;
        }
    }

    /// Update terminal dimensions. Returns true if they changed.
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.viewport_width != width || self.viewport_height != height;
        if changed {
            self.viewport_width = width;
            self.viewport_height = height;
            self.ensure_selection_visible();
        }
        changed
    }

    /// Set the query and rebuild the highlight matcher. Returns true if it changed.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        self.matcher = match QueryMatcher::new(query) {
            Ok(matcher) => matcher,
            Err(err) => {
                log::warn!("highlighting disabled for query {:?}: {}", query, err);
                None
            }
        };
        self.go_to_start();
        true
    }

    /// Toggle the conference at sidebar position `index`.
    ///
    /// Returns the toggled conference, or `None` when the position is empty.
    pub fn toggle_conference(&mut self, index: usize) -> Option<ConferenceId> {
        let conference = self.conferences.get(index)?.clone();
        if !self.selected_conferences.remove(&conference) {
            self.selected_conferences.insert(conference.clone());
        }
        self.go_to_start();
        Some(conference)
    }

    /// Clear the conference selection. Returns true if anything was selected.
    pub fn clear_conferences(&mut self) -> bool {
        if self.selected_conferences.is_empty() {
            return false;
        }
        self.selected_conferences.clear();
        self.go_to_start();
        true
    }

    fn add_conference(&mut self, conference: &ConferenceId) {
        if !self.conferences.contains(conference) {
            self.conferences.push(conference.clone());
        }
    }

    pub fn display_mode(&self, record: &PaperRecord) -> DisplayMode {
        if self.rendered.contains_key(&record_key(record)) {
            DisplayMode::Rendered
        } else {
            DisplayMode::Markup
        }
    }

    /// Resolve what to draw for one field of `record`.
    pub fn display_state<'a>(&'a self, record: &'a PaperRecord, field: TextField) -> DisplayState<'a> {
        if let Some(rendered) = self.rendered.get(&record_key(record)) {
            return DisplayState::Rendered(match field {
                TextField::Title => Arc::clone(&rendered.title),
                TextField::Abstract => Arc::clone(&rendered.abstract_text),
            });
        }

        let text = match field {
            TextField::Title => record.title.as_str(),
            TextField::Abstract => record.abstract_text.as_str(),
        };
        match &self.matcher {
            Some(matcher) => DisplayState::Highlighted(matcher.spans(text)),
            None => DisplayState::Plain(text),
        }
    }

    /// Format the complete status line for this view state
    pub fn format_status_line(&self) -> String {
        self.status_line.format_status_line(self.total_matches)
    }
}

/// Status line information
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub message: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a temporary message
    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn format_status_line(&self, matches: usize) -> String {
        let count = if matches == 1 {
            "1 paper".to_string()
        } else {
            format!("{} papers", matches)
        };
        match &self.message {
            Some(message) => format!("{} | {}", count, message),
            None => count,
        }
    }
}
