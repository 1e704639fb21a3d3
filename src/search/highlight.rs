//! Query highlighting.
//!
//! Splits displayed text around case-insensitive occurrences of the query. The query is
//! escaped before the pattern is built, so regex metacharacters and backslashes match
//! literally. Spans borrow from the input and concatenate back to it exactly.

use crate::error::{Result, ScreenerError};
use regex::{Regex, RegexBuilder};

/// Presentation tag of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Match,
}

/// Contiguous run of text tagged plain or match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub text: &'a str,
}

impl<'a> Span<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            kind: SpanKind::Plain,
            text,
        }
    }

    pub fn matched(text: &'a str) -> Self {
        Self {
            kind: SpanKind::Match,
            text,
        }
    }

    pub fn is_match(&self) -> bool {
        self.kind == SpanKind::Match
    }
}

/// Compiled query, reusable across many texts.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    pattern: Regex,
    folded_query: String,
}

impl QueryMatcher {
    /// Build a matcher; `Ok(None)` for a blank query.
    pub fn new(query: &str) -> Result<Option<Self>> {
        if query.trim().is_empty() {
            return Ok(None);
        }
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| ScreenerError::pattern(e.to_string()))?;
        Ok(Some(Self {
            pattern,
            folded_query: query.to_lowercase(),
        }))
    }

    /// Split `text` into fragments around matches and tag each one.
    ///
    /// A fragment is a match when its lowercase form equals the lowercase query.
    pub fn spans<'a>(&self, text: &'a str) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        let mut last_end = 0;

        for found in self.pattern.find_iter(text) {
            if found.start() > last_end {
                spans.push(self.tag(&text[last_end..found.start()]));
            }
            if !found.as_str().is_empty() {
                spans.push(self.tag(found.as_str()));
            }
            last_end = found.end();
        }

        if last_end < text.len() {
            spans.push(self.tag(&text[last_end..]));
        }

        spans
    }

    fn tag<'a>(&self, fragment: &'a str) -> Span<'a> {
        if fragment.to_lowercase() == self.folded_query {
            Span::matched(fragment)
        } else {
            Span::plain(fragment)
        }
    }
}

/// Highlight `query` inside `text`.
///
/// A blank query yields the whole text as one plain span. If the pattern cannot be built
/// the failure is logged and the text is returned unhighlighted.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Span<'a>> {
    match QueryMatcher::new(query) {
        Ok(Some(matcher)) => matcher.spans(text),
        Ok(None) => vec![Span::plain(text)],
        Err(err) => {
            log::debug!("highlight disabled for query {:?}: {}", query, err);
            vec![Span::plain(text)]
        }
    }
}
