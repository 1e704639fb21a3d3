//! Paper record model.
//!
//! Records are immutable once parsed and are shared between the store, the catalog
//! worker and the renderer behind `Arc`.

use std::fmt;

/// Identifier of a venue+year partition, e.g. `iclr2026`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConferenceId(String);

impl ConferenceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: `iclr2026` becomes `ICLR 2026`.
    ///
    /// Identifiers too short to carry a venue and a four-digit year are upper-cased whole.
    pub fn label(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return self.0.to_uppercase();
        }
        let split = chars.len() - 4;
        let venue: String = chars[..split].iter().collect();
        let year: String = chars[split..].iter().collect();
        format!("{} {}", venue.to_uppercase(), year)
    }
}

impl fmt::Display for ConferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConferenceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifiers of the paper on external services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalIds {
    pub arxiv: Option<String>,
    pub openreview: Option<String>,
}

impl ExternalIds {
    /// Best link for the paper: arXiv, then OpenReview, then a web search for the title.
    pub fn link(&self, title: &str) -> String {
        if let Some(arxiv) = &self.arxiv {
            format!("https://arxiv.org/abs/{}", arxiv)
        } else if let Some(openreview) = &self.openreview {
            format!("https://openreview.net/forum?id={}", openreview)
        } else {
            format!(
                "https://www.google.com/search?q={}",
                urlencoding::encode(title)
            )
        }
    }
}

/// One paper's metadata.
#[derive(Debug, Clone)]
pub struct PaperRecord {
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub rating: f64,
    pub conference: ConferenceId,
    pub external_ids: ExternalIds,
    // Lowercased copies used by the substring filter
    folded_title: String,
    folded_abstract: String,
}

impl PaperRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        rating: f64,
        conference: ConferenceId,
        external_ids: ExternalIds,
    ) -> Self {
        let title = title.into();
        let abstract_text = abstract_text.into();
        Self {
            id: id.into(),
            folded_title: title.to_lowercase(),
            folded_abstract: abstract_text.to_lowercase(),
            title,
            abstract_text,
            rating,
            conference,
            external_ids,
        }
    }

    /// Check whether title or abstract contains an already-lowercased needle.
    pub fn contains_folded(&self, folded_needle: &str) -> bool {
        self.folded_title.contains(folded_needle) || self.folded_abstract.contains(folded_needle)
    }

    pub fn link(&self) -> String {
        self.external_ids.link(&self.title)
    }

    /// Rating formatted with two decimals, as shown in the result list.
    pub fn display_rating(&self) -> String {
        format!("{:.2}", self.rating)
    }
}

/// Average review score from the raw sum and count columns.
///
/// Any failure (missing or unparsable values, zero count, non-finite result) yields `0.0`.
pub fn compute_rating(sum: Option<&str>, count: Option<&str>) -> f64 {
    let parse = |raw: Option<&str>| raw.and_then(|value| value.trim().parse::<f64>().ok());
    match (parse(sum), parse(count)) {
        (Some(sum), Some(count)) if count != 0.0 => {
            let rating = sum / count;
            // 0 / -n is -0.0
            if rating.is_finite() && rating != 0.0 {
                rating
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
