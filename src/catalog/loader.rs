//! Concurrent partition loading.
//!
//! Every source is fetched concurrently. Each one that finishes is appended to the store
//! immediately, so the catalog fills up (and re-sorts) in completion order. A failing
//! source is logged and contributes nothing.

use crate::catalog::record::ConferenceId;
use crate::catalog::source::CatalogSource;
use crate::catalog::store::RecordStore;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;

/// Result of loading a single partition.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Number of records appended to the store
    Loaded(usize),
    /// Failure description; the partition contributed no records
    Failed(String),
}

/// Per-source report returned by [`load_catalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub conference: ConferenceId,
    pub description: String,
    pub status: LoadStatus,
}

impl SourceOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded(_))
    }
}

/// Load all sources into `store`, returning outcomes in completion order.
pub async fn load_catalog(
    sources: Vec<Arc<dyn CatalogSource>>,
    store: RecordStore,
) -> Vec<SourceOutcome> {
    let mut pending: FuturesUnordered<_> = sources
        .into_iter()
        .map(|source| async move {
            let result = source.load().await;
            (source, result)
        })
        .collect();

    let mut outcomes = Vec::new();
    while let Some((source, result)) = pending.next().await {
        let description = source.describe();
        let status = match result {
            Ok(records) => {
                let count = records.len();
                let total = store.append_and_resort(records);
                log::info!(
                    "loaded {} records from {} ({} in catalog)",
                    count,
                    description,
                    total
                );
                LoadStatus::Loaded(count)
            }
            Err(err) => {
                log::warn!("skipping source {}: {}", description, err);
                LoadStatus::Failed(err.to_string())
            }
        };
        outcomes.push(SourceOutcome {
            conference: source.conference().clone(),
            description,
            status,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::layout::FieldLayout;
    use crate::error::{Result, ScreenerError};
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticSource {
        conference: ConferenceId,
        layout: FieldLayout,
        text: Option<&'static str>,
        delay: Duration,
    }

    impl StaticSource {
        fn ok(conference: &str, text: &'static str, delay_ms: u64) -> Arc<dyn CatalogSource> {
            Arc::new(Self {
                conference: ConferenceId::new(conference),
                layout: FieldLayout::default(),
                text: Some(text),
                delay: Duration::from_millis(delay_ms),
            })
        }

        fn failing(conference: &str) -> Arc<dyn CatalogSource> {
            Arc::new(Self {
                conference: ConferenceId::new(conference),
                layout: FieldLayout::default(),
                text: None,
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl CatalogSource for StaticSource {
        fn conference(&self) -> &ConferenceId {
            &self.conference
        }

        fn layout(&self) -> &FieldLayout {
            &self.layout
        }

        fn describe(&self) -> String {
            self.conference.to_string()
        }

        async fn fetch(&self) -> Result<Vec<u8>> {
            tokio::time::sleep(self.delay).await;
            self.text
                .map(|text| text.as_bytes().to_vec())
                .ok_or_else(|| ScreenerError::other("network unreachable"))
        }
    }

    #[tokio::test]
    async fn test_failing_source_contributes_nothing() {
        let store = RecordStore::new();
        let outcomes = load_catalog(
            vec![
                StaticSource::failing("iclr2025"),
                StaticSource::ok("iclr2026", "h\na,Low,x,2,1\nb,High,y,9,1", 5),
            ],
            store.clone(),
        )
        .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes.iter().filter(|o| o.is_loaded()).count(), 1);
        let ids: Vec<_> = store.snapshot().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_outcomes_follow_completion_order() {
        let store = RecordStore::new();
        let outcomes = load_catalog(
            vec![
                StaticSource::ok("slow2024", "h\ns,Slow,x,1,1", 40),
                StaticSource::ok("fast2025", "h\nf,Fast,x,5,1", 0),
            ],
            store.clone(),
        )
        .await;

        assert_eq!(outcomes[0].conference.as_str(), "fast2025");
        assert_eq!(outcomes[0].status, LoadStatus::Loaded(1));
        assert_eq!(outcomes[1].conference.as_str(), "slow2024");
        assert_eq!(store.len(), 2);
        assert_eq!(store.version(), 2);
    }

    #[tokio::test]
    async fn test_no_sources() {
        let store = RecordStore::new();
        assert!(load_catalog(Vec::new(), store.clone()).await.is_empty());
        assert!(store.is_empty());
    }
}
