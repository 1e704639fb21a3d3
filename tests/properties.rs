use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

use paperscreen::catalog::{ConferenceId, ExternalIds, PaperRecord};
use paperscreen::search::{filter, highlight, FilterState, SpanKind};

const CONFERENCES: [&str; 3] = ["iclr2024", "iclr2025", "iclr2026"];

fn record_strategy() -> impl Strategy<Value = Arc<PaperRecord>> {
    (
        "[a-zA-Z ]{0,24}",
        "[a-zA-Z .$]{0,48}",
        0.0f64..10.0,
        0usize..CONFERENCES.len(),
    )
        .prop_map(|(title, abstract_text, rating, conference)| {
            Arc::new(PaperRecord::new(
                "id",
                title,
                abstract_text,
                rating,
                ConferenceId::new(CONFERENCES[conference]),
                ExternalIds::default(),
            ))
        })
}

fn conference_set_strategy() -> impl Strategy<Value = BTreeSet<ConferenceId>> {
    proptest::sample::subsequence(CONFERENCES.to_vec(), 0..=CONFERENCES.len())
        .prop_map(|ids| ids.into_iter().map(ConferenceId::new).collect())
}

fn is_subsequence(needle: &[Arc<PaperRecord>], haystack: &[Arc<PaperRecord>]) -> bool {
    let mut rest = haystack.iter();
    needle
        .iter()
        .all(|item| rest.any(|candidate| Arc::ptr_eq(item, candidate)))
}

proptest! {
    #[test]
    fn empty_filter_passes_everything(records in prop::collection::vec(record_strategy(), 0..40)) {
        let result = filter(&records, "", &BTreeSet::new());
        prop_assert_eq!(result.len(), records.len());
        prop_assert!(result.iter().zip(&records).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn results_contain_query(
        records in prop::collection::vec(record_strategy(), 0..40),
        query in "[a-zA-Z]{1,3}",
    ) {
        let folded = query.to_lowercase();
        let result = filter(&records, &query, &BTreeSet::new());
        for record in &result {
            prop_assert!(
                record.title.to_lowercase().contains(&folded)
                    || record.abstract_text.to_lowercase().contains(&folded)
            );
        }
        let expected = records
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&folded)
                    || r.abstract_text.to_lowercase().contains(&folded)
            })
            .count();
        prop_assert_eq!(result.len(), expected);
    }

    #[test]
    fn results_belong_to_selected_conferences(
        records in prop::collection::vec(record_strategy(), 0..40),
        conferences in conference_set_strategy(),
        query in "[a-z]{0,2}",
    ) {
        let result = filter(&records, &query, &conferences);
        if !conferences.is_empty() {
            prop_assert!(result.iter().all(|r| conferences.contains(&r.conference)));
        }
        prop_assert!(is_subsequence(&result, &records));
    }

    #[test]
    fn window_is_bounded_by_matches(
        records in prop::collection::vec(record_strategy(), 0..60),
        page_size in 1usize..20,
        pages in 0usize..5,
    ) {
        let mut state = FilterState::new(page_size);
        for _ in 0..pages {
            state.load_more();
        }
        let view = state.apply(&records);
        prop_assert_eq!(view.visible.len(), (page_size * (pages + 1)).min(records.len()));
        prop_assert_eq!(view.has_more, view.total > view.visible.len());
    }

    #[test]
    fn highlight_reassembles_text(text in "[a-zA-Z .$()*+?]{0,40}", query in "[a-zA-Z .$()*+?]{0,4}") {
        let spans = highlight(&text, &query);
        let joined: String = spans.iter().map(|s| s.text).collect();
        prop_assert_eq!(joined, text.clone());
        prop_assert!(spans.iter().all(|s| !s.text.is_empty() || text.is_empty()));

        let folded = query.to_lowercase();
        for span in spans.iter().filter(|s| s.kind == SpanKind::Match) {
            prop_assert_eq!(span.text.to_lowercase(), folded.clone());
        }
    }
}
