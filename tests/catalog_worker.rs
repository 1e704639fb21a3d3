use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use paperscreen::catalog::{ConferenceId, ExternalIds, PaperRecord, RecordStore};
use paperscreen::render::protocol::{CatalogCommand, CatalogResponse, ViewSnapshot};
use paperscreen::search::worker::catalog_worker_loop;
use paperscreen::search::FilterState;

const TIMEOUT_MS: u64 = 200;

async fn next_response(rx: &mut mpsc::UnboundedReceiver<CatalogResponse>) -> CatalogResponse {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("worker response timed out")
        .expect("worker channel closed unexpectedly")
}

async fn next_view(rx: &mut mpsc::UnboundedReceiver<CatalogResponse>) -> ViewSnapshot {
    match next_response(rx).await {
        CatalogResponse::ViewLoaded { view, .. } | CatalogResponse::CatalogUpdated { view } => view,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn paper(id: &str, title: &str, rating: f64, conference: &str) -> PaperRecord {
    PaperRecord::new(
        id,
        title,
        format!("Abstract of {title}"),
        rating,
        ConferenceId::new(conference),
        ExternalIds::default(),
    )
}

fn sample_store() -> RecordStore {
    let store = RecordStore::new();
    store.append_and_resort(vec![
        paper("a", "Deep Nets", 6.0, "iclr2026"),
        paper("b", "Graph Nets", 7.5, "iclr2025"),
        paper("c", "Kernel Methods", 5.0, "iclr2026"),
        paper("d", "Diffusion Models", 8.0, "iclr2026"),
        paper("e", "Sparse Nets", 3.0, "iclr2025"),
    ]);
    store
}

fn spawn_worker(
    store: RecordStore,
    page_size: usize,
) -> (
    mpsc::Sender<CatalogCommand>,
    mpsc::UnboundedReceiver<CatalogResponse>,
    tokio::task::JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(4);
    let (resp_tx, resp_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(catalog_worker_loop(
        cmd_rx,
        resp_tx,
        store,
        FilterState::new(page_size),
    ));
    (cmd_tx, resp_rx, worker)
}

fn titles(view: &ViewSnapshot) -> Vec<&str> {
    view.rows.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test]
async fn refresh_returns_first_page_in_rating_order() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sample_store(), 2);

    cmd_tx
        .send(CatalogCommand::Refresh { request_id: 1 })
        .await
        .unwrap();

    match next_response(&mut resp_rx).await {
        CatalogResponse::ViewLoaded { request_id, view } => {
            assert_eq!(request_id, 1);
            assert_eq!(titles(&view), vec!["Diffusion Models", "Graph Nets"]);
            assert_eq!(view.total_matches, 5);
            assert_eq!(view.visible_count, 2);
            assert_eq!(view.catalog_size, 5);
            assert_eq!(view.conference_counts[&ConferenceId::new("iclr2026")], 3);
            assert!(view.has_more());
        }
        other => panic!("unexpected response: {other:?}"),
    }

    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn load_more_grows_window_until_exhausted() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sample_store(), 2);

    for request_id in 1..=3 {
        cmd_tx
            .send(CatalogCommand::LoadMore { request_id })
            .await
            .unwrap();
    }
    assert_eq!(next_view(&mut resp_rx).await.rows.len(), 4);
    let view = next_view(&mut resp_rx).await;
    assert_eq!(view.rows.len(), 5);
    assert!(!view.has_more());
    // Asking past the end is a display no-op
    assert_eq!(next_view(&mut resp_rx).await.rows.len(), 5);

    drop(cmd_tx);
    worker.await.unwrap();
}

#[tokio::test]
async fn filter_change_resets_window() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sample_store(), 2);

    cmd_tx
        .send(CatalogCommand::LoadMore { request_id: 1 })
        .await
        .unwrap();
    assert_eq!(next_view(&mut resp_rx).await.visible_count, 4);

    cmd_tx
        .send(CatalogCommand::SetFilter {
            request_id: 2,
            query: "NETS".to_string(),
            conferences: BTreeSet::new(),
        })
        .await
        .unwrap();
    let view = next_view(&mut resp_rx).await;
    assert_eq!(view.visible_count, 2);
    assert_eq!(view.total_matches, 3);
    assert_eq!(titles(&view), vec!["Graph Nets", "Deep Nets"]);

    cmd_tx
        .send(CatalogCommand::SetFilter {
            request_id: 3,
            query: "NETS".to_string(),
            conferences: BTreeSet::from([ConferenceId::new("iclr2025")]),
        })
        .await
        .unwrap();
    let view = next_view(&mut resp_rx).await;
    assert_eq!(titles(&view), vec!["Graph Nets", "Sparse Nets"]);
    assert!(!view.has_more());

    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn identical_filter_keeps_window() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sample_store(), 2);

    cmd_tx
        .send(CatalogCommand::LoadMore { request_id: 1 })
        .await
        .unwrap();
    next_view(&mut resp_rx).await;

    cmd_tx
        .send(CatalogCommand::SetFilter {
            request_id: 2,
            query: String::new(),
            conferences: BTreeSet::new(),
        })
        .await
        .unwrap();
    assert_eq!(next_view(&mut resp_rx).await.visible_count, 4);

    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn store_changes_push_updates_without_reset() {
    let store = RecordStore::new();
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(store.clone(), 2);

    cmd_tx
        .send(CatalogCommand::LoadMore { request_id: 1 })
        .await
        .unwrap();
    let view = next_view(&mut resp_rx).await;
    assert_eq!(view.catalog_size, 0);
    assert_eq!(view.visible_count, 4);

    store.append_and_resort(vec![
        paper("a", "Deep Nets", 6.0, "iclr2026"),
        paper("b", "Graph Nets", 7.5, "iclr2025"),
        paper("c", "Kernel Methods", 5.0, "iclr2026"),
    ]);

    match next_response(&mut resp_rx).await {
        CatalogResponse::CatalogUpdated { view } => {
            assert_eq!(view.catalog_size, 3);
            assert_eq!(view.visible_count, 4);
            assert_eq!(
                titles(&view),
                vec!["Graph Nets", "Deep Nets", "Kernel Methods"]
            );
        }
        other => panic!("unexpected response: {other:?}"),
    }

    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn multiline_query_is_rejected() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sample_store(), 2);

    cmd_tx
        .send(CatalogCommand::SetFilter {
            request_id: 9,
            query: "deep\nnets".to_string(),
            conferences: BTreeSet::new(),
        })
        .await
        .unwrap();

    match next_response(&mut resp_rx).await {
        CatalogResponse::Error { request_id, error } => {
            assert_eq!(request_id, 9);
            assert!(error.to_string().contains("single line"));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    // The previous filter is still in effect
    cmd_tx
        .send(CatalogCommand::Refresh { request_id: 10 })
        .await
        .unwrap();
    assert_eq!(next_view(&mut resp_rx).await.total_matches, 5);

    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

fn set_filter(request_id: u64, query: &str) -> CatalogCommand {
    CatalogCommand::SetFilter {
        request_id,
        query: query.to_string(),
        conferences: BTreeSet::new(),
    }
}

#[tokio::test]
async fn queued_filter_changes_collapse_into_the_last() {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();

    // Everything is queued before the worker starts
    cmd_tx.send(set_filter(1, "d")).await.unwrap();
    cmd_tx.send(set_filter(2, "de")).await.unwrap();
    cmd_tx.send(set_filter(3, "deep")).await.unwrap();
    cmd_tx
        .send(CatalogCommand::LoadMore { request_id: 4 })
        .await
        .unwrap();
    cmd_tx.send(set_filter(5, "nets")).await.unwrap();
    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();

    let worker = tokio::spawn(catalog_worker_loop(
        cmd_rx,
        resp_tx,
        sample_store(),
        FilterState::new(2),
    ));

    match next_response(&mut resp_rx).await {
        CatalogResponse::ViewLoaded { request_id, view } => {
            assert_eq!(request_id, 3);
            assert_eq!(titles(&view), vec!["Deep Nets"]);
        }
        other => panic!("unexpected response: {other:?}"),
    }
    match next_response(&mut resp_rx).await {
        CatalogResponse::ViewLoaded { request_id, view } => {
            assert_eq!(request_id, 4);
            assert_eq!(view.visible_count, 4);
        }
        other => panic!("unexpected response: {other:?}"),
    }
    match next_response(&mut resp_rx).await {
        CatalogResponse::ViewLoaded { request_id, view } => {
            assert_eq!(request_id, 5);
            assert_eq!(view.total_matches, 3);
            assert_eq!(view.visible_count, 2);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    worker.await.unwrap();
    assert!(resp_rx.recv().await.is_none());
}

#[tokio::test]
async fn unread_responses_never_stall_commands() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sample_store(), 2);

    // Nobody reads responses while thousands of commands go through a 4-slot channel
    let sent = timeout(Duration::from_secs(10), async {
        for request_id in 1..=3000u64 {
            let query = if request_id % 2 == 0 { "nets" } else { "deep" };
            cmd_tx.send(set_filter(request_id, query)).await.unwrap();
        }
        cmd_tx
            .send(CatalogCommand::Refresh { request_id: 3001 })
            .await
            .unwrap();
    })
    .await;
    assert!(sent.is_ok(), "worker stopped accepting commands");

    let last = timeout(Duration::from_secs(10), async {
        loop {
            if let Some(CatalogResponse::ViewLoaded { request_id: 3001, view }) =
                resp_rx.recv().await
            {
                return view;
            }
        }
    })
    .await
    .expect("refresh was never answered");
    assert_eq!(last.total_matches, 3);

    cmd_tx.send(CatalogCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}
