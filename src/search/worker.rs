use crate::catalog::store::conference_counts;
use crate::catalog::{ConferenceId, RecordStore};
use crate::error::Result;
use crate::render::protocol::{CatalogCommand, CatalogResponse, RequestId, ViewSnapshot};
use crate::search::filter::{validate_query, FilterState};
use std::collections::BTreeSet;
use tokio::sync::mpsc::{Receiver, UnboundedSender};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

/// Run the catalog worker: answer filter/pagination commands and push a fresh view
/// whenever the store changes.
///
/// Responses use an unbounded channel: the render loop blocks on the bounded command
/// channel, so the worker must never block on the render loop.
pub async fn catalog_worker_loop(
    mut rx: Receiver<CatalogCommand>,
    tx: UnboundedSender<CatalogResponse>,
    store: RecordStore,
    filter: FilterState,
) {
    let mut state = WorkerState::new(store.clone(), filter);
    let mut store_changes = WatchStream::from_changes(store.subscribe());
    let mut deferred: Option<CatalogCommand> = None;

    loop {
        let outcome = match deferred.take() {
            Some(cmd) => state.handle_command(cmd),
            None => tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(cmd) => {
                        let (cmd, next) = latest_filter(cmd, &mut rx);
                        deferred = next;
                        state.handle_command(cmd)
                    }
                    None => HandlerOutcome::exit(),
                },
                Some(_) = store_changes.next() => HandlerOutcome::respond(CatalogResponse::CatalogUpdated {
                    view: state.snapshot(),
                }),
            },
        };

        if let Some(response) = outcome.response {
            if tx.send(response).is_err() {
                break;
            }
        }

        if outcome.done {
            break;
        }
    }

    log::debug!("catalog worker stopped");
}

/// Collapse a run of queued `SetFilter` commands into the last one.
///
/// Returns the command to handle now and the first queued non-filter command, if one
/// ended the run.
fn latest_filter(
    first: CatalogCommand,
    rx: &mut Receiver<CatalogCommand>,
) -> (CatalogCommand, Option<CatalogCommand>) {
    if !matches!(first, CatalogCommand::SetFilter { .. }) {
        return (first, None);
    }
    let mut latest = first;
    while let Ok(next) = rx.try_recv() {
        if matches!(next, CatalogCommand::SetFilter { .. }) {
            latest = next;
        } else {
            return (latest, Some(next));
        }
    }
    (latest, None)
}

struct WorkerState {
    store: RecordStore,
    filter: FilterState,
}

impl WorkerState {
    fn new(store: RecordStore, filter: FilterState) -> Self {
        Self { store, filter }
    }

    fn handle_command(&mut self, cmd: CatalogCommand) -> HandlerOutcome {
        match cmd {
            CatalogCommand::SetFilter {
                request_id,
                query,
                conferences,
            } => match self.set_filter(query, conferences) {
                Ok(()) => self.respond_view(request_id),
                Err(error) => HandlerOutcome::respond(CatalogResponse::Error { request_id, error }),
            },
            CatalogCommand::LoadMore { request_id } => {
                self.filter.load_more();
                self.respond_view(request_id)
            }
            CatalogCommand::Refresh { request_id } => self.respond_view(request_id),
            CatalogCommand::Shutdown => HandlerOutcome::exit(),
        }
    }

    fn set_filter(&mut self, query: String, conferences: BTreeSet<ConferenceId>) -> Result<()> {
        validate_query(&query)?;
        let query_changed = self.filter.set_query(query);
        let conferences_changed = self.filter.set_conferences(conferences);
        if query_changed || conferences_changed {
            log::debug!(
                "filter changed: query={:?} conferences={}",
                self.filter.query(),
                self.filter.conferences().len()
            );
        }
        Ok(())
    }

    fn respond_view(&self, request_id: RequestId) -> HandlerOutcome {
        HandlerOutcome::respond(CatalogResponse::ViewLoaded {
            request_id,
            view: self.snapshot(),
        })
    }

    fn snapshot(&self) -> ViewSnapshot {
        let records = self.store.snapshot();
        let view = self.filter.apply(&records);
        ViewSnapshot {
            rows: view.visible,
            total_matches: view.total,
            visible_count: self.filter.visible_count(),
            catalog_size: records.len(),
            conference_counts: conference_counts(&records),
        }
    }
}

struct HandlerOutcome {
    response: Option<CatalogResponse>,
    done: bool,
}

impl HandlerOutcome {
    fn respond(response: CatalogResponse) -> Self {
        Self {
            response: Some(response),
            done: false,
        }
    }

    fn exit() -> Self {
        Self {
            response: None,
            done: true,
        }
    }
}
