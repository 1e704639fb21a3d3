//! Application orchestration layer
//!
//! Wires the catalog loader, the catalog worker, the input thread and the renderer
//! together and runs the render loop.

pub mod runtime;

use crate::catalog::{load_catalog, LoadStatus, RecordStore, SourceOutcome};
use crate::config::ScreenerConfig;
use crate::error::{Result, ScreenerError};
use crate::input::InputAction;
use crate::render::protocol::{CatalogCommand, RequestIds};
use crate::render::typeset::{TexTypesetter, TypesetCache};
use crate::render::ui::{UIRenderer, ViewState};
use crate::render::RenderLoopState;
use crate::search::query_string::SharedFilter;
use crate::search::{
    catalog_worker_loop, observe_sentinel, validate_query, FilterState, FilteredView,
};
use runtime::spawn_input_thread;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const INPUT_POLL_INTERVAL_MS: u64 = 25;
const TYPESET_CACHE_CAPACITY: usize = 256;

/// Application orchestrator
pub struct Application {
    config: ScreenerConfig,
    initial_filter: SharedFilter,
    ui_renderer: Box<dyn UIRenderer>,
}

impl Application {
    pub fn new(
        config: ScreenerConfig,
        initial_filter: SharedFilter,
        ui_renderer: Box<dyn UIRenderer>,
    ) -> Self {
        Self {
            config,
            initial_filter,
            ui_renderer,
        }
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        self.ui_renderer.initialize()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let input_handle = spawn_input_thread(
            input_tx,
            Arc::clone(&shutdown),
            Duration::from_millis(INPUT_POLL_INTERVAL_MS),
            self.initial_filter.query.clone(),
        );

        let result = self.run_with_input(input_rx).await;

        shutdown.store(true, Ordering::SeqCst);
        let cleanup = self.ui_renderer.cleanup();
        if input_handle.join().is_err() {
            log::warn!("input thread panicked");
        }

        result.and(cleanup)
    }

    /// Load the catalog and drive the render loop from `input_rx` until a `Quit` action.
    ///
    /// The renderer must already be initialized.
    pub async fn run_with_input(
        &mut self,
        mut input_rx: mpsc::UnboundedReceiver<InputAction>,
    ) -> Result<()> {
        let filter = initial_filter_state(&self.config, &self.initial_filter)?;
        let sources = self.config.build_sources()?;
        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let store = RecordStore::new();
        let mut loader = tokio::spawn(load_catalog(sources, store.clone()));

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        // Unbounded: the worker must never wait on this loop
        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(catalog_worker_loop(
            command_rx,
            response_tx,
            store,
            filter,
        ));

        let request_ids = RequestIds::default();
        let (sentinel_tx, sentinel_rx) = watch::channel(false);
        let mut sentinel = observe_sentinel(sentinel_rx, command_tx.clone(), request_ids.clone());

        let mut view_state = ViewState::new(width, height)
            .with_conferences(self.config.conferences())
            .with_filter(
                &self.initial_filter.query,
                self.initial_filter.conferences.clone(),
            );

        let typesetter = self
            .config
            .math_rendering
            .then(|| TypesetCache::new(Box::new(TexTypesetter), TYPESET_CACHE_CAPACITY));
        let mut render_state = RenderLoopState::new(request_ids.clone(), typesetter);

        let result = async {
            command_tx
                .send(CatalogCommand::Refresh {
                    request_id: request_ids.next(),
                })
                .await
                .map_err(|_| ScreenerError::other("catalog worker unavailable"))?;
            self.ui_renderer.render(&view_state)?;

            let mut loading = true;
            loop {
                tokio::select! {
                    Some(action) = input_rx.recv() => {
                        if !render_state
                            .process_action(action, &mut view_state, &command_tx)
                            .await?
                        {
                            break;
                        }
                    }
                    Some(response) = response_rx.recv() => {
                        render_state.handle_response(response, &mut view_state);
                    }
                    outcomes = &mut loader, if loading => {
                        loading = false;
                        match outcomes {
                            Ok(outcomes) => {
                                if let Some(summary) = failure_summary(&outcomes) {
                                    view_state.status_line.set_message(summary);
                                }
                            }
                            Err(err) => log::error!("catalog loader crashed: {}", err),
                        }
                    }
                    else => break,
                }

                render_state
                    .publish_sentinel(&view_state, &sentinel_tx, &command_tx)
                    .await?;
                self.ui_renderer.render(&view_state)?;
            }
            Ok::<(), ScreenerError>(())
        }
        .await;

        sentinel.unsubscribe();
        let _ = command_tx.send(CatalogCommand::Shutdown).await;
        drop(command_tx);
        if let Err(err) = worker.await {
            log::warn!("catalog worker ended abnormally: {}", err);
        }
        loader.abort();

        result
    }
}

/// Filter state seeded from the command line and configuration.
///
/// The query follows the same single-line rule the catalog worker enforces.
pub fn initial_filter_state(
    config: &ScreenerConfig,
    filter: &SharedFilter,
) -> Result<FilterState> {
    validate_query(&filter.query)?;
    let mut state = FilterState::new(config.page_size);
    state.set_query(filter.query.clone());
    state.set_conferences(filter.conferences.clone());
    Ok(state)
}

/// Load every configured source and return the first page of the filtered catalog.
///
/// Used for non-interactive listing.
pub async fn load_first_page(
    config: &ScreenerConfig,
    filter: &SharedFilter,
) -> Result<(Vec<SourceOutcome>, FilteredView)> {
    let state = initial_filter_state(config, filter)?;
    let store = RecordStore::new();
    let outcomes = load_catalog(config.build_sources()?, store.clone()).await;
    let view = state.apply(&store.snapshot());
    Ok((outcomes, view))
}

/// Status message naming the sources that failed to load, if any.
pub fn failure_summary(outcomes: &[SourceOutcome]) -> Option<String> {
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|outcome| matches!(outcome.status, LoadStatus::Failed(_)))
        .map(|outcome| outcome.conference.as_str())
        .collect();
    if failed.is_empty() {
        None
    } else {
        Some(format!("failed to load: {}", failed.join(", ")))
    }
}
