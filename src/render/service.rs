//! Render coordination helpers.
//!
//! Provides the state machine that mediates between input actions, catalog worker commands,
//! and view updates. The loop itself lives in `Application::run`.

use crate::error::{Result, ScreenerError};
use crate::input::{InputAction, ScrollDirection};
use crate::render::protocol::{CatalogCommand, CatalogResponse, RequestIds};
use crate::render::typeset::TypesetCache;
use crate::render::ui::state::{record_key, RenderedText};
use crate::render::ui::ViewState;
use crate::search::query_string;
use tokio::sync::{mpsc, watch};

/// Tracks render-related state that must persist across input actions and worker responses.
pub struct RenderLoopState {
    request_ids: RequestIds,
    /// `None` when math rendering is disabled
    typesetter: Option<TypesetCache>,
    /// Row count when the sentinel was last seen on screen
    rows_at_sentinel: usize,
}

impl RenderLoopState {
    pub fn new(request_ids: RequestIds, typesetter: Option<TypesetCache>) -> Self {
        Self {
            request_ids,
            typesetter,
            rows_at_sentinel: 0,
        }
    }

    /// Apply one input action. Returns `Ok(false)` when the application should quit.
    pub async fn process_action(
        &mut self,
        action: InputAction,
        view_state: &mut ViewState,
        commands: &mpsc::Sender<CatalogCommand>,
    ) -> Result<bool> {
        match action {
            InputAction::Quit => return Ok(false),
            InputAction::Scroll { direction, rows } => {
                let rows = i64::try_from(rows).unwrap_or(i64::MAX);
                match direction {
                    ScrollDirection::Up => view_state.move_selection(-rows),
                    ScrollDirection::Down => view_state.move_selection(rows),
                }
            }
            InputAction::PageUp => view_state.page_up(),
            InputAction::PageDown => view_state.page_down(),
            InputAction::GoToStart => view_state.go_to_start(),
            InputAction::GoToEnd => view_state.go_to_end(),
            InputAction::StartQuery => {
                view_state.editing_query = true;
                view_state.status_line.clear_message();
            }
            InputAction::UpdateQuery(query) => {
                if view_state.set_query(&query) {
                    self.send_filter(view_state, commands).await?;
                }
            }
            InputAction::FinishQuery => view_state.editing_query = false,
            InputAction::ToggleConference(index) => {
                if view_state.toggle_conference(index).is_some() {
                    self.send_filter(view_state, commands).await?;
                } else {
                    view_state
                        .status_line
                        .set_message(format!("No conference at position {}", index + 1));
                }
            }
            InputAction::ClearConferences => {
                if view_state.clear_conferences() {
                    self.send_filter(view_state, commands).await?;
                }
            }
            InputAction::ToggleRendering => self.toggle_rendering(view_state),
            InputAction::ShowShareLink => {
                let message = share_message(view_state);
                view_state.status_line.set_message(message);
            }
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
            }
            InputAction::NoAction | InputAction::InvalidInput => {}
        }
        Ok(true)
    }

    pub fn handle_response(&mut self, response: CatalogResponse, view_state: &mut ViewState) {
        match response {
            CatalogResponse::ViewLoaded { view, .. } | CatalogResponse::CatalogUpdated { view } => {
                view_state.apply_view(view);
            }
            CatalogResponse::Error { request_id, error } => {
                log::warn!("catalog request {} failed: {}", request_id, error);
                view_state
                    .status_line
                    .set_message(format!("Filter rejected: {}", error));
            }
        }
    }

    /// Publish the sentinel's visibility after the view changed.
    ///
    /// The sentinel observer reacts to hidden-to-visible transitions only. When a new page
    /// arrives and the sentinel is still on screen there is no transition, so the next page
    /// is requested here instead.
    pub async fn publish_sentinel(
        &mut self,
        view_state: &ViewState,
        sentinel: &watch::Sender<bool>,
        commands: &mpsc::Sender<CatalogCommand>,
    ) -> Result<()> {
        let visible = view_state.sentinel_visible();
        let mut was_visible = false;
        sentinel.send_if_modified(|current| {
            was_visible = *current;
            if *current == visible {
                false
            } else {
                *current = visible;
                true
            }
        });

        let rows = view_state.rows.len();
        if visible && was_visible && rows > self.rows_at_sentinel {
            send(
                commands,
                CatalogCommand::LoadMore {
                    request_id: self.request_ids.next(),
                },
            )
            .await?;
        }
        if visible {
            self.rows_at_sentinel = rows;
        }
        Ok(())
    }

    async fn send_filter(
        &self,
        view_state: &mut ViewState,
        commands: &mpsc::Sender<CatalogCommand>,
    ) -> Result<()> {
        view_state.status_line.clear_message();
        send(
            commands,
            CatalogCommand::SetFilter {
                request_id: self.request_ids.next(),
                query: view_state.query.clone(),
                conferences: view_state.selected_conferences.clone(),
            },
        )
        .await
    }

    fn toggle_rendering(&mut self, view_state: &mut ViewState) {
        let Some(typesetter) = self.typesetter.as_mut() else {
            view_state
                .status_line
                .set_message("Math rendering is disabled".to_string());
            return;
        };
        let Some(record) = view_state.selected_record().cloned() else {
            return;
        };

        let key = record_key(&record);
        if view_state.rendered.remove(&key).is_none() {
            let rendered = RenderedText {
                title: typesetter.render(&format!("{}#title", key), &record.title),
                abstract_text: typesetter
                    .render(&format!("{}#abstract", key), &record.abstract_text),
            };
            view_state.rendered.insert(key, rendered);
        }
    }
}

async fn send(commands: &mpsc::Sender<CatalogCommand>, command: CatalogCommand) -> Result<()> {
    commands
        .send(command)
        .await
        .map_err(|_| ScreenerError::other("catalog worker unavailable"))
}

/// Shareable filter string plus the selected paper's link.
fn share_message(view_state: &ViewState) -> String {
    let encoded = query_string::encode(&view_state.query, &view_state.selected_conferences);
    let filter = if encoded.is_empty() {
        "filter: (none)".to_string()
    } else {
        format!("filter: ?{}", encoded)
    };
    match view_state.selected_record() {
        Some(record) => format!("{} | {}", filter, record.link()),
        None => filter,
    }
}
