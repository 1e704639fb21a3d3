//! Growing result window and the sentinel subscription that drives it.
//!
//! The paginator only tracks how many filtered results are visible. The window grows by
//! one page whenever the sentinel row (the row after the last visible record) scrolls into
//! view; the render loop publishes that visibility on a `watch` channel and
//! [`observe_sentinel`] turns rising edges into `LoadMore` commands.

use crate::render::protocol::{CatalogCommand, RequestIds};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Number of records added per pagination step.
pub const PAGE_SIZE: usize = 100;

/// Visible-window size over a filtered result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    visible_count: usize,
}

impl Paginator {
    /// Create a paginator; a zero page size is raised to one.
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            visible_count: page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Grow the window by one page. There is no upper bound; the slice truncates.
    pub fn load_more(&mut self) {
        self.visible_count = self.visible_count.saturating_add(self.page_size);
    }

    /// Start again from the first page.
    pub fn reset(&mut self) {
        self.visible_count = self.page_size;
    }

    /// The visible prefix of `filtered`.
    pub fn window<'a, T>(&self, filtered: &'a [T]) -> &'a [T] {
        &filtered[..self.visible_count.min(filtered.len())]
    }

    /// Whether `total` results extend beyond the current window.
    pub fn has_more(&self, total: usize) -> bool {
        total > self.visible_count
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

/// Handle to a running sentinel observer.
///
/// Dropping the handle detaches the observer. The observer also stops by itself once the
/// visibility publisher is dropped or the worker channel closes.
pub struct SentinelSubscription {
    task: Option<JoinHandle<()>>,
}

impl SentinelSubscription {
    /// Detach the observer now.
    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SentinelSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Send a `LoadMore` command each time the sentinel goes from hidden to visible.
pub fn observe_sentinel(
    mut visibility: watch::Receiver<bool>,
    commands: mpsc::Sender<CatalogCommand>,
    request_ids: RequestIds,
) -> SentinelSubscription {
    let task = tokio::spawn(async move {
        let mut was_visible = *visibility.borrow_and_update();
        while visibility.changed().await.is_ok() {
            let visible = *visibility.borrow_and_update();
            if visible && !was_visible {
                log::debug!("sentinel visible, requesting next page");
                let command = CatalogCommand::LoadMore {
                    request_id: request_ids.next(),
                };
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            was_visible = visible;
        }
    });

    SentinelSubscription { task: Some(task) }
}
