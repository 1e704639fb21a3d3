//! Renderer seam between the render loop and the terminal.

use crate::error::Result;
use crate::render::ui::state::ViewState;

/// Draws view states and owns the terminal's lifecycle.
pub trait UIRenderer {
    /// Draw the sidebar, search bar, result list, detail pane and status line for
    /// `view_state`.
    fn render(&mut self, view_state: &ViewState) -> Result<()>;

    /// Enter raw mode and the alternate screen, and capture the mouse for wheel scrolling.
    fn initialize(&mut self) -> Result<()>;

    /// Restore the terminal. Safe to call more than once.
    fn cleanup(&mut self) -> Result<()>;

    /// (width, height) in cells
    fn get_terminal_size(&self) -> Result<(u16, u16)>;
}
