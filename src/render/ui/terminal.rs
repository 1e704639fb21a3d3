//! Terminal UI implementation using ratatui
//!
//! Draws the screener: search bar on top, conference sidebar and result list in the
//! middle, the selected paper's details below, and the status line at the bottom.

use crate::error::{Result, ScreenerError};
use crate::render::ui::state::{
    DisplayMode, DisplayState, TextField, ViewState, HEADER_HEIGHT, SEARCH_BAR_HEIGHT,
    SIDEBAR_WIDTH, STATUS_LINE_HEIGHT,
};
use crate::render::ui::{ColorTheme, UIRenderer};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const LOADING_ROW: &str = "Loading...";

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    pub fn new() -> Result<Self> {
        Self::with_theme(ColorTheme::default())
    }

    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }
}

/// Draw one frame.
pub fn draw_frame(frame: &mut Frame, view_state: &ViewState, theme: &ColorTheme) {
    let size = frame.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(view_state.detail_height()),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[1]);

    let list = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
        .split(body[1]);

    render_search_bar(frame, rows[0], view_state, theme);
    render_sidebar(frame, body[0], view_state, theme);
    render_header(frame, list[0], theme);
    render_results(frame, list[1], view_state, theme);
    render_details(frame, rows[2], view_state, theme);
    render_status(frame, rows[3], view_state, theme);
}

fn field_spans<'a>(state: DisplayState<'a>, theme: &ColorTheme) -> Vec<Span<'a>> {
    match state {
        DisplayState::Plain(text) => vec![Span::styled(text, theme.text())],
        DisplayState::Highlighted(spans) => spans
            .into_iter()
            .map(|span| {
                let style = if span.is_match() {
                    theme.search_match
                } else {
                    theme.text()
                };
                Span::styled(span.text, style)
            })
            .collect(),
        DisplayState::Rendered(text) => vec![Span::styled(text.to_string(), theme.text())],
    }
}

fn render_search_bar(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let muted = Style::default().fg(theme.muted);
    let line = if view_state.editing_query {
        Line::from(vec![
            Span::styled("Search: ", theme.header),
            Span::styled(view_state.query.as_str(), theme.text()),
            Span::styled("_", muted),
        ])
    } else if view_state.query.is_empty() {
        Line::from(Span::styled("Press / to search titles and abstracts", muted))
    } else {
        Line::from(vec![
            Span::styled("Search: ", theme.header),
            Span::styled(view_state.query.as_str(), theme.text()),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let muted = Style::default().fg(theme.muted);
    let mut lines: Vec<Line> = view_state
        .conferences
        .iter()
        .enumerate()
        .map(|(index, conference)| {
            let key = if index < 9 {
                (index + 1).to_string()
            } else {
                " ".to_string()
            };
            let active = view_state.selected_conferences.contains(conference);
            let mark = if active { "[x]" } else { "[ ]" };
            let count = view_state
                .conference_counts
                .get(conference)
                .copied()
                .unwrap_or(0);
            let style = if active {
                theme.active_conference
            } else {
                theme.text()
            };
            Line::from(vec![
                Span::styled(format!("{} {} ", key, mark), style),
                Span::styled(conference.label(), style),
                Span::styled(format!(" ({})", count), muted),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("0 all ({})", view_state.catalog_size),
        muted,
    )));

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Conferences"),
    );
    frame.render_widget(sidebar, area);
}

fn render_header(frame: &mut Frame, area: Rect, theme: &ColorTheme) {
    let header = format!(
        "{:>4} {:>6} {:<10} {}",
        "#", "Rating", "Conference", "Title | Abstract"
    );
    frame.render_widget(Paragraph::new(header).style(theme.header), area);
}

fn render_results(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let muted = Style::default().fg(theme.muted);
    let height = area.height as usize;
    let start = view_state.scroll_top.min(view_state.rows.len());
    let end = (start + height).min(view_state.rows.len());

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (offset, record) in view_state.rows[start..end].iter().enumerate() {
        let index = start + offset;
        let mut spans = vec![Span::styled(
            format!(
                "{:>4} {:>6} {:<10} ",
                index + 1,
                record.display_rating(),
                record.conference.label()
            ),
            theme.text(),
        )];
        spans.extend(field_spans(
            view_state.display_state(record, TextField::Title),
            theme,
        ));
        spans.push(Span::styled(" | ", muted));
        spans.extend(field_spans(
            view_state.display_state(record, TextField::Abstract),
            theme,
        ));

        let mut line = Line::from(spans);
        if index == view_state.selected {
            line = line.style(theme.selection);
        }
        lines.push(line);
    }

    if lines.len() < height {
        if view_state.has_more() {
            lines.push(Line::from(Span::styled(LOADING_ROW, muted)));
        } else if view_state.rows.is_empty() {
            let message = if view_state.catalog_size == 0 {
                "Loading catalog..."
            } else {
                "No papers match the current filter"
            };
            lines.push(Line::from(Span::styled(message, muted)));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_details(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let block = Block::default().borders(Borders::TOP).title("Paper");
    let Some(record) = view_state.selected_record() else {
        frame.render_widget(block, area);
        return;
    };

    let muted = Style::default().fg(theme.muted);
    let title_style = theme.text().add_modifier(Modifier::BOLD);
    let title: Vec<Span> = field_spans(view_state.display_state(record, TextField::Title), theme)
        .into_iter()
        .map(|span| span.patch_style(title_style))
        .collect();

    let mode = match view_state.display_mode(record) {
        DisplayMode::Markup => "m: render math",
        DisplayMode::Rendered => "m: show markup",
    };

    let lines = vec![
        Line::from(title),
        Line::from(field_spans(
            view_state.display_state(record, TextField::Abstract),
            theme,
        )),
        Line::from(vec![
            Span::styled(record.link(), muted),
            Span::styled(format!("  [{}]", mode), muted),
        ]),
    ];

    let details = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(details, area);
}

fn render_status(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
    let status = Paragraph::new(view_state.format_status_line()).style(status_style);
    frame.render_widget(status, area);
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            let theme = &self.theme;
            terminal
                .draw(|frame| draw_frame(frame, view_state, theme))
                .map_err(ui_error("draw"))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode().map_err(ui_error("enable raw mode"))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(ui_error("enter alternate screen"))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(ui_error("open terminal"))?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode().map_err(ui_error("disable raw mode"))?;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
                .map_err(ui_error("leave alternate screen"))?;
            self.terminal = None;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) =
            ratatui::crossterm::terminal::size().map_err(ui_error("query terminal size"))?;
        Ok((cols, rows))
    }
}

/// Terminal failures are UI errors, not source read errors.
fn ui_error(action: &'static str) -> impl FnOnce(io::Error) -> ScreenerError {
    move |err| ScreenerError::ui(format!("{}: {}", action, err))
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConferenceId, ExternalIds, PaperRecord};
    use crate::render::protocol::ViewSnapshot;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample_state(rows: usize, total: usize) -> ViewState {
        let conference = ConferenceId::new("iclr2026");
        let records = (0..rows)
            .map(|i| {
                Arc::new(PaperRecord::new(
                    format!("id{}", i),
                    format!("Deep Nets {}", i),
                    "We study deep networks",
                    6.5,
                    conference.clone(),
                    ExternalIds {
                        arxiv: Some("2401.00001".to_string()),
                        openreview: None,
                    },
                ))
            })
            .collect();

        let mut state = ViewState::new(100, 24).with_conferences(vec![conference.clone()]);
        state.apply_view(ViewSnapshot {
            rows: records,
            total_matches: total,
            visible_count: rows,
            catalog_size: total,
            conference_counts: HashMap::from([(conference, total)]),
        });
        state
    }

    #[test]
    fn test_terminal_ui_creation() {
        let ui = TerminalUI::new().unwrap();
        assert!(ui.terminal.is_none());
        assert_eq!(ui.theme.status_bg, Color::Blue);

        let ui = TerminalUI::with_theme(ColorTheme::monochrome()).unwrap();
        assert_eq!(ui.theme.status_bg, Color::Black);
    }

    #[test]
    fn test_frame_shows_results_and_sidebar() {
        let state = sample_state(3, 3);
        let theme = ColorTheme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| draw_frame(frame, &state, &theme))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Conferences"));
        assert!(text.contains("1 [ ] ICLR 2026 (3)"));
        assert!(text.contains("Deep Nets 0"));
        assert!(text.contains("6.50"));
        assert!(text.contains("https://arxiv.org/abs/2401.00001"));
        assert!(text.contains("3 papers"));
        assert!(!text.contains(LOADING_ROW));
    }

    #[test]
    fn test_loading_row_when_more_results_exist() {
        let state = sample_state(2, 10);
        let theme = ColorTheme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| draw_frame(frame, &state, &theme))
            .unwrap();

        assert!(screen_text(&terminal).contains(LOADING_ROW));
    }

    #[test]
    fn test_match_spans_use_highlight_style() {
        let mut state = sample_state(1, 1);
        state.set_query("nets");
        let theme = ColorTheme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| draw_frame(frame, &state, &theme))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let highlighted: String = buffer
            .content
            .iter()
            .filter(|cell| cell.bg == Color::Yellow)
            .map(|cell| cell.symbol())
            .collect();
        assert!(highlighted.contains("Nets"));
    }

    #[test]
    fn test_empty_catalog_message() {
        let state = ViewState::new(100, 24);
        let theme = ColorTheme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| draw_frame(frame, &state, &theme))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Loading catalog..."));
        assert!(text.contains("Press / to search"));
    }

    #[test]
    fn test_terminal_failures_are_ui_errors() {
        let err = ui_error("draw")(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(matches!(err, ScreenerError::UIError { .. }));
        assert_eq!(err.to_string(), "Terminal error: draw: pipe closed");
    }
}
