//! High-level input service.
//!
//! Consumes raw events, runs the screener's input state machine, and yields
//! domain-level `InputAction`s that the render coordinator consumes.

use crate::error::Result;
use crate::input::raw::{RawInputCollector, RawInputEvent};
pub use crate::input::raw::ScrollDirection;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Current input mode: list navigation or editing the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Navigation,
    QueryInput,
}

/// High-level input actions emitted by the state machine/service.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Scroll {
        direction: ScrollDirection,
        rows: u64,
    },
    PageUp,
    PageDown,
    GoToStart,
    GoToEnd,
    Quit,
    /// Focus the search bar
    StartQuery,
    /// The query text changed; carries the full new text
    UpdateQuery(String),
    /// Leave the search bar, keeping the query
    FinishQuery,
    /// Toggle the conference at this zero-based sidebar position
    ToggleConference(usize),
    ClearConferences,
    /// Switch the selected record between markup and rendered math
    ToggleRendering,
    /// Show the shareable filter string and the selected paper's link
    ShowShareLink,
    Resize {
        width: u16,
        height: u16,
    },
    NoAction,
    InvalidInput,
}

/// Key-binding state machine.
///
/// The query buffer persists across modes: re-entering the search bar continues editing
/// the active query.
pub struct InputStateMachine {
    state: InputState,
    query: String,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self::with_query(String::new())
    }

    /// Start with an existing query, e.g. one passed on the command line.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            state: InputState::Navigation,
            query: query.into(),
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputAction {
        if key_event.kind != KeyEventKind::Press {
            return InputAction::NoAction;
        }

        let plain = !key_event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match (self.state, key_event.code) {
            (_, KeyCode::Char('c')) if key_event.modifiers == KeyModifiers::CONTROL => {
                InputAction::Quit
            }

            (InputState::QueryInput, KeyCode::Char('u'))
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                self.query.clear();
                InputAction::UpdateQuery(String::new())
            }
            (InputState::QueryInput, KeyCode::Char(ch)) if plain => {
                self.query.push(ch);
                InputAction::UpdateQuery(self.query.clone())
            }
            (InputState::QueryInput, KeyCode::Backspace) => {
                if self.query.pop().is_some() {
                    InputAction::UpdateQuery(self.query.clone())
                } else {
                    InputAction::NoAction
                }
            }
            (InputState::QueryInput, KeyCode::Enter | KeyCode::Esc) => {
                self.state = InputState::Navigation;
                InputAction::FinishQuery
            }

            (InputState::Navigation, KeyCode::Char('j') | KeyCode::Down) if plain => {
                InputAction::Scroll {
                    direction: ScrollDirection::Down,
                    rows: 1,
                }
            }
            (InputState::Navigation, KeyCode::Char('k') | KeyCode::Up) if plain => {
                InputAction::Scroll {
                    direction: ScrollDirection::Up,
                    rows: 1,
                }
            }
            (InputState::Navigation, KeyCode::Char(' ') | KeyCode::Char('f') | KeyCode::PageDown)
                if plain =>
            {
                InputAction::PageDown
            }
            (InputState::Navigation, KeyCode::Char('b') | KeyCode::PageUp) if plain => {
                InputAction::PageUp
            }
            (InputState::Navigation, KeyCode::Char('g') | KeyCode::Home) if plain => {
                InputAction::GoToStart
            }
            (InputState::Navigation, KeyCode::Char('G') | KeyCode::End) if plain => {
                InputAction::GoToEnd
            }
            (InputState::Navigation, KeyCode::Char('q')) if plain => InputAction::Quit,
            (InputState::Navigation, KeyCode::Char('/')) if plain => {
                self.state = InputState::QueryInput;
                InputAction::StartQuery
            }
            (InputState::Navigation, KeyCode::Esc) => {
                if self.query.is_empty() {
                    InputAction::NoAction
                } else {
                    self.query.clear();
                    InputAction::UpdateQuery(String::new())
                }
            }
            (InputState::Navigation, KeyCode::Char(digit @ '1'..='9')) if plain => {
                InputAction::ToggleConference(digit as usize - '1' as usize)
            }
            (InputState::Navigation, KeyCode::Char('0')) if plain => InputAction::ClearConferences,
            (InputState::Navigation, KeyCode::Char('m') | KeyCode::Enter) if plain => {
                InputAction::ToggleRendering
            }
            (InputState::Navigation, KeyCode::Char('y')) if plain => InputAction::ShowShareLink,

            _ => InputAction::InvalidInput,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> InputState {
        self.state
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Service responsible for producing high-level `InputAction`s from terminal events.
pub struct InputService {
    state_machine: InputStateMachine,
    raw_input: RawInputCollector,
}

impl InputService {
    pub fn new(state_machine: InputStateMachine) -> Self {
        Self {
            state_machine,
            raw_input: RawInputCollector::new(),
        }
    }

    /// Poll the terminal and drain every event that is ready.
    pub fn poll_actions(&mut self, timeout: Option<Duration>) -> Result<Vec<InputAction>> {
        let mut actions = Vec::new();

        if let Some(raw_event) = self.raw_input.poll_event(timeout)? {
            actions.extend(self.translate(raw_event));
            while let Some(extra) = self.raw_input.next_ready() {
                actions.extend(self.translate(extra));
            }
        }

        Ok(actions)
    }

    /// Feed a synthetic event and drain everything that became ready.
    pub fn process_event(&mut self, event: Event) -> Vec<InputAction> {
        self.raw_input.push_event(event);
        let mut actions = Vec::new();
        while let Some(raw_event) = self.raw_input.next_ready() {
            actions.extend(self.translate(raw_event));
        }
        actions
    }

    fn translate(&mut self, event: RawInputEvent) -> Option<InputAction> {
        let action = match event {
            RawInputEvent::Key(key_event) => self.state_machine.handle_key_event(key_event),
            RawInputEvent::Resize { width, height } => InputAction::Resize { width, height },
            RawInputEvent::Scroll { direction, rows } => InputAction::Scroll { direction, rows },
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}
