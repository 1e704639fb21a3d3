//! Low-level input collection: crossterm polling and mouse-wheel batching.
//!
//! Wheel ticks arrive in bursts; moving the selection once per tick makes the list
//! stutter, so consecutive ticks in the same direction are merged into one scroll event
//! until the burst goes quiet.

use crate::error::Result;
use ratatui::crossterm::event::{self, Event, KeyEvent, MouseEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Quiet period after which a wheel burst is emitted.
const WHEEL_BURST_WINDOW_MS: u64 = 12;
/// Rows moved by a single wheel tick.
const ROWS_PER_WHEEL_TICK: u64 = 3;
/// Poll timeout used when the caller does not provide one.
const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Events surfaced by the collector.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Scroll { direction: ScrollDirection, rows: u64 },
}

/// Accumulates wheel ticks of one direction.
#[derive(Debug, Clone)]
pub struct WheelBurst {
    window: Duration,
    current: Option<(ScrollDirection, u64, Instant)>,
}

impl WheelBurst {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            current: None,
        }
    }

    /// Add `rows` in `direction`. A direction change closes the running burst and
    /// returns it.
    pub fn add(
        &mut self,
        direction: ScrollDirection,
        rows: u64,
        now: Instant,
    ) -> Option<RawInputEvent> {
        if let Some((dir, total, last)) = &mut self.current {
            if *dir == direction {
                *total = total.saturating_add(rows);
                *last = now;
                return None;
            }
        }
        let closed = self.take();
        self.current = Some((direction, rows, now));
        closed
    }

    /// Emit the burst once it has been quiet for the whole window.
    pub fn take_if_quiet(&mut self, now: Instant) -> Option<RawInputEvent> {
        match self.current {
            Some((_, _, last)) if now.duration_since(last) >= self.window => self.take(),
            _ => None,
        }
    }

    /// Emit the burst immediately.
    pub fn take(&mut self) -> Option<RawInputEvent> {
        self.current
            .take()
            .map(|(direction, rows, _)| RawInputEvent::Scroll { direction, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// Polls crossterm and queues events in arrival order, with wheel bursts merged.
#[derive(Debug)]
pub struct RawInputCollector {
    wheel: WheelBurst,
    queue: VecDeque<RawInputEvent>,
}

impl RawInputCollector {
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(WHEEL_BURST_WINDOW_MS))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            wheel: WheelBurst::new(window),
            queue: VecDeque::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.wheel.is_empty()
    }

    /// Feed an event without polling the terminal.
    pub fn push_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                self.close_burst();
                self.queue.push_back(RawInputEvent::Key(key));
            }
            Event::Resize(width, height) => {
                self.close_burst();
                self.queue.push_back(RawInputEvent::Resize { width, height });
            }
            Event::Mouse(mouse) => {
                let direction = match mouse.kind {
                    MouseEventKind::ScrollUp => ScrollDirection::Up,
                    MouseEventKind::ScrollDown => ScrollDirection::Down,
                    _ => return,
                };
                if let Some(closed) = self.wheel.add(direction, ROWS_PER_WHEEL_TICK, Instant::now())
                {
                    self.queue.push_back(closed);
                }
            }
            _ => {}
        }
    }

    /// Next ready event, if any, without blocking.
    pub fn next_ready(&mut self) -> Option<RawInputEvent> {
        if let Some(event) = self.queue.pop_front() {
            return Some(event);
        }
        self.wheel.take_if_quiet(Instant::now())
    }

    /// Next event, waiting up to `timeout` for terminal input.
    pub fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        if let Some(event) = self.next_ready() {
            return Ok(Some(event));
        }

        let timeout = timeout.unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS));
        if event::poll(timeout)? {
            let event = event::read()?;
            self.push_event(event);
        }
        Ok(self.next_ready())
    }

    fn close_burst(&mut self) {
        if let Some(burst) = self.wheel.take() {
            self.queue.push_back(burst);
        }
    }
}

impl Default for RawInputCollector {
    fn default() -> Self {
        Self::new()
    }
}
