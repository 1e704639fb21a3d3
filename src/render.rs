//! Rendering subsystem: the worker protocol, the render coordinator, math typesetting and
//! the terminal UI.

pub mod protocol;
pub mod service;
pub mod typeset;
pub mod ui;

pub use service::RenderLoopState;
