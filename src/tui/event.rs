//! TUI event loop messages.
//!
//! The runner multiplexes:
//! - crossterm keyboard events (from a blocking reader task)
//! - form session events (notification timers, finished generations)
//! - render interval (~30fps, draws a frame)
//!
//! Everything is applied to the model as a TuiMessage, one at a time.

use crossterm::event::KeyEvent;

use crate::form::FormEvent;

/// Messages that drive the TUI update loop.
#[derive(Debug)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// Form session event (timer fired, generation finished, ...).
    Form(FormEvent),
    /// Render: draw a frame.
    Render,
    /// Quit the TUI.
    Quit,
}
