//! The request form as a ratatui terminal UI.
//!
//! ## Architecture (TEA)
//!
//! Model (`TuiApp`) + Update (message handler) + View (render).
//! Immediate mode: every frame is drawn from the `FormSession` the model
//! owns. Keys become `FormEvent`s; timers and finished generations come
//! back through the session queue and are applied on the same loop, so
//! the form is only ever touched from one place.

pub mod app;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
pub mod theme;
