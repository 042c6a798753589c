//! TuiApp: the TEA model.
//!
//! Owns the `FormSession` plus purely presentational state (focus, icon
//! cursors, scroll). Update receives TuiMessages and turns key presses into
//! `FormEvent`s; the session is the only thing that changes form state.

use crate::catalog::{self, Role};
use crate::form::{FormEvent, FormSession};

use super::event::TuiMessage;

/// Which widget has keyboard focus, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SourceDropdown,
    SourceIcons,
    DestinationDropdown,
    DestinationIcons,
    Prompt,
    MicIcon,
    SearchIcon,
    EnterButton,
}

const TAB_ORDER: [Focus; 8] = [
    Focus::SourceDropdown,
    Focus::SourceIcons,
    Focus::DestinationDropdown,
    Focus::DestinationIcons,
    Focus::Prompt,
    Focus::MicIcon,
    Focus::SearchIcon,
    Focus::EnterButton,
];

impl Focus {
    fn is_destination(self) -> bool {
        matches!(self, Focus::DestinationDropdown | Focus::DestinationIcons)
    }

    fn position(self) -> usize {
        TAB_ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next focusable widget, skipping destination inputs when gated.
    pub fn next(self, destination_enabled: bool) -> Self {
        self.step(destination_enabled, 1)
    }

    /// Previous focusable widget, skipping destination inputs when gated.
    pub fn prev(self, destination_enabled: bool) -> Self {
        self.step(destination_enabled, TAB_ORDER.len() - 1)
    }

    fn step(self, destination_enabled: bool, by: usize) -> Self {
        let mut i = self.position();
        loop {
            i = (i + by) % TAB_ORDER.len();
            let candidate = TAB_ORDER[i];
            if destination_enabled || !candidate.is_destination() {
                return candidate;
            }
        }
    }
}

/// The main TUI application state (TEA model).
pub struct TuiApp {
    pub session: FormSession,
    pub focus: Focus,
    /// Cursor within the source icon row.
    pub source_cursor: usize,
    /// Cursor within the destination icon row.
    pub destination_cursor: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Scroll offset for the output pane.
    pub output_scroll: u16,
}

impl TuiApp {
    pub fn new(session: FormSession) -> Self {
        Self {
            session,
            focus: Focus::SourceDropdown,
            source_cursor: 0,
            destination_cursor: 0,
            should_quit: false,
            output_scroll: 0,
        }
    }

    /// Handle a TUI message (TEA update).
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => {
                super::input::handle_key(self, key);
            }
            TuiMessage::Form(event) => self.dispatch(event),
            TuiMessage::Render => {
                // Render handled externally by runner
            }
            TuiMessage::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// Apply a form event and keep focus off gated widgets.
    pub fn dispatch(&mut self, event: FormEvent) {
        let finished = matches!(event, FormEvent::GenerationFinished { .. });
        self.session.handle(event);
        if finished {
            self.output_scroll = 0;
        }
        if self.focus.is_destination() && !self.destination_enabled() {
            self.focus = Focus::SourceDropdown;
        }
    }

    pub fn destination_enabled(&self) -> bool {
        self.session.availability().enabled
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next(self.destination_enabled());
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev(self.destination_enabled());
    }

    pub fn cursor(&self, role: Role) -> usize {
        match role {
            Role::Source => self.source_cursor,
            Role::Destination => self.destination_cursor,
        }
    }

    /// Move the icon cursor of `role` by `delta`, clamped to the row.
    pub fn move_cursor(&mut self, role: Role, delta: isize) {
        let len = self.session.inputs().icons(role).icons.len();
        let current = self.cursor(role);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            (current + delta as usize).min(len.saturating_sub(1))
        };
        match role {
            Role::Source => self.source_cursor = next,
            Role::Destination => self.destination_cursor = next,
        }
    }

    /// Step the dropdown of `role` through `["", keys...]`, clamped.
    pub fn step_dropdown(&mut self, role: Role, forward: bool) {
        let options = catalog::identifiers(role);
        let current = self
            .session
            .inputs()
            .dropdown(role)
            .value
            .and_then(|id| options.iter().position(|o| *o == id))
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = if forward {
            (current + 1).min(options.len())
        } else {
            current.saturating_sub(1)
        };
        if next == current {
            return;
        }
        let value = match next {
            0 => String::new(),
            n => options[n - 1].key().to_string(),
        };
        self.dispatch(FormEvent::DropdownChanged { role, value });
    }

    /// Click the icon under the cursor of `role`.
    pub fn click_icon_at_cursor(&mut self, role: Role) {
        let row = self.session.inputs().icons(role);
        let Some(icon) = row.icons.get(self.cursor(role)) else {
            return;
        };
        let label = icon.label.clone();
        self.dispatch(FormEvent::IconClicked { role, label });
    }

    pub fn push_prompt_char(&mut self, c: char) {
        let mut text = self.session.prompt().to_string();
        text.push(c);
        self.dispatch(FormEvent::PromptEdited(text));
    }

    pub fn pop_prompt_char(&mut self) {
        let mut text = self.session.prompt().to_string();
        if text.pop().is_some() {
            self.dispatch(FormEvent::PromptEdited(text));
        }
    }

    /// Dismiss the newest visible notification, if any.
    pub fn dismiss_newest(&mut self) {
        if let Some(id) = self.session.notifications().newest_visible() {
            self.dispatch(FormEvent::CloseNotification(id));
        }
    }

    pub fn scroll_output_down(&mut self) {
        self.output_scroll = self.output_scroll.saturating_add(1);
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }
}
