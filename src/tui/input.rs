//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::catalog::Role;
use crate::form::{FormEvent, SubmitTrigger};

use super::app::{Focus, TuiApp};

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut TuiApp, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('d') if ctrl => {
            app.dismiss_newest();
            return;
        }
        KeyCode::Char('s') if ctrl => {
            app.dispatch(FormEvent::Submit(SubmitTrigger::Global));
            return;
        }
        KeyCode::Tab => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return;
        }
        KeyCode::PageDown => {
            app.scroll_output_down();
            return;
        }
        KeyCode::PageUp => {
            app.scroll_output_up();
            return;
        }
        _ => {}
    }

    // Focus-specific bindings
    match app.focus {
        Focus::SourceDropdown => dropdown_key(app, Role::Source, key.code),
        Focus::DestinationDropdown => dropdown_key(app, Role::Destination, key.code),
        Focus::SourceIcons => icon_key(app, Role::Source, key.code),
        Focus::DestinationIcons => icon_key(app, Role::Destination, key.code),
        Focus::Prompt => match key.code {
            KeyCode::Enter => app.dispatch(FormEvent::Submit(SubmitTrigger::PromptEnter)),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Char(c) if !ctrl => app.push_prompt_char(c),
            _ => {}
        },
        Focus::MicIcon => {
            if is_activate(key.code) {
                app.dispatch(FormEvent::VoiceInput);
            }
        }
        Focus::SearchIcon => {
            if is_activate(key.code) {
                app.dispatch(FormEvent::Submit(SubmitTrigger::SearchIcon));
            }
        }
        Focus::EnterButton => {
            if is_activate(key.code) {
                app.dispatch(FormEvent::Submit(SubmitTrigger::EnterButton));
            }
        }
    }
}

fn is_activate(code: KeyCode) -> bool {
    matches!(code, KeyCode::Enter | KeyCode::Char(' '))
}

fn dropdown_key(app: &mut TuiApp, role: Role, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.step_dropdown(role, true),
        KeyCode::Up | KeyCode::Char('k') => app.step_dropdown(role, false),
        KeyCode::Delete | KeyCode::Backspace => app.dispatch(FormEvent::DropdownChanged {
            role,
            value: String::new(),
        }),
        _ => {}
    }
}

fn icon_key(app: &mut TuiApp, role: Role, code: KeyCode) {
    match code {
        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(role, -1),
        KeyCode::Right | KeyCode::Char('l') => app.move_cursor(role, 1),
        code if is_activate(code) => app.click_icon_at_cursor(role),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Identifier;
    use crate::form::{FormSession, SessionOptions};
    use crate::generation::SimulatedClient;
    use crate::notify::{NotificationKind, Phase};
    use std::sync::Arc;

    fn app() -> TuiApp {
        let (session, _rx) = FormSession::new(Arc::new(SimulatedClient::default()), SessionOptions::default());
        TuiApp::new(session)
    }

    fn press(app: &mut TuiApp, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut TuiApp, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    #[tokio::test]
    async fn quit_on_ctrl_c_and_esc() {
        let mut app = app();
        ctrl(&mut app, 'c');
        assert!(app.should_quit);

        let mut app = self::app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn typing_goes_to_prompt_only_when_focused() {
        let mut app = app();
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.session.prompt(), "");

        app.focus = Focus::Prompt;
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.session.prompt(), "q");
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn full_keyboard_flow() {
        let mut app = app();
        // Source: dropdown down twice → file.
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.selections().get(Role::Source), Some(Identifier::File));

        // Tab to icons, then destination dropdown → enabled now.
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::DestinationDropdown);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.selections().get(Role::Destination), Some(Identifier::Gcp));
        assert_eq!(app.session.inputs().dropdown(Role::Destination).key(), "gcp");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Prompt);
        for c in "load csv".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.generations().len(), 1);
        let last = app.session.notifications().all().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn enter_button_with_empty_prompt_warns() {
        let mut app = app();
        app.focus = Focus::EnterButton;
        press(&mut app, KeyCode::Enter);
        let last = app.session.notifications().all().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Warning);
        assert_eq!(last.message, "Please enter a prompt for ETL code generation");
    }

    #[tokio::test]
    async fn search_icon_uses_same_validation() {
        let mut app = app();
        app.focus = Focus::Prompt;
        press(&mut app, KeyCode::Char('x'));
        app.focus = Focus::SearchIcon;
        press(&mut app, KeyCode::Char(' '));
        let last = app.session.notifications().all().last().unwrap();
        assert_eq!(last.message, "Please select a data source first");
    }

    #[tokio::test]
    async fn mic_reports_unsupported() {
        let mut app = app();
        app.focus = Focus::MicIcon;
        press(&mut app, KeyCode::Enter);
        let last = app.session.notifications().all().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Warning);
    }

    #[tokio::test]
    async fn ctrl_d_dismisses_newest() {
        let mut app = app();
        ctrl(&mut app, 's');
        ctrl(&mut app, 's');
        ctrl(&mut app, 'd');
        let all = app.session.notifications().all();
        assert_eq!(all[0].phase, Phase::Visible);
        assert_eq!(all[1].phase, Phase::Dismissing);
    }

    #[tokio::test]
    async fn delete_clears_dropdown() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.session.selections().get(Role::Source), None);
    }
}
