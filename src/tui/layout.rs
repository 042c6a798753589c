//! Form layout with a notification overlay.
//!
//! ```text
//! ┌─ Source ────────────────┐┌─ Destination ───────────┐
//! │ ▾ database              ││ ▾ (select)              │
//! │ [Database] File  API    ││  AWS  Azure  Google Cloud│
//! └─────────────────────────┘└─────────────────────────┘
//! ┌─ Prompt ─────────────────────────┐┌────────────────────┐
//! │ > map users table                ││ Mic  Go  Enter     │
//! └──────────────────────────────────┘└────────────────────┘
//! ┌─ Output ──────────────────────────────────────────┐
//! │ (latest generated artifact)                        │
//! └────────────────────────────────────────────────────┘
//!  [idle] Tab:focus ↑↓:dropdown ←→:icons Enter:select ^D:dismiss
//! ```
//!
//! Notifications stack in the top-right corner, newest last.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::Role;

use super::app::{Focus, TuiApp};
use super::theme;

const NOTIFICATION_WIDTH: u16 = 48;

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &TuiApp) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // selection panels
            Constraint::Length(3), // prompt row
            Constraint::Min(3),    // output
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[0]);

    draw_selection(f, app, Role::Source, panels[0]);
    draw_selection(f, app, Role::Destination, panels[1]);
    draw_prompt_row(f, app, outer[1]);
    draw_output(f, app, outer[2]);
    draw_status(f, app, outer[3]);

    // Overlay last so banners sit above everything.
    draw_notifications(f, app, f.area());
}

fn focus_pair(role: Role) -> (Focus, Focus) {
    match role {
        Role::Source => (Focus::SourceDropdown, Focus::SourceIcons),
        Role::Destination => (Focus::DestinationDropdown, Focus::DestinationIcons),
    }
}

fn draw_selection(f: &mut Frame, app: &TuiApp, role: Role, area: Rect) {
    let theme = theme::get();
    let gated = role == Role::Destination && !app.destination_enabled();
    let (dropdown_focus, icons_focus) = focus_pair(role);

    let title = match role {
        Role::Source => " Source ",
        Role::Destination => " Destination ",
    };
    let border = if app.focus == dropdown_focus || app.focus == icons_focus {
        theme.focused
    } else {
        theme.border
    };
    let block = Block::default()
        .title(Span::styled(title, theme.title))
        .borders(Borders::ALL)
        .border_style(border);

    let inputs = app.session.inputs();
    let key = inputs.dropdown(role).key();
    let shown = if key.is_empty() { "(select)" } else { key };
    let dropdown_style = if app.focus == dropdown_focus {
        theme.focused
    } else {
        Style::default()
    };
    let dropdown = Line::from(vec![
        Span::raw(" ▾ "),
        Span::styled(shown.to_string(), dropdown_style),
    ]);

    let mut icons = Vec::new();
    for (i, icon) in inputs.icons(role).icons.iter().enumerate() {
        let mut style = if icon.active {
            theme.icon_active
        } else {
            theme.icon_idle
        };
        if app.focus == icons_focus && app.cursor(role) == i {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let text = if icon.active {
            format!("[{}]", icon.label)
        } else {
            format!(" {} ", icon.label)
        };
        icons.push(Span::raw(" "));
        icons.push(Span::styled(text, style));
    }

    let mut paragraph = Paragraph::new(vec![dropdown, Line::from(icons)]).block(block);
    if gated {
        paragraph = paragraph.style(theme.disabled);
    }
    f.render_widget(paragraph, area);
}

fn draw_prompt_row(f: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = theme::get();
    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(21)])
        .split(area);

    let focused = app.focus == Focus::Prompt;
    let block = Block::default()
        .title(Span::styled(" Prompt ", theme.title))
        .borders(Borders::ALL)
        .border_style(if focused { theme.focused } else { theme.border });
    let inner = block.inner(row[0]);
    let text = Paragraph::new(Line::from(vec![
        Span::raw("> "),
        Span::raw(app.session.prompt().to_string()),
    ]))
    .block(block);
    f.render_widget(text, row[0]);

    if focused {
        let width = app.session.prompt().chars().count() as u16 + 2;
        let x = inner.x + width.min(inner.width.saturating_sub(1));
        f.set_cursor_position(Position::new(x, inner.y));
    }

    let button = |label: &'static str, focus: Focus| {
        let style = if app.focus == focus {
            theme.focused.add_modifier(Modifier::REVERSED)
        } else {
            theme.icon_idle
        };
        Span::styled(label, style)
    };
    let buttons = Paragraph::new(Line::from(vec![
        button(" Mic ", Focus::MicIcon),
        Span::raw(" "),
        button(" Go ", Focus::SearchIcon),
        Span::raw(" "),
        button(" Enter ", Focus::EnterButton),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(theme.border));
    f.render_widget(buttons, row[1]);
}

fn draw_output(f: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = theme::get();
    let block = Block::default()
        .title(Span::styled(" Output ", theme.title))
        .borders(Borders::ALL)
        .border_style(theme.border);
    let body = match app.session.latest_artifact() {
        Some(artifact) => Paragraph::new(artifact.artifact_text.as_str()),
        None => Paragraph::new("No generated code yet.").style(theme.disabled),
    };
    f.render_widget(
        body.block(block)
            .wrap(Wrap { trim: false })
            .scroll((app.output_scroll, 0)),
        area,
    );
}

fn draw_status(f: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = theme::get();
    let pending = app.session.pending_generations();
    let status = if pending == 0 {
        Span::styled("[idle]", Style::default().fg(theme.success))
    } else {
        Span::styled(
            format!("[generating x{pending}]"),
            Style::default().fg(theme.warning),
        )
    };
    let hints = Span::styled(
        " Tab:focus ↑↓:dropdown ←→:icons Enter:select ^S:submit ^D:dismiss Esc:quit",
        theme.border,
    );
    f.render_widget(Paragraph::new(Line::from(vec![status, hints])), area);
}

/// Height of a banner once wrapped to the overlay width.
fn banner_height(message: &str) -> u16 {
    let inner = (NOTIFICATION_WIDTH - 4) as usize;
    let lines = message.chars().count().div_ceil(inner).max(1);
    lines as u16 + 2
}

fn draw_notifications(f: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = theme::get();
    let width = NOTIFICATION_WIDTH.min(area.width);
    let x = area.x + area.width - width;
    let mut y = area.y;

    for n in app.session.notifications().all() {
        let height = banner_height(&n.message);
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, height);
        let style = theme.notification(n.kind, n.phase);
        let banner = Paragraph::new(n.message.as_str())
            .style(style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(Span::styled(" x ", style)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(banner, rect);
        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormSession, SessionOptions};
    use crate::generation::SimulatedClient;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn app() -> TuiApp {
        let (session, _rx) = FormSession::new(Arc::new(SimulatedClient::default()), SessionOptions::default());
        TuiApp::new(session)
    }

    fn render(app: &TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn renders_both_icon_rows() {
        let screen = render(&app());
        for label in ["Database", "File", "API", "AWS", "Azure", "Google Cloud"] {
            assert!(screen.contains(label), "missing {label}");
        }
        assert!(screen.contains("(select)"));
    }

    #[tokio::test]
    async fn active_icon_is_bracketed() {
        let mut app = app();
        app.step_dropdown(Role::Source, true);
        let screen = render(&app);
        assert!(screen.contains("[Database]"));
        assert!(screen.contains("database"));
    }

    #[tokio::test]
    async fn notifications_overlay_is_drawn() {
        let mut app = app();
        app.session.voice_input();
        let screen = render(&app);
        assert!(screen.contains("Voice input not supported"));
    }

    #[test]
    fn long_messages_get_taller_banners() {
        assert_eq!(banner_height("hi"), 3);
        assert!(banner_height(&"x".repeat(100)) > 3);
    }
}
