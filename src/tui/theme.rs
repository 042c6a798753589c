//! Process-wide styles, set up once per session.
//!
//! `init` may be called any number of times; only the first call wins.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

use crate::notify::{NotificationKind, Phase};

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    /// Highlighted icon (the active selection).
    pub icon_active: Style,
    pub icon_idle: Style,
    /// Focus ring for the widget under the cursor.
    pub focused: Style,
    pub border: Style,
    /// Applied on top of anything gated off.
    pub disabled: Style,
    pub title: Style,
    pub info: Color,
    pub success: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            icon_active: Style::default()
                .fg(Color::Rgb(0x8b, 0x5c, 0xf6))
                .add_modifier(Modifier::BOLD),
            icon_idle: Style::default().fg(Color::Gray),
            focused: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            disabled: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            info: Color::Rgb(0x3b, 0x82, 0xf6),
            success: Color::Rgb(0x10, 0xb9, 0x81),
            warning: Color::Rgb(0xf5, 0x9e, 0x0b),
        }
    }
}

impl Theme {
    /// Banner style for a notification in a given phase.
    pub fn notification(&self, kind: NotificationKind, phase: Phase) -> Style {
        let bg = match kind {
            NotificationKind::Info => self.info,
            NotificationKind::Success => self.success,
            NotificationKind::Warning => self.warning,
        };
        let style = Style::default().fg(Color::White).bg(bg);
        match phase {
            Phase::Visible => style,
            Phase::Dismissing => style.add_modifier(Modifier::DIM),
        }
    }
}

/// Install the theme. Returns false if one was already installed.
pub fn init(theme: Theme) -> bool {
    THEME.set(theme).is_ok()
}

/// The installed theme, or the default if `init` was never called.
pub fn get() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let first = get().success;
        let mut other = Theme::default();
        other.success = Color::Red;
        assert!(!init(other));
        assert_eq!(get().success, first);
    }

    #[test]
    fn dismissing_banners_are_dimmed() {
        let theme = Theme::default();
        let visible = theme.notification(NotificationKind::Warning, Phase::Visible);
        let leaving = theme.notification(NotificationKind::Warning, Phase::Dismissing);
        assert_eq!(visible.bg, Some(theme.warning));
        assert!(leaving.add_modifier.contains(Modifier::DIM));
    }
}
