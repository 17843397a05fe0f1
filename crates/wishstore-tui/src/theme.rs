//! Colours and the semantic styles screens draw with. Screens pick a role
//! (`pending`, `destructive`, `heading`...) rather than a raw colour.

use ratatui::style::{Color, Modifier, Style};

use crate::action::NotificationLevel;

const ACCENT: Color = Color::Rgb(225, 53, 255);
const HIGHLIGHT: Color = Color::Rgb(128, 255, 234);
const DANGER: Color = Color::Rgb(255, 106, 193);
const PENDING: Color = Color::Rgb(241, 250, 140);
const OK: Color = Color::Rgb(80, 250, 123);
const ERROR: Color = Color::Rgb(255, 99, 99);
const TEXT: Color = Color::Rgb(189, 193, 207);
const MUTED: Color = Color::Rgb(98, 114, 164);
const SURFACE: Color = Color::Rgb(30, 31, 41);
const SURFACE_RAISED: Color = Color::Rgb(40, 42, 54);

// ── Chrome ───────────────────────────────────────────────────────────

/// The app name in the header and detail headings.
pub fn brand() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn title_style() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn heading() -> Style {
    Style::default().fg(HIGHLIGHT)
}

/// Signed-in login, right of the header.
pub fn principal() -> Style {
    Style::default().fg(DANGER)
}

pub fn rule() -> Style {
    Style::default().fg(MUTED)
}

/// Background under overlays and toasts.
pub fn surface() -> Style {
    Style::default().bg(SURFACE)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

// ── Tables and fields ────────────────────────────────────────────────

pub fn table_header() -> Style {
    Style::default()
        .fg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(SURFACE_RAISED)
        .add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default().fg(TEXT)
}

pub fn focused_label() -> Style {
    Style::default().fg(PENDING).add_modifier(Modifier::BOLD)
}

pub fn value() -> Style {
    Style::default().fg(HIGHLIGHT)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR)
}

// ── Request state ────────────────────────────────────────────────────

/// Loading, saving, deleting, connecting.
pub fn pending() -> Style {
    Style::default().fg(PENDING)
}

pub fn connected() -> Style {
    Style::default().fg(OK)
}

/// Create/edit overlay border.
pub fn form_border() -> Style {
    Style::default().fg(ACCENT)
}

pub fn form_title() -> Style {
    Style::default().fg(PENDING).add_modifier(Modifier::BOLD)
}

/// Delete overlay border and title.
pub fn destructive() -> Style {
    Style::default().fg(DANGER).add_modifier(Modifier::BOLD)
}

/// Border style and icon for a toast.
pub fn toast(level: NotificationLevel) -> (Style, &'static str) {
    match level {
        NotificationLevel::Success => (Style::default().fg(OK), "✓"),
        NotificationLevel::Error => (Style::default().fg(ERROR), "✗"),
        NotificationLevel::Info => (Style::default().fg(HIGHLIGHT), "·"),
    }
}

pub fn toast_text() -> Style {
    Style::default().fg(TEXT)
}
