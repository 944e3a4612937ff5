use ratatui::{style::Style, text::Span};

use crate::{
    app::{AccountsPane, AppState, Section},
    ui::theme::Theme,
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints for whatever currently has the keyboard.
pub fn context_hints(state: &AppState) -> Vec<KeyHint> {
    if state.prompt.is_some() || state.palette.active {
        return vec![KeyHint::new("Enter", "confirm"), KeyHint::new("Esc", "cancel")];
    }
    match state.section {
        Section::Home => vec![
            KeyHint::new("c", "add"),
            KeyHint::new("g", "budget"),
            KeyHint::new("i", "income"),
        ],
        Section::Transactions => vec![
            KeyHint::new("c", "add"),
            KeyHint::new("e", "edit"),
            KeyHint::new("d", "delete"),
            KeyHint::new("f", "filter"),
            KeyHint::new("x", "clear"),
        ],
        Section::Bills => crud(),
        Section::Accounts if state.accounts_pane == AccountsPane::Sessions => vec![
            KeyHint::new("d", "log out device"),
            KeyHint::new("L", "log out all"),
            KeyHint::new("Tab", "accounts"),
        ],
        Section::Accounts => {
            let mut hints = crud();
            hints.push(KeyHint::new("T", "transfer"));
            hints.push(KeyHint::new("Tab", "sessions"));
            hints
        }
        Section::Notifications => vec![KeyHint::new("↑↓", "select"), KeyHint::new("m", "mark read")],
        Section::Reports => vec![KeyHint::new("c", "download")],
    }
}

pub fn global_hints() -> Vec<KeyHint> {
    vec![
        KeyHint::new("R", "refresh"),
        KeyHint::new("Ctrl+P", "cmd"),
        KeyHint::new("q", "quit"),
    ]
}

fn crud() -> Vec<KeyHint> {
    vec![
        KeyHint::new("c", "add"),
        KeyHint::new("e", "edit"),
        KeyHint::new("d", "delete"),
    ]
}
