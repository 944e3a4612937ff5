pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Screen, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

use components::hints;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = state.theme();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        area,
    );

    match state.screen {
        Screen::Login => screens::login::render(frame, area, state, &theme),
        Screen::Register => screens::login::render_register(frame, area, state, &theme),
        Screen::ForgotPassword => screens::login::render_recovery(frame, area, state, &theme),
        Screen::Home => render_shell(frame, area, state, &theme),
    }

    components::prompt::render(frame, area, state, &theme);
    components::command_palette::render(frame, area, state, &theme);
    components::toast::render(frame, area, &state.toasts, &theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(
        frame,
        layout[1],
        state.section,
        state.alerts.badge(),
        theme,
    );

    let content = layout[2];
    match state.section {
        Section::Home => screens::home::render(frame, content, state, theme),
        Section::Transactions => screens::transactions::render(frame, content, state, theme),
        Section::Bills => screens::bills::render(frame, content, state, theme),
        Section::Accounts => screens::accounts::render(frame, content, state, theme),
        Section::Notifications => screens::alerts::render(frame, content, state, theme),
        Section::Reports => screens::reports::render(frame, content, state, theme),
    }

    render_bottom_bar(frame, layout[3], state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_color) = if state.connected {
        ("OK", theme.positive)
    } else {
        ("OFFLINE", theme.error)
    };
    let badge = state.alerts.badge();
    let badge_color = if badge > 0 { theme.warning } else { theme.text };

    let line = Line::from(vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.username())),
        Span::styled("Alerts", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        Span::styled(badge.to_string(), Style::default().fg(badge_color)),
        Span::raw("  "),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled(status, Style::default().fg(status_color)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context = hints::context_hints(state);
    if !context.is_empty() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(&context, theme));
    }

    parts.push(hints::hint_separator(theme));
    parts.extend(hints::hints_to_spans(&hints::global_hints(), theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
