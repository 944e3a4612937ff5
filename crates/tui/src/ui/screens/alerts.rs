use engine::{Alert, AlertLevel, AlertSource};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let alerts = state.alerts.alerts();
    let title = format!("Notifications ({} unread)", alerts.len());
    let card = Card::new(&title, theme).focused(true);
    if alerts.is_empty() {
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled("You're all caught up.", Style::default().fg(theme.dim))),
        );
        return;
    }

    let items = alerts
        .iter()
        .map(|alert| {
            let color = level_color(alert, theme);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", source_tag(alert.source)), Style::default().fg(color)),
                    Span::styled(
                        alert.title.clone(),
                        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(
                            "  {}",
                            alert.created_at.with_timezone(&state.tz).format("%d %b %H:%M")
                        ),
                        Style::default().fg(theme.dim),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("    {}", alert.body),
                    Style::default().fg(theme.text_muted),
                )),
            ])
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.alerts_cursor.selected.min(items.len() - 1)));
    let list = List::new(items)
        .block(card.block())
        .highlight_style(Style::default().bg(theme.background))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn source_tag(source: AlertSource) -> &'static str {
    match source {
        AlertSource::Server => "[server]",
        AlertSource::Bill => "[bill]",
        AlertSource::Budget => "[budget]",
    }
}

fn level_color(alert: &Alert, theme: &Theme) -> Color {
    match alert.level {
        AlertLevel::Urgent => theme.error,
        AlertLevel::Warning => theme.warning,
        AlertLevel::Info => theme.accent,
    }
}
