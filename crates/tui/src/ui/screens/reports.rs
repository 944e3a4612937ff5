use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

const KINDS: [(&str, &str, &str); 4] = [
    ("monthly", "monthly 2 2026", "Income and expenses of one month"),
    ("range", "range 2026-01-01 2026-03-31", "Transactions between two dates"),
    ("budget", "budget 2 2026", "Spending against the month's budget"),
    ("full", "full [FROM TO]", "Complete account statement"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let lines = KINDS
        .iter()
        .map(|(name, example, about)| {
            Line::from(vec![
                Span::styled(format!("{name:<9}"), Style::default().fg(theme.accent)),
                Span::styled(format!("{example:<30}"), Style::default().fg(theme.text)),
                Span::styled(*about, Style::default().fg(theme.dim)),
            ])
        })
        .chain(std::iter::once(Line::from(Span::styled(
            "Append pdf or excel to pick the format (pdf by default). Press c to download.",
            Style::default().fg(theme.text_muted),
        ))))
        .collect::<Vec<_>>();
    Card::new("Reports", theme).render_with(frame, layout[0], Paragraph::new(lines));

    let last = match &state.last_report {
        Some(path) => Span::styled(path.clone(), Style::default().fg(theme.positive)),
        None => Span::styled("No report downloaded yet", Style::default().fg(theme.dim)),
    };
    Card::new("Last download", theme).render_with(frame, layout[1], Paragraph::new(Line::from(last)));
}
