use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::AppState,
    ui::{components::centered_box, theme::Theme},
};

/// One-line input overlay used by every add/edit form.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(prompt) = &state.prompt else {
        return;
    };

    let width = area.width.saturating_sub(8).min(90);
    let popup = centered_box(width, 5, area);
    frame.render_widget(Clear, popup);

    let footer = match &prompt.error {
        Some(err) => Span::styled(err.clone(), Style::default().fg(theme.error)),
        None => Span::styled(prompt.kind.hint(), Style::default().fg(theme.dim)),
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::styled(prompt.input.clone(), Style::default().fg(theme.text)),
            Span::styled("│", Style::default().fg(theme.accent)),
        ]),
        Line::default(),
        Line::from(footer),
    ];

    let block = Block::default()
        .title(format!(" {} ", prompt.kind.title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface_bright));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
