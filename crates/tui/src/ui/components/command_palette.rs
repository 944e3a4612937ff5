use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, PaletteCommand},
    ui::{components::centered_rect, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    if !state.palette.active {
        return;
    }

    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(popup);

    render_input(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let query = state.palette.query.as_str();
    let (text, style) = if query.is_empty() {
        ("search a command...", Style::default().fg(theme.dim))
    } else {
        (query, Style::default().fg(theme.text))
    };

    let line = Line::from(vec![
        Span::styled(text.to_string(), style),
        Span::styled(" │", Style::default().fg(theme.accent)),
    ]);

    let block = Block::default()
        .title(" Command palette ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.surface_bright));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let commands = PaletteCommand::filtered(&state.palette.query);
    let items = commands
        .iter()
        .map(|cmd| ListItem::new(Line::from(cmd.label())))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(state.palette.selected.min(items.len() - 1)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.surface_bright)),
        )
        .style(Style::default().fg(theme.text))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}
