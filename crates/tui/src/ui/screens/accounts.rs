use engine::Money;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AccountsPane, AppState},
    ui::{
        components::{card::Card, money::styled_amount_bold},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let symbol = state.currency_symbol.as_str();
    let total: Money = state.accounts.iter().map(|a| a.balance).sum();
    Card::new("Total balance", theme).render_with(
        frame,
        layout[0],
        Paragraph::new(Line::from(vec![
            styled_amount_bold(total, symbol, theme),
            Span::styled(
                format!("  across {} account(s)", state.accounts.len()),
                Style::default().fg(theme.dim),
            ),
        ])),
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);
    render_accounts(frame, columns[0], state, theme);
    render_sessions(frame, columns[1], state, theme);
}

fn render_accounts(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let symbol = state.currency_symbol.as_str();
    let focused = state.accounts_pane == AccountsPane::Accounts;
    let card = Card::new("Accounts", theme).focused(focused);
    if state.accounts.is_empty() {
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(
                "No accounts. Press c to add one.",
                Style::default().fg(theme.dim),
            )),
        );
        return;
    }

    let items = state
        .accounts
        .iter()
        .map(|account| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<32} ", account.label())),
                Span::raw(format!("{:>16}", account.balance.format(symbol))),
            ]))
        })
        .collect::<Vec<_>>();

    render_list(frame, area, card, items, state.accounts_cursor.selected, focused, theme);
}

fn render_sessions(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let focused = state.accounts_pane == AccountsPane::Sessions;
    let card = Card::new("Devices", theme).focused(focused);
    if state.sessions.is_empty() {
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled("No active sessions", Style::default().fg(theme.dim))),
        );
        return;
    }

    let items = state
        .sessions
        .iter()
        .map(|session| {
            let last_active = session
                .last_active
                .map(|at| at.with_timezone(&state.tz).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let mut first = vec![Span::raw(session.device.clone())];
            if state.is_this_device(session) {
                first.push(Span::styled("  (this device)", Style::default().fg(theme.accent)));
            }
            ListItem::new(vec![
                Line::from(first),
                Line::from(Span::styled(
                    format!("  last active {last_active}"),
                    Style::default().fg(theme.dim),
                )),
            ])
        })
        .collect::<Vec<_>>();

    render_list(frame, area, card, items, state.sessions_cursor.selected, focused, theme);
}

fn render_list(
    frame: &mut Frame<'_>,
    area: Rect,
    card: Card<'_>,
    items: Vec<ListItem<'static>>,
    selected: usize,
    focused: bool,
    theme: &Theme,
) {
    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(selected.min(items.len().saturating_sub(1))));
    }
    let list = List::new(items)
        .block(card.block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}
