use chrono::{NaiveDate, Utc};
use engine::{Bill, BillStatus};
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
    let card = Card::new("Bill reminders", theme).focused(true);
    if state.bills.is_empty() {
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(
                "No reminders. Press c to add one.",
                Style::default().fg(theme.dim),
            )),
        );
        return;
    }

    let today = Utc::now().date_naive();
    let symbol = state.currency_symbol.as_str();
    let items = state
        .bills
        .iter()
        .map(|bill| {
            let (status, color) = status_label(bill, today, theme);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}  ", bill.due_date.format("%d/%m/%Y")),
                    Style::default().fg(theme.text_muted),
                ),
                Span::raw(format!("{:<20} ", bill.name)),
                Span::raw(format!("{:>14}  ", bill.amount.format(symbol))),
                Span::styled(status, Style::default().fg(color)),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.bills_cursor.selected.min(items.len() - 1)));
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

fn status_label(bill: &Bill, today: NaiveDate, theme: &Theme) -> (String, Color) {
    match bill.status(today) {
        Some(BillStatus::Overdue { days }) => (format!("{days} day(s) overdue"), theme.error),
        Some(BillStatus::DueToday) => ("due today".to_string(), theme.error),
        Some(BillStatus::Upcoming { days }) => (format!("in {days} day(s)"), theme.warning),
        None => ("scheduled".to_string(), theme.dim),
    }
}
