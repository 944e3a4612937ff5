use chrono::Utc;
use engine::{
    Money, YearMonth,
    summary::{summarize, summarize_month},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            money::{budget_gauge, plain_amount, styled_amount_bold, transaction_amount},
        },
        theme::Theme,
    },
};

const RECENT_ROWS: usize = 8;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Month cards
            Constraint::Length(3), // Budget gauge
            Constraint::Min(5),    // Categories and recent transactions
        ])
        .split(area);

    let month = YearMonth::of(&Utc::now().with_timezone(&state.tz));
    let summary = summarize_month(state.transactions.store.items(), month, &state.tz)
        .with_income(state.local.income_for(month));
    let budget = state.local.budget_for(month);
    let symbol = state.currency_symbol.as_str();

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(layout[0]);

    let income_note = if state.local.income_for(month).is_some() {
        "set manually"
    } else {
        "from transactions"
    };
    StatCard::new(
        "Income",
        Span::styled(summary.income.format(symbol), Style::default().fg(theme.positive)),
        theme,
    )
    .subtitle(income_note)
    .render(frame, cols[0]);
    StatCard::new(
        "Expenses",
        Span::styled(summary.expense.format(symbol), Style::default().fg(theme.error)),
        theme,
    )
    .subtitle(month.to_string())
    .render(frame, cols[1]);
    let all_time = summarize(state.transactions.store.items());
    StatCard::new("Balance", styled_amount_bold(summary.balance(), symbol, theme), theme)
        .subtitle(format!("all time {}", all_time.balance().format(symbol)))
        .render(frame, cols[2]);
    let budget_value = match budget {
        Some(budget) => plain_amount(budget, symbol, theme),
        None => Span::styled("not set", Style::default().fg(theme.dim)),
    };
    let budget_card = StatCard::new("Budget", budget_value, theme);
    match budget {
        Some(budget) => budget_card
            .subtitle(format!("{} left", (budget - summary.expense).format(symbol)))
            .render(frame, cols[3]),
        None => budget_card.subtitle("press g to set").render(frame, cols[3]),
    }

    let gauge_card = Card::new("Monthly budget", theme);
    match budget_gauge(summary.expense, budget, theme) {
        Some(gauge) => gauge_card.render_with(frame, layout[1], gauge),
        None => gauge_card.render_with(
            frame,
            layout[1],
            Paragraph::new(Span::styled("No budget for this month", Style::default().fg(theme.dim))),
        ),
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[2]);
    render_categories(frame, bottom[0], &summary.by_category, summary.expense, state, theme);
    render_recent(frame, bottom[1], state, theme);
}

fn render_categories(
    frame: &mut Frame<'_>,
    area: Rect,
    totals: &[(String, Money)],
    expense: Money,
    state: &AppState,
    theme: &Theme,
) {
    let card = Card::new("Spending by category", theme);
    if totals.is_empty() {
        let empty = Paragraph::new(Span::styled("No expenses this month", Style::default().fg(theme.dim)));
        card.render_with(frame, area, empty);
        return;
    }
    let symbol = state.currency_symbol.as_str();
    let items = totals
        .iter()
        .map(|(name, total)| {
            let share = total
                .percent_of(expense)
                .map(|p| format!("{p:>5.1}%"))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{name:<18} "), Style::default().fg(theme.text_muted)),
                Span::raw(format!("{:>14} ", total.format(symbol))),
                Span::styled(share, Style::default().fg(theme.dim)),
            ]))
        })
        .collect::<Vec<_>>();
    card.render_with(frame, area, List::new(items));
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let symbol = state.currency_symbol.as_str();
    let items = state
        .transactions
        .store
        .items()
        .iter()
        .take(RECENT_ROWS)
        .map(|tx| {
            let date = tx.occurred_at.with_timezone(&state.tz).format("%d %b");
            let label = tx.category().unwrap_or("Transfer");
            let pending = if tx.is_provisional() { " …" } else { "" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme.dim)),
                Span::raw(format!("{label:<16} ")),
                transaction_amount(tx.amount, tx.kind, symbol, theme),
                Span::styled(pending, Style::default().fg(theme.dim)),
            ]))
        })
        .collect::<Vec<_>>();

    let card = Card::new("Recent transactions", theme);
    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "Nothing here yet. Press c to add a transaction.",
            Style::default().fg(theme.dim),
        ));
        card.render_with(frame, area, empty);
    } else {
        card.render_with(frame, area, List::new(items));
    }
}
