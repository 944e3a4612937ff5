use api_types::transaction::TransactionQuery;
use chrono::Utc;
use engine::{
    Transaction, TransactionDetail, TransactionKind, transactions::EDIT_WINDOW_HOURS,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, money::transaction_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(6),
        ])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
    render_detail(frame, layout[2], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let txs = &state.transactions;
    let mut line = vec![
        Span::styled("Filter", Style::default().fg(theme.dim)),
        Span::styled(
            format!(": {}   ", filter_label(&txs.filter)),
            Style::default().fg(if txs.is_filtered() {
                theme.warning
            } else {
                theme.text
            }),
        ),
        Span::styled("Rows", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}", txs.store.len())),
    ];
    if txs.loading {
        line.push(Span::styled("   loading…", Style::default().fg(theme.warning)));
    }
    Card::new("Transactions", theme).render_with(frame, area, Paragraph::new(Line::from(line)));
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let symbol = state.currency_symbol.as_str();
    let items = state
        .transactions
        .store
        .items()
        .iter()
        .map(|tx| {
            let date = tx.occurred_at.with_timezone(&state.tz).format("%d %b %Y %H:%M");
            let style = if tx.is_provisional() {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme.text_muted)),
                Span::styled(format!("{:<8} ", kind_label(tx.kind)), style),
                Span::styled(format!("{:<18} ", row_label(tx)), style),
                Span::styled(format!("{:<9} ", tx.division.as_str()), style),
                transaction_amount(tx.amount, tx.kind, symbol, theme),
                Span::styled(
                    if tx.is_provisional() { "  saving…" } else { "" },
                    Style::default().fg(theme.dim),
                ),
            ]))
        })
        .collect::<Vec<_>>();

    let card = Card::new("List", theme).focused(true);
    if items.is_empty() {
        let message = if state.transactions.loading {
            "Loading…"
        } else {
            "No transactions. Press c to add one."
        };
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim))),
        );
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(state.transactions.selected.min(items.len() - 1)));
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

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Detail", theme);
    let txs = &state.transactions;
    let Some(tx) = txs.store.items().get(txs.selected) else {
        card.render_frame(frame, area);
        return;
    };
    let symbol = state.currency_symbol.as_str();
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.dim));

    let mut lines = vec![Line::from(vec![
        label("Note"),
        Span::raw(format!(": {}   ", tx.description.as_deref().unwrap_or("-"))),
        label("Account"),
        Span::raw(format!(": {}", tx.account.as_deref().unwrap_or("-"))),
    ])];
    if let TransactionDetail::Transfer { from, to } = &tx.detail {
        for (name, leg) in [("From", from), ("To", to)] {
            lines.push(Line::from(vec![
                label(name),
                Span::raw(format!(
                    ": {} (••{})  {} → {}",
                    leg.account_name,
                    last_digits(&leg.account_number),
                    leg.balance_before.format(symbol),
                    leg.balance_after.format(symbol),
                )),
            ]));
        }
    } else {
        let editable = tx.ensure_editable(Utc::now()).is_ok() && !tx.is_provisional();
        lines.push(Line::from(vec![
            label("Editable"),
            Span::raw(if editable {
                ": yes".to_string()
            } else {
                format!(": no (older than {EDIT_WINDOW_HOURS} hours)")
            }),
        ]));
    }

    card.render_with(frame, area, Paragraph::new(lines));
}

fn row_label(tx: &Transaction) -> String {
    match &tx.detail {
        TransactionDetail::Categorized { category } => category.clone(),
        TransactionDetail::Transfer { from, to } => {
            format!("{} → {}", from.account_name, to.account_name)
        }
    }
}

fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expense",
        TransactionKind::Transfer => "Transfer",
    }
}

fn last_digits(number: &str) -> &str {
    let start = number.len().saturating_sub(4);
    number.get(start..).unwrap_or(number)
}

/// Short description of the active filter, `All` when none.
pub fn filter_label(filter: &TransactionQuery) -> String {
    let mut parts = Vec::new();
    if let (Some(start), Some(end)) = (&filter.start, &filter.end) {
        parts.push(format!("{start} → {end}"));
    }
    if let Some(category) = &filter.category {
        parts.push(format!("#{category}"));
    }
    if let Some(division) = filter.division {
        parts.push(format!("!{division:?}").to_lowercase());
    }
    if let Some(account) = &filter.account {
        parts.push(format!("@{account}"));
    }
    if parts.is_empty() {
        "All".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_label_lists_active_fields() {
        assert_eq!(filter_label(&TransactionQuery::default()), "All");
        let filter = TransactionQuery {
            category: Some("Food".to_string()),
            account: Some("HDFC".to_string()),
            ..TransactionQuery::default()
        };
        assert_eq!(filter_label(&filter), "#Food @HDFC");
    }

    #[test]
    fn last_digits_handles_short_numbers() {
        assert_eq!(last_digits("123456"), "3456");
        assert_eq!(last_digits("12"), "12");
    }
}
