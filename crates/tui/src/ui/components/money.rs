use engine::{Money, TransactionKind, budget::WARNING_THRESHOLD_PERCENT};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::Gauge,
};

use crate::ui::theme::Theme;

/// Amount of a transaction row, signed and colored by kind.
///
/// - Income: green with `+`
/// - Expense: red with `-`
/// - Transfer: neutral, no sign
#[must_use]
pub fn transaction_amount(
    amount: Money,
    kind: TransactionKind,
    symbol: &str,
    theme: &Theme,
) -> Span<'static> {
    let formatted = amount.format(symbol);
    let (color, prefix) = match kind {
        TransactionKind::Income => (theme.positive, "+"),
        TransactionKind::Expense => (theme.error, "-"),
        TransactionKind::Transfer => (theme.text_muted, ""),
    };
    Span::styled(format!("{prefix}{formatted}"), Style::default().fg(color))
}

/// Amount colored by its own sign, bold. Used for balances.
#[must_use]
pub fn styled_amount_bold(amount: Money, symbol: &str, theme: &Theme) -> Span<'static> {
    let color = if amount.is_positive() {
        theme.positive
    } else if amount.is_negative() {
        theme.error
    } else {
        theme.text
    };
    Span::styled(
        amount.format(symbol),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

#[must_use]
pub fn plain_amount(amount: Money, symbol: &str, theme: &Theme) -> Span<'static> {
    Span::styled(amount.format(symbol), Style::default().fg(theme.text))
}

/// Gauge of the month's spending against its budget.
///
/// Returns `None` when no budget is set.
#[must_use]
pub fn budget_gauge(spent: Money, budget: Option<Money>, theme: &Theme) -> Option<Gauge<'static>> {
    let budget = budget.filter(|b| b.is_positive())?;
    let percent = spent.percent_of(budget)?;
    let ratio = (percent / 100.0).clamp(0.0, 1.0);

    let color = if spent > budget {
        theme.error
    } else if percent >= WARNING_THRESHOLD_PERCENT as f64 {
        theme.warning
    } else {
        theme.positive
    };

    Some(
        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(ratio)
            .label(format!("{percent:.0}% used")),
    )
}
