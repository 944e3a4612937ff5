//! Totals shown on the dashboard cards.

use std::collections::HashMap;

use chrono::TimeZone;

use crate::{
    Money,
    budget::YearMonth,
    transactions::{Transaction, TransactionKind},
};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub income: Money,
    pub expense: Money,
    /// Expense per category, largest first; ties ordered by name.
    pub by_category: Vec<(String, Money)>,
}

impl Summary {
    pub fn balance(&self) -> Money {
        self.income - self.expense
    }

    /// Replaces the computed income, used for the monthly income override.
    pub fn with_income(mut self, income: Option<Money>) -> Self {
        if let Some(income) = income {
            self.income = income;
        }
        self
    }
}

/// Sums income and expense. Transfers move money between accounts and count
/// as neither.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = Summary::default();
    let mut categories: HashMap<&str, Money> = HashMap::new();
    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => summary.income += tx.amount,
            TransactionKind::Expense => {
                summary.expense += tx.amount;
                let category = tx
                    .category()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or(UNCATEGORIZED);
                *categories.entry(category).or_default() += tx.amount;
            }
            TransactionKind::Transfer => {}
        }
    }
    let mut by_category: Vec<(String, Money)> = categories
        .into_iter()
        .map(|(name, total)| (name.to_string(), total))
        .collect();
    by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    summary.by_category = by_category;
    summary
}

/// Summary restricted to `month`, dates read in `tz`.
pub fn summarize_month<'a, Tz, I>(transactions: I, month: YearMonth, tz: &Tz) -> Summary
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Transaction>,
{
    summarize(
        transactions
            .into_iter()
            .filter(|tx| month.contains(tx.occurred_at.with_timezone(tz).date_naive())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::TransactionDraft;
    use chrono::{DateTime, Utc};

    fn tx(kind: TransactionKind, category: &str, major: i64, at: DateTime<Utc>) -> Transaction {
        let draft = TransactionDraft::new(kind, category, Money::from_major(major), at).unwrap();
        Transaction::provisional(&draft)
    }

    fn march() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn categories_sorted_descending() {
        let items = [
            tx(TransactionKind::Income, "Salary", 5000, march()),
            tx(TransactionKind::Expense, "Food", 300, march()),
            tx(TransactionKind::Expense, "Rent", 1200, march()),
            tx(TransactionKind::Expense, "Food", 200, march()),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.income, Money::from_major(5000));
        assert_eq!(summary.expense, Money::from_major(1700));
        assert_eq!(summary.balance(), Money::from_major(3300));
        assert_eq!(
            summary.by_category,
            vec![
                ("Rent".to_string(), Money::from_major(1200)),
                ("Food".to_string(), Money::from_major(500)),
            ]
        );
    }

    #[test]
    fn month_filter_and_income_override() {
        let april = Utc.with_ymd_and_hms(2026, 4, 1, 0, 30, 0).unwrap();
        let items = [
            tx(TransactionKind::Income, "Salary", 5000, march()),
            tx(TransactionKind::Expense, "Food", 100, april),
        ];
        let summary = summarize_month(&items, YearMonth::new(2026, 3), &Utc)
            .with_income(Some(Money::from_major(6000)));
        assert_eq!(summary.income, Money::from_major(6000));
        assert_eq!(summary.expense, Money::ZERO);
    }
}
