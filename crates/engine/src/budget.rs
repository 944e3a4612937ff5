//! Monthly budget evaluation.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{
    Money,
    transactions::{Transaction, TransactionKind},
};

/// Share of the budget, in percent, from which a warning is raised.
pub const WARNING_THRESHOLD_PERCENT: i64 = 80;

/// A calendar month. Formats as `2026-2`, the key used for per-month settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::new(instant.year(), instant.month())
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.pred_opt())
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetStatus {
    Exceeded { excess: Money, percent: i64 },
    Warning { remaining: Money, percent: i64 },
}

/// Compares the month's spending against `budget`.
///
/// Returns `None` for an unset (non-positive) budget or spending below the
/// warning threshold.
pub fn evaluate(total_expense: Money, budget: Money) -> Option<BudgetStatus> {
    let percent = total_expense.percent_of(budget)?;
    let rounded = percent.round() as i64;
    if total_expense > budget {
        return Some(BudgetStatus::Exceeded {
            excess: total_expense - budget,
            percent: rounded,
        });
    }
    // Integer comparison keeps exactly 80% on the warning side.
    if total_expense.cents() * 100 >= budget.cents() * WARNING_THRESHOLD_PERCENT {
        return Some(BudgetStatus::Warning {
            remaining: budget - total_expense,
            percent: rounded,
        });
    }
    None
}

/// Sums expenses whose date falls in `month`, dates read in `tz`.
pub fn monthly_expense_total<'a, Tz, I>(transactions: I, month: YearMonth, tz: &Tz) -> Money
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
        .filter(|tx| month.contains(tx.occurred_at.with_timezone(tz).date_naive()))
        .map(|tx| tx.amount)
        .sum()
}
