//! Transaction primitives.
//!
//! A `Transaction` is either a categorized income/expense or a transfer between
//! two accounts. Records created on the client before the backend confirms them
//! carry a provisional id (see [`TransactionId::provisional`]).

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

const PROVISIONAL_PREFIX: &str = "temp-";

/// Hours after `occurred_at` during which a transaction may still be edited.
pub const EDIT_WINDOW_HOURS: i64 = 12;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh client-side id, marked so it is never mistaken for a server id.
    pub fn provisional() -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    #[default]
    Personal,
    Office,
}

impl Division {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Office => "Office",
        }
    }
}

/// Account state recorded on one side of a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSnapshot {
    pub account_name: String,
    pub account_number: String,
    pub balance_before: Money,
    pub balance_after: Money,
}

/// Kind-specific payload. Categorized records never carry a transfer pair and
/// transfers never carry a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDetail {
    Categorized {
        category: String,
    },
    Transfer {
        from: TransferSnapshot,
        to: TransferSnapshot,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub division: Division,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
    pub account: Option<String>,
    pub detail: TransactionDetail,
}

impl Transaction {
    /// Builds the provisional record shown while the add request is in flight.
    pub fn provisional(draft: &TransactionDraft) -> Self {
        Self {
            id: TransactionId::provisional(),
            kind: draft.kind,
            division: draft.division,
            amount: draft.amount,
            occurred_at: draft.occurred_at,
            description: draft.description.clone(),
            account: draft.account.clone(),
            detail: TransactionDetail::Categorized {
                category: draft.category.clone(),
            },
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }

    pub fn category(&self) -> Option<&str> {
        match &self.detail {
            TransactionDetail::Categorized { category } => Some(category.as_str()),
            TransactionDetail::Transfer { .. } => None,
        }
    }

    /// Rejects edits outside the window measured from `occurred_at`.
    pub fn ensure_editable(&self, now: DateTime<Utc>) -> ResultEngine<()> {
        if now - self.occurred_at > Duration::hours(EDIT_WINDOW_HOURS) {
            return Err(EngineError::EditWindowExpired);
        }
        Ok(())
    }

    /// Returns a copy with the edit applied, used as the optimistic value.
    pub fn edited(&self, edit: &TransactionEdit) -> Self {
        let mut updated = self.clone();
        updated.amount = edit.amount;
        if let TransactionDetail::Categorized { category } = &mut updated.detail {
            category.clone_from(&edit.category);
        }
        updated
    }
}

/// Validated input of the add form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub category: String,
    pub division: Division,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
    pub account: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        category: &str,
        amount: Money,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if kind == TransactionKind::Transfer {
            return Err(EngineError::InvalidAmount(
                "transfers are booked through accounts".to_string(),
            ));
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(EngineError::MissingField("category".to_string()));
        }
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            kind,
            category: category.to_string(),
            division: Division::Personal,
            amount,
            occurred_at,
            description: None,
            account: None,
        })
    }

    pub fn division(mut self, division: Division) -> Self {
        self.division = division;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn account(mut self, account: Option<String>) -> Self {
        self.account = account.filter(|a| !a.trim().is_empty());
        self
    }
}

/// Fields the backend lets the user change on an existing record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEdit {
    pub category: String,
    pub amount: Money,
}

impl TransactionEdit {
    pub fn new(category: &str, amount: Money) -> ResultEngine<Self> {
        let category = category.trim();
        if category.is_empty() {
            return Err(EngineError::MissingField("category".to_string()));
        }
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            category: category.to_string(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, h, m, 0).unwrap()
    }

    fn expense(occurred_at: DateTime<Utc>) -> Transaction {
        let draft =
            TransactionDraft::new(TransactionKind::Expense, "Food", Money::new(4500), occurred_at)
                .unwrap();
        Transaction::provisional(&draft)
    }

    #[test]
    fn provisional_ids_are_marked() {
        let id = TransactionId::provisional();
        assert!(id.is_provisional());
        assert!(!TransactionId::new("65f0a1").is_provisional());
        assert_ne!(TransactionId::provisional(), id);
    }

    #[test]
    fn edit_window_is_twelve_hours() {
        let tx = expense(at(8, 0));
        assert!(tx.ensure_editable(at(20, 0)).is_ok());
        assert_eq!(
            tx.ensure_editable(at(20, 1)),
            Err(EngineError::EditWindowExpired)
        );
    }

    #[test]
    fn draft_requires_category_and_positive_amount() {
        assert_eq!(
            TransactionDraft::new(TransactionKind::Income, "  ", Money::new(100), at(1, 0)),
            Err(EngineError::MissingField("category".to_string()))
        );
        assert!(TransactionDraft::new(TransactionKind::Income, "Salary", Money::ZERO, at(1, 0)).is_err());
        assert!(
            TransactionDraft::new(TransactionKind::Transfer, "x", Money::new(1), at(1, 0)).is_err()
        );
    }

    #[test]
    fn edited_keeps_identity() {
        let tx = expense(at(8, 0));
        let edit = TransactionEdit::new("Fuel", Money::new(9900)).unwrap();
        let updated = tx.edited(&edit);
        assert_eq!(updated.id, tx.id);
        assert_eq!(updated.category(), Some("Fuel"));
        assert_eq!(updated.amount, Money::new(9900));
    }
}
