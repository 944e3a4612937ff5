//! Bank accounts and fund transfers between them.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_number: String,
    pub balance: Money,
}

impl Account {
    /// Label used in pickers, e.g. `Savings (••1234)`.
    pub fn label(&self) -> String {
        let tail: String = {
            let chars: Vec<char> = self.account_number.chars().collect();
            let start = chars.len().saturating_sub(4);
            chars[start..].iter().collect()
        };
        if tail.is_empty() {
            self.name.clone()
        } else {
            format!("{} (••{tail})", self.name)
        }
    }
}

/// Validated account form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDraft {
    pub name: String,
    pub account_number: String,
    pub balance: Money,
}

impl AccountDraft {
    pub fn new(name: &str, account_number: &str, balance: Money) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::MissingField("name".to_string()));
        }
        let account_number = account_number.trim();
        if account_number.is_empty() {
            return Err(EngineError::MissingField("account number".to_string()));
        }
        if balance.is_negative() {
            return Err(EngineError::InvalidAmount(
                "balance cannot be negative".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            account_number: account_number.to_string(),
            balance,
        })
    }
}

/// A transfer that passed local validation. Balance checks stay on the
/// backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

impl TransferRequest {
    pub fn new(from: &str, to: &str, amount: Money) -> ResultEngine<Self> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(EngineError::MissingField("account".to_string()));
        }
        if from == to {
            return Err(EngineError::SameAccount);
        }
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_rejects_same_account() {
        assert_eq!(
            TransferRequest::new("a1", "a1", Money::new(100)),
            Err(EngineError::SameAccount)
        );
    }

    #[test]
    fn transfer_requires_both_accounts_and_positive_amount() {
        assert!(matches!(
            TransferRequest::new("", "a2", Money::new(100)),
            Err(EngineError::MissingField(_))
        ));
        assert!(matches!(
            TransferRequest::new("a1", "a2", Money::ZERO),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(TransferRequest::new("a1", "a2", Money::new(1)).is_ok());
    }

    #[test]
    fn label_masks_account_number() {
        let account = Account {
            id: "x".to_string(),
            name: "Savings".to_string(),
            account_number: "00991234".to_string(),
            balance: Money::ZERO,
        };
        assert_eq!(account.label(), "Savings (••1234)");
    }

    #[test]
    fn draft_validates_fields() {
        assert!(AccountDraft::new(" ", "1", Money::ZERO).is_err());
        assert!(AccountDraft::new("Main", "1", Money::new(-1)).is_err());
        assert_eq!(
            AccountDraft::new(" Main ", " 42 ", Money::new(10)).unwrap().name,
            "Main"
        );
    }
}
