//! In-memory transaction list with optimistic mutations.
//!
//! The list is ordered newest-first. Every mutation goes through
//! [`TransactionStore::apply`], which is synchronous, so actions issued
//! back-to-back are applied in issuance order.

use crate::transactions::{Transaction, TransactionId};

/// A single mutation of the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreAction {
    /// Prepend a record.
    Add(Transaction),
    /// Replace the record with `id`; no-op when absent.
    Update {
        id: TransactionId,
        transaction: Transaction,
    },
    /// Remove the record with `id`.
    Delete { id: TransactionId },
    /// Promote the provisional record `temp_id` to the confirmed `transaction`.
    ReplaceTemp {
        temp_id: TransactionId,
        transaction: Transaction,
    },
    /// Drop the provisional record `temp_id` after a failed add.
    RemoveTemp { temp_id: TransactionId },
    /// Put back a record removed by a failed delete, at its former position.
    Restore {
        index: usize,
        transaction: Transaction,
    },
}

/// What an [`StoreAction`] changed, carrying what is needed to undo it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Nothing,
    Inserted,
    Replaced { previous: Transaction },
    Removed { index: usize, previous: Transaction },
}

#[derive(Debug, Default, Clone)]
pub struct TransactionStore {
    items: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection verbatim, e.g. after a filtered reload.
    pub fn replace_all(&mut self, items: Vec<Transaction>) {
        self.items = items;
    }

    /// Prepends a record.
    pub fn insert(&mut self, transaction: Transaction) {
        self.items.insert(0, transaction);
    }

    pub fn apply(&mut self, action: StoreAction) -> Applied {
        match action {
            StoreAction::Add(transaction) => {
                self.insert(transaction);
                Applied::Inserted
            }
            StoreAction::Update { id, transaction } => self.replace(&id, transaction),
            StoreAction::Delete { id } | StoreAction::RemoveTemp { temp_id: id } => {
                self.remove(&id)
            }
            StoreAction::ReplaceTemp {
                temp_id,
                transaction,
            } => match self.replace(&temp_id, transaction.clone()) {
                Applied::Nothing if self.position(&transaction.id).is_none() => {
                    // The provisional entry was wiped by a reload that did not
                    // yet contain the confirmed record.
                    self.insert(transaction);
                    Applied::Inserted
                }
                applied => applied,
            },
            StoreAction::Restore { index, transaction } => {
                if self.position(&transaction.id).is_some() {
                    return Applied::Nothing;
                }
                let index = index.min(self.items.len());
                self.items.insert(index, transaction);
                Applied::Inserted
            }
        }
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.items.iter().find(|tx| &tx.id == id)
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.items.iter().position(|tx| &tx.id == id)
    }

    fn replace(&mut self, id: &TransactionId, transaction: Transaction) -> Applied {
        match self.position(id) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.items[index], transaction);
                Applied::Replaced { previous }
            }
            None => Applied::Nothing,
        }
    }

    fn remove(&mut self, id: &TransactionId) -> Applied {
        match self.position(id) {
            Some(index) => {
                let previous = self.items.remove(index);
                Applied::Removed { index, previous }
            }
            None => Applied::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Money,
        transactions::{TransactionDraft, TransactionKind},
    };
    use chrono::{TimeZone, Utc};

    fn tx(id: &str, cents: i64) -> Transaction {
        let occurred_at = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let draft =
            TransactionDraft::new(TransactionKind::Expense, "Food", Money::new(cents), occurred_at)
                .unwrap();
        let mut tx = Transaction::provisional(&draft);
        tx.id = TransactionId::new(id);
        tx
    }

    fn ids(store: &TransactionStore) -> Vec<&str> {
        store.items().iter().map(|tx| tx.id.as_str()).collect()
    }

    #[test]
    fn add_prepends() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("a", 1), tx("b", 2)]);
        store.apply(StoreAction::Add(tx("c", 3)));
        assert_eq!(ids(&store), ["c", "a", "b"]);
    }

    #[test]
    fn update_missing_is_noop() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("a", 1)]);
        let applied = store.apply(StoreAction::Update {
            id: TransactionId::new("zz"),
            transaction: tx("zz", 5),
        });
        assert_eq!(applied, Applied::Nothing);
        assert_eq!(ids(&store), ["a"]);
    }

    #[test]
    fn update_returns_previous() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("a", 1), tx("b", 2)]);
        let applied = store.apply(StoreAction::Update {
            id: TransactionId::new("b"),
            transaction: tx("b", 20),
        });
        assert_eq!(applied, Applied::Replaced { previous: tx("b", 2) });
        assert_eq!(store.get(&TransactionId::new("b")).unwrap().amount, Money::new(20));
    }

    #[test]
    fn delete_then_restore_keeps_position() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("a", 1), tx("b", 2), tx("c", 3)]);
        let Applied::Removed { index, previous } = store.apply(StoreAction::Delete {
            id: TransactionId::new("b"),
        }) else {
            panic!("expected removal");
        };
        assert_eq!(ids(&store), ["a", "c"]);
        store.apply(StoreAction::Restore {
            index,
            transaction: previous,
        });
        assert_eq!(ids(&store), ["a", "b", "c"]);
    }

    #[test]
    fn replace_temp_promotes_in_place() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("a", 1)]);
        store.apply(StoreAction::Add(tx("temp-1", 5)));
        store.apply(StoreAction::Add(tx("temp-2", 6)));
        store.apply(StoreAction::ReplaceTemp {
            temp_id: TransactionId::new("temp-1"),
            transaction: tx("srv-1", 5),
        });
        assert_eq!(ids(&store), ["temp-2", "srv-1", "a"]);
    }

    #[test]
    fn replace_temp_after_reload_does_not_duplicate() {
        let mut store = TransactionStore::new();
        store.apply(StoreAction::Add(tx("temp-1", 5)));
        // A reload already returned the confirmed record.
        store.replace_all(vec![tx("srv-1", 5), tx("a", 1)]);
        store.apply(StoreAction::ReplaceTemp {
            temp_id: TransactionId::new("temp-1"),
            transaction: tx("srv-1", 5),
        });
        assert_eq!(ids(&store), ["srv-1", "a"]);

        // A reload that missed it.
        store.apply(StoreAction::Add(tx("temp-2", 7)));
        store.replace_all(vec![tx("a", 1)]);
        store.apply(StoreAction::ReplaceTemp {
            temp_id: TransactionId::new("temp-2"),
            transaction: tx("srv-2", 7),
        });
        assert_eq!(ids(&store), ["srv-2", "a"]);
    }

    #[test]
    fn remove_temp_rolls_back_add() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("a", 1)]);
        store.apply(StoreAction::Add(tx("temp-1", 5)));
        store.apply(StoreAction::RemoveTemp {
            temp_id: TransactionId::new("temp-1"),
        });
        assert_eq!(ids(&store), ["a"]);
    }
}
