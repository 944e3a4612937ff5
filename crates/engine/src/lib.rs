//! Client-side core of tally.
//!
//! Nothing here performs I/O: the terminal front-end fetches data, converts it
//! into these types and feeds it through the store, the alert merge and the
//! refresh gate.

pub use accounts::{Account, AccountDraft, TransferRequest};
pub use bills::{Bill, BillStatus};
pub use budget::{BudgetStatus, YearMonth};
pub use error::EngineError;
pub use money::Money;
pub use notifications::{
    Alert, AlertBoard, AlertKey, AlertLevel, AlertSource, AlertTable, NotificationLedger,
    PassInput, PassOutcome, PopupLedger, ReadMarkers,
};
pub use refresh::{RefreshGate, Ticket, Trigger};
pub use store::{Applied, StoreAction, TransactionStore};
pub use summary::Summary;
pub use transactions::{
    Division, Transaction, TransactionDetail, TransactionDraft, TransactionEdit, TransactionId,
    TransactionKind, TransferSnapshot,
};

pub mod accounts;
pub mod bills;
pub mod budget;
mod error;
mod money;
pub mod notifications;
pub mod refresh;
pub mod store;
pub mod summary;
pub mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
