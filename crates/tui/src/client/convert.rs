//! Wire views to engine types and back.

use api_types::{
    account::AccountView,
    notification::NotificationView,
    reminder::BillView,
    session::SessionView,
    transaction::{self as wire, TransactionNew, TransactionView, TransferLegView},
};
use chrono::{DateTime, Utc};
use engine::{
    Account, Alert, Bill, Division, Money, Transaction, TransactionDetail, TransactionDraft,
    TransactionId, TransactionKind, TransferSnapshot, bills,
};
use tracing::warn;

use super::DeviceSession;

pub fn transaction(view: TransactionView) -> Transaction {
    let kind = match view.kind {
        wire::TransactionType::Income => TransactionKind::Income,
        wire::TransactionType::Expense => TransactionKind::Expense,
        wire::TransactionType::Transfer => TransactionKind::Transfer,
    };
    let detail = match (kind, view.from, view.to) {
        (TransactionKind::Transfer, Some(from), Some(to)) => TransactionDetail::Transfer {
            from: snapshot(from),
            to: snapshot(to),
        },
        _ => TransactionDetail::Categorized {
            category: view.category,
        },
    };
    Transaction {
        id: TransactionId::new(view.id),
        kind,
        division: division(view.division),
        amount: Money::from_f64(view.amount),
        occurred_at: view.date,
        description: view.description.filter(|d| !d.is_empty()),
        account: view.account.filter(|a| !a.is_empty()),
        detail,
    }
}

fn snapshot(leg: TransferLegView) -> TransferSnapshot {
    TransferSnapshot {
        account_name: leg.account_name,
        account_number: leg.account_number,
        balance_before: Money::from_f64(leg.balance_before),
        balance_after: Money::from_f64(leg.balance_after),
    }
}

fn division(division: wire::Division) -> Division {
    match division {
        wire::Division::Personal => Division::Personal,
        wire::Division::Office => Division::Office,
    }
}

pub fn wire_division(division: Division) -> wire::Division {
    match division {
        Division::Personal => wire::Division::Personal,
        Division::Office => wire::Division::Office,
    }
}

/// Body of `POST /transactions/add`.
pub fn transaction_new(draft: &TransactionDraft) -> TransactionNew {
    let kind = match draft.kind {
        TransactionKind::Income => wire::TransactionType::Income,
        TransactionKind::Expense => wire::TransactionType::Expense,
        TransactionKind::Transfer => wire::TransactionType::Transfer,
    };
    TransactionNew {
        kind,
        category: draft.category.clone(),
        division: wire_division(draft.division),
        amount: draft.amount.to_f64(),
        date: draft.occurred_at,
        description: draft.description.clone().unwrap_or_default(),
        account: draft.account.clone().unwrap_or_default(),
    }
}

/// Bills with an unreadable due date are skipped.
pub fn bill(view: BillView) -> Option<Bill> {
    match bills::parse_due_date(&view.due_date) {
        Ok(due_date) => Some(Bill {
            id: view.id,
            name: view.name,
            amount: Money::from_f64(view.amount),
            due_date,
        }),
        Err(err) => {
            warn!(bill = %view.id, "skipping bill: {err}");
            None
        }
    }
}

/// Notifications without a timestamp sort last.
pub fn notification(view: NotificationView) -> Alert {
    Alert::server(
        view.id,
        view.title,
        view.body,
        view.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        view.read,
    )
}

pub fn account(view: AccountView) -> Account {
    Account {
        id: view.id,
        name: view.name,
        account_number: view.account_number,
        balance: Money::from_f64(view.balance),
    }
}

pub fn device_session(view: SessionView) -> DeviceSession {
    let device = if view.device.trim().is_empty() {
        "Unknown device".to_string()
    } else {
        view.device
    };
    DeviceSession {
        id: view.session_id,
        device,
        last_active: view.last_active_at,
    }
}
