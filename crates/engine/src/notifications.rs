//! Alert synthesis, keyed merge and pop-up suppression.
//!
//! Three independent sources feed the alert list:
//!
//! - server notifications, which carry their own durable read flag;
//! - bill alerts, derived from the bill reminders on every pass;
//! - budget alerts, derived from the month's expenses and the local budget.
//!
//! They meet in an [`AlertTable`] keyed by [`AlertKey`]. Synthetic keys are
//! derived deterministically, so recomputing a pass over unchanged data yields
//! the same keys in the same order. Bill and budget alerts never take their
//! read flag from durable storage: when their condition still holds on the next
//! pass they come back unread.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Money,
    bills::{Bill, BillStatus},
    budget::{self, BudgetStatus, YearMonth},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertKey(String);

impl AlertKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Changes whenever the bill's due date or amount change, so an edited
    /// bill pops up again.
    pub fn for_bill(bill: &Bill) -> Self {
        Self(format!(
            "bill-{}-{}-{}",
            bill.id,
            bill.due_date.format("%Y-%m-%d"),
            bill.amount.cents()
        ))
    }

    pub fn for_budget(month: YearMonth, status: &BudgetStatus) -> Self {
        let kind = match status {
            BudgetStatus::Exceeded { .. } => "exceed",
            BudgetStatus::Warning { .. } => "warning",
        };
        Self(format!("budget-{kind}-month-{}-{}", month.year, month.month))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertSource {
    #[serde(rename = "notification")]
    Server,
    #[serde(rename = "bill-alert")]
    Bill,
    #[serde(rename = "budget-alert")]
    Budget,
}

impl AlertSource {
    /// Bill and budget alerts are recomputed every pass.
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::Bill | Self::Budget)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Urgent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub key: AlertKey,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub source: AlertSource,
    pub level: AlertLevel,
}

impl Alert {
    pub fn server(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
        read: bool,
    ) -> Self {
        Self {
            key: AlertKey::new(id),
            title: title.into(),
            body: body.into(),
            created_at,
            read,
            source: AlertSource::Server,
            level: AlertLevel::Info,
        }
    }

    /// Builds the alert for `bill` on `today`, if it is due within the window.
    pub fn for_bill(bill: &Bill, today: NaiveDate, now: DateTime<Utc>, symbol: &str) -> Option<Self> {
        let amount = bill.amount.format(symbol);
        let (title, body, level) = match bill.status(today)? {
            BillStatus::Overdue { days } => (
                format!("{} Bill Overdue", bill.name),
                format!("{days} day{} overdue • {amount}", plural(days)),
                AlertLevel::Urgent,
            ),
            BillStatus::DueToday => (
                format!("{} Bill Due Today", bill.name),
                format!("{amount} due today"),
                AlertLevel::Urgent,
            ),
            BillStatus::Upcoming { days } => (
                format!("{} Due in {days} Day{}", bill.name, plural(days)),
                format!("{amount} due on {}", bill.due_date.format("%d/%m/%Y")),
                AlertLevel::Warning,
            ),
        };
        Some(Self {
            key: AlertKey::for_bill(bill),
            title,
            body,
            created_at: now,
            read: false,
            source: AlertSource::Bill,
            level,
        })
    }

    /// Builds the budget alert for `month`, if spending crossed the threshold.
    pub fn for_budget(
        month: YearMonth,
        total_expense: Money,
        budget: Money,
        now: DateTime<Utc>,
        symbol: &str,
    ) -> Option<Self> {
        let status = budget::evaluate(total_expense, budget)?;
        let (title, body, level) = match status {
            BudgetStatus::Exceeded { excess, percent } => (
                "Monthly Budget Exceeded".to_string(),
                format!(
                    "You've exceeded by {} ({percent}% of {})",
                    excess.format(symbol),
                    budget.format(symbol)
                ),
                AlertLevel::Urgent,
            ),
            BudgetStatus::Warning { remaining, percent } => (
                "Monthly Budget Warning".to_string(),
                format!(
                    "Only {} remaining ({percent}% used)",
                    remaining.format(symbol)
                ),
                AlertLevel::Warning,
            ),
        };
        Some(Self {
            key: AlertKey::for_budget(month, &status),
            title,
            body,
            created_at: now,
            read: false,
            source: AlertSource::Budget,
            level,
        })
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.is_synthetic()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Durable set of server notification ids the user dismissed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadMarkers(BTreeSet<AlertKey>);

impl ReadMarkers {
    pub fn contains(&self, key: &AlertKey) -> bool {
        self.0.contains(key)
    }

    pub fn insert(&mut self, key: AlertKey) -> bool {
        self.0.insert(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Durable set of synthetic alert keys that already raised a pop-up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopupLedger(BTreeSet<AlertKey>);

impl PopupLedger {
    /// Returns the alerts that should pop up now and remembers them.
    ///
    /// Only unread bill/budget alerts not seen before qualify.
    pub fn select(&mut self, visible: &[Alert]) -> Vec<Alert> {
        visible
            .iter()
            .filter(|alert| alert.is_synthetic() && !alert.read)
            .filter(|alert| self.0.insert(alert.key.clone()))
            .cloned()
            .collect()
    }

    /// Forgets every pop-up, e.g. on a fresh login.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Everything about notifications that outlives a pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationLedger {
    pub read: ReadMarkers,
    pub popped: PopupLedger,
    /// Last visible server notifications.
    pub cached: Vec<Alert>,
}

impl NotificationLedger {
    /// Records that the user dismissed `alert`.
    ///
    /// Server alerts get a durable marker and leave the cached snapshot;
    /// synthetic alerts leave no trace.
    pub fn record_read(&mut self, alert: &Alert) {
        if alert.is_synthetic() {
            return;
        }
        self.read.insert(alert.key.clone());
        self.cached.retain(|cached| cached.key != alert.key);
    }
}

/// Alerts keyed by [`AlertKey`], one entry per key.
#[derive(Debug, Default, Clone)]
pub struct AlertTable {
    entries: HashMap<AlertKey, Alert>,
}

impl AlertTable {
    /// Merges one pass worth of alerts.
    ///
    /// 1. synthetic alerts are inserted, keeping the `created_at` they had in
    ///    `previous` for the same key;
    /// 2. server alerts are inserted over them, so server content wins on a
    ///    key collision;
    /// 3. the cached snapshot is overlaid: read flags are OR-ed into server
    ///    entries, unread cached-only server entries are kept;
    /// 4. durable read markers mark server entries read.
    pub fn merge(
        server: Vec<Alert>,
        synthetic: Vec<Alert>,
        ledger: &NotificationLedger,
        previous: &[Alert],
    ) -> Self {
        let first_seen: HashMap<&AlertKey, DateTime<Utc>> = previous
            .iter()
            .filter(|alert| alert.is_synthetic())
            .map(|alert| (&alert.key, alert.created_at))
            .collect();

        let mut table = Self::default();
        for mut alert in synthetic {
            if let Some(created_at) = first_seen.get(&alert.key) {
                alert.created_at = *created_at;
            }
            table.entries.insert(alert.key.clone(), alert);
        }
        for alert in server {
            table.entries.insert(alert.key.clone(), alert);
        }

        for cached in ledger.cached.iter().filter(|c| !c.is_synthetic()) {
            match table.entries.get_mut(&cached.key) {
                Some(existing) if !existing.is_synthetic() => {
                    existing.read |= cached.read;
                }
                Some(_) => {}
                None if !cached.read => {
                    table.entries.insert(cached.key.clone(), cached.clone());
                }
                None => {}
            }
        }

        for alert in table.entries.values_mut() {
            if !alert.is_synthetic() && ledger.read.contains(&alert.key) {
                alert.read = true;
            }
        }

        debug!(entries = table.entries.len(), "merged alert table");
        table
    }

    pub fn get(&self, key: &AlertKey) -> Option<&Alert> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All alerts, newest first; ties broken by key.
    pub fn into_sorted(self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.entries.into_values().collect();
        alerts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        alerts
    }
}

/// Inputs of one aggregation pass, already fetched.
#[derive(Clone, Debug)]
pub struct PassInput<'a> {
    pub server: Vec<Alert>,
    pub bills: Vec<Bill>,
    pub month: YearMonth,
    pub month_expense: Money,
    pub budget: Option<Money>,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    pub currency_symbol: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Unread alerts, newest first.
    pub visible: Vec<Alert>,
    /// Alerts that should raise a transient pop-up.
    pub popups: Vec<Alert>,
}

/// Synthesizes bill and budget alerts for a pass.
pub fn synthesize(input: &PassInput<'_>) -> Vec<Alert> {
    let mut seen = HashSet::new();
    let mut alerts: Vec<Alert> = input
        .bills
        .iter()
        .filter(|bill| seen.insert(bill.id.as_str()))
        .filter_map(|bill| Alert::for_bill(bill, input.today, input.now, input.currency_symbol))
        .collect();

    if let Some(budget) = input.budget {
        alerts.extend(Alert::for_budget(
            input.month,
            input.month_expense,
            budget,
            input.now,
            input.currency_symbol,
        ));
    }
    alerts
}

/// Runs a full pass: synthesis, merge, unread filter, pop-up selection, and
/// refresh of the cached server snapshot.
pub fn run_pass(input: PassInput<'_>, ledger: &mut NotificationLedger, previous: &[Alert]) -> PassOutcome {
    let synthetic = synthesize(&input);
    let table = AlertTable::merge(input.server, synthetic, ledger, previous);
    let visible: Vec<Alert> = table
        .into_sorted()
        .into_iter()
        .filter(|alert| !alert.read)
        .collect();

    let popups = ledger.popped.select(&visible);
    ledger.cached = visible
        .iter()
        .filter(|alert| alert.source == AlertSource::Server)
        .cloned()
        .collect();

    PassOutcome { visible, popups }
}

/// The alert list currently on screen.
#[derive(Debug, Default, Clone)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
}

impl AlertBoard {
    pub fn replace(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
    }

    /// Removes `key` from the display immediately and returns it.
    pub fn mark_read(&mut self, key: &AlertKey) -> Option<Alert> {
        let index = self.alerts.iter().position(|alert| &alert.key == key)?;
        let mut alert = self.alerts.remove(index);
        alert.read = true;
        Some(alert)
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Number shown on the notification badge.
    pub fn badge(&self) -> usize {
        self.alerts.len()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, 9, 0, 0).unwrap()
    }

    fn bill(id: &str, days_from_today: i64) -> Bill {
        Bill {
            id: id.to_string(),
            name: "Power".to_string(),
            amount: Money::from_major(1200),
            due_date: now().date_naive() + Duration::days(days_from_today),
        }
    }

    #[test]
    fn bill_key_tracks_due_date_and_amount() {
        let a = bill("b1", 3);
        let mut b = a.clone();
        assert_eq!(AlertKey::for_bill(&a), AlertKey::for_bill(&b));
        b.amount = Money::from_major(1300);
        assert_ne!(AlertKey::for_bill(&a), AlertKey::for_bill(&b));
        assert_eq!(AlertKey::for_bill(&a).as_str(), "bill-b1-2026-02-08-120000");
    }

    #[test]
    fn bill_alert_texts() {
        let overdue = Alert::for_bill(&bill("b1", -1), now().date_naive(), now(), "₹").unwrap();
        assert_eq!(overdue.title, "Power Bill Overdue");
        assert_eq!(overdue.body, "1 day overdue • ₹1200.00");
        assert_eq!(overdue.level, AlertLevel::Urgent);

        let upcoming = Alert::for_bill(&bill("b1", 3), now().date_naive(), now(), "").unwrap();
        assert_eq!(upcoming.title, "Power Due in 3 Days");
        assert_eq!(upcoming.body, "1200.00 due on 08/02/2026");
    }

    #[test]
    fn budget_alert_keys_differ_by_status() {
        let month = YearMonth::new(2026, 2);
        let warn = Alert::for_budget(month, Money::from_major(8000), Money::from_major(10_000), now(), "")
            .unwrap();
        assert_eq!(warn.key.as_str(), "budget-warning-month-2026-2");
        assert_eq!(warn.body, "Only 2000.00 remaining (80% used)");
        let over = Alert::for_budget(month, Money::from_major(12_000), Money::from_major(10_000), now(), "")
            .unwrap();
        assert_eq!(over.key.as_str(), "budget-exceed-month-2026-2");
        assert_eq!(over.body, "You've exceeded by 2000.00 (120% of 10000.00)");
    }

    #[test]
    fn server_content_wins_on_collision() {
        let synthetic = Alert::for_bill(&bill("b1", 0), now().date_naive(), now(), "").unwrap();
        let server = Alert::server(synthetic.key.as_str(), "From server", "", now(), false);
        let table = AlertTable::merge(vec![server], vec![synthetic.clone()], &NotificationLedger::default(), &[]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&synthetic.key).unwrap().title, "From server");
    }

    #[test]
    fn read_markers_ignore_synthetic_alerts() {
        let synthetic = Alert::for_bill(&bill("b1", 0), now().date_naive(), now(), "").unwrap();
        let server = Alert::server("n1", "Hello", "", now(), false);
        let mut ledger = NotificationLedger::default();
        ledger.read.insert(AlertKey::new("n1"));
        ledger.read.insert(synthetic.key.clone());

        let table = AlertTable::merge(vec![server], vec![synthetic.clone()], &ledger, &[]);
        assert!(table.get(&AlertKey::new("n1")).unwrap().read);
        assert!(!table.get(&synthetic.key).unwrap().read);
    }

    #[test]
    fn cached_read_flag_is_ored_in() {
        let mut ledger = NotificationLedger::default();
        let mut cached = Alert::server("n1", "Hello", "", now(), true);
        ledger.cached.push(cached.clone());
        cached.key = AlertKey::new("n2");
        cached.read = false;
        ledger.cached.push(cached);

        let table = AlertTable::merge(
            vec![Alert::server("n1", "Hello", "", now(), false)],
            Vec::new(),
            &ledger,
            &[],
        );
        assert!(table.get(&AlertKey::new("n1")).unwrap().read);
        assert!(!table.get(&AlertKey::new("n2")).unwrap().read);
    }

    #[test]
    fn sorted_newest_first_with_stable_ties() {
        let older = Alert::server("a", "", "", now() - Duration::hours(1), false);
        let tie_b = Alert::server("c", "", "", now(), false);
        let tie_a = Alert::server("b", "", "", now(), false);
        let sorted = AlertTable::merge(vec![older, tie_b, tie_a], Vec::new(), &NotificationLedger::default(), &[])
            .into_sorted();
        let keys: Vec<&str> = sorted.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["b", "c", "a"]);
    }

    #[test]
    fn popups_fire_once_per_key() {
        let mut ledger = PopupLedger::default();
        let alert = Alert::for_bill(&bill("b1", 2), now().date_naive(), now(), "").unwrap();
        let server = Alert::server("n1", "", "", now(), false);
        let visible = vec![alert.clone(), server];
        assert_eq!(ledger.select(&visible), vec![alert.clone()]);
        assert!(ledger.select(&visible).is_empty());
        ledger.clear();
        assert_eq!(ledger.select(&visible), vec![alert]);
    }

    #[test]
    fn board_mark_read_removes_entry() {
        let mut board = AlertBoard::default();
        board.replace(vec![
            Alert::server("a", "", "", now(), false),
            Alert::server("b", "", "", now(), false),
        ]);
        let removed = board.mark_read(&AlertKey::new("a")).unwrap();
        assert!(removed.read);
        assert_eq!(board.badge(), 1);
        assert!(board.mark_read(&AlertKey::new("zz")).is_none());
    }

    #[test]
    fn record_read_only_persists_server_alerts() {
        let mut ledger = NotificationLedger::default();
        let server = Alert::server("n1", "", "", now(), false);
        ledger.cached.push(server.clone());
        let synthetic = Alert::for_bill(&bill("b1", 0), now().date_naive(), now(), "").unwrap();

        ledger.record_read(&synthetic);
        assert!(ledger.read.is_empty());

        ledger.record_read(&server);
        assert!(ledger.read.contains(&server.key));
        assert!(ledger.cached.is_empty());
    }
}
