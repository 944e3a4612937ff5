//! Fetching and scheduling of notification passes.
//!
//! The pure merge lives in [`engine::notifications`]; this module fetches the
//! three sources concurrently, decides when a pass runs and keeps the list on
//! screen.

use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use engine::{
    Alert, AlertBoard, AlertKey, Bill, Money, NotificationLedger, PassInput, RefreshGate, Ticket,
    Trigger, YearMonth, budget, notifications::run_pass,
};
use tracing::{debug, info, warn};

use crate::client::{Client, ClientError, ClientResult};

/// Raw material of one pass. A source that failed contributes nothing.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub ticket: Ticket,
    pub month: YearMonth,
    pub server: Vec<Alert>,
    pub bills: Vec<Bill>,
    pub month_expense: Money,
    /// Set when any source answered 401.
    pub unauthorized: bool,
}

/// Fetches notifications, bills and the month's transactions concurrently.
pub async fn fetch(client: &Client, ticket: Ticket, now: DateTime<Utc>, tz: Tz) -> Fetched {
    let month = YearMonth::of(&now.with_timezone(&tz));
    let (start, end) = match (month.first_day(), month.last_day()) {
        (Some(start), Some(end)) => (start, end),
        _ => (now.date_naive(), now.date_naive()),
    };

    let (server, bills, transactions) = tokio::join!(
        client.notifications(),
        client.bills(),
        client.transactions_between(start, end),
    );

    let mut unauthorized = false;
    let server = isolate("notifications", server, &mut unauthorized);
    let bills = isolate("reminders", bills, &mut unauthorized);
    let transactions = isolate("transactions", transactions, &mut unauthorized);
    let month_expense = budget::monthly_expense_total(&transactions, month, &tz);

    Fetched {
        ticket,
        month,
        server,
        bills,
        month_expense,
        unauthorized,
    }
}

fn isolate<T>(source: &str, result: ClientResult<Vec<T>>, unauthorized: &mut bool) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            *unauthorized |= matches!(err, ClientError::Unauthorized);
            warn!(source, "notification source failed: {err}");
            Vec::new()
        }
    }
}

/// Context read from local state at merge time.
#[derive(Debug, Clone, Copy)]
pub struct MergeContext<'a> {
    pub budget: Option<Money>,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    pub currency_symbol: &'a str,
}

/// Scheduling plus the displayed list.
#[derive(Debug)]
pub struct Aggregator {
    gate: RefreshGate,
    board: AlertBoard,
    poll_interval: Duration,
    last_poll: Option<Instant>,
}

impl Aggregator {
    pub fn new(debounce: Duration, poll_interval: Duration) -> Self {
        Self {
            gate: RefreshGate::new(debounce),
            board: AlertBoard::default(),
            poll_interval,
            last_poll: None,
        }
    }

    pub fn request(&mut self, trigger: Trigger, now: Instant) -> Option<Ticket> {
        let ticket = self.gate.request(trigger, now);
        if ticket.is_some() {
            self.last_poll = Some(now);
        }
        ticket
    }

    /// Releases a debounced refresh or the periodic poll when due.
    pub fn tick(&mut self, now: Instant) -> Option<Ticket> {
        if let Some(ticket) = self.gate.poll(now) {
            self.last_poll = Some(now);
            return Some(ticket);
        }
        let due = self
            .last_poll
            .is_some_and(|last| now.saturating_duration_since(last) >= self.poll_interval);
        if due {
            return self.request(Trigger::Poll, now);
        }
        None
    }

    /// Whether a fetch carrying `ticket` still belongs to the current view.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.gate.is_current(ticket)
    }

    /// Merges a completed fetch. Returns the pop-ups to raise, or `None` when
    /// the fetch was superseded.
    pub fn apply(
        &mut self,
        fetched: Fetched,
        ledger: &mut NotificationLedger,
        ctx: MergeContext<'_>,
    ) -> Option<Vec<Alert>> {
        if !self.gate.accept(fetched.ticket) {
            debug!(ticket = fetched.ticket.value(), "superseded notification pass");
            return None;
        }
        let input = PassInput {
            server: fetched.server,
            bills: fetched.bills,
            month: fetched.month,
            month_expense: fetched.month_expense,
            budget: ctx.budget,
            today: ctx.today,
            now: ctx.now,
            currency_symbol: ctx.currency_symbol,
        };
        let outcome = run_pass(input, ledger, self.board.alerts());
        info!(
            visible = outcome.visible.len(),
            popups = outcome.popups.len(),
            "notifications refreshed"
        );
        self.board.replace(outcome.visible);
        Some(outcome.popups)
    }

    /// Hides `key` and records the durable marker for server alerts.
    pub fn mark_read(&mut self, key: &AlertKey, ledger: &mut NotificationLedger) -> Option<Alert> {
        let alert = self.board.mark_read(key)?;
        ledger.record_read(&alert);
        Some(alert)
    }

    pub fn alerts(&self) -> &[Alert] {
        self.board.alerts()
    }

    pub fn badge(&self) -> usize {
        self.board.badge()
    }

    pub fn reset(&mut self) {
        self.gate.reset();
        self.board.clear();
        self.last_poll = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use chrono::TimeZone;
    use engine::AlertSource;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, 6, 0, 0).unwrap()
    }

    async fn backend(reminders_fail: bool) -> Client {
        let reminders = move || async move {
            if reminders_fail {
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            } else {
                Ok(Json(json!({"reminders": [
                    {"_id": "b1", "name": "Rent", "amount": 900, "dueDate": "2026-02-05"}
                ]})))
            }
        };
        let app = Router::new()
            .route(
                "/notifications",
                get(|| async {
                    Json(json!({"notifications": [
                        {"_id": "n1", "title": "Hello", "createdAt": "2026-02-04T00:00:00Z"}
                    ]}))
                }),
            )
            .route("/reminders", get(reminders))
            .route(
                "/transactions",
                get(|| async {
                    Json(json!([
                        {"_id": "t1", "type": "expense", "category": "Food", "amount": 850,
                         "date": "2026-02-03T10:00:00Z"},
                        {"_id": "t2", "type": "income", "category": "Pay", "amount": 5000,
                         "date": "2026-02-01T10:00:00Z"}
                    ]))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Client::new(&format!("http://{addr}")).unwrap()
    }

    fn ctx(budget: Option<Money>) -> MergeContext<'static> {
        MergeContext {
            budget,
            today: now().date_naive(),
            now: now(),
            currency_symbol: "",
        }
    }

    #[tokio::test]
    async fn all_sources_merge() {
        let client = backend(false).await;
        let mut aggregator = Aggregator::new(Duration::from_millis(300), Duration::from_secs(30));
        let mut ledger = NotificationLedger::default();
        let ticket = aggregator.request(Trigger::Initial, Instant::now()).unwrap();

        let fetched = fetch(&client, ticket, now(), chrono_tz::UTC).await;
        assert_eq!(fetched.month_expense, Money::from_major(850));

        let popups = aggregator
            .apply(fetched, &mut ledger, ctx(Some(Money::from_major(1000))))
            .unwrap();
        let sources: Vec<AlertSource> = aggregator.alerts().iter().map(|a| a.source).collect();
        assert_eq!(aggregator.badge(), 3);
        assert!(sources.contains(&AlertSource::Server));
        assert!(sources.contains(&AlertSource::Bill));
        assert!(sources.contains(&AlertSource::Budget));
        assert_eq!(popups.len(), 2);
    }

    #[tokio::test]
    async fn failing_source_is_isolated() {
        let client = backend(true).await;
        let mut aggregator = Aggregator::new(Duration::from_millis(300), Duration::from_secs(30));
        let mut ledger = NotificationLedger::default();
        let ticket = aggregator.request(Trigger::Initial, Instant::now()).unwrap();

        let fetched = fetch(&client, ticket, now(), chrono_tz::UTC).await;
        assert!(fetched.bills.is_empty());
        assert!(!fetched.unauthorized);
        aggregator.apply(fetched, &mut ledger, ctx(None)).unwrap();
        assert_eq!(aggregator.badge(), 1);
    }

    #[tokio::test]
    async fn superseded_fetch_is_discarded() {
        let client = backend(false).await;
        let mut aggregator = Aggregator::new(Duration::from_millis(300), Duration::from_secs(30));
        let mut ledger = NotificationLedger::default();
        let start = Instant::now();
        let old = aggregator.request(Trigger::Initial, start).unwrap();
        let new = aggregator.request(Trigger::TransactionsChanged, start).unwrap();

        let fresh = fetch(&client, new, now(), chrono_tz::UTC).await;
        let stale = fetch(&client, old, now(), chrono_tz::UTC).await;
        assert!(aggregator.apply(fresh, &mut ledger, ctx(None)).is_some());
        assert!(aggregator.apply(stale, &mut ledger, ctx(None)).is_none());
    }

    #[test]
    fn poll_fires_after_interval() {
        let mut aggregator = Aggregator::new(Duration::from_millis(300), Duration::from_secs(30));
        let start = Instant::now();
        assert!(aggregator.tick(start).is_none());
        aggregator.request(Trigger::Initial, start).unwrap();
        assert!(aggregator.tick(start + Duration::from_secs(10)).is_none());
        assert!(aggregator.tick(start + Duration::from_secs(30)).is_some());
    }

    #[test]
    fn mark_read_updates_board_and_ledger() {
        let mut aggregator = Aggregator::new(Duration::from_millis(300), Duration::from_secs(30));
        let mut ledger = NotificationLedger::default();
        let ticket = aggregator.request(Trigger::Initial, Instant::now()).unwrap();
        let fetched = Fetched {
            ticket,
            month: YearMonth::new(2026, 2),
            server: vec![Alert::server("n1", "Hi", "", now(), false)],
            bills: Vec::new(),
            month_expense: Money::ZERO,
            unauthorized: false,
        };
        aggregator.apply(fetched, &mut ledger, ctx(None)).unwrap();
        assert!(aggregator.mark_read(&AlertKey::new("n1"), &mut ledger).is_some());
        assert_eq!(aggregator.badge(), 0);
        assert!(ledger.read.contains(&AlertKey::new("n1")));
    }
}
