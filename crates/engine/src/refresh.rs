//! Debounce and ordering of notification refreshes.

use std::time::{Duration, Instant};

use tracing::trace;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Why a refresh was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    Initial,
    Login,
    Poll,
    TransactionsChanged,
    BillsChanged,
    AccountsChanged,
    BudgetChanged,
    Manual,
}

impl Trigger {
    pub fn bypasses_debounce(self) -> bool {
        matches!(
            self,
            Self::Initial | Self::Login | Self::TransactionsChanged
        )
    }
}

/// Sequence number of an accepted refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Decides when a refresh runs and which results may be merged.
///
/// Triggers arriving within `debounce` of the last accepted one collapse into
/// a single trailing refresh, released by [`RefreshGate::poll`]. Results are
/// merged only when their ticket is newer than the last merged one.
#[derive(Debug, Clone)]
pub struct RefreshGate {
    debounce: Duration,
    issued: u64,
    merged: u64,
    last_accepted: Option<Instant>,
    pending_since: Option<Instant>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl RefreshGate {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            issued: 0,
            merged: 0,
            last_accepted: None,
            pending_since: None,
        }
    }

    /// Returns a ticket when the refresh should start now.
    pub fn request(&mut self, trigger: Trigger, now: Instant) -> Option<Ticket> {
        let quiet = self
            .last_accepted
            .is_none_or(|last| now.saturating_duration_since(last) >= self.debounce);
        if trigger.bypasses_debounce() || quiet {
            return Some(self.issue(now));
        }
        trace!(?trigger, "refresh coalesced");
        self.pending_since.get_or_insert(now);
        None
    }

    /// Releases a coalesced refresh once the debounce window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Ticket> {
        self.pending_since?;
        let last = self.last_accepted?;
        if now.saturating_duration_since(last) < self.debounce {
            return None;
        }
        Some(self.issue(now))
    }

    /// Whether `ticket` is newer than everything merged or reset so far.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 > self.merged
    }

    /// Whether results of `ticket` may replace what is displayed.
    ///
    /// Accepting a ticket retires every older one.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 <= self.merged {
            trace!(ticket = ticket.0, merged = self.merged, "stale refresh dropped");
            return false;
        }
        self.merged = ticket.0;
        true
    }

    /// Forgets timing state, e.g. on logout. Ticket numbers stay monotonic so
    /// fetches started before the reset can never be merged afterwards.
    pub fn reset(&mut self) {
        self.merged = self.issued;
        self.last_accepted = None;
        self.pending_since = None;
    }

    fn issue(&mut self, now: Instant) -> Ticket {
        self.issued += 1;
        self.last_accepted = Some(now);
        self.pending_since = None;
        Ticket(self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn triggers_inside_window_coalesce() {
        let start = Instant::now();
        let mut gate = RefreshGate::default();
        assert!(gate.request(Trigger::Poll, start).is_some());
        assert!(gate.request(Trigger::BudgetChanged, start + ms(100)).is_none());
        assert!(gate.request(Trigger::BillsChanged, start + ms(200)).is_none());
        assert!(gate.poll(start + ms(250)).is_none());
        assert!(gate.poll(start + ms(300)).is_some());
        assert!(gate.poll(start + ms(900)).is_none());
    }

    #[test]
    fn bypass_triggers_run_immediately() {
        let start = Instant::now();
        let mut gate = RefreshGate::default();
        let first = gate.request(Trigger::Initial, start).unwrap();
        let second = gate.request(Trigger::TransactionsChanged, start + ms(10)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn stale_results_are_rejected() {
        let start = Instant::now();
        let mut gate = RefreshGate::default();
        let slow = gate.request(Trigger::Initial, start).unwrap();
        let fast = gate.request(Trigger::Login, start + ms(1)).unwrap();
        assert!(gate.accept(fast));
        assert!(!gate.accept(slow));
    }

    #[test]
    fn reset_retires_in_flight_tickets() {
        let start = Instant::now();
        let mut gate = RefreshGate::default();
        let before = gate.request(Trigger::Initial, start).unwrap();
        gate.reset();
        assert!(!gate.accept(before));
        let after = gate.request(Trigger::Login, start).unwrap();
        assert!(gate.accept(after));
    }

    #[test]
    fn is_current_does_not_retire_tickets() {
        let start = Instant::now();
        let mut gate = RefreshGate::default();
        let before = gate.request(Trigger::Initial, start).unwrap();
        assert!(gate.is_current(before));
        assert!(gate.is_current(before));

        gate.reset();
        assert!(!gate.is_current(before));
        let after = gate.request(Trigger::Login, start).unwrap();
        assert!(gate.is_current(after));
        assert!(gate.accept(after));
        assert!(!gate.is_current(after));
    }
}
