//! Typed publish/subscribe between screens and the notification aggregator.

use tokio::sync::broadcast::{self, Receiver, Sender, error::TryRecvError};
use tracing::{trace, warn};

use crate::ui::components::toast::Toast;

const CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    TransactionsChanged,
    BillsChanged,
    AccountsChanged,
    BudgetChanged,
    LoggedIn,
    Toast(Toast),
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    /// Publishing with no subscriber is not an error.
    pub fn publish(&self, event: AppEvent) {
        trace!(?event, "publish");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<AppEvent>,
}

impl Subscription {
    /// Returns every event queued since the last call.
    pub fn drain(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_see_events_in_order() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        bus.publish(AppEvent::BillsChanged);
        bus.publish(AppEvent::TransactionsChanged);

        let expected = vec![AppEvent::BillsChanged, AppEvent::TransactionsChanged];
        assert_eq!(first.drain(), expected);
        assert_eq!(second.drain(), expected);
        assert!(first.drain().is_empty());
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        EventBus::new().publish(AppEvent::LoggedIn);
    }
}
