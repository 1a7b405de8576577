use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use felt_engine::cards::Card;
use felt_engine::equity::Equity;
use felt_engine::record::Street;

// Bounded channel per subscriber; a slow consumer drops events rather than
// backpressuring the match loop.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<MatchEvent>;
pub type EventReceiver = mpsc::Receiver<MatchEvent>;

/// Live per-seat win/tie/lose probabilities at a street boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatEquity {
    pub seat: usize,
    pub bot: String,
    pub equity: Equity,
}

/// Events published by the match loop for external streaming consumers.
/// Equity snapshots are emitted at least once per street transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    HandStarted {
        match_id: String,
        hand_id: String,
        button: usize,
        seats: Vec<String>,
    },
    StreetEquity {
        match_id: String,
        hand_id: String,
        street: Street,
        board: Vec<Card>,
        equities: Vec<SeatEquity>,
    },
    HandCompleted {
        match_id: String,
        hand_id: String,
        deltas: Vec<i64>,
    },
    MatchCompleted {
        match_id: String,
        deltas: Vec<i64>,
        hands_played: u32,
    },
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

/// Fan-out bus from the single match loop to any number of subscribers.
/// Publishing uses `try_send`, so the loop never blocks on a consumer.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        guard.push((id, tx));

        tracing::debug!(subscriber_id = id, "client subscribed to match events");

        EventSubscription {
            bus: self.clone(),
            subscriber_id: id,
            receiver: rx,
        }
    }

    pub fn publish(&self, event: MatchEvent) {
        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .expect("subscriber lock poisoned");
            guard.clone()
        };

        let mut dead = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = ?e,
                    "dropping event for slow or closed subscriber"
                );
                if matches!(e, mpsc::error::TrySendError::Closed(_)) {
                    dead.push(id);
                }
            }
        }
        if !dead.is_empty() {
            self.remove_subscribers(&dead);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .len()
    }

    fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        guard.retain(|(id, _)| !ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> MatchEvent {
        MatchEvent::HandStarted {
            match_id: "m".to_string(),
            hand_id: "m-000001".to_string(),
            button: 0,
            seats: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        bus.publish(sample_event());
        let got = sub.receiver().recv().await.unwrap();
        assert_eq!(got, sample_event());
    }

    #[tokio::test]
    async fn dropped_subscriptions_are_cleaned_up() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        // Publishing into an empty room is fine.
        bus.publish(sample_event());
    }

    #[test]
    fn events_serialize_with_a_tag() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["event"], "hand_started");
    }
}
