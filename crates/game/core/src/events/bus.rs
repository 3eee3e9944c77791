//! Synchronous topic-based event bus.

use super::{GameEvent, Topic};

/// Callback invoked for every matching event.
pub type Handler = Box<dyn FnMut(&GameEvent)>;

/// Token returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    /// `None` receives every topic.
    topic: Option<Topic>,
    handler: Handler,
}

/// Observer list owned by whoever publishes (the authority manager).
///
/// Delivery is synchronous and in subscription order: every subscriber has
/// seen an event before `publish` returns. Handlers only receive a shared
/// reference to the event, so they cannot call back into the publisher.
/// Reactions that need to mutate the publisher go through an
/// [`EventMailbox`](super::EventMailbox) drained after the call.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every topic.
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.push(None, Box::new(handler))
    }

    /// Subscribe to a single topic.
    pub fn subscribe_topic(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.push(Some(topic), Box::new(handler))
    }

    fn push(&mut self, topic: Option<Topic>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, topic, handler });
        id
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &GameEvent) {
        let topic = event.topic();
        for subscriber in &mut self.subscribers {
            if subscriber.topic.is_none_or(|wanted| wanted == topic) {
                (subscriber.handler)(event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drops every subscriber. Called between matches.
    pub fn reset(&mut self) {
        self.subscribers.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
