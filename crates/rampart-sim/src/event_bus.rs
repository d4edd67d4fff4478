//! Synchronous event delivery to observers.
//!
//! Subscribers run in registration order as each event is emitted. Every
//! event is also buffered until the engine drains it into the tick snapshot.

use log::trace;

use rampart_core::events::SimEvent;

type Subscriber = Box<dyn FnMut(&SimEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    buffer: Vec<SimEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Returns its position in the firing order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&SimEvent) + 'static) -> usize {
        self.subscribers.push(Box::new(subscriber));
        self.subscribers.len() - 1
    }

    pub fn emit(&mut self, event: SimEvent) {
        trace!("event {:?}", event);
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
        self.buffer.push(event);
    }

    /// Events emitted since the last drain, in emission order.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.buffer)
    }

    /// Drop buffered events. Subscribers are kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("buffer", &self.buffer)
            .finish()
    }
}
