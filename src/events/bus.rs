//! Thread-safe event bus using mpsc channels.
//!
//! The bus lets the managed side collect menu notifications and handle them
//! later on its own thread:
//! - The native side publishes through an [`EventPublisher`], usually turned
//!   into an event-sink proxy with [`EventPublisher::into_sink`]
//! - The managed side polls with [`EventBus::drain`]

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::types::MenuEvent;
use crate::callback::EventSinkProxy;
use crate::com::ComPtr;

/// Multi-producer, single-consumer queue of [`MenuEvent`]s.
///
/// # Example
///
/// ```
/// use menubridge::com::ObjectId;
/// use menubridge::events::{EventBus, MenuEvent};
///
/// let bus = EventBus::new();
/// let publisher = bus.publisher();
///
/// publisher.publish(MenuEvent::ItemClicked { item: ObjectId::next() });
///
/// let events = bus.drain();
/// assert_eq!(events.len(), 1);
/// ```
pub struct EventBus {
    sender: Sender<MenuEvent>,
    receiver: Receiver<MenuEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Get a publisher handle that can be cloned and sent to other threads.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Try to receive the next event without blocking.
    pub fn try_recv(&self) -> Option<MenuEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            // The bus owns a sender, so Disconnected cannot happen while
            // `self` is alive; treat it like an empty queue anyway.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending events into a Vec, oldest first.
    pub fn drain(&self) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe event publisher.
#[derive(Clone)]
pub struct EventPublisher {
    sender: Sender<MenuEvent>,
}

impl EventPublisher {
    pub fn from_sender(sender: Sender<MenuEvent>) -> Self {
        Self { sender }
    }

    /// Publish an event to the bus.
    ///
    /// Non-blocking. If the bus has been dropped the event is discarded.
    pub fn publish(&self, event: MenuEvent) {
        let _ = self.sender.send(event);
    }

    /// Wrap this publisher in an event-sink proxy that queues every
    /// notification on the bus.
    pub fn into_sink(self) -> ComPtr<EventSinkProxy> {
        EventSinkProxy::new(move |event| self.publish(event.clone()))
    }
}
