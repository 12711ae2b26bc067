//! Event fan-out to the host
//!
//! Listeners are called synchronously in registration order. The session
//! updates its own counters before publishing, so every listener already sees
//! the post-event `moves_left` / `goals_left`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::types::GameEvent;

/// Receives game events pushed by a session
pub trait Listener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> Listener for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// FIFO list of listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Listener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn publish(&mut self, event: &GameEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener that keeps every event it sees
///
/// Clones share one buffer, so a test can subscribe one clone and inspect
/// another.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Events recorded so far, removing them from the buffer
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Event names in order, e.g. `["auto_matches_found", "successful_move"]`
    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(GameEvent::name).collect()
    }
}

impl Listener for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
