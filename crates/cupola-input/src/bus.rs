//! Listener bus scoping event delivery to mounted views.
//!
//! The platform layer publishes every [`InputEvent`] to an [`InputBus`].
//! A view that wants events subscribes under a unique name and receives a
//! [`Subscription`]; dropping the subscription unregisters it, so an
//! unmounted view never sees another event.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::InputError;
use crate::event::InputEvent;

#[derive(Debug, Default)]
struct BusInner {
    listeners: Vec<(&'static str, VecDeque<InputEvent>)>,
}

/// Single-threaded fan-out of input events to named listeners.
#[derive(Debug, Clone, Default)]
pub struct InputBus {
    inner: Rc<RefCell<BusInner>>,
}

impl InputBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// # Errors
    /// Returns [`InputError::DuplicateListener`] if `name` is already
    /// subscribed.
    pub fn subscribe(&self, name: &'static str) -> Result<Subscription, InputError> {
        let mut inner = self.inner.borrow_mut();
        if inner.listeners.iter().any(|(n, _)| *n == name) {
            return Err(InputError::DuplicateListener(name));
        }
        inner.listeners.push((name, VecDeque::new()));
        debug!(listener = name, "input listener subscribed");
        Ok(Subscription {
            name,
            bus: Rc::downgrade(&self.inner),
        })
    }

    /// Queue `event` for every subscribed listener.
    pub fn publish(&self, event: InputEvent) {
        for (_, queue) in &mut self.inner.borrow_mut().listeners {
            queue.push_back(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// RAII handle for a bus registration. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    name: &'static str,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// Name this subscription was registered under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Take every event queued since the last drain, oldest first.
    ///
    /// Returns an empty list if the bus itself has been dropped.
    pub fn drain(&self) -> Vec<InputEvent> {
        let Some(bus) = self.bus.upgrade() else {
            return Vec::new();
        };
        let mut inner = bus.borrow_mut();
        inner
            .listeners
            .iter_mut()
            .find(|(n, _)| *n == self.name)
            .map(|(_, q)| q.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().listeners.retain(|(n, _)| *n != self.name);
            debug!(listener = self.name, "input listener unsubscribed");
        }
    }
}
