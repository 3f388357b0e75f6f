//! Synchronous in-process publish/subscribe channel
//!
//! Handlers run inline with [`EventBus::emit`], in subscription order. A
//! handler stays registered for as long as its [`Subscription`] is alive.
//! Handlers may subscribe or unsubscribe while an event is being delivered;
//! such changes take effect from the next emit.

use std::cell::RefCell;
use std::rc::Rc;

type Handler<E> = Rc<dyn Fn(&E)>;

pub struct EventBus<E> {
    handlers: Rc<RefCell<Vec<Handler<E>>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            handlers: Rc::clone(&self.handlers),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; dropping the returned subscription unregisters it
    #[must_use = "the handler is unregistered when the subscription is dropped"]
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let handler: Handler<E> = Rc::new(handler);
        self.handlers.borrow_mut().push(Rc::clone(&handler));

        let handlers = Rc::downgrade(&self.handlers);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(handlers) = handlers.upgrade() {
                    handlers
                        .borrow_mut()
                        .retain(|item| !Rc::ptr_eq(item, &handler));
                }
            })),
        }
    }

    /// Deliver `event` to every current handler
    pub fn emit(&self, event: &E) {
        let handlers = self.handlers.borrow().clone();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

/// Scoped registration on an [`EventBus`]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unregister now rather than at drop
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
