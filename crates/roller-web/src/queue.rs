#![forbid(unsafe_code)]

//! Bounded queue between DOM listeners and the guide driver.
//!
//! # Invariants
//!
//! 1. At most [`MAX_PENDING_EVENTS`] events are held; pushing past the limit
//!    drops the oldest.
//! 2. The waker runs after every push, with the event already queued.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use roller_backend::PageEvent;

/// Pending events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 256;

type Waker = Box<dyn Fn()>;

/// Events captured by page listeners, waiting to be handled.
#[derive(Default)]
pub struct EventQueue {
    events: RefCell<VecDeque<PageEvent>>,
    wake: RefCell<Option<Waker>>,
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.len())
            .field("wake", &self.wake.borrow().is_some())
            .finish()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` and run the waker.
    pub fn push(&self, event: PageEvent) {
        {
            let mut events = self.events.borrow_mut();
            if events.len() >= MAX_PENDING_EVENTS {
                events.pop_front();
                tracing::warn!(limit = MAX_PENDING_EVENTS, "event queue full, dropping oldest");
            }
            events.push_back(event);
        }
        if let Some(wake) = self.wake.borrow().as_ref() {
            wake();
        }
    }

    pub fn pop(&self) -> Option<PageEvent> {
        self.events.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Install the function run after each push. Must not be called from
    /// inside the waker itself.
    pub fn set_waker(&self, wake: impl Fn() + 'static) {
        *self.wake.borrow_mut() = Some(Box::new(wake));
    }

    pub fn clear_waker(&self) {
        self.wake.borrow_mut().take();
    }
}
