//! Deferred event queue for subscribers that need to react with mutations.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::GameEvent;

/// Shared FIFO filled by a bus subscription and drained by its owner.
///
/// Cloning shares the underlying queue.
#[derive(Clone, Debug, Default)]
pub struct EventMailbox {
    queue: Rc<RefCell<VecDeque<GameEvent>>>,
}

impl EventMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler suitable for [`EventBus::subscribe`](super::EventBus::subscribe).
    pub fn sink(&self) -> impl FnMut(&GameEvent) + 'static {
        let queue = Rc::clone(&self.queue);
        move |event| queue.borrow_mut().push_back(event.clone())
    }

    pub fn pop(&self) -> Option<GameEvent> {
        self.queue.borrow_mut().pop_front()
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
