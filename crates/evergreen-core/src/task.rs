//! Single-threaded deferred results polled from the frame loop.
//!
//! A host callback (promise continuation, worker reply) holds the
//! [`Completer`]; the frame loop holds the [`Deferred`] and polls it without
//! ever blocking.

use crate::error::GestureError;
use std::cell::RefCell;
use std::rc::Rc;

type Slot<T> = Rc<RefCell<Option<Result<T, GestureError>>>>;

#[derive(Debug, PartialEq)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    Failed(GestureError),
}

pub struct Deferred<T> {
    slot: Slot<T>,
}

pub struct Completer<T> {
    slot: Slot<T>,
}

/// Create a linked completer/deferred pair.
pub fn deferred<T>() -> (Completer<T>, Deferred<T>) {
    let slot: Slot<T> = Rc::new(RefCell::new(None));
    (
        Completer { slot: slot.clone() },
        Deferred { slot },
    )
}

impl<T> Deferred<T> {
    /// Already-resolved result, for hosts whose call is synchronous.
    pub fn ready(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(Ok(value)))),
        }
    }

    pub fn failed(err: GestureError) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(Err(err)))),
        }
    }

    /// Take the result if it has arrived.
    ///
    /// After `Ready`/`Failed` has been returned the deferred is spent and
    /// should be dropped by the caller.
    pub fn poll(&self) -> TaskPoll<T> {
        match self.slot.borrow_mut().take() {
            Some(Ok(v)) => TaskPoll::Ready(v),
            Some(Err(e)) => TaskPoll::Failed(e),
            // completer gone without an answer
            None if Rc::strong_count(&self.slot) == 1 => TaskPoll::Failed(GestureError::Abandoned),
            None => TaskPoll::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.borrow().is_none() && Rc::strong_count(&self.slot) > 1
    }
}

impl<T> Completer<T> {
    pub fn resolve(self, value: T) {
        *self.slot.borrow_mut() = Some(Ok(value));
    }

    pub fn reject(self, err: GestureError) {
        *self.slot.borrow_mut() = Some(Err(err));
    }

    pub fn complete(self, result: Result<T, GestureError>) {
        *self.slot.borrow_mut() = Some(result);
    }
}
