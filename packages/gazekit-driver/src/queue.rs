use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Input that arrives between frames and is applied at the start of the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// Physical trigger (button press, magnet pull).
    Trigger,
    ResetCamera,
    SetFocusMode(bool),
    SetCameraLocked(bool),
}

/// FIFO of pending driver events. Clones share one queue, so platform
/// callbacks can hold a handle while the driver owns another.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    queue: Rc<RefCell<VecDeque<DriverEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: DriverEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<DriverEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Takes everything queued so far. Events pushed while the batch is
    /// being handled wait for the next drain.
    pub fn drain(&self) -> Vec<DriverEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }
}
