//! Input event hand-off from the poll interrupt to the control loop.
//!
//! The button poller pushes debounced edges, the control loop drains them
//! before acting on anything else. Every access runs inside a critical
//! section so the two sides may live in different interrupt priorities.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// The rejected event, handed back because no slot was free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull<T>(pub T);

/// Fixed-capacity FIFO of pending events.
pub struct EventQueue<T, const SIZE: usize> {
    slots: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> EventQueue<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for the producing side (the poller).
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { queue: self }
    }

    /// Handle for the draining side (the control loop).
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { queue: self }
    }

    fn with_slots<R>(&self, f: impl FnOnce(&mut Deque<T, SIZE>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.slots.borrow_ref_mut(cs)))
    }

    /// Append an event, or give it back when every slot is taken.
    pub fn try_send(&self, event: T) -> Result<(), QueueFull<T>> {
        self.with_slots(|slots| slots.push_back(event).map_err(QueueFull))
    }

    /// Oldest pending event.
    pub fn try_receive(&self) -> Option<T> {
        self.with_slots(Deque::pop_front)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.with_slots(|slots| slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for EventQueue<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producing end of an [`EventQueue`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    queue: &'a EventQueue<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    pub fn try_send(&self, event: T) -> Result<(), QueueFull<T>> {
        self.queue.try_send(event)
    }
}

/// Draining end of an [`EventQueue`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    queue: &'a EventQueue<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    pub fn try_receive(&self) -> Option<T> {
        self.queue.try_receive()
    }
}
