//! Circular key queue
//!
//! Fixed-capacity ring with `capacity + 1` slots. `head` is the write index
//! and `tail` the read index; the queue is empty when they are equal, and
//! one slot is always left unused so a full queue never looks empty.
//!
//! The queue is shared between exactly one producer (the transport driver,
//! which owns every index update) and any number of readers that only peek.
//! Slots are [`AtomicCell`]s and `head` is published with release ordering
//! after the slot write, so a reader that observes a `head` value also
//! observes the record written before it.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam::atomic::AtomicCell;

/// Default number of usable slots in a key queue
pub const MAX_KEY_ALLOWED: usize = 64;

/// Single-producer circular queue of `Copy` records
pub struct KeyQueue<T> {
    /// `capacity + 1` slots
    buffer: Box<[AtomicCell<T>]>,
    /// Write position
    head: AtomicUsize,
    /// Read position
    tail: AtomicUsize,
    /// Size of one record in bytes
    item_size: usize,
    /// Set while a [`Producer`] is alive
    producer_claimed: AtomicBool,
}

impl<T: Copy + Default> KeyQueue<T> {
    /// Create an empty queue holding up to `capacity` records
    pub fn new(capacity: usize) -> Self {
        let buffer: Vec<AtomicCell<T>> = (0..=capacity)
            .map(|_| AtomicCell::new(T::default()))
            .collect();

        Self {
            buffer: buffer.into_boxed_slice(),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            item_size: core::mem::size_of::<T>(),
            producer_claimed: AtomicBool::new(false),
        }
    }

    /// Most recently written record
    ///
    /// Reads `buffer[head - 1]`, or the boundary slot `buffer[capacity]`
    /// when `head` is zero. The queue is not checked for emptiness: a queue
    /// that has never been written yields the boundary slot's initial
    /// (all-zero) record. Never blocks and never mutates the queue.
    pub fn peek_last(&self) -> T {
        self.peek_last_slot().1
    }

    /// [`KeyQueue::peek_last`] together with the index of the slot it read
    pub fn peek_last_slot(&self) -> (usize, T) {
        let head = self.head.load(Ordering::Acquire);
        let slot = if head == 0 { self.capacity() } else { head - 1 };
        (slot, self.buffer[slot].load())
    }

    /// Copy of the record in `index`, if the index is in range
    pub fn slot(&self, index: usize) -> Option<T> {
        self.buffer.get(index).map(AtomicCell::load)
    }

    /// Claim the producer role
    ///
    /// Returns `None` while another producer is alive.
    pub fn producer(&self) -> Option<Producer<'_, T>> {
        self.producer_claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Producer { queue: self })
    }
}

impl<T> KeyQueue<T> {
    /// Number of usable slots
    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Size of one record in bytes
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Current write index
    pub fn head(&self) -> usize {
        self.head.load(Ordering::Acquire)
    }

    /// Current read index
    pub fn tail(&self) -> usize {
        self.tail.load(Ordering::Acquire)
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.head() == self.tail()
    }

    /// Number of records waiting to be read
    pub fn len(&self) -> usize {
        let slots = self.buffer.len();
        (self.head() + slots - self.tail()) % slots
    }

    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.buffer.len()
    }
}

impl<T: Copy + Default> Default for KeyQueue<T> {
    fn default() -> Self {
        Self::new(MAX_KEY_ALLOWED)
    }
}

impl<T> core::fmt::Debug for KeyQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyQueue")
            .field("capacity", &self.capacity())
            .field("head", &self.head())
            .field("tail", &self.tail())
            .field("item_size", &self.item_size)
            .finish()
    }
}

/// Exclusive write access to a [`KeyQueue`]
///
/// Releases the producer role when dropped.
pub struct Producer<'a, T> {
    queue: &'a KeyQueue<T>,
}

impl<T: Copy> Producer<'_, T> {
    /// Append a record
    ///
    /// When the queue is full the oldest record is dropped first.
    pub fn push(&mut self, item: T) {
        let queue = self.queue;
        let head = queue.head.load(Ordering::Relaxed);
        let next = queue.next_index(head);

        let tail = queue.tail.load(Ordering::Relaxed);
        if next == tail {
            queue.tail.store(queue.next_index(tail), Ordering::Release);
            log::trace!("key queue full, dropped oldest record");
        }

        queue.buffer[head].store(item);
        queue.head.store(next, Ordering::Release);
    }

    /// Remove the oldest record
    ///
    /// Returns `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        let queue = self.queue;
        let tail = queue.tail.load(Ordering::Relaxed);
        if tail == queue.head.load(Ordering::Relaxed) {
            return None;
        }

        let item = queue.buffer[tail].load();
        queue.tail.store(queue.next_index(tail), Ordering::Release);
        Some(item)
    }

    /// Reset both indices to zero
    ///
    /// Slot contents are left in place.
    pub fn clear(&mut self) {
        self.queue.head.store(0, Ordering::Release);
        self.queue.tail.store(0, Ordering::Release);
    }
}

impl<T> Drop for Producer<'_, T> {
    fn drop(&mut self) {
        self.queue.producer_claimed.store(false, Ordering::Release);
    }
}
