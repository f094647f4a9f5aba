//! Glide Ring - Bounded FIFO queue for buffered snapshots
//!
//! This crate provides the per-entity snapshot buffer used by the smoothing
//! state machines.
//!
//! # Features
//!
//! - **Bounded memory**: fixed-size ring storage, no growth after creation
//! - **O(1) operations**: enqueue, dequeue, peek, and indexed access
//! - **Bulk fast-forward**: [`RingQueue::dequeue_up_to`] trims stale ticks
//!   and hands back the last trimmed item so motion can be re-based on it
//! - **In-place correction**: [`RingQueue::get`]/[`RingQueue::set`] let the
//!   replay step ease a buffered-but-unconsumed entry without reordering
//!
//! # Example
//!
//! ```rust
//! use glide_ring::RingQueue;
//!
//! let mut queue: RingQueue<u32> = RingQueue::new(8);
//! queue.enqueue(1);
//! queue.enqueue(2);
//! queue.enqueue(3);
//!
//! assert_eq!(queue.peek(), Some(&1));
//! assert_eq!(queue.dequeue(), Some(1));
//! assert_eq!(queue.len(), 2);
//! ```

use glide_core::TickSnapshot;

/// Default capacity, sized for the maximum adaptive interpolation depth
/// plus discard slack
pub const DEFAULT_CAPACITY: usize = 260;

/// A snapshot buffer for one tracked entity
pub type SnapshotQueue = RingQueue<TickSnapshot>;

/// Bounded FIFO with indexed in-place access
///
/// Capacity is fixed at construction. Enqueueing past capacity is a caller
/// contract violation and panics: the smoothing controllers' discard pass
/// guarantees headroom before every capture, so a full queue means the
/// caller skipped that pass.
#[derive(Debug, Clone)]
pub struct RingQueue<T> {
    /// Ring storage; `None` marks an empty slot
    items: Vec<Option<T>>,
    /// Index of the oldest item
    head: usize,
    /// Number of items currently stored
    count: usize,
    /// Maximum number of items
    capacity: usize,
}

impl<T> RingQueue<T> {
    /// Create a queue with the given capacity
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            items: (0..capacity).map(|_| None).collect(),
            head: 0,
            count: 0,
            capacity,
        }
    }

    /// Append an item at the tail
    ///
    /// # Panics
    ///
    /// Panics when the queue is full; see the type-level contract note.
    pub fn enqueue(&mut self, item: T) {
        assert!(
            self.count < self.capacity,
            "RingQueue capacity exceeded; upstream discard must run first"
        );
        let index = (self.head + self.count) % self.capacity;
        self.items[index] = Some(item);
        self.count += 1;
    }

    /// The oldest item, without removing it
    pub fn peek(&self) -> Option<&T> {
        if self.count == 0 {
            None
        } else {
            self.items[self.head].as_ref()
        }
    }

    /// Remove and return the oldest item
    pub fn dequeue(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let item = self.items[self.head].take();
        self.head = (self.head + 1) % self.capacity;
        self.count -= 1;
        item
    }

    /// Remove up to `n` oldest items, returning the last one removed
    ///
    /// Used to fast-forward past stale ticks: the returned item is the most
    /// recent discarded snapshot, which the caller re-bases motion on.
    pub fn dequeue_up_to(&mut self, n: usize) -> Option<T> {
        let n = n.min(self.count);
        let mut last = None;
        for _ in 0..n {
            last = self.dequeue();
        }
        last
    }

    /// Item at `index`, where 0 is the oldest
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            None
        } else {
            self.items[(self.head + index) % self.capacity].as_ref()
        }
    }

    /// Replace the item at `index` in place
    ///
    /// Returns false (and stores nothing) when `index` is out of range.
    pub fn set(&mut self, index: usize, item: T) -> bool {
        if index >= self.count {
            return false;
        }
        self.items[(self.head + index) % self.capacity] = Some(item);
        true
    }

    /// Number of items stored
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all items
    pub fn clear(&mut self) {
        for slot in &mut self.items {
            *slot = None;
        }
        self.head = 0;
        self.count = 0;
    }

    /// Iterate items oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.count).filter_map(move |i| self.get(i))
    }
}

impl<T> Default for RingQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let queue: RingQueue<u32> = RingQueue::new(16);
        assert_eq!(queue.capacity(), 16);
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = RingQueue::new(8);
        for i in 0..5 {
            queue.enqueue(i);
        }
        for i in 0..5 {
            assert_eq!(queue.dequeue(), Some(i));
        }
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_fifo_order_across_wrap() {
        let mut queue = RingQueue::new(4);

        // Cycle the head around the ring a few times.
        for round in 0..3 {
            for i in 0..4 {
                queue.enqueue(round * 10 + i);
            }
            for i in 0..4 {
                assert_eq!(queue.dequeue(), Some(round * 10 + i));
            }
        }
    }

    #[test]
    fn test_dequeue_up_to_returns_last_removed() {
        let mut queue = RingQueue::new(8);
        for i in 0..6 {
            queue.enqueue(i);
        }

        assert_eq!(queue.dequeue_up_to(3), Some(2));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek(), Some(&3));

        // Requesting more than remain drains the queue.
        assert_eq!(queue.dequeue_up_to(10), Some(5));
        assert!(queue.is_empty());

        assert_eq!(queue.dequeue_up_to(1), None);
    }

    #[test]
    fn test_indexed_access() {
        let mut queue = RingQueue::new(4);
        queue.enqueue(10);
        queue.enqueue(20);
        queue.enqueue(30);

        // Shift the head so logical and physical indices differ.
        queue.dequeue();
        queue.enqueue(40);

        assert_eq!(queue.get(0), Some(&20));
        assert_eq!(queue.get(2), Some(&40));
        assert_eq!(queue.get(3), None);
    }

    #[test]
    fn test_set_in_place() {
        let mut queue = RingQueue::new(4);
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);

        assert!(queue.set(1, 99));
        assert_eq!(queue.get(1), Some(&99));

        // Order and length are unchanged by an in-place set.
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(99));

        assert!(!queue.set(5, 0));
    }

    #[test]
    fn test_clear() {
        let mut queue = RingQueue::new(4);
        queue.enqueue(1);
        queue.enqueue(2);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);
        queue.enqueue(7);
        assert_eq!(queue.peek(), Some(&7));
    }

    #[test]
    fn test_iter_oldest_to_newest() {
        let mut queue = RingQueue::new(4);
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);
        queue.dequeue();
        queue.enqueue(4);

        let items: Vec<_> = queue.iter().copied().collect();
        assert_eq!(items, vec![2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn test_enqueue_past_capacity_panics() {
        let mut queue = RingQueue::new(2);
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);
    }
}
