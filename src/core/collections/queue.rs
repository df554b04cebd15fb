//! Growable FIFO queue over a circular array.
//!
//! `first` indexes the next element to pop and `last` the next slot to fill;
//! both wrap modulo the capacity and `last == (first + len) % capacity`
//! whenever an operation returns. A push into a full buffer doubles it, and a
//! pop that leaves the buffer at most half full halves it (never below the
//! capacity the queue was created with). Either way the live elements are
//! copied out starting at `first`, so the resized buffer starts at index 0.

use super::errors::ContainerError;
use log::trace;
use std::mem;

/// Capacity used by [`Queue::new`], and the floor for shrinking
pub const DEFAULT_CAPACITY: usize = 8;

const GROWTH_FACTOR: usize = 2;
/// Fallback growth when doubling is not representable
const CAPACITY_INCREMENT: usize = 32;

/// Largest slot count a `Vec<Option<T>>` can hold
fn max_capacity<T>() -> usize {
    isize::MAX as usize / mem::size_of::<Option<T>>().max(1)
}

/// Capacity after growing a full buffer of `capacity` slots
pub fn grown_capacity<T>(capacity: usize) -> Result<usize, ContainerError> {
    let ceiling = max_capacity::<T>();
    capacity
        .checked_mul(GROWTH_FACTOR)
        .filter(|grown| *grown <= ceiling)
        .or_else(|| {
            capacity
                .checked_add(CAPACITY_INCREMENT)
                .filter(|grown| *grown <= ceiling)
        })
        .ok_or_else(|| {
            ContainerError::ResourceExhausted(format!(
                "queue cannot grow beyond {} slots",
                capacity
            ))
        })
}

#[derive(Debug, Clone)]
pub struct Queue<T> {
    buffer: Vec<Option<T>>,
    first: usize,
    last: usize,
    len: usize,
    min_capacity: usize,
}

impl<T> Queue<T> {
    /// Create an empty queue with [`DEFAULT_CAPACITY`] slots
    pub fn new() -> Self {
        Self::empty(DEFAULT_CAPACITY)
    }

    /// Create an empty queue whose buffer never shrinks below `capacity`
    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        if capacity == 0 {
            return Err(ContainerError::InvalidArgument(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self::empty(capacity))
    }

    fn empty(capacity: usize) -> Self {
        Self {
            buffer: (0..capacity).map(|_| None).collect(),
            first: 0,
            last: 0,
            len: 0,
            min_capacity: capacity,
        }
    }

    /// Append `item` at the back, growing the buffer if it is full
    pub fn push(&mut self, item: T) -> Result<(), ContainerError> {
        if self.len == self.capacity() {
            let capacity = grown_capacity::<T>(self.capacity())?;
            self.relocate(capacity);
        }

        self.buffer[self.last] = Some(item);
        self.last = (self.last + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    pub fn peek_front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.buffer[self.first].as_ref()
    }

    /// Remove and return the front element, shrinking the buffer once it is
    /// at most half full
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.buffer[self.first].take();
        self.first = (self.first + 1) % self.capacity();
        self.len -= 1;

        let halved = self.capacity() / GROWTH_FACTOR;
        if self.len <= halved && halved >= self.min_capacity {
            self.relocate(halved);
        }

        item
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Elements from front to back
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |offset| {
            self.buffer[(self.first + offset) % self.capacity()].as_ref()
        })
    }

    /// Move the live elements into a fresh buffer of `capacity` slots,
    /// front element first
    fn relocate(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);
        let old_capacity = self.capacity();
        let mut buffer: Vec<Option<T>> = Vec::with_capacity(capacity);
        for offset in 0..self.len {
            buffer.push(self.buffer[(self.first + offset) % old_capacity].take());
        }
        buffer.resize_with(capacity, || None);

        trace!("Queue resized from {} to {} slots", old_capacity, capacity);
        self.buffer = buffer;
        self.first = 0;
        self.last = self.len % capacity;
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cursors<T>(queue: &Queue<T>) {
        assert!(queue.len() <= queue.capacity());
        assert_eq!(queue.last, (queue.first + queue.len()) % queue.capacity());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = Queue::<u8>::with_capacity(0);
        assert!(matches!(result, Err(ContainerError::InvalidArgument(_))));
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::new();
        for item in ["a", "b", "c"] {
            queue.push(item).unwrap();
        }

        assert_eq!(queue.peek_front(), Some(&"a"));
        assert_eq!(queue.pop_front(), Some("a"));
        assert_eq!(queue.pop_front(), Some("b"));
        assert_eq!(queue.pop_front(), Some("c"));
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn test_empty_queue_returns_none() {
        let mut queue: Queue<u32> = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.peek_front(), None);
        assert_eq!(queue.pop_front(), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_size_after_pushes_and_pops() {
        let mut queue = Queue::new();
        for item in 0..50 {
            queue.push(item).unwrap();
        }
        for _ in 0..17 {
            queue.pop_front();
        }
        assert_eq!(queue.len(), 33);
        assert_cursors(&queue);
    }

    #[test]
    fn test_wraparound_then_growth_preserves_order() {
        let mut queue = Queue::with_capacity(4).unwrap();
        for item in 0..4 {
            queue.push(item).unwrap();
        }
        // drain two so the live range wraps once the next pushes land
        assert_eq!(queue.pop_front(), Some(0));
        assert_eq!(queue.pop_front(), Some(1));
        queue.push(4).unwrap();
        queue.push(5).unwrap();
        assert_eq!(queue.capacity(), 4);
        assert_cursors(&queue);

        queue.push(6).unwrap();
        assert_eq!(queue.capacity(), 8);
        assert_eq!(queue.first, 0);
        assert_cursors(&queue);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_round_trip_across_many_resizes() {
        let mut queue = Queue::with_capacity(8).unwrap();
        for item in 0..1000 {
            queue.push(item).unwrap();
            assert_cursors(&queue);
        }
        assert!(queue.capacity() >= 1000);

        let mut popped = Vec::with_capacity(1000);
        while let Some(item) = queue.pop_front() {
            popped.push(item);
            assert_cursors(&queue);
        }

        assert_eq!(popped, (0..1000).collect::<Vec<_>>());
        assert_eq!(queue.capacity(), 8);
    }

    #[test]
    fn test_shrink_stops_at_initial_capacity() {
        let mut queue = Queue::with_capacity(8).unwrap();
        for item in 0..64 {
            queue.push(item).unwrap();
        }
        assert_eq!(queue.capacity(), 64);

        for _ in 0..32 {
            queue.pop_front();
        }
        assert_eq!(queue.capacity(), 32);
        assert_eq!(queue.peek_front(), Some(&32));

        while queue.len() > 1 {
            queue.pop_front();
        }
        assert_eq!(queue.capacity(), 8);
        assert_eq!(queue.pop_front(), Some(63));
        assert_eq!(queue.capacity(), 8);
    }

    #[test]
    fn test_interleaved_push_pop_keeps_order() {
        let mut queue = Queue::with_capacity(2).unwrap();
        let mut expected = std::collections::VecDeque::new();
        let mut next = 0;
        for round in 0..200 {
            for _ in 0..(round % 7) {
                queue.push(next).unwrap();
                expected.push_back(next);
                next += 1;
            }
            for _ in 0..(round % 5) {
                assert_eq!(queue.pop_front(), expected.pop_front());
            }
            assert_eq!(queue.len(), expected.len());
            assert_cursors(&queue);
        }
    }

    #[test]
    fn test_growth_falls_back_to_increment_then_exhausts() {
        let ceiling = max_capacity::<u64>();
        assert_eq!(grown_capacity::<u64>(16), Ok(32));
        assert_eq!(
            grown_capacity::<u64>(ceiling - CAPACITY_INCREMENT),
            Ok(ceiling)
        );
        assert!(matches!(
            grown_capacity::<u64>(ceiling),
            Err(ContainerError::ResourceExhausted(_))
        ));
    }
}
