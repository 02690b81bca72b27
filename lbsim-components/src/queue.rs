//! Bounded FIFO queue
//!
//! Used both as the per-node waiting line and as the dispatcher-side shared
//! queue. A capacity of zero is valid and means the queue never holds
//! anything.

use crate::error::QueueError;
use std::collections::VecDeque;

/// First-In-First-Out queue with a hard capacity.
///
/// # Examples
///
/// ```
/// use lbsim_components::queue::FifoQueue;
///
/// let mut queue = FifoQueue::new(2);
/// queue.enqueue("a").unwrap();
/// queue.enqueue("b").unwrap();
/// assert!(queue.enqueue("c").is_err());
/// assert_eq!(queue.dequeue(), Some("a"));
/// ```
#[derive(Debug, Clone)]
pub struct FifoQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> FifoQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Append `item` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] when the queue already holds `capacity`
    /// items; the item is dropped.
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Remove the head.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = FifoQueue::new(3);
        for i in 0..3 {
            queue.enqueue(i).unwrap();
        }
        assert_eq!(queue.peek(), Some(&0));
        assert_eq!(queue.dequeue(), Some(0));
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut queue = FifoQueue::new(1);
        queue.enqueue(1).unwrap();
        assert!(queue.is_full());
        assert_eq!(queue.enqueue(2), Err(QueueError::Full { capacity: 1 }));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut queue: FifoQueue<u8> = FifoQueue::new(0);
        assert!(queue.is_full());
        assert!(queue.enqueue(7).is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rejected_item_is_not_stored() {
        let mut queue = FifoQueue::new(2);
        queue.enqueue('a').unwrap();
        queue.enqueue('b').unwrap();
        assert!(queue.enqueue('c').is_err());
        queue.dequeue();
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec!['b']);
    }
}
