//! A FIFO queue that can be extended while it is being drained.

use std::collections::VecDeque;

/// A FIFO queue that can be extended while iterating over it.
///
/// Draining it with [`Iterator::next`] while pushing newly discovered work
/// gives breadth-first traversal without recursion.
#[derive(Debug, Clone)]
pub struct ExtendableQueue<T> {
    queue: VecDeque<T>,
}

impl<T> Default for ExtendableQueue<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T, V> From<V> for ExtendableQueue<T>
where
    V: Into<VecDeque<T>>,
{
    fn from(value: V) -> Self {
        Self {
            queue: value.into(),
        }
    }
}

impl<T> ExtendableQueue<T> {
    /// Add an element to the back of the queue.
    pub fn push(&mut self, value: T) {
        self.queue.push_back(value);
    }

    /// Get the length of the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<A> Extend<A> for ExtendableQueue<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        self.queue.extend(iter);
    }
}

impl<T> Iterator for ExtendableQueue<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_extends_while_draining() {
        let mut queue = ExtendableQueue::default();
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.len(), 3);

        let mut order = Vec::new();
        while let Some(el) = queue.next() {
            order.push(el);

            if el == 1 {
                queue.extend(vec![4, 5, 6]);
            }
        }

        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_from() {
        let base = vec![1, 2, 3, 4];
        let queue = ExtendableQueue::from(base.clone());

        assert!(queue.zip(base).all(|(a, b)| a == b));
    }
}
