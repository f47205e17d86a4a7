use std::collections::VecDeque;

/// Fixed-capacity undo buffer. Pushing onto a full buffer evicts the oldest entry.
#[derive(Debug, Clone)]
pub(crate) struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<T> { self.entries.pop_back() }

    pub fn clear(&mut self) { self.entries.clear(); }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut h = History::with_capacity(3);
        for i in 0..5 {
            h.push(i);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.pop(), Some(4));
        assert_eq!(h.pop(), Some(3));
        assert_eq!(h.pop(), Some(2));
        assert_eq!(h.pop(), None);
        assert!(h.is_empty());
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut h = History::with_capacity(0);
        h.push("a");
        assert!(h.is_empty());
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut h = History::with_capacity(2);
        h.push(1);
        h.push(2);
        h.clear();
        assert_eq!(h.len(), 0);
    }
}
