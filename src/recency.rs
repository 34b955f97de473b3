//! Bounded, insertion-ordered list of recently sent images.
//!
//! Anything in the buffer is excluded from random selection.  Once the buffer grows past its
//! capacity the oldest entry falls off the front, regardless of how often it was picked since.

use std::collections::VecDeque;

pub struct RecencyBuffer {
    entries: VecDeque<String>,
    capacity: usize,
}

impl RecencyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append `name`, evicting from the front until the buffer is back within capacity.
    pub fn push(&mut self, name: impl Into<String>) {
        self.entries.push_back(name.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity_keeps_everything() {
        let mut recent = RecencyBuffer::new(3);
        recent.push("a.png");
        recent.push("b.png");

        assert_eq!(recent.len(), 2);
        assert!(recent.contains("a.png"));
        assert!(recent.contains("b.png"));
        assert!(!recent.contains("c.png"));
    }

    #[test]
    fn test_push_past_capacity_evicts_oldest() {
        let mut recent = RecencyBuffer::new(2);
        recent.push("a.png");
        recent.push("b.png");
        recent.push("c.png");

        assert_eq!(recent.len(), 2);
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["b.png", "c.png"]);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut recent = RecencyBuffer::new(50);
        for i in 0..500 {
            recent.push(format!("{i}.jpg"));
            assert!(recent.len() <= recent.capacity());
        }
        assert_eq!(recent.iter().next(), Some("450.jpg"));
        assert_eq!(recent.iter().last(), Some("499.jpg"));
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut recent = RecencyBuffer::new(5);
        recent.push("a.png");
        recent.push("b.gif");
        recent.clear();

        assert!(recent.is_empty());
        assert!(!recent.contains("a.png"));
        assert_eq!(recent.capacity(), 5);
    }
}
