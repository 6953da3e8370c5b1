//! Fixed-capacity history ring
//!
//! Appends go to the back; once the ring holds more than `capacity` items the
//! oldest ones are dropped from the front. Nothing is persisted.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::Timestamped;

#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append `item` and return how many old items were evicted
    pub fn append(&mut self, item: T) -> usize {
        self.items.push_back(item);

        let mut evicted = 0;
        while self.items.len() > self.capacity {
            self.items.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// The last `n` items in insertion order (fewer if the ring holds fewer)
    pub fn recent(&self, n: usize) -> Vec<T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }
}

impl<T: Timestamped> BoundedHistory<T> {
    /// Count items with `timestamp >= cutoff`
    pub fn count_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.items
            .iter()
            .filter(|item| item.timestamp() >= cutoff)
            .count()
    }
}
