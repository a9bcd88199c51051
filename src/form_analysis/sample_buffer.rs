// ABOUTME: Fixed-capacity FIFO buffer used for validated pose samples and movement history
// ABOUTME: Appends at the back and evicts the oldest entry once capacity is exceeded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::models::PoseSample;
use std::collections::VecDeque;

/// Bounded FIFO buffer, oldest entry evicted first
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

/// Buffer of validated pose samples owned by the session controller
pub type SampleBuffer = BoundedBuffer<PoseSample>;

impl<T> BoundedBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted oldest entry if the buffer was full
    pub fn push(&mut self, entry: T) -> Option<T> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    /// Most recent entry
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Current number of entries (never above capacity)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Ordered copy of the entries, oldest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl BoundedBuffer<f32> {
    /// Arithmetic mean of all entries
    #[must_use]
    pub fn mean(&self) -> Option<f32> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.iter().sum::<f32>() / self.entries.len() as f32)
    }

    /// `max - min` over the newest `window` entries
    #[must_use]
    pub fn trailing_range(&self, window: usize) -> Option<f32> {
        let skip = self.entries.len().saturating_sub(window);
        let (min, max) = self
            .entries
            .iter()
            .skip(skip)
            .fold(None, |acc: Option<(f32, f32)>, value| match acc {
                None => Some((*value, *value)),
                Some((min, max)) => Some((min.min(*value), max.max(*value))),
            })?;
        Some(max - min)
    }
}
