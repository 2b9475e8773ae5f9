//! Rolling history used by the selector to avoid repetition.

use crate::interval::Interval;
use crate::pitch::Pitch;
use std::collections::VecDeque;

/// Number of recent pitches and intervals remembered
pub const HISTORY_CAPACITY: usize = 8;

/// Bounded first-in-first-out queue; pushing past capacity evicts the oldest entry
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T: PartialEq> History<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append an entry, returning the evicted one if the queue was full
    pub fn push(&mut self, entry: T) -> Option<T> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn contains(&self, entry: &T) -> bool {
        self.entries.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }
}

impl<T: PartialEq> Default for History<T> {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

/// Recently accepted pitches and intervals
#[derive(Debug, Clone, Default)]
pub struct SelectionHistory {
    pub pitches: History<Pitch>,
    pub intervals: History<Interval>,
}

impl SelectionHistory {
    /// History that already remembers the starting pitch
    pub fn starting_from(pitch: Pitch) -> Self {
        let mut history = Self::default();
        history.pitches.push(pitch);
        history
    }

    pub fn record(&mut self, interval: Interval, pitch: Pitch) {
        self.pitches.push(pitch);
        self.intervals.push(interval);
    }

    /// Fraction of remembered intervals that are augmented or diminished.
    /// An empty history counts as 0.
    pub fn altered_ratio(&self) -> f64 {
        let altered = self
            .intervals
            .iter()
            .filter(|interval| interval.quality().is_altered())
            .count();
        altered as f64 / self.intervals.len().max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut history = History::with_capacity(3);
        assert_eq!(history.push(1), None);
        assert_eq!(history.push(2), None);
        assert_eq!(history.push(3), None);
        assert_eq!(history.push(4), Some(1));
        assert_eq!(history.push(5), Some(2));
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(history.latest(), Some(&5));
    }

    #[test]
    fn test_never_exceeds_default_capacity() {
        let mut history = History::default();
        for n in 0..50 {
            history.push(n);
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(!history.contains(&41));
        assert!(history.contains(&42));
    }

    #[test]
    fn test_altered_ratio() {
        let mut history = SelectionHistory::default();
        assert_eq!(history.altered_ratio(), 0.0);

        let pitch: Pitch = "C4".parse().unwrap();
        history.record("A4".parse().unwrap(), pitch);
        assert_eq!(history.altered_ratio(), 1.0);
        history.record("M3".parse().unwrap(), pitch);
        history.record("-P5".parse().unwrap(), pitch);
        history.record("m2".parse().unwrap(), pitch);
        assert_eq!(history.altered_ratio(), 0.25);
    }

    #[test]
    fn test_starting_from_seeds_pitches_only() {
        let start: Pitch = "A3".parse().unwrap();
        let history = SelectionHistory::starting_from(start);
        assert!(history.pitches.contains(&start));
        assert!(history.intervals.is_empty());
    }
}
