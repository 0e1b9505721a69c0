//! Keyed one-shot deadlines.
//!
//! [`TimerQueue`] stands in for `setTimeout`-style timers: each key owns at
//! most one pending deadline, deadlines can be cancelled, and a driver
//! collects whatever is due with [`TimerQueue::pop_due`]. Nothing fires on
//! its own; the owner decides when to poll.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::time::Duration;

use crate::clock::{duration_ms, Millis};

/// Why a deadline could not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The queue already holds its maximum number of pending deadlines.
    #[error("timer queue is full ({capacity} pending)")]
    CapacityExhausted { capacity: usize },

    /// `now + delay` does not fit in the timestamp type.
    #[error("deadline overflows the clock range")]
    DeadlineOverflow,
}

/// A bounded set of pending deadlines, at most one per key.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    deadlines: HashMap<K, Millis>,
    order: BTreeSet<(Millis, K)>,
    capacity: usize,
}

impl<K> TimerQueue<K>
where
    K: Copy + Eq + Hash + Ord,
{
    /// Creates an empty queue that holds at most `capacity` deadlines.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            deadlines: HashMap::new(),
            order: BTreeSet::new(),
            capacity,
        }
    }

    /// Schedules `key` to fire `delay` after `now`.
    ///
    /// Any deadline already pending for `key` is replaced.
    pub fn schedule_after(&mut self, key: K, now: Millis, delay: Duration) -> Result<Millis, TimerError> {
        let deadline = now
            .checked_add(duration_ms(delay))
            .ok_or(TimerError::DeadlineOverflow)?;
        self.schedule_at(key, deadline)?;
        Ok(deadline)
    }

    /// Schedules `key` to fire at the absolute time `deadline`.
    pub fn schedule_at(&mut self, key: K, deadline: Millis) -> Result<(), TimerError> {
        let replacing = self.cancel(&key);
        if !replacing && self.deadlines.len() >= self.capacity {
            return Err(TimerError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        self.deadlines.insert(key, deadline);
        self.order.insert((deadline, key));
        Ok(())
    }

    /// Cancels the pending deadline for `key`. Returns `true` if one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.deadlines.remove(key) {
            Some(deadline) => {
                self.order.remove(&(deadline, *key));
                true
            }
            None => false,
        }
    }

    /// Cancels everything.
    pub fn clear(&mut self) {
        self.deadlines.clear();
        self.order.clear();
    }

    /// Removes and returns every key whose deadline is `<= now`, earliest first.
    pub fn pop_due(&mut self, now: Millis) -> Vec<K> {
        let mut due = Vec::new();
        while let Some(&(deadline, key)) = self.order.first() {
            if deadline > now {
                break;
            }
            self.order.remove(&(deadline, key));
            self.deadlines.remove(&key);
            due.push(key);
        }
        due
    }

    /// Pending deadline for `key`, if any.
    pub fn deadline(&self, key: &K) -> Option<Millis> {
        self.deadlines.get(key).copied()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.order.first().map(|(deadline, _)| *deadline)
    }

    /// Number of pending deadlines.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_due_returns_in_deadline_order() {
        let mut q = TimerQueue::with_capacity(8);
        q.schedule_at(1u64, 300).unwrap();
        q.schedule_at(2u64, 100).unwrap();
        q.schedule_at(3u64, 200).unwrap();

        assert_eq!(q.pop_due(250), vec![2, 3]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(300));
    }

    #[test]
    fn pop_due_includes_exact_deadline() {
        let mut q = TimerQueue::with_capacity(8);
        q.schedule_at(7u64, 1_000).unwrap();

        assert!(q.pop_due(999).is_empty());
        assert_eq!(q.pop_due(1_000), vec![7]);
    }

    #[test]
    fn rescheduling_replaces_previous_deadline() {
        let mut q = TimerQueue::with_capacity(8);
        q.schedule_at(1u64, 100).unwrap();
        q.schedule_at(1u64, 500).unwrap();

        assert_eq!(q.len(), 1);
        assert!(q.pop_due(200).is_empty());
        assert_eq!(q.deadline(&1), Some(500));
    }

    #[test]
    fn cancel_removes_pending_deadline() {
        let mut q = TimerQueue::with_capacity(8);
        q.schedule_at(1u64, 100).unwrap();

        assert!(q.cancel(&1));
        assert!(!q.cancel(&1));
        assert!(q.pop_due(1_000).is_empty());
    }

    #[test]
    fn full_queue_rejects_new_keys_but_allows_replacement() {
        let mut q = TimerQueue::with_capacity(1);
        q.schedule_at(1u64, 100).unwrap();

        assert_eq!(
            q.schedule_at(2u64, 100),
            Err(TimerError::CapacityExhausted { capacity: 1 })
        );
        assert!(q.schedule_at(1u64, 200).is_ok());
    }

    #[test]
    fn schedule_after_detects_overflow() {
        let mut q = TimerQueue::with_capacity(1);
        let result = q.schedule_after(1u64, u64::MAX - 5, Duration::from_millis(10));
        assert_eq!(result, Err(TimerError::DeadlineOverflow));
        assert!(q.is_empty());
    }

    #[test]
    fn clear_empties_queue() {
        let mut q = TimerQueue::with_capacity(4);
        q.schedule_at(1u64, 10).unwrap();
        q.schedule_at(2u64, 20).unwrap();
        q.clear();

        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
