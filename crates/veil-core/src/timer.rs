//! Schedulable delays with cancel handles.
//!
//! A [`TimerQueue`] replaces wall-clock callbacks with explicit entries that
//! carry a fire time and a [`TimerId`] cancel handle. Time is an offset from
//! session start, so the owner decides how the clock advances: the terminal
//! runtime feeds real elapsed time, simulation feeds virtual time.
//!
//! # Ordering
//!
//! Due timers pop in fire-time order. Timers with the same fire time pop in
//! the order they were scheduled.

use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

/// Cancel handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    /// Handle the timer was scheduled under.
    pub id: TimerId,
    /// Scheduled fire time. Follow-up timers should be scheduled relative to
    /// this, not to the tick that popped it.
    pub at: Duration,
    /// Timer payload.
    pub payload: T,
}

/// Ordered queue of pending timers.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { next_id: 0, pending: BTreeMap::new(), deadlines: HashMap::new() }
    }

    /// Schedule `payload` to fire at `at`.
    pub fn schedule(&mut self, at: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.insert((at, id), payload);
        self.deadlines.insert(id, at);
        id
    }

    /// Schedule `payload` to fire `delay` after `now`.
    pub fn schedule_after(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        self.schedule(now.saturating_add(delay), payload)
    }

    /// Cancel a pending timer, returning its payload.
    ///
    /// Returns `None` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let at = self.deadlines.remove(&id)?;
        self.pending.remove(&(at, id))
    }

    /// Cancel every pending timer whose payload matches `predicate`.
    ///
    /// Returns the number of timers cancelled.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let doomed: Vec<_> =
            self.pending.iter().filter(|(_, payload)| predicate(payload)).map(|(k, _)| *k).collect();

        for key @ (_, id) in &doomed {
            self.pending.remove(key);
            self.deadlines.remove(id);
        }
        doomed.len()
    }

    /// Pop the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<T>> {
        let (&(at, id), _) = self.pending.first_key_value()?;
        if at > now {
            return None;
        }

        self.deadlines.remove(&id);
        self.pending.remove(&(at, id)).map(|payload| Fired { id, at, payload })
    }

    /// Whether the timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Fire time of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Iterate pending payloads in fire order.
    pub fn iter(&self) -> impl Iterator<Item = (Duration, &T)> {
        self.pending.iter().map(|((at, _), payload)| (*at, payload))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop all pending timers.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_fire_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(300), "c");
        q.schedule(ms(100), "a");
        q.schedule(ms(200), "b");

        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(1000))).map(|f| f.payload).collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn ties_pop_in_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(100), 1);
        q.schedule(ms(100), 2);
        q.schedule(ms(100), 3);

        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(100))).map(|f| f.payload).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn not_due_stays_pending() {
        let mut q = TimerQueue::new();
        let id = q.schedule_after(ms(50), ms(100), ());

        assert!(q.pop_due(ms(149)).is_none());
        assert!(q.is_pending(id));

        let fired = q.pop_due(ms(150));
        assert_eq!(fired.map(|f| f.at), Some(ms(150)));
        assert!(!q.is_pending(id));
    }

    #[test]
    fn cancel_removes_timer() {
        let mut q = TimerQueue::new();
        let keep = q.schedule(ms(10), "keep");
        let drop = q.schedule(ms(5), "drop");

        assert_eq!(q.cancel(drop), Some("drop"));
        assert_eq!(q.cancel(drop), None);
        assert_eq!(q.next_deadline(), Some(ms(10)));

        let fired = q.pop_due(ms(100));
        assert_eq!(fired.map(|f| f.id), Some(keep));
    }

    #[test]
    fn cancel_where_matches_payloads() {
        let mut q = TimerQueue::new();
        q.schedule(ms(1), 1);
        q.schedule(ms(2), 2);
        q.schedule(ms(3), 3);
        q.schedule(ms(4), 4);

        assert_eq!(q.cancel_where(|n| n % 2 == 0), 2);
        let left: Vec<_> = q.iter().map(|(_, n)| *n).collect();
        assert_eq!(left, vec![1, 3]);
    }

    proptest::proptest! {
        #[test]
        fn prop_fire_times_never_decrease(delays in proptest::collection::vec(0u64..10_000, 0..64)) {
            let mut q = TimerQueue::new();
            for d in &delays {
                q.schedule(ms(*d), ());
            }

            let mut last = Duration::ZERO;
            let mut count = 0;
            while let Some(fired) = q.pop_due(ms(10_000)) {
                proptest::prop_assert!(fired.at >= last);
                last = fired.at;
                count += 1;
            }
            proptest::prop_assert_eq!(count, delays.len());
        }
    }
}
