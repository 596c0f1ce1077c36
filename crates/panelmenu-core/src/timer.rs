//! Fire-and-forget timers for a single-threaded event loop.
//!
//! The queue never reads a clock itself: the host passes the current
//! monotonic time in, which keeps ordering deterministic and tests free of
//! sleeps.

use std::time::Duration;

/// Handle identifying one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<E> {
    handle: TimerHandle,
    deadline: Duration,
    event: E,
}

/// Pending timers ordered by deadline, then by scheduling order
#[derive(Debug)]
pub struct TimerQueue<E> {
    pending: Vec<Pending<E>>,
    next_handle: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<E> TimerQueue<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, event: E) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.pending.push(Pending {
            handle,
            deadline: now + delay,
            event,
        });
        handle
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer due at `now`, earliest deadline first.
    /// Equal deadlines fire in the order they were scheduled.
    pub fn fire_due(&mut self, now: Duration) -> Vec<(TimerHandle, E)> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.deadline <= now);
        self.pending = waiting;
        due.sort_by_key(|p| (p.deadline, p.handle));
        due.into_iter().map(|p| (p.handle, p.event)).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
