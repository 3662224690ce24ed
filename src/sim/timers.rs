//! Single-shot deferred actions on the simulation clock
//!
//! Timers fire in deadline order; timers sharing a deadline fire in the order
//! they were scheduled. Due timers are collected once per tick, so anything
//! scheduled while a tick is running fires on a later tick at the earliest.

#[derive(Debug, Clone)]
struct Timer<A> {
    deadline: f32,
    action: A,
}

/// Deadline-ordered queue of pending actions
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    /// Sorted by deadline, stable for equal deadlines
    timers: Vec<Timer<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Schedule `action` to fire `delay` seconds after `now`
    pub fn schedule(&mut self, now: f32, delay: f32, action: A) {
        let deadline = now + delay.max(0.0);
        let at = self.timers.partition_point(|t| t.deadline <= deadline);
        self.timers.insert(at, Timer { deadline, action });
    }

    /// Cancel every timer whose action matches
    pub fn cancel_where(&mut self, mut matches: impl FnMut(&A) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| !matches(&t.action));
        before - self.timers.len()
    }

    /// Remove and return all actions due at `now`, earliest first
    pub fn drain_due(&mut self, now: f32) -> Vec<A> {
        let due = self.timers.partition_point(|t| t.deadline <= now);
        self.timers.drain(..due).map(|t| t.action).collect()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
