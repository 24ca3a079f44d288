//! One-shot timers measured against simulation time.
//!
//! Timers never fire from outside the tick: the engine drains expired
//! entries at the tick boundary and hands the payloads to whoever owns
//! them. Cancelling a token that already fired is a no-op.

use ironsight_core::types::TimerToken;

#[derive(Debug, Clone)]
struct Pending<T> {
    token: TimerToken,
    due_ms: f64,
    payload: T,
}

/// A cancellable set of pending timers.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_token: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_token: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Pending {
            token,
            due_ms: now_ms + delay_ms.max(0.0),
            payload,
        });
        token
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    /// Remove and return every payload due at or before `now_ms`, earliest
    /// first. Timers due at the same instant fire in scheduling order.
    pub fn drain_expired(&mut self, now_ms: f64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.token.cmp(&b.token)));
        due.into_iter().map(|p| p.payload).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.0, 100.0, "a");

        assert!(timers.drain_expired(99.9).is_empty());
        assert_eq!(timers.drain_expired(100.0), vec!["a"]);
        assert!(timers.is_empty());
        // Already fired: nothing more to drain.
        assert!(timers.drain_expired(500.0).is_empty());
    }

    #[test]
    fn test_drain_orders_by_due_time_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.0, 50.0, 3);
        timers.schedule(0.0, 10.0, 1);
        timers.schedule(0.0, 50.0, 4);
        timers.schedule(0.0, 20.0, 2);
        timers.schedule(0.0, 999.0, 5);

        assert_eq!(timers.drain_expired(60.0), vec![1, 2, 3, 4]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(0.0, 10.0, 'a');
        let b = timers.schedule(0.0, 10.0, 'b');

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a), "double cancel reports nothing removed");
        assert_eq!(timers.drain_expired(10.0), vec!['b']);
        assert!(!timers.cancel(b), "cancel after firing is a no-op");
    }

    #[test]
    fn test_tokens_are_unique_after_clear() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(0.0, 1.0, ());
        timers.clear();
        let b = timers.schedule(0.0, 1.0, ());
        assert_ne!(a, b);
        assert!(!timers.cancel(a));
        assert_eq!(timers.len(), 1);
    }
}
