//! Cancellable delayed tasks
//!
//! The event loop drains due tasks on every tick. A cancelled task never
//! fires, and a task whose target has already gone away is the caller's
//! no-op to handle.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Scheduled<T> {
    /// Scheduling order, breaks ties between tasks due at the same instant
    seq: u64,
    due: Instant,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_seq: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `task` to run `delay` after `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            seq,
            due: now + delay,
            task,
        });
    }

    /// Cancel every pending task matching `predicate`. Returns how many were dropped.
    pub fn cancel_where(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !predicate(&s.task));
        before - self.pending.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every task due at `now`, earliest first.
    /// Tasks due at the same instant come out in scheduling order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_when_due() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(300), "late");
        scheduler.schedule(start, Duration::from_millis(100), "early");

        assert!(scheduler.drain_due(start).is_empty());
        assert_eq!(
            scheduler.drain_due(start + Duration::from_millis(150)),
            vec!["early"]
        );
        assert_eq!(
            scheduler.drain_due(start + Duration::from_secs(1)),
            vec!["late"]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_due_order_is_earliest_first() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(200), 2);
        scheduler.schedule(start, Duration::from_millis(100), 1);
        scheduler.schedule(start, Duration::from_millis(200), 3);

        assert_eq!(
            scheduler.drain_due(start + Duration::from_secs(1)),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(10), "reload");
        scheduler.schedule(start, Duration::from_millis(10), "dismiss");

        assert_eq!(scheduler.cancel_where(|t| *t == "reload"), 1);
        assert_eq!(scheduler.cancel_where(|t| *t == "reload"), 0);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(
            scheduler.drain_due(start + Duration::from_secs(5)),
            vec!["dismiss"]
        );
    }
}
