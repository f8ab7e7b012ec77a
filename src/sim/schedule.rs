//! Delayed one-shot actions
//!
//! Every task remembers the epoch it was armed in. Bumping the epoch (on
//! reset and start) turns all earlier tasks stale; stale tasks are dropped
//! when they come due instead of acting on a game that has moved on.

use super::state::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Put the ball in play from this side
    Serve(Side),
    /// Return to the title screen
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    due_tick: u64,
    epoch: u64,
    action: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    epoch: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate every task armed so far
    pub fn advance_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Arm `action` to fire `delay_ticks` after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, action: Deferred) {
        self.tasks.push(Task {
            due_tick: now + delay_ticks,
            epoch: self.epoch,
            action,
        });
    }

    /// Remove and return the live tasks due at `now`, in arming order
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let epoch = self.epoch;
        let mut due = Vec::new();
        self.tasks.retain(|task| {
            if task.due_tick > now {
                return true;
            }
            if task.epoch == epoch {
                due.push(task.action);
            } else {
                log::debug!(
                    "Dropping stale {:?} armed in epoch {} (now {})",
                    task.action,
                    task.epoch,
                    epoch
                );
            }
            false
        });
        due
    }

    /// Number of armed tasks, stale ones included
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut s = Scheduler::new();
        s.schedule(10, 60, Deferred::Serve(Side::Left));
        assert!(s.take_due(69).is_empty());
        assert_eq!(s.take_due(70), vec![Deferred::Serve(Side::Left)]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_fires_in_arming_order() {
        let mut s = Scheduler::new();
        s.schedule(0, 5, Deferred::Reset);
        s.schedule(0, 5, Deferred::Serve(Side::Right));
        assert_eq!(
            s.take_due(5),
            vec![Deferred::Reset, Deferred::Serve(Side::Right)]
        );
    }

    #[test]
    fn test_stale_tasks_are_dropped() {
        let mut s = Scheduler::new();
        s.schedule(0, 60, Deferred::Serve(Side::Left));
        s.advance_epoch();
        assert_eq!(s.epoch(), 1);
        s.schedule(0, 60, Deferred::Reset);
        assert_eq!(s.take_due(60), vec![Deferred::Reset]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_zero_delay_fires_same_tick() {
        let mut s = Scheduler::new();
        s.schedule(3, 0, Deferred::Reset);
        assert_eq!(s.take_due(3), vec![Deferred::Reset]);
    }
}
