//! Time-based callback scheduler
//!
//! A collaborator independent of the ECS pipeline, used by systems and
//! applications for delayed or periodic side effects that must not block a
//! frame (e.g. playing a sound after a delay). One [`Scheduler::update`]
//! call per frame executes everything that has come due.

use std::time::{Duration, Instant};

use slotmap::SlotMap;

use crate::foundation::time::Stopwatch;

slotmap::new_key_type! {
    /// Handle to a scheduled task
    pub struct TaskId;
}

struct Task {
    due: Instant,
    period: Option<Duration>,
    callback: Box<dyn FnMut()>,
}

/// Queue of delayed and periodic callbacks
pub struct Scheduler {
    tasks: SlotMap<TaskId, Task>,
    warn_threshold: Duration,
}

impl Scheduler {
    /// Create a scheduler that warns when a callback runs longer than the
    /// given threshold
    pub fn new(warn_threshold: Duration) -> Self {
        Self {
            tasks: SlotMap::with_key(),
            warn_threshold,
        }
    }

    /// Run `callback` once after `delay`
    pub fn schedule_in(&mut self, delay: Duration, callback: impl FnMut() + 'static) -> TaskId {
        self.tasks.insert(Task {
            due: Instant::now() + delay,
            period: None,
            callback: Box::new(callback),
        })
    }

    /// Run `callback` after `delay`, then every `period`
    pub fn schedule_repeating(
        &mut self,
        delay: Duration,
        period: Duration,
        callback: impl FnMut() + 'static,
    ) -> TaskId {
        self.tasks.insert(Task {
            due: Instant::now() + delay,
            period: Some(period),
            callback: Box::new(callback),
        })
    }

    /// Cancel a scheduled task
    ///
    /// Returns `false` if the task already ran to completion or was
    /// cancelled before.
    pub fn cancel(&mut self, task: TaskId) -> bool {
        self.tasks.remove(task).is_some()
    }

    /// Execute every due callback
    ///
    /// A callback that overruns the warning threshold is reported through
    /// the logging collaborator but neither cancelled nor retried. One-shot
    /// tasks are dropped after running; periodic tasks are rescheduled
    /// relative to this update.
    pub fn update(&mut self) {
        let now = Instant::now();
        let due: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(id, _)| id)
            .collect();

        for id in due {
            let stopwatch = Stopwatch::start_new();
            let period = {
                let Some(task) = self.tasks.get_mut(id) else {
                    continue;
                };
                (task.callback)();
                task.period
            };
            if stopwatch.elapsed() > self.warn_threshold {
                log::warn!(
                    "scheduled callback ran for {:.2} ms (threshold {:.2} ms)",
                    stopwatch.elapsed_millis(),
                    self.warn_threshold.as_secs_f32() * 1000.0
                );
            }
            match period {
                Some(period) => {
                    if let Some(task) = self.tasks.get_mut(id) {
                        task.due = now + period;
                    }
                }
                None => {
                    self.tasks.remove(id);
                }
            }
        }
    }

    /// Number of tasks currently scheduled
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_due_callback_runs_once() {
        let mut scheduler = Scheduler::default();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        scheduler.schedule_in(Duration::ZERO, move || counter.set(counter.get() + 1));

        scheduler.update();
        scheduler.update();

        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_future_callback_waits() {
        let mut scheduler = Scheduler::default();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        scheduler.schedule_in(Duration::from_secs(3600), move || counter.set(counter.get() + 1));

        scheduler.update();

        assert_eq!(runs.get(), 0);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_repeating_callback_is_rescheduled() {
        let mut scheduler = Scheduler::default();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        scheduler.schedule_repeating(Duration::ZERO, Duration::ZERO, move || {
            counter.set(counter.get() + 1);
        });

        scheduler.update();
        scheduler.update();

        assert_eq!(runs.get(), 2);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_cancel_prevents_execution() {
        let mut scheduler = Scheduler::default();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let task = scheduler.schedule_in(Duration::ZERO, move || counter.set(counter.get() + 1));

        assert!(scheduler.cancel(task));
        assert!(!scheduler.cancel(task));
        scheduler.update();

        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_overrunning_callback_still_completes() {
        let mut scheduler = Scheduler::new(Duration::ZERO);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        scheduler.schedule_in(Duration::ZERO, move || {
            std::thread::sleep(Duration::from_millis(2));
            counter.set(counter.get() + 1);
        });

        // Overrun is logged as a warning; the callback is not cancelled.
        scheduler.update();

        assert_eq!(runs.get(), 1);
    }
}
