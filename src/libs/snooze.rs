//! Snooze controller.
//!
//! Holds the one fired reminder currently shown to the user and turns a
//! snooze choice into a relative reminder.

use super::scheduler::{ReminderCallback, ReminderScheduler, ScheduleOutcome};
use super::task::Task;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

pub struct SnoozeController {
    scheduler: Arc<ReminderScheduler>,
    on_fire: ReminderCallback,
    presented: Mutex<Option<Task>>,
}

impl SnoozeController {
    /// `on_fire` runs when a snoozed reminder comes due.
    pub fn new(scheduler: Arc<ReminderScheduler>, on_fire: ReminderCallback) -> Self {
        Self {
            scheduler,
            on_fire,
            presented: Mutex::new(None),
        }
    }

    /// Shows `task`, replacing whatever was shown before.
    pub fn present(&self, task: Task) {
        debug!(task_id = %task.id, "reminder presented");
        *self.presented.lock() = Some(task);
    }

    pub fn current(&self) -> Option<Task> {
        self.presented.lock().clone()
    }

    /// Re-arms the presented task `minutes` from now and clears the presentation.
    ///
    /// Returns `None` when nothing is presented.
    pub fn snooze(&self, minutes: f64) -> Option<ScheduleOutcome> {
        let task = self.presented.lock().take()?;
        let outcome = self.scheduler.schedule_relative(&task, minutes, Arc::clone(&self.on_fire));
        debug!(task_id = %task.id, minutes, scheduled = outcome.is_scheduled(), "reminder snoozed");
        Some(outcome)
    }

    /// Clears the presentation without rescheduling. Returns the task that was shown.
    pub fn dismiss(&self) -> Option<Task> {
        self.presented.lock().take()
    }
}
