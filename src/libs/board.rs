//! In-memory task board.
//!
//! Owns the loaded task list and keeps the scheduler in step with it: every
//! create, update, toggle and delete re-derives the task's reminder, and so
//! does a load for every task whose record changed.
//! When a reminder fires the board chimes, presents the task for snoozing and
//! publishes a [`BoardEvent`] for whoever is showing output to the user.

use super::scheduler::{ReminderCallback, ReminderScheduler, ScheduleOutcome, SkipReason};
use super::snooze::SnoozeController;
use super::sound::SoundEngine;
use super::task::{Task, TaskId};
use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// A reminder came due. `chimed` tells whether the chime played.
    Fired { task: Task, chimed: bool },
}

pub struct TaskBoard {
    tasks: Mutex<Vec<Task>>,
    scheduler: Arc<ReminderScheduler>,
    sound: Mutex<SoundEngine>,
    snooze: SnoozeController,
    on_fire: ReminderCallback,
    events: UnboundedSender<BoardEvent>,
}

impl TaskBoard {
    pub fn new(scheduler: Arc<ReminderScheduler>, sound: SoundEngine) -> (Arc<Self>, UnboundedReceiver<BoardEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let board = Arc::new_cyclic(|board: &Weak<TaskBoard>| {
            let board = board.clone();
            let on_fire: ReminderCallback = Arc::new(move |task: &Task| match board.upgrade() {
                Some(board) => board.handle_fire(task),
                None => Ok(()),
            });
            TaskBoard {
                tasks: Mutex::new(Vec::new()),
                snooze: SnoozeController::new(Arc::clone(&scheduler), Arc::clone(&on_fire)),
                scheduler,
                sound: Mutex::new(sound),
                on_fire,
                events,
            }
        });
        (board, receiver)
    }

    fn handle_fire(&self, task: &Task) -> Result<()> {
        let chimed = self.sound.lock().play_chime();
        self.snooze.present(task.clone());
        info!(task_id = %task.id, chimed, "reminder presented");
        self.events
            .send(BoardEvent::Fired {
                task: task.clone(),
                chimed,
            })
            .map_err(|_| anyhow!("no listener for fired reminders"))
    }

    fn schedule(&self, task: &Task) -> ScheduleOutcome {
        self.scheduler.schedule_with_fallback(task, Arc::clone(&self.on_fire))
    }

    fn replace(&self, task: Task) {
        let mut tasks = self.tasks.lock();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        }
    }

    /// Replaces the task list and schedules every task.
    ///
    /// Reminders of tasks that are no longer listed are cleared. A task whose
    /// record is unchanged since the last load keeps the reminder it has
    /// armed, so a snooze survives a refresh.
    pub fn load(&self, tasks: Vec<Task>) -> Vec<(TaskId, ScheduleOutcome)> {
        let incoming: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let previous = std::mem::take(&mut *self.tasks.lock());
        for gone in previous.iter().filter(|t| !incoming.contains(t.id.as_str())) {
            self.scheduler.clear_for_task(&gone.id);
        }

        let outcomes: Vec<_> = tasks
            .iter()
            .map(|task| {
                let unchanged = previous.iter().any(|p| p == task);
                let outcome = match self.scheduler.armed(&task.id) {
                    Some(outcome) if unchanged => outcome,
                    _ => self.schedule(task),
                };
                (task.id.clone(), outcome)
            })
            .collect();
        debug!(
            tasks = tasks.len(),
            scheduled = outcomes.iter().filter(|(_, o)| o.is_scheduled()).count(),
            "task board loaded"
        );
        *self.tasks.lock() = tasks;
        outcomes
    }

    /// Adds or updates a task and re-derives its reminder.
    pub fn upsert(&self, task: Task) -> ScheduleOutcome {
        let outcome = self.schedule(&task);
        self.replace(task);
        outcome
    }

    /// Applies a completion toggle. Completing clears the reminder; reopening re-arms it.
    pub fn toggle(&self, task: Task) -> ScheduleOutcome {
        if !task.completed {
            return self.upsert(task);
        }
        self.scheduler.clear_for_task(&task.id);
        self.replace(task);
        ScheduleOutcome::Skipped(SkipReason::Completed)
    }

    /// Drops a task and its reminder. Returns whether the task was listed.
    pub fn remove(&self, task_id: &str) -> bool {
        self.scheduler.clear_for_task(task_id);
        if self.snooze.current().is_some_and(|t| t.id == task_id) {
            self.snooze.dismiss();
        }
        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        tasks.len() != before
    }

    /// Clears every reminder, the task list and the presentation.
    pub fn reset(&self) {
        self.scheduler.clear_all();
        self.tasks.lock().clear();
        self.snooze.dismiss();
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    pub fn task(&self, task_id: &str) -> Option<Task> {
        self.tasks.lock().iter().find(|t| t.id == task_id).cloned()
    }

    pub fn presented(&self) -> Option<Task> {
        self.snooze.current()
    }

    pub fn snooze(&self, minutes: f64) -> Option<ScheduleOutcome> {
        self.snooze.snooze(minutes)
    }

    pub fn dismiss(&self) -> Option<Task> {
        self.snooze.dismiss()
    }

    pub fn scheduler(&self) -> &Arc<ReminderScheduler> {
        &self.scheduler
    }

    /// Runs `f` with exclusive access to the sound engine.
    pub fn with_sound<R>(&self, f: impl FnOnce(&mut SoundEngine) -> R) -> R {
        f(&mut self.sound.lock())
    }
}
