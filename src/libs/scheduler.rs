//! Reminder scheduling.
//!
//! A [`ReminderScheduler`] owns a table of armed reminders keyed by task id.
//! Each entry is a one-shot Tokio task that sleeps until the reminder's fire
//! time and then raises a platform notification and/or runs an application
//! callback.
//!
//! ## Delivery Modes
//!
//! - **Native**: notification permission is granted. At fire time a platform
//!   notification tagged with the task id is raised, then the callback runs.
//! - **Fallback**: notifications are unsupported or not allowed. Only the
//!   callback runs, so the application can still chime and offer a snooze.
//!
//! ## Guarantees
//!
//! - At most one armed reminder exists per task id. Arming replaces the
//!   previous entry and aborts its timer under the same lock.
//! - A cleared or replaced reminder never fires, even if its timer already
//!   woke up on another worker thread: a timer only fires if it can still
//!   remove its own entry from the table.
//! - Notification and callback failures are logged and never leave the timer.
//! - Dropping the scheduler cancels everything it armed.
//!
//! The scheduler must be used from within a Tokio runtime.

use super::clock::Clock;
use super::messages::Message;
use super::notifier::{Notification, Notifier, Permission};
use super::task::{parse_instant, Task, TaskId};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Longest single timer sleep. Longer delays are slept in segments.
pub const MAX_TIMER_DELAY_MS: i64 = 2_147_483_647;

/// Upper bound for relative reminders. Keeps `now + minutes` representable.
const MAX_RELATIVE_MINUTES: f64 = i32::MAX as f64;

/// Invoked with the task when a reminder fires.
pub type ReminderCallback = Arc<dyn Fn(&Task) -> anyhow::Result<()> + Send + Sync>;

/// Why a reminder was not armed.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unsupported,
    Permission,
    NoDueDate,
    Completed,
    NoReminder,
    InvalidDue,
    InPast,
    NoDelay,
}

impl SkipReason {
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::Unsupported => "unsupported",
            SkipReason::Permission => "permission",
            SkipReason::NoDueDate => "no_due_date",
            SkipReason::Completed => "completed",
            SkipReason::NoReminder => "no_reminder",
            SkipReason::InvalidDue => "invalid_due",
            SkipReason::InPast => "in_past",
            SkipReason::NoDelay => "no_delay",
        }
    }

    /// User-facing guidance for this reason.
    pub fn message(&self) -> Message {
        match self {
            SkipReason::Unsupported => Message::ReminderUnsupported,
            SkipReason::Permission => Message::ReminderNeedsPermission,
            SkipReason::NoDueDate => Message::ReminderNeedsDueDate,
            SkipReason::Completed => Message::ReminderTaskCompleted,
            SkipReason::NoReminder => Message::ReminderNeedsOffset,
            SkipReason::InvalidDue => Message::ReminderInvalidDue,
            SkipReason::InPast => Message::ReminderInPast,
            SkipReason::NoDelay => Message::ReminderNoDelay,
        }
    }

    /// The task can never be reminded as it stands, regardless of permission.
    pub fn is_structural(&self) -> bool {
        !matches!(self, SkipReason::Unsupported | SkipReason::Permission)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Native,
    Fallback,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeliveryMode::Native => write!(f, "native"),
            DeliveryMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of a `schedule*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled {
        /// Full delay until the fire time, even past [`MAX_TIMER_DELAY_MS`].
        ms_until: i64,
        /// Whether a platform notification will be attempted at fire time.
        native: bool,
    },
    Skipped(SkipReason),
}

impl ScheduleOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, ScheduleOutcome::Scheduled { .. })
    }

    pub fn reason(&self) -> Option<SkipReason> {
        match self {
            ScheduleOutcome::Skipped(reason) => Some(*reason),
            ScheduleOutcome::Scheduled { .. } => None,
        }
    }

    pub fn ms_until(&self) -> Option<i64> {
        match self {
            ScheduleOutcome::Scheduled { ms_until, .. } => Some(*ms_until),
            ScheduleOutcome::Skipped(_) => None,
        }
    }

    pub fn native(&self) -> Option<bool> {
        match self {
            ScheduleOutcome::Scheduled { native, .. } => Some(*native),
            ScheduleOutcome::Skipped(_) => None,
        }
    }

    /// Feedback line for the user, e.g. "Reminder scheduled in 50 min (in-app)".
    pub fn message(&self) -> Message {
        match self {
            ScheduleOutcome::Scheduled { ms_until, native } => {
                let minutes = (*ms_until as f64 / 60_000.0).round() as i64;
                if *native {
                    Message::ReminderScheduled(minutes)
                } else {
                    Message::ReminderScheduledInApp(minutes)
                }
            }
            ScheduleOutcome::Skipped(reason) => reason.message(),
        }
    }
}

/// When a reminder for a task should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPlan {
    pub fire_at: DateTime<Utc>,
    pub ms_until: i64,
}

impl ReminderPlan {
    /// Derives the fire time from the task's due date and offset.
    ///
    /// Checks run in a fixed order and the first failure wins: missing due
    /// date, completed, non-positive offset, unparseable due date, fire time
    /// not in the future.
    pub fn for_task(task: &Task, now: DateTime<Utc>) -> Result<Self, SkipReason> {
        let raw_due = Self::raw_due(task)?;
        if task.completed {
            return Err(SkipReason::Completed);
        }
        Self::from_due(raw_due, task.remind_minutes_before, now)
    }

    /// Fire time for an in-app reminder: the same checks as
    /// [`for_task`](Self::for_task) minus the completion check.
    pub fn for_fallback(task: &Task, now: DateTime<Utc>) -> Result<Self, SkipReason> {
        Self::from_due(Self::raw_due(task)?, task.remind_minutes_before, now)
    }

    fn raw_due(task: &Task) -> Result<&str, SkipReason> {
        task.due_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(SkipReason::NoDueDate)
    }

    fn from_due(raw_due: &str, remind_minutes_before: i64, now: DateTime<Utc>) -> Result<Self, SkipReason> {
        if remind_minutes_before <= 0 {
            return Err(SkipReason::NoReminder);
        }
        let due = parse_instant(raw_due).ok_or(SkipReason::InvalidDue)?;

        let offset = TimeDelta::try_minutes(remind_minutes_before).ok_or(SkipReason::InPast)?;
        let fire_at = due.checked_sub_signed(offset).ok_or(SkipReason::InPast)?;
        let ms_until = (fire_at - now).num_milliseconds();
        if ms_until <= 0 {
            return Err(SkipReason::InPast);
        }

        Ok(Self { fire_at, ms_until })
    }

    /// A fire time `minutes` from now. Fractions are floored; negative and
    /// NaN read as zero, which yields [`SkipReason::NoDelay`].
    pub fn relative(minutes: f64, now: DateTime<Utc>) -> Result<Self, SkipReason> {
        let minutes = minutes.floor().max(0.0).min(MAX_RELATIVE_MINUTES) as i64;
        if minutes <= 0 {
            return Err(SkipReason::NoDelay);
        }
        let delay = TimeDelta::minutes(minutes);
        let fire_at = now.checked_add_signed(delay).ok_or(SkipReason::NoDelay)?;
        Ok(Self {
            fire_at,
            ms_until: delay.num_milliseconds(),
        })
    }
}

/// A reminder currently armed in the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub task_id: TaskId,
    pub title: String,
    pub fire_at: DateTime<Utc>,
    pub mode: DeliveryMode,
}

#[derive(Debug, Clone, Copy)]
enum FireAction {
    /// Due-date reminder: always notify.
    Due { minutes_before: i64 },
    /// In-app only: never notify.
    Fallback,
    /// Snooze: notify only if permission is granted at fire time.
    Relative,
}

struct Armed {
    generation: u64,
    title: String,
    fire_at: DateTime<Utc>,
    mode: DeliveryMode,
    handle: JoinHandle<()>,
}

pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    timers: Arc<Mutex<HashMap<TaskId, Armed>>>,
    next_generation: AtomicU64,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifier,
            clock,
            timers: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    fn may_notify(&self) -> bool {
        self.notifier.is_supported() && self.notifier.permission() == Permission::Granted
    }

    /// Arms a native reminder for `task`.
    ///
    /// Any reminder already armed for the task is cleared first, whatever the
    /// outcome, so a task that lost its due date or was completed does not
    /// keep a stale timer.
    pub fn schedule_for_task(&self, task: &Task, on_fire: ReminderCallback) -> ScheduleOutcome {
        self.clear_for_task(&task.id);

        if !self.notifier.is_supported() {
            return self.skipped(task, SkipReason::Unsupported);
        }
        if self.notifier.permission() != Permission::Granted {
            return self.skipped(task, SkipReason::Permission);
        }
        let plan = match ReminderPlan::for_task(task, self.clock.now()) {
            Ok(plan) => plan,
            Err(reason) => return self.skipped(task, reason),
        };

        let action = FireAction::Due {
            minutes_before: task.remind_minutes_before,
        };
        self.arm(task, plan, DeliveryMode::Native, action, on_fire);
        ScheduleOutcome::Scheduled {
            ms_until: plan.ms_until,
            native: true,
        }
    }

    /// Like [`schedule_for_task`](Self::schedule_for_task), but when only
    /// notification support or permission is missing, arms an in-app reminder
    /// that just runs `on_fallback`.
    ///
    /// Structural reasons (no due date, no offset, past, completed, invalid)
    /// are returned unchanged. The in-app timer itself does not look at
    /// completion, only at the due date and offset.
    pub fn schedule_with_fallback(&self, task: &Task, on_fallback: ReminderCallback) -> ScheduleOutcome {
        let outcome = self.schedule_for_task(task, Arc::clone(&on_fallback));
        match outcome.reason() {
            Some(reason) if !reason.is_structural() => {}
            _ => return outcome,
        }

        let plan = match ReminderPlan::for_fallback(task, self.clock.now()) {
            Ok(plan) => plan,
            Err(reason) => return self.skipped(task, reason),
        };
        self.arm(task, plan, DeliveryMode::Fallback, FireAction::Fallback, on_fallback);
        ScheduleOutcome::Scheduled {
            ms_until: plan.ms_until,
            native: false,
        }
    }

    /// Arms a reminder `minutes_from_now` minutes from now, ignoring the
    /// task's due date and offset. Used for snoozing.
    pub fn schedule_relative(&self, task: &Task, minutes_from_now: f64, on_fire: ReminderCallback) -> ScheduleOutcome {
        let plan = match ReminderPlan::relative(minutes_from_now, self.clock.now()) {
            Ok(plan) => plan,
            Err(reason) => return self.skipped(task, reason),
        };

        let native = self.may_notify();
        let mode = if native { DeliveryMode::Native } else { DeliveryMode::Fallback };
        self.arm(task, plan, mode, FireAction::Relative, on_fire);
        ScheduleOutcome::Scheduled {
            ms_until: plan.ms_until,
            native,
        }
    }

    /// What [`schedule_with_fallback`](Self::schedule_with_fallback) would
    /// answer for `task` right now, without arming anything.
    pub fn preview(&self, task: &Task) -> ScheduleOutcome {
        match ReminderPlan::for_task(task, self.clock.now()) {
            Ok(plan) => ScheduleOutcome::Scheduled {
                ms_until: plan.ms_until,
                native: self.may_notify(),
            },
            Err(reason) => ScheduleOutcome::Skipped(reason),
        }
    }

    /// Cancels the reminder for `task_id`. Returns whether one was armed.
    pub fn clear_for_task(&self, task_id: &str) -> bool {
        match self.timers.lock().remove(task_id) {
            Some(armed) => {
                armed.handle.abort();
                debug!(task_id, "reminder cleared");
                true
            }
            None => false,
        }
    }

    /// Cancels every armed reminder.
    pub fn clear_all(&self) {
        let drained: Vec<_> = self.timers.lock().drain().collect();
        for (_, armed) in &drained {
            armed.handle.abort();
        }
        if !drained.is_empty() {
            debug!(count = drained.len(), "all reminders cleared");
        }
    }

    /// Raises a notification right away. Returns whether it was shown.
    pub fn show_now(&self, notification: &Notification) -> bool {
        if !self.may_notify() {
            return false;
        }
        match self.notifier.notify(notification) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "immediate notification failed");
                false
            }
        }
    }

    /// State of the reminder armed for `task_id`, with the delay measured from now.
    pub fn armed(&self, task_id: &str) -> Option<ScheduleOutcome> {
        let now = self.clock.now();
        self.timers.lock().get(task_id).map(|armed| ScheduleOutcome::Scheduled {
            ms_until: (armed.fire_at - now).num_milliseconds().max(0),
            native: armed.mode == DeliveryMode::Native,
        })
    }

    pub fn is_scheduled(&self, task_id: &str) -> bool {
        self.timers.lock().contains_key(task_id)
    }

    pub fn scheduled_count(&self) -> usize {
        self.timers.lock().len()
    }

    /// Armed reminders ordered by fire time.
    pub fn pending(&self) -> Vec<ScheduledReminder> {
        let mut pending: Vec<_> = self
            .timers
            .lock()
            .iter()
            .map(|(task_id, armed)| ScheduledReminder {
                task_id: task_id.clone(),
                title: armed.title.clone(),
                fire_at: armed.fire_at,
                mode: armed.mode,
            })
            .collect();
        pending.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.task_id.cmp(&b.task_id)));
        pending
    }

    fn skipped(&self, task: &Task, reason: SkipReason) -> ScheduleOutcome {
        debug!(task_id = %task.id, reason = %reason, "reminder not scheduled");
        ScheduleOutcome::Skipped(reason)
    }

    fn arm(&self, task: &Task, plan: ReminderPlan, mode: DeliveryMode, action: FireAction, callback: ReminderCallback) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let notifier = Arc::clone(&self.notifier);
        let fired = task.clone();
        let deadline = deadline_after(plan.ms_until);

        let mut table = self.timers.lock();
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;

            let claimed = {
                let mut table = timers.lock();
                match table.get(&fired.id) {
                    Some(armed) if armed.generation == generation => table.remove(&fired.id).is_some(),
                    _ => false,
                }
            };
            if claimed {
                fire(notifier.as_ref(), &fired, action, &callback);
            }
        });

        let armed = Armed {
            generation,
            title: task.title.clone(),
            fire_at: plan.fire_at,
            mode,
            handle,
        };
        if let Some(previous) = table.insert(task.id.clone(), armed) {
            previous.handle.abort();
        }
        info!(task_id = %task.id, ms_until = plan.ms_until, mode = %mode, "reminder armed");
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.clear_all();
    }
}

/// The instant `ms_until` milliseconds from now, or `None` past what the timer can represent.
fn deadline_after(ms_until: i64) -> Option<Instant> {
    Instant::now().checked_add(Duration::from_millis(ms_until.max(0) as u64))
}

/// Sleeps until `deadline` in segments no longer than [`MAX_TIMER_DELAY_MS`].
async fn sleep_until(deadline: Option<Instant>) {
    let Some(deadline) = deadline else {
        return std::future::pending().await;
    };
    let segment = Duration::from_millis(MAX_TIMER_DELAY_MS as u64);
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        time::sleep(remaining.min(segment)).await;
    }
}

fn fire(notifier: &dyn Notifier, task: &Task, action: FireAction, callback: &ReminderCallback) {
    let notification = match action {
        FireAction::Due { minutes_before } => Some(Notification {
            title: Message::NotificationTitle.to_string(),
            body: Message::NotificationDueBody(task.title.clone(), minutes_before).to_string(),
            tag: Some(task.id.clone()),
            silent: false,
        }),
        FireAction::Fallback => None,
        FireAction::Relative => {
            let granted = notifier.is_supported() && notifier.permission() == Permission::Granted;
            granted.then(|| Notification {
                title: Message::NotificationTitle.to_string(),
                body: Message::NotificationSnoozeBody(task.title.clone()).to_string(),
                tag: Some(task.id.clone()),
                silent: false,
            })
        }
    };

    if let Some(notification) = notification {
        if let Err(e) = notifier.notify(&notification) {
            warn!(task_id = %task.id, error = %e, "reminder notification failed");
        }
    }

    match panic::catch_unwind(AssertUnwindSafe(|| callback(task))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(task_id = %task.id, error = %e, "reminder callback failed"),
        Err(_) => warn!(task_id = %task.id, "reminder callback panicked"),
    }
    info!(task_id = %task.id, "reminder fired");
}
