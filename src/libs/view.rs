use super::formatter::{format_due, format_duration, format_local};
use super::scheduler::{ReminderPlan, ScheduledReminder};
use super::task::Task;
use anyhow::Result;
use chrono::{DateTime, Utc};
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints the task list. The REMINDER column previews when the reminder
    /// would fire, or why there is none.
    pub fn tasks(tasks: &[Task], now: DateTime<Utc>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "ID", "TITLE", "DUE", "PRIORITY", "REPEAT", "REMIND", "REMINDER", "DONE"]);
        for (index, task) in tasks.iter().enumerate() {
            let reminder = match ReminderPlan::for_task(task, now) {
                Ok(plan) => format!("in {}", format_duration(&(plan.fire_at - now))),
                Err(reason) => reason.to_string(),
            };
            let remind = if task.remind_minutes_before > 0 {
                format!("{} min", task.remind_minutes_before)
            } else {
                "-".to_string()
            };
            let mut due = format_due(task.due_date.as_deref());
            if task.is_overdue(now) {
                due.push_str(" (overdue)");
            }
            table.add_row(row![
                index + 1,
                task.id,
                task.title,
                due,
                task.priority,
                task.recurrence,
                remind,
                reminder,
                if task.completed { "✔" } else { "" }
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Prints armed reminders in fire order.
    pub fn reminders(reminders: &[ScheduledReminder], now: DateTime<Utc>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TASK ID", "TITLE", "FIRES AT", "IN", "MODE"]);
        for reminder in reminders {
            table.add_row(row![
                reminder.task_id,
                reminder.title,
                format_local(&reminder.fire_at),
                format_duration(&(reminder.fire_at - now)),
                reminder.mode
            ]);
        }
        table.printstd();

        Ok(())
    }
}
