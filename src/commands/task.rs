//! Task management against the task server.
//!
//! Every change is followed by a reminder preview so the user sees right
//! away whether, when, and how the task will be reminded, or what to change
//! to get a reminder.

use super::{desktop_notifier, scheduler_for};
use crate::{
    api::TaskApi,
    libs::{
        config::Config,
        formatter::{format_due, parse_due_input},
        messages::Message,
        prefs::{Preferences, DEFAULT_REMIND_MINUTES},
        scheduler::ScheduleOutcome,
        task::{format_instant, NewTask, Priority, Recurrence, Task, TaskUpdate},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: Option<TaskCommand>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        /// Task title; prompted for when omitted
        title: Option<String>,
        /// Details
        #[arg(long)]
        description: Option<String>,
        /// Due date, "YYYY-MM-DD HH:MM" local time or RFC 3339
        #[arg(short, long)]
        due: Option<String>,
        /// Minutes before the due date to remind; defaults to the stored preference
        #[arg(short, long)]
        remind: Option<i64>,
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long, value_enum, default_value_t = Recurrence::None)]
        recurrence: Recurrence,
    },
    /// List tasks
    List,
    /// Edit a task; prompts for title, due date and reminder when no option is given
    Edit {
        /// Task ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(short, long)]
        remind: Option<i64>,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        recurrence: Option<Recurrence>,
    },
    /// Mark a task as complete
    Done {
        /// Task ID
        id: String,
        /// Mark as pending again
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: TaskArgs) -> Result<()> {
    let config = Config::read()?;
    let api = TaskApi::new(config.server()?);

    match args.command {
        Some(TaskCommand::Add {
            title,
            description,
            due,
            remind,
            priority,
            recurrence,
        }) => {
            let draft = NewTaskDraft {
                title,
                description,
                due,
                remind,
                priority,
                recurrence,
            };
            handle_add(&api, draft).await
        }
        Some(TaskCommand::List) | None => handle_list(&api).await,
        Some(TaskCommand::Edit {
            id,
            title,
            due,
            clear_due,
            remind,
            priority,
            recurrence,
        }) => {
            let mut update = TaskUpdate {
                title,
                due_date: None,
                priority,
                recurrence,
                remind_minutes_before: remind,
                completed: None,
            };
            if clear_due {
                update.due_date = Some(None);
            } else if let Some(raw) = due {
                update.due_date = Some(Some(format_instant(&parse_due(&raw)?)));
            }
            handle_edit(&api, &id, update).await
        }
        Some(TaskCommand::Done { id, undo }) => handle_done(&api, &id, !undo).await,
        Some(TaskCommand::Delete { id, yes }) => handle_delete(&api, &id, yes).await,
    }
}

struct NewTaskDraft {
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    remind: Option<i64>,
    priority: Priority,
    recurrence: Recurrence,
}

async fn handle_add(api: &TaskApi, draft: NewTaskDraft) -> Result<()> {
    let title = match draft.title {
        Some(title) => title,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTaskTitle.to_string())
            .interact_text()?,
    };
    let title = title.trim().to_string();
    if title.is_empty() {
        msg_bail_anyhow!(Message::TaskTitleEmpty);
    }

    let due = draft.due.as_deref().map(parse_due).transpose()?;
    if due.is_some_and(|due| due < Utc::now()) {
        msg_bail_anyhow!(Message::TaskDueInPast);
    }
    let remind = draft
        .remind
        .unwrap_or_else(|| {
            Preferences::new()
                .map(|prefs| prefs.default_remind_minutes())
                .unwrap_or(DEFAULT_REMIND_MINUTES)
        })
        .max(0);

    let task = api
        .create(&NewTask {
            title,
            description: draft.description,
            due_date: due.as_ref().map(format_instant),
            priority: draft.priority,
            recurrence: draft.recurrence,
            remind_minutes_before: remind,
        })
        .await?;

    msg_success!(Message::TaskCreated);
    report_reminder(&task)
}

async fn handle_list(api: &TaskApi) -> Result<()> {
    let tasks = api.list().await?;
    if tasks.is_empty() {
        msg_info!(Message::TasksNotFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader, true);
    View::tasks(&tasks, Utc::now())?;
    Ok(())
}

async fn handle_edit(api: &TaskApi, id: &str, mut update: TaskUpdate) -> Result<()> {
    let task = find_task(api, id).await?;

    if update.is_empty() {
        update = prompt_update(&task)?;
    }
    if let Some(Some(raw)) = &update.due_date {
        let due = parse_due(raw)?;
        if task.created().is_some_and(|created| due < created) {
            msg_bail_anyhow!(Message::TaskDueBeforeCreation);
        }
    }
    if update.is_empty() {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    let task = api.update(id, &update).await?;
    msg_success!(Message::TaskUpdated);
    report_reminder(&task)
}

/// Asks for title, due date and reminder, keeping current values as defaults.
fn prompt_update(task: &Task) -> Result<TaskUpdate> {
    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskTitle.to_string())
        .default(task.title.clone())
        .interact_text()?;
    let current_due = task.due().map(|_| format_due(task.due_date.as_deref())).unwrap_or_default();
    let due: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskDueDate.to_string())
        .default(current_due.clone())
        .allow_empty(true)
        .interact_text()?;
    let remind: i64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskRemind.to_string())
        .default(task.remind_minutes_before)
        .interact_text()?;

    let mut update = TaskUpdate::default();
    let title = title.trim();
    if title.is_empty() {
        msg_bail_anyhow!(Message::TaskTitleEmpty);
    }
    if title != task.title {
        update.title = Some(title.to_string());
    }
    if due.trim() != current_due {
        update.due_date = if due.trim().is_empty() {
            Some(None)
        } else {
            Some(Some(format_instant(&parse_due(&due)?)))
        };
    }
    if remind != task.remind_minutes_before {
        update.remind_minutes_before = Some(remind.max(0));
    }
    Ok(update)
}

async fn handle_done(api: &TaskApi, id: &str, completed: bool) -> Result<()> {
    let update = TaskUpdate {
        completed: Some(completed),
        ..TaskUpdate::default()
    };
    let task = api.update(id, &update).await?;

    if task.completed {
        msg_success!(Message::TaskCompleted(task.title.clone()));
        Ok(())
    } else {
        msg_success!(Message::TaskReopened(task.title.clone()));
        report_reminder(&task)
    }
}

async fn handle_delete(api: &TaskApi, id: &str, confirmed: bool) -> Result<()> {
    let task = find_task(api, id).await?;

    let confirmed = confirmed
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.title.clone()).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    api.delete(id).await?;
    msg_success!(Message::TaskDeleted);
    Ok(())
}

async fn find_task(api: &TaskApi, id: &str) -> Result<Task> {
    match api.list().await?.into_iter().find(|task| task.id == id) {
        Some(task) => Ok(task),
        None => msg_bail_anyhow!(Message::TaskNotFoundWithId(id.to_string())),
    }
}

fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    match parse_due_input(raw) {
        Some(due) => Ok(due),
        None => msg_bail_anyhow!(Message::TaskInvalidDueDate(raw.to_string())),
    }
}

/// Prints what the watcher will do with the task's reminder.
fn report_reminder(task: &Task) -> Result<()> {
    let scheduler = scheduler_for(desktop_notifier()?);
    let outcome = scheduler.preview(task);
    msg_info!(outcome.message());
    if let ScheduleOutcome::Scheduled { native: false, .. } = outcome {
        msg_info!(Message::EnableNotificationsHint);
    }
    Ok(())
}
