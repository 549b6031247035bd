//! Display implementation for taskbell application messages.
//!
//! Every piece of user-facing text lives in the single `match` below, so the
//! wording of notifications, prompts, and errors can be reviewed in one place.
//!
//! ## Message Categories
//!
//! - **Task Messages**: Creation, edits, completion, and deletion
//! - **Reminder Messages**: Scheduling outcomes, firing, and snoozing
//! - **Notification Messages**: Permission state and test notifications
//! - **Sound Messages**: Audio unlock and chime settings
//! - **Configuration Messages**: Setup wizard and persisted settings
//! - **Watcher Messages**: Foreground reminder loop lifecycle
//!
//! ## Usage Integration
//!
//! ```rust
//! use taskbell::{msg_info, msg_success};
//! use taskbell::libs::messages::Message;
//!
//! msg_success!(Message::TaskCreated);
//! msg_info!(Message::ReminderScheduled(15));
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    /// Converts a `Message` variant into human-readable text.
    ///
    /// Reminder outcome texts double as guidance: each skip reason tells the
    /// user what to change so that a reminder can be scheduled.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated => "Task added".to_string(),
            Message::TaskUpdated => "Task updated".to_string(),
            Message::TaskDeleted => "Task deleted".to_string(),
            Message::TaskCompleted(title) => format!("'{}' marked as complete", title),
            Message::TaskReopened(title) => format!("'{}' marked as pending", title),
            Message::TaskNotFoundWithId(id) => format!("Task with ID {} not found.", id),
            Message::TasksHeader => "Tasks:".to_string(),
            Message::TasksNotFound => "No tasks yet.".to_string(),
            Message::TaskTitleEmpty => "Task title cannot be empty".to_string(),
            Message::TaskDueInPast => "Please pick a future due date/time".to_string(),
            Message::TaskDueBeforeCreation => "Due date cannot be earlier than creation time".to_string(),
            Message::TaskInvalidDueDate(raw) => format!("Invalid due date '{}'. Use 'YYYY-MM-DD HH:MM' or RFC 3339.", raw),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),
            Message::NoChangesDetected => "No changes detected.".to_string(),

            // === REMINDER MESSAGES ===
            Message::ReminderScheduled(minutes) => format!("Reminder scheduled in {} min", minutes),
            Message::ReminderScheduledInApp(minutes) => format!("Reminder scheduled in {} min (in-app)", minutes),
            Message::ReminderNeedsPermission => "Enable notifications to receive reminders".to_string(),
            Message::ReminderNeedsDueDate => "Set a due date to schedule a reminder".to_string(),
            Message::ReminderNeedsOffset => "Set Remind (min) > 0 to schedule a reminder".to_string(),
            Message::ReminderInPast => "Reminder time is already in the past".to_string(),
            Message::ReminderTaskCompleted => "Task is completed; no reminders".to_string(),
            Message::ReminderInvalidDue => "Invalid due date".to_string(),
            Message::ReminderUnsupported => "Notifications not supported on this system".to_string(),
            Message::ReminderNoDelay => "Snooze needs at least one minute".to_string(),
            Message::ReminderFired(title) => format!("Reminder: {}", title),
            Message::ReminderSnoozed(minutes) => format!("Snoozed for {} min", minutes),
            Message::ReminderDismissed => "Reminder dismissed".to_string(),
            Message::ReminderNothingPresented => "No reminder to snooze.".to_string(),
            Message::SnoozeHint(presets) => format!("Snooze: {} (minutes) or any number, 'd' to dismiss", presets),
            Message::RemindersScheduled(count) => format!("{} reminder(s) armed", count),
            Message::RemindersCleared => "All reminders cleared".to_string(),
            Message::EnableNotificationsHint => "Enable notifications to get reminders".to_string(),
            Message::NotificationTitle => "Task reminder".to_string(),
            Message::NotificationDueBody(title, minutes) => format!("{} is due in {} minute(s)", title, minutes),
            Message::NotificationSnoozeBody(title) => format!("{} reminder", title),

            // === NOTIFICATION PERMISSION MESSAGES ===
            Message::NotificationsEnabled => "Notifications enabled".to_string(),
            Message::NotificationsNotAllowed => "Notifications not allowed".to_string(),
            Message::NotificationsUnsupported => "Desktop notifications are not available here".to_string(),
            Message::NotificationPermissionReset => "Stored notification decision removed".to_string(),
            Message::NotificationPermissionStatus(status) => format!("Notification permission: {}", status),
            Message::TestNotificationShown => "Test notification sent".to_string(),
            Message::TestNotificationFailed => "Could not show a notification".to_string(),

            // === SOUND MESSAGES ===
            Message::SoundEnabled => "Sound enabled".to_string(),
            Message::SoundEnableFailed => "Failed to enable sound".to_string(),
            Message::SoundChimePlayed => "Chime played".to_string(),
            Message::SoundChimeFailed => "Chime could not be played".to_string(),
            Message::SoundSettings(wave, volume) => format!("Chime: {} at {}% volume", wave, (volume * 100.0).round()),
            Message::DefaultRemindSetting(minutes) => format!("Default reminder: {} min before due", minutes),
            Message::SettingsSaved => "Settings saved".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigServerMissing => "Task server is not configured. Run 'taskbell init' first.".to_string(),
            Message::ConfigModuleServer => "Task server settings".to_string(),
            Message::ConfigModuleReminders => "Reminder settings".to_string(),

            // === API MESSAGES ===
            Message::ApiRequestFailed(reason) => format!("Task server request failed: {}", reason),
            Message::ApiStatusFailed(status, message) => format!("Task server answered {}: {}", status, message),
            Message::ApiUnauthorized => "Task server rejected the token. Run 'taskbell init' to update it.".to_string(),

            // === WATCHER MESSAGES ===
            Message::WatcherStarting(url) => format!("Watching tasks on {}... Press Ctrl+C to exit.", url),
            Message::WatcherRefreshFailed(error) => format!("Failed to refresh tasks: {}", error),
            Message::WatcherRefreshed(count) => format!("Task list refreshed ({} tasks)", count),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down gracefully...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down gracefully...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::WatcherShuttingDown => "Shutting down watcher...".to_string(),
            Message::WatcherStopped => "Watcher stopped".to_string(),
            Message::WatcherUnknownCommand(input) => format!("Unknown command '{}'", input),
            Message::FailedToCreateSigtermHandler => "Failed to create SIGTERM handler".to_string(),
            Message::FailedToCreateSigintHandler => "Failed to create SIGINT handler".to_string(),

            // === PROMPTS ===
            Message::PromptServerApiUrl => "Task server URL".to_string(),
            Message::PromptServerAuthToken => "Access token".to_string(),
            Message::PromptRefreshInterval => "Refresh task list every (seconds)".to_string(),
            Message::PromptSnoozePresets => "Snooze presets in minutes (comma separated)".to_string(),
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptAllowNotifications => "Allow taskbell to show desktop notifications?".to_string(),
            Message::PromptTaskTitle => "Title".to_string(),
            Message::PromptTaskDueDate => "Due (YYYY-MM-DD HH:MM, empty for none)".to_string(),
            Message::PromptTaskRemind => "Remind (min before due)".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
