#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskCompleted(String), // title
    TaskReopened(String),  // title
    TaskNotFoundWithId(String),
    TasksHeader,
    TasksNotFound,
    TaskTitleEmpty,
    TaskDueInPast,
    TaskDueBeforeCreation,
    TaskInvalidDueDate(String), // raw input
    ConfirmDeleteTask(String),  // title
    NoChangesDetected,

    // === REMINDER MESSAGES ===
    ReminderScheduled(i64),       // minutes until
    ReminderScheduledInApp(i64),  // minutes until
    ReminderNeedsPermission,
    ReminderNeedsDueDate,
    ReminderNeedsOffset,
    ReminderInPast,
    ReminderTaskCompleted,
    ReminderInvalidDue,
    ReminderUnsupported,
    ReminderNoDelay,
    ReminderFired(String),        // title
    ReminderSnoozed(u32),         // minutes
    ReminderDismissed,
    ReminderNothingPresented,
    SnoozeHint(String),           // presets
    RemindersScheduled(usize),    // count
    RemindersCleared,
    EnableNotificationsHint,
    NotificationTitle,
    NotificationDueBody(String, i64), // title, minutes
    NotificationSnoozeBody(String),   // title

    // === NOTIFICATION PERMISSION MESSAGES ===
    NotificationsEnabled,
    NotificationsNotAllowed,
    NotificationsUnsupported,
    NotificationPermissionReset,
    NotificationPermissionStatus(String),
    TestNotificationShown,
    TestNotificationFailed,

    // === SOUND MESSAGES ===
    SoundEnabled,
    SoundEnableFailed,
    SoundChimePlayed,
    SoundChimeFailed,
    SoundSettings(String, f64), // wave, volume
    DefaultRemindSetting(i64),
    SettingsSaved,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigServerMissing,
    ConfigModuleServer,
    ConfigModuleReminders,

    // === API MESSAGES ===
    ApiRequestFailed(String),       // reason
    ApiStatusFailed(u16, String),   // status, server message
    ApiUnauthorized,

    // === WATCHER MESSAGES ===
    WatcherStarting(String), // server url
    WatcherRefreshFailed(String),
    WatcherRefreshed(usize),
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    WatcherShuttingDown,
    WatcherStopped,
    WatcherUnknownCommand(String),
    FailedToCreateSigtermHandler,
    FailedToCreateSigintHandler,

    // === PROMPTS ===
    PromptServerApiUrl,
    PromptServerAuthToken,
    PromptRefreshInterval,
    PromptSnoozePresets,
    PromptSelectModules,
    PromptAllowNotifications,
    PromptTaskTitle,
    PromptTaskDueDate,
    PromptTaskRemind,

    // === GENERAL MESSAGES ===
    OperationCancelled,
}
