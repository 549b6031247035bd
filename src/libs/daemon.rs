//! Foreground reminder loop for the watch command.
//!
//! The [`Watcher`] keeps the task board in sync with the task server,
//! reports fired reminders and reads snooze commands from stdin.
//! [`run_with_signal_handling`] runs it until SIGINT/SIGTERM (Ctrl+C on
//! Windows) or until it stops on its own.

use crate::api::TaskApi;
use crate::libs::board::{BoardEvent, TaskBoard};
use crate::libs::config::{join_presets, ReminderConfig};
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_debug, msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{self, MissedTickBehavior};

/// A line typed into the watch loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Snooze(f64),
    Dismiss,
    List,
    Unknown(String),
}

impl WatchCommand {
    /// Parses a line. Blank input yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let command = match line.to_lowercase().as_str() {
            "d" | "dismiss" => WatchCommand::Dismiss,
            "l" | "list" => WatchCommand::List,
            other => match other.strip_suffix('m').unwrap_or(other).trim_end().parse::<f64>() {
                Ok(minutes) if minutes.is_finite() => WatchCommand::Snooze(minutes),
                _ => WatchCommand::Unknown(line.to_string()),
            },
        };
        Some(command)
    }
}

pub struct Watcher {
    api: TaskApi,
    board: Arc<TaskBoard>,
    events: UnboundedReceiver<BoardEvent>,
    settings: ReminderConfig,
}

impl Watcher {
    pub fn new(api: TaskApi, board: Arc<TaskBoard>, events: UnboundedReceiver<BoardEvent>, settings: ReminderConfig) -> Self {
        Self {
            api,
            board,
            events,
            settings,
        }
    }

    /// Runs until the board's event channel closes.
    pub async fn run(mut self) -> Result<()> {
        let mut refresh = time::interval(Duration::from_secs(self.settings.refresh_interval.max(1)));
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut input = spawn_stdin_reader();
        let mut input_open = true;

        loop {
            tokio::select! {
                _ = refresh.tick() => self.refresh().await,
                event = self.events.recv() => match event {
                    Some(event) => self.report(event),
                    None => return Ok(()),
                },
                line = input.recv(), if input_open => match line {
                    Some(line) => {
                        if let Some(command) = WatchCommand::parse(&line) {
                            self.handle(command)?;
                        }
                    }
                    None => input_open = false,
                },
            }
        }
    }

    async fn refresh(&self) {
        match self.api.list().await {
            Ok(tasks) => {
                let count = tasks.len();
                let outcomes = self.board.load(tasks);
                let armed = outcomes.iter().filter(|(_, outcome)| outcome.is_scheduled()).count();
                msg_debug!(Message::WatcherRefreshed(count));
                msg_debug!(Message::RemindersScheduled(armed));
            }
            Err(e) => msg_error!(Message::WatcherRefreshFailed(e.to_string())),
        }
    }

    fn report(&self, event: BoardEvent) {
        match event {
            BoardEvent::Fired { task, .. } => {
                msg_info!(Message::ReminderFired(task.title), true);
                msg_print!(Message::SnoozeHint(join_presets(&self.settings.snooze_presets)));
            }
        }
    }

    pub fn handle(&self, command: WatchCommand) -> Result<()> {
        match command {
            WatchCommand::Snooze(minutes) => match self.board.snooze(minutes) {
                Some(outcome) if outcome.is_scheduled() => {
                    msg_success!(Message::ReminderSnoozed(minutes.floor() as u32));
                }
                Some(outcome) => msg_warning!(outcome.message()),
                None => msg_info!(Message::ReminderNothingPresented),
            },
            WatchCommand::Dismiss => match self.board.dismiss() {
                Some(_) => msg_info!(Message::ReminderDismissed),
                None => msg_info!(Message::ReminderNothingPresented),
            },
            WatchCommand::List => View::reminders(&self.board.scheduler().pending(), Utc::now())?,
            WatchCommand::Unknown(input) => msg_warning!(Message::WatcherUnknownCommand(input)),
        }
        Ok(())
    }
}

/// Forwards stdin lines from a plain thread, which does not hold up runtime shutdown.
fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Runs `watcher` until it finishes or the process is asked to stop.
pub async fn run_with_signal_handling<F>(watcher: F) -> Result<()>
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).map_err(|_| crate::msg_error_anyhow!(Message::FailedToCreateSigtermHandler))?;
        let mut sigint = signal(SignalKind::interrupt()).map_err(|_| crate::msg_error_anyhow!(Message::FailedToCreateSigintHandler))?;

        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
        drop(shutdown_tx);
    }

    let mut watcher_handle = tokio::spawn(watcher);

    tokio::select! {
        result = &mut watcher_handle => {
            match result {
                Ok(Ok(())) => msg_info!(Message::WatcherStopped),
                Ok(Err(e)) => msg_error!(e.to_string()),
                Err(e) => msg_error!(e.to_string()),
            }
        }
        Ok(()) = shutdown_rx => {
            msg_info!(Message::WatcherShuttingDown);
            watcher_handle.abort();
        }
    }

    Ok(())
}
