//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and a `cmd`
//! function. Shared wiring for the notification and audio backends is kept
//! here so every command builds them the same way.

pub mod init;
pub mod notify;
pub mod permission;
pub mod settings;
pub mod task;
pub mod watch;

use crate::libs::clock::SystemClock;
use crate::libs::notifier::DesktopNotifier;
use crate::libs::prefs::Preferences;
use crate::libs::scheduler::ReminderScheduler;
use crate::libs::sound::AudioHost;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the task server and reminder settings")]
    Init(init::InitArgs),
    #[command(about = "Add, list, edit, complete and delete tasks")]
    Task(task::TaskArgs),
    #[command(about = "Show or change chime and default reminder settings")]
    Settings(settings::SettingsArgs),
    #[command(about = "Show a notification right now")]
    Notify(notify::NotifyArgs),
    #[command(about = "Ask for or reset notification permission")]
    Permission(permission::PermissionArgs),
    #[command(about = "Watch tasks and fire reminders until interrupted")]
    Watch,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args).await,
            Commands::Settings(args) => settings::cmd(args).await,
            Commands::Notify(args) => notify::cmd(args).await,
            Commands::Permission(args) => permission::cmd(args).await,
            Commands::Watch => watch::cmd().await,
        }
    }
}

/// Desktop notifier backed by the user's preference store.
pub(crate) fn desktop_notifier() -> Result<Arc<DesktopNotifier>> {
    Ok(Arc::new(DesktopNotifier::new(Preferences::new()?)))
}

/// Scheduler on the system clock around `notifier`.
pub(crate) fn scheduler_for(notifier: Arc<DesktopNotifier>) -> Arc<ReminderScheduler> {
    Arc::new(ReminderScheduler::new(notifier, Arc::new(SystemClock)))
}

/// Audio backend selected at build time.
pub(crate) fn audio_host() -> Box<dyn AudioHost> {
    #[cfg(feature = "cpal")]
    {
        Box::new(crate::libs::sound::CpalHost)
    }
    #[cfg(not(feature = "cpal"))]
    {
        Box::new(crate::libs::sound::TerminalBell)
    }
}
