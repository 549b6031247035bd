//! # Taskbell - task reminders for the terminal
//!
//! A command-line companion for a personal task server. It keeps one
//! reminder per task armed ahead of the due date, raises a desktop
//! notification when it fires, and plays a short two-tone chime.
//!
//! ## Features
//!
//! - **Permission Gate**: asks once for notification permission and remembers the answer
//! - **Reminder Scheduling**: per-task timers with an in-app fallback when notifications are off
//! - **Snooze**: re-arm the last fired reminder a few minutes from now
//! - **Chime**: synthesized pitch-step chime with configurable waveform and volume
//! - **Task Management**: add, list, edit, complete and delete tasks on the server
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskbell::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
