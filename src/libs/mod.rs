//! Core library modules for the taskbell application.
//!
//! ## Features
//!
//! - **Core Infrastructure**: configuration, data storage, preferences, messaging
//! - **Reminders**: permission gate, scheduler, snooze controller, task board
//! - **Sound**: chime synthesis and the audio engine that plays it
//! - **User Interface**: watch loop, console tables, formatting
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskbell::libs::clock::SystemClock;
//! use taskbell::libs::notifier::RecordingNotifier;
//! use taskbell::libs::scheduler::ReminderScheduler;
//! use taskbell::libs::task::Task;
//!
//! let scheduler = ReminderScheduler::new(Arc::new(RecordingNotifier::granted()), Arc::new(SystemClock));
//! let outcome = scheduler.preview(&Task::new("1", "Write report"));
//! println!("{}", outcome.message());
//! ```

pub mod board;
pub mod chime;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod formatter;
pub mod messages;
pub mod metadata;
pub mod notifier;
pub mod permission;
pub mod prefs;
pub mod scheduler;
pub mod snooze;
pub mod sound;
pub mod task;
pub mod view;
