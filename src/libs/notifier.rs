//! Platform notification capability.
//!
//! The reminder core talks to notifications only through the [`Notifier`]
//! trait: a capability check, a synchronously readable permission, an async
//! permission request, and a call that raises a visible alert.
//!
//! ## Implementations
//!
//! - [`DesktopNotifier`]: desktop notifications via `notify-rust`. The
//!   permission is a persisted user decision collected by a terminal prompt.
//! - [`RecordingNotifier`]: in-memory notifier with adjustable support and
//!   permission that records every raised notification.

use super::data_storage::APP_NAME;
use super::messages::Message;
use super::prefs::{Preferences, NOTIFICATION_PERMISSION_KEY};
use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Confirm};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::IsTerminal;
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info};

/// Notification permission state.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not decided yet; a request will prompt the user.
    #[default]
    Default,
    Granted,
    Denied,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Permission::Default => "default",
            Permission::Granted => "granted",
            Permission::Denied => "denied",
        };
        write!(f, "{}", text)
    }
}

/// A visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Notifications with the same tag replace each other where the platform allows it.
    pub tag: Option<String>,
    pub silent: bool,
}

impl Default for Notification {
    fn default() -> Self {
        Notification {
            title: "Task Manager".to_string(),
            body: "This is a test notification".to_string(),
            tag: None,
            silent: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifications are not supported here")]
    Unsupported,

    #[error("permission prompt failed: {0}")]
    Prompt(String),

    #[error("failed to store permission decision: {0}")]
    Storage(String),

    #[error("failed to raise notification: {0}")]
    Platform(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether the host can show notifications at all.
    fn is_supported(&self) -> bool;

    /// Current permission, readable without suspending.
    fn permission(&self) -> Permission;

    /// Asks the user for permission, or returns the stored decision immediately.
    async fn request_permission(&self) -> Result<Permission, NotifyError>;

    /// Raises a notification.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Desktop notifications through the session's notification service.
pub struct DesktopNotifier {
    prefs: Preferences,
    // Server-side ids per tag, so a newer alert for the same task replaces the older one.
    #[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
    replaces: Mutex<HashMap<String, u32>>,
}

impl DesktopNotifier {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs,
            replaces: Mutex::new(HashMap::new()),
        }
    }

    fn stored_permission(&self) -> Option<Permission> {
        self.prefs.get::<Permission>(NOTIFICATION_PERMISSION_KEY)
    }

    /// Forgets the stored decision so the next request prompts again.
    pub fn reset_permission(&self) -> anyhow::Result<bool> {
        self.prefs.remove(NOTIFICATION_PERMISSION_KEY)
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn is_supported(&self) -> bool {
        // Without a stored decision the only way to obtain one is the prompt.
        self.stored_permission().is_some() || std::io::stdin().is_terminal()
    }

    fn permission(&self) -> Permission {
        self.stored_permission().unwrap_or_default()
    }

    async fn request_permission(&self) -> Result<Permission, NotifyError> {
        if !self.is_supported() {
            return Err(NotifyError::Unsupported);
        }
        let current = self.permission();
        if current != Permission::Default {
            return Ok(current);
        }

        let allowed = tokio::task::spawn_blocking(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptAllowNotifications.to_string())
                .default(true)
                .interact()
        })
        .await
        .map_err(|e| NotifyError::Prompt(e.to_string()))?
        .map_err(|e| NotifyError::Prompt(e.to_string()))?;

        let decision = if allowed { Permission::Granted } else { Permission::Denied };
        self.prefs
            .set(NOTIFICATION_PERMISSION_KEY, &decision)
            .map_err(|e| NotifyError::Storage(e.to_string()))?;
        info!(permission = %decision, "notification permission decided");
        Ok(decision)
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut alert = notify_rust::Notification::new();
        alert.summary(&notification.title).body(&notification.body).appname(APP_NAME);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            if notification.silent {
                alert.hint(notify_rust::Hint::SuppressSound(true));
            }
            if let Some(id) = notification.tag.as_ref().and_then(|tag| self.replaces.lock().get(tag).copied()) {
                alert.id(id);
            }
        }

        // show() waits on the notification service; reminders fire from runtime tasks.
        let handle = blocking_call(|| alert.show()).map_err(|e| NotifyError::Platform(e.to_string()))?;
        debug!(title = %notification.title, tag = ?notification.tag, "notification raised");

        #[cfg(all(unix, not(target_os = "macos")))]
        if let Some(tag) = &notification.tag {
            self.replaces.lock().insert(tag.clone(), handle.id());
        }
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        drop(handle);

        Ok(())
    }
}

/// Runs a blocking platform call. On a multi-threaded runtime worker the
/// worker hands its other tasks off first; elsewhere the call runs in place.
pub fn blocking_call<T>(call: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => tokio::task::block_in_place(call),
        _ => call(),
    }
}

#[derive(Debug)]
struct RecordingState {
    supported: bool,
    permission: Permission,
    prompt_answer: Permission,
    failing: bool,
    prompts: usize,
    raised: Vec<Notification>,
}

/// In-memory notifier that records what would have been shown.
#[derive(Debug)]
pub struct RecordingNotifier {
    state: Mutex<RecordingState>,
}

impl RecordingNotifier {
    fn with(supported: bool, permission: Permission, prompt_answer: Permission) -> Self {
        Self {
            state: Mutex::new(RecordingState {
                supported,
                permission,
                prompt_answer,
                failing: false,
                prompts: 0,
                raised: Vec::new(),
            }),
        }
    }

    pub fn granted() -> Self {
        Self::with(true, Permission::Granted, Permission::Granted)
    }

    pub fn denied() -> Self {
        Self::with(true, Permission::Denied, Permission::Denied)
    }

    pub fn unsupported() -> Self {
        Self::with(false, Permission::Default, Permission::Default)
    }

    /// Undecided permission; a request resolves to `answer`.
    pub fn undecided(answer: Permission) -> Self {
        Self::with(true, Permission::Default, answer)
    }

    pub fn set_permission(&self, permission: Permission) {
        self.state.lock().permission = permission;
    }

    pub fn set_supported(&self, supported: bool) {
        self.state.lock().supported = supported;
    }

    /// Makes every subsequent `notify` call fail.
    pub fn fail_notifications(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    pub fn raised(&self) -> Vec<Notification> {
        self.state.lock().raised.clone()
    }

    /// Number of times the user would have been prompted.
    pub fn prompts(&self) -> usize {
        self.state.lock().prompts
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn is_supported(&self) -> bool {
        self.state.lock().supported
    }

    fn permission(&self) -> Permission {
        self.state.lock().permission
    }

    async fn request_permission(&self) -> Result<Permission, NotifyError> {
        let answer = {
            let mut state = self.state.lock();
            if !state.supported {
                return Err(NotifyError::Unsupported);
            }
            if state.permission != Permission::Default {
                return Ok(state.permission);
            }
            state.prompts += 1;
            state.prompt_answer
        };
        // The user takes a moment to answer.
        tokio::task::yield_now().await;
        self.state.lock().permission = answer;
        Ok(answer)
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(NotifyError::Platform("notification service unavailable".to_string()));
        }
        state.raised.push(notification.clone());
        Ok(())
    }
}
