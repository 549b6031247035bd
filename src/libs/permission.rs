//! Permission gate in front of the platform notifier.
//!
//! Turns the notifier's permission protocol into a plain "may notify" answer
//! and makes sure only one permission prompt is outstanding at a time: callers
//! that arrive while a prompt is open wait for it and reuse its answer.

use super::notifier::{Notifier, Permission};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct PermissionGate {
    notifier: Arc<dyn Notifier>,
    prompt: Mutex<()>,
}

impl PermissionGate {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            prompt: Mutex::new(()),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.notifier.is_supported()
    }

    pub fn permission(&self) -> Permission {
        self.notifier.permission()
    }

    /// Supported and granted.
    pub fn is_granted(&self) -> bool {
        self.is_supported() && self.permission() == Permission::Granted
    }

    /// Resolves whether notifications may be shown, prompting the user if
    /// nothing has been decided yet.
    ///
    /// Never fails: an unsupported host or a failed prompt answers `false`.
    pub async fn request_permission(&self) -> bool {
        if !self.is_supported() {
            return false;
        }
        if let Some(decided) = decided(self.permission()) {
            return decided;
        }

        let _prompt = self.prompt.lock().await;
        // Answered while we were queued behind another prompt.
        if let Some(decided) = decided(self.permission()) {
            debug!("reusing permission answer from concurrent request");
            return decided;
        }

        match self.notifier.request_permission().await {
            Ok(permission) => permission == Permission::Granted,
            Err(e) => {
                warn!(error = %e, "notification permission request failed");
                false
            }
        }
    }
}

fn decided(permission: Permission) -> Option<bool> {
    match permission {
        Permission::Granted => Some(true),
        Permission::Denied => Some(false),
        Permission::Default => None,
    }
}
