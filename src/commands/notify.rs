use super::{desktop_notifier, scheduler_for};
use crate::{
    libs::{messages::Message, notifier::Notification, permission::PermissionGate},
    msg_error, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Notification title
    #[arg(short, long)]
    title: Option<String>,
    /// Notification body
    #[arg(short, long)]
    body: Option<String>,
    /// Ask the notification service not to play a sound
    #[arg(short, long)]
    silent: bool,
}

/// Requests permission if needed and shows a notification immediately.
pub async fn cmd(args: NotifyArgs) -> Result<()> {
    let notifier = desktop_notifier()?;
    let gate = PermissionGate::new(notifier.clone());

    if !gate.request_permission().await {
        if gate.is_supported() {
            msg_warning!(Message::NotificationsNotAllowed);
        } else {
            msg_warning!(Message::NotificationsUnsupported);
        }
        return Ok(());
    }

    let defaults = Notification::default();
    let notification = Notification {
        title: args.title.unwrap_or(defaults.title),
        body: args.body.unwrap_or(defaults.body),
        tag: None,
        silent: args.silent,
    };

    if scheduler_for(notifier).show_now(&notification) {
        msg_success!(Message::TestNotificationShown);
    } else {
        msg_error!(Message::TestNotificationFailed);
    }
    Ok(())
}
