use super::desktop_notifier;
use crate::{
    libs::{messages::Message, notifier::Notifier, permission::PermissionGate},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct PermissionArgs {
    /// Forget the stored decision so the next request asks again
    #[arg(short, long)]
    reset: bool,
}

pub async fn cmd(args: PermissionArgs) -> Result<()> {
    let notifier = desktop_notifier()?;

    if args.reset {
        if notifier.reset_permission()? {
            msg_success!(Message::NotificationPermissionReset);
        }
        msg_print!(Message::NotificationPermissionStatus(notifier.permission().to_string()));
        return Ok(());
    }

    let gate = PermissionGate::new(notifier.clone());
    if gate.request_permission().await {
        msg_success!(Message::NotificationsEnabled);
    } else if gate.is_supported() {
        msg_warning!(Message::NotificationsNotAllowed);
    } else {
        msg_info!(Message::NotificationsUnsupported);
    }
    msg_print!(Message::NotificationPermissionStatus(notifier.permission().to_string()));
    Ok(())
}
