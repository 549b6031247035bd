use super::{audio_host, desktop_notifier, scheduler_for};
use crate::{
    api::TaskApi,
    libs::{
        board::TaskBoard,
        config::Config,
        daemon::{self, Watcher},
        messages::Message,
        permission::PermissionGate,
        prefs::Preferences,
        sound::SoundEngine,
    },
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;

/// Keeps reminders armed for every task on the server until interrupted.
pub async fn cmd() -> Result<()> {
    let config = Config::read()?;
    let server = config.server()?;
    let api = TaskApi::new(server);

    let notifier = desktop_notifier()?;
    let gate = PermissionGate::new(notifier.clone());
    if !gate.request_permission().await {
        msg_warning!(Message::EnableNotificationsHint);
    }

    let mut sound = SoundEngine::load(audio_host(), Preferences::new()?);
    if sound.enable() {
        msg_success!(Message::SoundEnabled);
    } else {
        msg_warning!(Message::SoundEnableFailed);
    }

    let (board, events) = TaskBoard::new(scheduler_for(notifier), sound);
    let watcher = Watcher::new(api, board.clone(), events, config.reminders.clone().unwrap_or_default());

    msg_info!(Message::WatcherStarting(server.api_url.clone()));
    daemon::run_with_signal_handling(watcher.run()).await?;

    board.reset();
    msg_info!(Message::RemindersCleared);
    Ok(())
}
