use super::audio_host;
use crate::{
    libs::{
        chime::Waveform,
        messages::Message,
        prefs::Preferences,
        sound::{SoundConfigUpdate, SoundEngine},
    },
    msg_error, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Chime waveform
    #[arg(short, long, value_enum)]
    wave: Option<Waveform>,
    /// Chime volume from 0.0 to 1.0
    #[arg(short, long)]
    volume: Option<f64>,
    /// Reminder offset in minutes suggested for new tasks
    #[arg(short, long)]
    default_remind: Option<i64>,
    /// Unlock audio and play the chime
    #[arg(short, long)]
    test: bool,
}

pub async fn cmd(args: SettingsArgs) -> Result<()> {
    let prefs = Preferences::new()?;
    let mut engine = SoundEngine::load(audio_host(), prefs.clone());

    let mut changed = false;
    if args.wave.is_some() || args.volume.is_some() {
        engine.set_config(SoundConfigUpdate {
            wave: args.wave.map(|wave| wave.to_string()),
            volume: args.volume.map(Value::from),
        });
        changed = true;
    }
    if let Some(minutes) = args.default_remind {
        prefs.set_default_remind_minutes(minutes)?;
        changed = true;
    }
    if changed {
        msg_success!(Message::SettingsSaved);
    }

    let config = engine.config();
    msg_print!(Message::SoundSettings(config.wave.to_string(), config.volume));
    msg_print!(Message::DefaultRemindSetting(prefs.default_remind_minutes()));

    if args.test {
        if !engine.enable() {
            msg_error!(Message::SoundEnableFailed);
            return Ok(());
        }
        msg_success!(Message::SoundEnabled);
        if engine.play_chime() {
            msg_success!(Message::SoundChimePlayed);
            // Playback may run on a background thread; let it finish before exiting.
            tokio::time::sleep(Duration::from_millis(400)).await;
        } else {
            msg_error!(Message::SoundChimeFailed);
        }
    }

    Ok(())
}
