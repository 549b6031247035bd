//! Configuration management for the taskbell application.
//!
//! Holds the settings that describe *where* tasks come from and *how* the
//! reminder loop behaves. User preferences that change often (chime, default
//! reminder offset) live in the preference store instead, see
//! [`Preferences`](super::prefs::Preferences).
//!
//! ## Configuration Structure
//!
//! - **Server Config**: task server URL and access token
//! - **Reminder Config**: refresh interval for the watch loop and snooze presets
//!
//! Both sections are optional. A missing server section makes every command
//! that talks to the task server fail with a hint to run `taskbell init`.
//!
//! ## Storage
//!
//! The file is `config.json` in the per-user data directory, written as
//! pretty-printed JSON so it can be edited by hand.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use taskbell::libs::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::read()?;
//! let reminders = config.reminders.clone().unwrap_or_default();
//! println!("refresh every {}s", reminders.refresh_interval);
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use super::metadata::APP_METADATA_DEFAULT_API_URL;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// A configurable section shown by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Identifier used to route the selection
    pub key: String,
    /// Display name shown to users
    pub name: String,
}

/// Connection parameters for the task server.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the task server, e.g. `https://tasks.example.com`.
    ///
    /// Endpoint paths such as `/api/tasks` are appended to it.
    pub api_url: String,

    /// Bearer token sent with every request.
    pub auth_token: String,
}

/// Reminder loop settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReminderConfig {
    /// Seconds between task list refreshes in `taskbell watch`.
    ///
    /// Each refresh re-derives every reminder from the current task data, so
    /// edits made elsewhere are picked up without restarting the watcher.
    pub refresh_interval: u64,

    /// Snooze offsets in minutes offered when a reminder fires.
    pub snooze_presets: Vec<u32>,
}

impl Default for ReminderConfig {
    /// - 60 second refresh interval
    /// - snooze presets of 5, 10 and 30 minutes
    fn default() -> Self {
        ReminderConfig {
            refresh_interval: 60,
            snooze_presets: vec![5, 10, 30],
        }
    }
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Task server connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Reminder loop behaviour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderConfig>,
}

impl Config {
    /// Reads configuration from the data directory.
    ///
    /// A missing file yields the default configuration. A file that exists
    /// but cannot be parsed is reported as an error, since silently replacing
    /// a hand-edited server configuration would hide the mistake.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns whether a file was removed.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Returns the server section or an error telling the user to run `init`.
    pub fn server(&self) -> Result<&ServerConfig> {
        self.server.as_ref().ok_or_else(|| msg_error_anyhow!(Message::ConfigServerMissing))
    }

    /// Runs the interactive setup wizard.
    ///
    /// Starts from the stored configuration so existing values appear as
    /// defaults, lets the user pick which sections to edit, and returns the
    /// updated configuration without saving it.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "server".to_string(),
                name: Message::ConfigModuleServer.to_string(),
            },
            ConfigModule {
                key: "reminders".to_string(),
                name: Message::ConfigModuleReminders.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .defaults(&[config.server.is_none(), false])
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "server" => {
                    let default = config.server.clone().unwrap_or(ServerConfig {
                        api_url: APP_METADATA_DEFAULT_API_URL.to_string(),
                        auth_token: String::new(),
                    });
                    msg_print!(Message::ConfigModuleServer);
                    let api_url: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptServerApiUrl.to_string())
                        .default(default.api_url)
                        .interact_text()?;
                    config.server = Some(ServerConfig {
                        api_url: api_url.trim_end_matches('/').to_string(),
                        auth_token: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerAuthToken.to_string())
                            .default(default.auth_token)
                            .interact_text()?,
                    });
                }
                "reminders" => {
                    let default = config.reminders.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleReminders);
                    let refresh_interval = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptRefreshInterval.to_string())
                        .default(default.refresh_interval)
                        .interact_text()?;
                    let presets: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptSnoozePresets.to_string())
                        .default(join_presets(&default.snooze_presets))
                        .interact_text()?;
                    config.reminders = Some(ReminderConfig {
                        refresh_interval,
                        snooze_presets: parse_presets(&presets).unwrap_or(default.snooze_presets),
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

/// Formats snooze presets as `5, 10, 30`.
pub fn join_presets(presets: &[u32]) -> String {
    presets.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
}

/// Parses a comma separated preset list, dropping zeroes and duplicates.
///
/// Returns `None` if any entry is not a whole number or nothing remains.
pub fn parse_presets(input: &str) -> Option<Vec<u32>> {
    let mut presets = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let minutes: u32 = part.parse().ok()?;
        if minutes > 0 && !presets.contains(&minutes) {
            presets.push(minutes);
        }
    }
    if presets.is_empty() {
        None
    } else {
        Some(presets)
    }
}
