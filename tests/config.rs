#[cfg(test)]
mod tests {
    use std::fs;
    use taskbell::libs::config::{join_presets, parse_presets, Config, ReminderConfig, ServerConfig, CONFIG_FILE_NAME};
    use taskbell::libs::data_storage::DataStorage;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Test context to ensure a clean environment for each config test.
    /// It sets up a temporary directory to act as the user's home/appdata directory.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        api_url: String,
        auth_token: String,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext {
                _temp_dir: temp_dir,
                api_url: "https://tasks.example.com".to_string(),
                auth_token: "token123".to_string(),
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert_eq!(config, Config::default());
        assert!(config.server().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read(ctx: &mut ConfigTestContext) {
        let config = Config {
            server: Some(ServerConfig {
                api_url: ctx.api_url.clone(),
                auth_token: ctx.auth_token.clone(),
            }),
            reminders: Some(ReminderConfig {
                refresh_interval: 30,
                snooze_presets: vec![1, 15],
            }),
        };
        config.save().unwrap();

        let read = Config::read().unwrap();
        assert_eq!(read, config);
        assert_eq!(read.server().unwrap().api_url, ctx.api_url);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_sections_are_not_written(ctx: &mut ConfigTestContext) {
        let config = Config {
            server: Some(ServerConfig {
                api_url: ctx.api_url.clone(),
                auth_token: ctx.auth_token.clone(),
            }),
            reminders: None,
        };
        config.save().unwrap();

        let raw = fs::read_to_string(DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap()).unwrap();
        assert!(raw.contains("api_url"));
        assert!(!raw.contains("reminders"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_corrupt_config_is_an_error(_ctx: &mut ConfigTestContext) {
        fs::write(DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap(), "server = 1").unwrap();
        assert!(Config::read().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_delete(ctx: &mut ConfigTestContext) {
        assert!(!Config::delete().unwrap());

        Config {
            server: Some(ServerConfig {
                api_url: ctx.api_url.clone(),
                auth_token: ctx.auth_token.clone(),
            }),
            reminders: None,
        }
        .save()
        .unwrap();
        assert!(Config::delete().unwrap());
        assert_eq!(Config::read().unwrap(), Config::default());
    }

    #[test]
    fn test_reminder_defaults() {
        let reminders = ReminderConfig::default();
        assert_eq!(reminders.refresh_interval, 60);
        assert_eq!(reminders.snooze_presets, vec![5, 10, 30]);
    }

    #[test]
    fn test_presets() {
        assert_eq!(join_presets(&[5, 10, 30]), "5, 10, 30");
        assert_eq!(parse_presets("5, 10,30"), Some(vec![5, 10, 30]));
        assert_eq!(parse_presets("0, 5, 5, ,15"), Some(vec![5, 15]));
        assert_eq!(parse_presets("5, soon"), None);
        assert_eq!(parse_presets("0"), None);
        assert_eq!(parse_presets(""), None);
    }
}
