#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;
    use taskbell::api::TaskApi;
    use taskbell::libs::board::TaskBoard;
    use taskbell::libs::clock::ManualClock;
    use taskbell::libs::config::{ReminderConfig, ServerConfig};
    use taskbell::libs::daemon::{WatchCommand, Watcher};
    use taskbell::libs::notifier::RecordingNotifier;
    use taskbell::libs::scheduler::ReminderScheduler;
    use taskbell::libs::sound::{CapturedAudio, SoundEngine};
    use taskbell::libs::task::Task;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 7, 15, 0, 0).unwrap()
    }

    fn watcher() -> (Arc<TaskBoard>, Watcher) {
        let scheduler = Arc::new(ReminderScheduler::new(
            Arc::new(RecordingNotifier::granted()),
            Arc::new(ManualClock::new(now())),
        ));
        let (board, events) = TaskBoard::new(scheduler, SoundEngine::new(Box::new(CapturedAudio::new())));
        let api = TaskApi::new(&ServerConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            auth_token: String::new(),
        });
        let watcher = Watcher::new(api, board.clone(), events, ReminderConfig::default());
        (board, watcher)
    }

    #[test]
    fn test_parse_snooze_minutes() {
        assert_eq!(WatchCommand::parse("10"), Some(WatchCommand::Snooze(10.0)));
        assert_eq!(WatchCommand::parse(" 5m "), Some(WatchCommand::Snooze(5.0)));
        assert_eq!(WatchCommand::parse("2.5"), Some(WatchCommand::Snooze(2.5)));
        assert_eq!(WatchCommand::parse("-5"), Some(WatchCommand::Snooze(-5.0)));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(WatchCommand::parse("d"), Some(WatchCommand::Dismiss));
        assert_eq!(WatchCommand::parse("Dismiss"), Some(WatchCommand::Dismiss));
        assert_eq!(WatchCommand::parse("l"), Some(WatchCommand::List));
        assert_eq!(WatchCommand::parse("LIST"), Some(WatchCommand::List));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(WatchCommand::parse(""), None);
        assert_eq!(WatchCommand::parse("   "), None);
        assert_eq!(WatchCommand::parse("later"), Some(WatchCommand::Unknown("later".to_string())));
        assert_eq!(WatchCommand::parse("inf"), Some(WatchCommand::Unknown("inf".to_string())));
    }

    #[test]
    fn test_parse_snooze_edge_cases() {
        assert_eq!(WatchCommand::parse("5m"), Some(WatchCommand::Snooze(5.0)));
        assert_eq!(WatchCommand::parse("5 m"), Some(WatchCommand::Snooze(5.0)));
        assert_eq!(WatchCommand::parse("30M"), Some(WatchCommand::Snooze(30.0)));
        assert_eq!(WatchCommand::parse("-3"), Some(WatchCommand::Snooze(-3.0)));
        assert_eq!(WatchCommand::parse("0"), Some(WatchCommand::Snooze(0.0)));
        assert_eq!(WatchCommand::parse("nan"), Some(WatchCommand::Unknown("nan".to_string())));
        assert_eq!(WatchCommand::parse("NaN"), Some(WatchCommand::Unknown("NaN".to_string())));
        assert_eq!(WatchCommand::parse("m"), Some(WatchCommand::Unknown("m".to_string())));
        assert_eq!(WatchCommand::parse("5mm"), Some(WatchCommand::Unknown("5mm".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snooze_command_rearms_presented_task() {
        let (board, watcher) = watcher();
        watcher.handle(WatchCommand::Snooze(5.0)).unwrap();
        assert_eq!(board.scheduler().scheduled_count(), 0);

        let due = now() + TimeDelta::minutes(20);
        board.load(vec![Task::new("t1", "Stretch").with_due_date(due).with_reminder(10)]);
        tokio::time::advance(Duration::from_secs(10 * 60)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(board.presented().map(|t| t.id), Some("t1".to_string()));

        watcher.handle(WatchCommand::Snooze(5.0)).unwrap();
        assert!(board.presented().is_none());
        assert!(board.scheduler().is_scheduled("t1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_negative_snooze_arms_nothing() {
        let (board, watcher) = watcher();
        let due = now() + TimeDelta::minutes(20);
        board.load(vec![Task::new("t1", "Stretch").with_due_date(due).with_reminder(10)]);
        tokio::time::advance(Duration::from_secs(10 * 60)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(board.presented().is_some());

        watcher.handle(WatchCommand::parse("-3").unwrap()).unwrap();
        assert!(board.presented().is_none());
        assert_eq!(board.scheduler().scheduled_count(), 0);
    }

    #[tokio::test]
    async fn test_dismiss_list_and_unknown_commands_succeed() {
        let (_board, watcher) = watcher();
        watcher.handle(WatchCommand::Dismiss).unwrap();
        watcher.handle(WatchCommand::List).unwrap();
        watcher.handle(WatchCommand::Unknown("later".to_string())).unwrap();
    }
}
