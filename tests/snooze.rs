#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use taskbell::libs::clock::ManualClock;
    use taskbell::libs::messages::Message;
    use taskbell::libs::notifier::RecordingNotifier;
    use taskbell::libs::scheduler::{ReminderCallback, ReminderScheduler, ScheduleOutcome, SkipReason};
    use taskbell::libs::snooze::SnoozeController;
    use taskbell::libs::task::Task;

    struct Fixture {
        notifier: Arc<RecordingNotifier>,
        scheduler: Arc<ReminderScheduler>,
        fired: Arc<AtomicUsize>,
        snooze: SnoozeController,
    }

    fn fixture(notifier: RecordingNotifier) -> Fixture {
        let notifier = Arc::new(notifier);
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()));
        let scheduler = Arc::new(ReminderScheduler::new(notifier.clone(), clock));
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        let on_fire: ReminderCallback = Arc::new(move |_task: &Task| -> anyhow::Result<()> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        Fixture {
            notifier,
            snooze: SnoozeController::new(scheduler.clone(), on_fire),
            scheduler,
            fired,
        }
    }

    async fn advance_minutes(minutes: u64) {
        tokio::time::advance(Duration::from_secs(minutes * 60)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_snooze_rearms_presented_task() {
        let f = fixture(RecordingNotifier::granted());
        f.snooze.present(Task::new("t1", "Pay rent"));

        let outcome = f.snooze.snooze(10.0);
        assert_eq!(
            outcome,
            Some(ScheduleOutcome::Scheduled {
                ms_until: 600_000,
                native: true
            })
        );
        assert!(f.snooze.current().is_none());
        assert!(f.scheduler.is_scheduled("t1"));

        advance_minutes(9).await;
        assert_eq!(f.fired.load(Ordering::SeqCst), 0);

        advance_minutes(1).await;
        assert_eq!(f.fired.load(Ordering::SeqCst), 1);
        let raised = f.notifier.raised();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].body, Message::NotificationSnoozeBody("Pay rent".to_string()).to_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snooze_without_presentation() {
        let f = fixture(RecordingNotifier::granted());
        assert_eq!(f.snooze.snooze(5.0), None);
        assert_eq!(f.scheduler.scheduled_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snooze_needs_a_positive_delay() {
        let f = fixture(RecordingNotifier::granted());
        f.snooze.present(Task::new("t1", "Pay rent"));

        assert_eq!(f.snooze.snooze(-5.0), Some(ScheduleOutcome::Skipped(SkipReason::NoDelay)));
        assert!(f.snooze.current().is_none());
        assert_eq!(f.scheduler.scheduled_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snooze_without_permission_is_in_app() {
        let f = fixture(RecordingNotifier::denied());
        f.snooze.present(Task::new("t1", "Pay rent"));

        let outcome = f.snooze.snooze(5.0).unwrap();
        assert_eq!(outcome.native(), Some(false));

        advance_minutes(5).await;
        assert_eq!(f.fired.load(Ordering::SeqCst), 1);
        assert!(f.notifier.raised().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_present_replaces_and_dismiss_clears() {
        let f = fixture(RecordingNotifier::granted());
        f.snooze.present(Task::new("t1", "First"));
        f.snooze.present(Task::new("t2", "Second"));
        assert_eq!(f.snooze.current().map(|t| t.id), Some("t2".to_string()));

        let dismissed = f.snooze.dismiss();
        assert_eq!(dismissed.map(|t| t.id), Some("t2".to_string()));
        assert!(f.snooze.current().is_none());
        assert!(f.snooze.dismiss().is_none());
        assert_eq!(f.scheduler.scheduled_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snoozing_again_replaces_the_previous_snooze() {
        let f = fixture(RecordingNotifier::granted());
        f.snooze.present(Task::new("t1", "Pay rent"));
        f.snooze.snooze(30.0);
        f.snooze.present(Task::new("t1", "Pay rent"));
        f.snooze.snooze(5.0);
        assert_eq!(f.scheduler.scheduled_count(), 1);

        advance_minutes(40).await;
        assert_eq!(f.fired.load(Ordering::SeqCst), 1);
    }
}
