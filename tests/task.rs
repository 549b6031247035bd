#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use taskbell::libs::task::{format_instant, parse_instant, Priority, Recurrence, Task, TaskUpdate};

    #[test]
    fn test_deserialize_server_task() {
        let task: Task = serde_json::from_value(json!({
            "_id": "65a1",
            "title": "Call the bank",
            "description": "Ask about fees",
            "dueDate": "2025-01-15T09:30:00.000Z",
            "priority": "low",
            "recurrence": "weekly",
            "remindMinutesBefore": 15,
            "order": 2,
            "completed": true,
            "createdAt": "2025-01-01T00:00:00.000Z",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(task.id, "65a1");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.recurrence, Recurrence::Weekly);
        assert_eq!(task.remind_minutes_before, 15);
        assert!(task.completed);
        assert_eq!(task.due(), Some(Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()));
        assert_eq!(task.created(), Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_missing_and_null_fields_take_defaults() {
        let task: Task = serde_json::from_value(json!({
            "id": "1",
            "title": "Bare",
            "dueDate": null,
            "remindMinutesBefore": null
        }))
        .unwrap();

        assert_eq!(task, Task::new("1", "Bare"));
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.recurrence, Recurrence::None);
        assert!(!task.completed);
    }

    #[test]
    fn test_fractional_reminder_minutes_truncate() {
        let task: Task = serde_json::from_value(json!({ "_id": "1", "title": "T", "remindMinutesBefore": 7.9 })).unwrap();
        assert_eq!(task.remind_minutes_before, 7);
    }

    #[test]
    fn test_unparseable_due_is_kept_raw() {
        let task = Task::new("1", "T").with_raw_due_date("tomorrow-ish");
        assert_eq!(task.due_date.as_deref(), Some("tomorrow-ish"));
        assert_eq!(task.due(), None);
    }

    #[test]
    fn test_serialize_uses_server_names() {
        let task = Task::new("1", "T").with_due_date(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()).with_reminder(10);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["_id"], json!("1"));
        assert_eq!(value["dueDate"], json!("2025-05-01T12:00:00.000Z"));
        assert_eq!(value["remindMinutesBefore"], json!(10));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_overdue() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let past = Task::new("1", "T").with_due_date(Utc.with_ymd_and_hms(2025, 5, 1, 11, 0, 0).unwrap());
        assert!(past.is_overdue(now));
        assert!(!past.clone().with_completed(true).is_overdue(now));
        assert!(!Task::new("2", "No due").is_overdue(now));
    }

    #[test]
    fn test_task_update_serialization() {
        assert!(TaskUpdate::default().is_empty());
        assert_eq!(serde_json::to_value(TaskUpdate::default()).unwrap(), json!({}));

        let update = TaskUpdate {
            title: Some("New".to_string()),
            due_date: Some(None),
            remind_minutes_before: Some(0),
            ..TaskUpdate::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "title": "New", "dueDate": null, "remindMinutesBefore": 0 })
        );
    }

    #[test]
    fn test_instant_format() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(format_instant(&instant), "2025-01-15T09:30:00.000Z");
        assert_eq!(parse_instant("2025-01-15T10:30:00+01:00"), Some(instant));
        assert_eq!(parse_instant("15/01/2025"), None);
    }
}
