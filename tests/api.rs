#[cfg(test)]
mod tests {
    use serde_json::json;
    use taskbell::api::TaskApi;
    use taskbell::libs::config::ServerConfig;
    use taskbell::libs::task::{NewTask, Priority, Recurrence, TaskUpdate};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer) -> TaskApi {
        TaskApi::new(&ServerConfig {
            api_url: format!("{}/", server.uri()),
            auth_token: "secret-token".to_string(),
        })
    }

    fn stored_task() -> serde_json::Value {
        json!({
            "_id": "65a1",
            "title": "Renew passport",
            "description": null,
            "dueDate": "2025-02-01T10:00:00.000Z",
            "priority": "high",
            "recurrence": "none",
            "remindMinutesBefore": 30,
            "order": 0,
            "completed": false,
            "createdAt": "2025-01-10T08:00:00.000Z"
        })
    }

    #[tokio::test]
    async fn test_list_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_task()])))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = api(&server).list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "65a1");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].remind_minutes_before, 30);
    }

    #[tokio::test]
    async fn test_create_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .and(body_json(json!({
                "title": "Renew passport",
                "dueDate": "2025-02-01T10:00:00.000Z",
                "priority": "high",
                "recurrence": "none",
                "remindMinutesBefore": 30
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(stored_task()))
            .expect(1)
            .mount(&server)
            .await;

        let task = api(&server)
            .create(&NewTask {
                title: "Renew passport".to_string(),
                description: None,
                due_date: Some("2025-02-01T10:00:00.000Z".to_string()),
                priority: Priority::High,
                recurrence: Recurrence::None,
                remind_minutes_before: 30,
            })
            .await
            .unwrap();
        assert_eq!(task.created_at.as_deref(), Some("2025-01-10T08:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let server = MockServer::start().await;
        let mut completed = stored_task();
        completed["completed"] = json!(true);
        Mock::given(method("PUT"))
            .and(path("/api/tasks/65a1"))
            .and(body_json(json!({ "dueDate": null, "completed": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completed))
            .expect(1)
            .mount(&server)
            .await;

        let update = TaskUpdate {
            due_date: Some(None),
            completed: Some(true),
            ..TaskUpdate::default()
        };
        let task = api(&server).update("65a1", &update).await.unwrap();
        assert!(task.completed);
    }

    #[tokio::test]
    async fn test_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/65a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Task deleted" })))
            .expect(1)
            .mount(&server)
            .await;

        api(&server).delete("65a1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token is not valid" })))
            .mount(&server)
            .await;

        let error = api(&server).list().await.unwrap_err().to_string();
        assert!(error.contains("taskbell init"), "{}", error);
    }

    #[tokio::test]
    async fn test_validation_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "Validation failed",
                "errors": [{ "field": "dueDate", "message": "Due date cannot be in the past" }]
            })))
            .mount(&server)
            .await;

        let error = api(&server)
            .create(&NewTask {
                title: "Late".to_string(),
                description: None,
                due_date: Some("2020-01-01T00:00:00.000Z".to_string()),
                priority: Priority::Medium,
                recurrence: Recurrence::None,
                remind_minutes_before: 0,
            })
            .await
            .unwrap_err()
            .to_string();
        assert!(error.contains("400"), "{}", error);
        assert!(error.contains("Validation failed: Due date cannot be in the past"), "{}", error);
    }

    #[tokio::test]
    async fn test_error_without_body_uses_status_reason() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let error = api(&server).update("missing", &TaskUpdate::default()).await.unwrap_err().to_string();
        assert!(error.contains("404"), "{}", error);
        assert!(error.contains("Not Found"), "{}", error);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let api = TaskApi::new(&ServerConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            auth_token: String::new(),
        });
        assert!(api.list().await.is_err());
    }
}
