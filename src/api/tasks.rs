//! Task server client.
//!
//! Talks to the task server's REST endpoints with a bearer token:
//!
//! - `GET /api/tasks`: list the user's tasks
//! - `POST /api/tasks`: create a task
//! - `PUT /api/tasks/:id`: partial update
//! - `DELETE /api/tasks/:id`: delete
//!
//! Error responses carry `{"message": ..., "errors": [{"field", "message"}]}`;
//! the message and any field messages are surfaced to the user.

use crate::libs::config::ServerConfig;
use crate::libs::messages::Message;
use crate::libs::metadata::user_agent;
use crate::libs::task::{NewTask, Task, TaskUpdate};
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

const TASKS_PATH: &str = "/api/tasks";

#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Deserialize, Debug)]
struct FieldError {
    message: String,
}

#[derive(Debug, Clone)]
pub struct TaskApi {
    client: Client,
    config: ServerConfig,
}

impl TaskApi {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn url(&self, id: Option<&str>) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        match id {
            Some(id) => format!("{}{}/{}", base, TASKS_PATH, id),
            None => format!("{}{}", base, TASKS_PATH),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.config.auth_token)
            .header(header::USER_AGENT, user_agent())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| msg_error_anyhow!(Message::ApiRequestFailed(e.to_string())))?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "task server responded");

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            msg_bail_anyhow!(Message::ApiUnauthorized);
        }
        let body: ErrorBody = response.json().await.unwrap_or_default();
        let mut details: Vec<String> = body.message.into_iter().collect();
        details.extend(body.errors.into_iter().map(|e| e.message));
        let detail = if details.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            details.join(": ")
        };
        msg_bail_anyhow!(Message::ApiStatusFailed(status.as_u16(), detail));
    }

    /// Fetches every task of the authenticated user.
    pub async fn list(&self) -> Result<Vec<Task>> {
        let response = self.send(self.request(Method::GET, &self.url(None))).await?;
        Ok(response.json::<Vec<Task>>().await?)
    }

    /// Creates a task and returns it as stored, with its id and creation time.
    pub async fn create(&self, task: &NewTask) -> Result<Task> {
        let response = self.send(self.request(Method::POST, &self.url(None)).json(task)).await?;
        Ok(response.json::<Task>().await?)
    }

    pub async fn update(&self, id: &str, update: &TaskUpdate) -> Result<Task> {
        let response = self.send(self.request(Method::PUT, &self.url(Some(id))).json(update)).await?;
        Ok(response.json::<Task>().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &self.url(Some(id)))).await?;
        Ok(())
    }
}
