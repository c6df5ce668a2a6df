/// Transport layer: the REST surface as a trait
///
/// This module defines the contract the task service speaks, plus two
/// implementations:
///
/// - [`HttpTransport`]: the real thing, built on reqwest
/// - [`MockTransport`]: an in-memory implementation with scripted failures,
///   used by the service tests (no network involved)
///
/// The trait boundary keeps the optimistic-update protocol testable: the
/// service only sees `Result`s, never sockets.
///
/// # Wire format
///
/// Request/response bodies are the server's own DTOs; error bodies are
/// `{ "detail": string }` and are mapped to [`ClientError`] by status code.

use crate::error::{ClientError, ErrorDetail};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use taskflow_shared::models::{
    task::{CreateTask, Task, UpdateTask},
    user::UserProfile,
};

/// Successful authentication payload: profile plus session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSuccess {
    /// Public user data
    pub user: UserProfile,

    /// Signed JWT for subsequent requests
    pub token: String,
}

/// The REST surface consumed by the task service
///
/// Every task operation carries the bearer token and the target `user_id`;
/// the server rejects a token whose subject differs from the path.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    /// POST /auth/register
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ClientError>;

    /// POST /auth/login
    async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, ClientError>;

    /// GET /api/{user_id}/tasks
    async fn list_tasks(&self, token: &str, user_id: &str) -> Result<Vec<Task>, ClientError>;

    /// POST /api/{user_id}/tasks
    async fn create_task(
        &self,
        token: &str,
        user_id: &str,
        data: &CreateTask,
    ) -> Result<Task, ClientError>;

    /// GET /api/{user_id}/tasks/{id}
    async fn get_task(&self, token: &str, user_id: &str, id: i64) -> Result<Task, ClientError>;

    /// PUT /api/{user_id}/tasks/{id}
    async fn update_task(
        &self,
        token: &str,
        user_id: &str,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Task, ClientError>;

    /// DELETE /api/{user_id}/tasks/{id}
    async fn delete_task(&self, token: &str, user_id: &str, id: i64) -> Result<(), ClientError>;

    /// PATCH /api/{user_id}/tasks/{id}/complete
    async fn toggle_completed(
        &self,
        token: &str,
        user_id: &str,
        id: i64,
    ) -> Result<Task, ClientError>;
}

/// HTTP transport built on reqwest
///
/// Stateless between calls; each request carries its own auth proof.
/// Timeouts and connection reuse are reqwest's defaults.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport against the given API base URL
    /// (e.g., "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Deserializes a success body or maps the error body to a typed error
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        Err(Self::error_from(status.as_u16(), response).await)
    }

    /// Checks status for empty-body endpoints (DELETE)
    async fn decode_empty(response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        Err(Self::error_from(status.as_u16(), response).await)
    }

    async fn error_from(status: u16, response: reqwest::Response) -> ClientError {
        let detail = match response.json::<ErrorDetail>().await {
            Ok(body) => body.detail,
            Err(_) => format!("HTTP {}", status),
        };

        ClientError::from_status(status, detail)
    }
}

#[async_trait]
impl TaskTransport for HttpTransport {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn list_tasks(&self, token: &str, user_id: &str) -> Result<Vec<Task>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/{}/tasks", user_id)))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn create_task(
        &self,
        token: &str,
        user_id: &str,
        data: &CreateTask,
    ) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/api/{}/tasks", user_id)))
            .bearer_auth(token)
            .json(data)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn get_task(&self, token: &str, user_id: &str, id: i64) -> Result<Task, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/{}/tasks/{}", user_id, id)))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn update_task(
        &self,
        token: &str,
        user_id: &str,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/api/{}/tasks/{}", user_id, id)))
            .bearer_auth(token)
            .json(data)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn delete_task(&self, token: &str, user_id: &str, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/{}/tasks/{}", user_id, id)))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode_empty(response).await
    }

    async fn toggle_completed(
        &self,
        token: &str,
        user_id: &str,
        id: i64,
    ) -> Result<Task, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/api/{}/tasks/{}/complete", user_id, id)))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode(response).await
    }
}

/// In-memory mock transport for tests
///
/// Behaves like the server for a single user ("user-1"): ids are assigned
/// sequentially, timestamps are set on the server side of the boundary,
/// partial updates keep unset fields. Failures are scripted with
/// [`MockTransport::fail_next`]; each queued error is consumed by the next
/// mutating call, which leaves no trace in the mock's task table (the
/// request "never reached the server").
#[derive(Debug, Default)]
pub struct MockTransport {
    state: std::sync::Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    tasks: Vec<Task>,
    next_id: i64,
    failures: std::collections::VecDeque<ClientError>,
}

impl MockTransport {
    /// Creates an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity every register/login resolves to
    pub fn user() -> UserProfile {
        UserProfile {
            id: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Test User".to_string(),
        }
    }

    /// Queues an error; the next task operation consumes and returns it
    pub fn fail_next(&self, error: ClientError) {
        self.state.lock().unwrap().failures.push_back(error);
    }

    /// Number of tasks currently held by the mock "server"
    pub fn server_task_count(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    fn take_failure(&self) -> Option<ClientError> {
        self.state.lock().unwrap().failures.pop_front()
    }

    fn now() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

#[async_trait]
impl TaskTransport for MockTransport {
    async fn register(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<AuthSuccess, ClientError> {
        Ok(AuthSuccess {
            user: Self::user(),
            token: "mock-token".to_string(),
        })
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<AuthSuccess, ClientError> {
        Ok(AuthSuccess {
            user: Self::user(),
            token: "mock-token".to_string(),
        })
    }

    async fn list_tasks(&self, _token: &str, user_id: &str) -> Result<Vec<Task>, ClientError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.lock().unwrap();
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_task(
        &self,
        _token: &str,
        user_id: &str,
        data: &CreateTask,
    ) -> Result<Task, ClientError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;

        let now = Self::now();
        let task = Task {
            id: state.next_id,
            user_id: user_id.to_string(),
            title: data.title.clone(),
            description: data.description.clone(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        };

        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, _token: &str, user_id: &str, id: i64) -> Result<Task, ClientError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.lock().unwrap();
        state
            .tasks
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Task not found".to_string()))
    }

    async fn update_task(
        &self,
        _token: &str,
        user_id: &str,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Task, ClientError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut state = self.state.lock().unwrap();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .ok_or_else(|| ClientError::NotFound("Task not found".to_string()))?;

        if let Some(title) = &data.title {
            task.title = title.clone();
        }
        if let Some(description) = &data.description {
            task.description = Some(description.clone());
        }
        if let Some(is_completed) = data.is_completed {
            task.is_completed = is_completed;
        }
        task.updated_at = Self::now();

        Ok(task.clone())
    }

    async fn delete_task(&self, _token: &str, user_id: &str, id: i64) -> Result<(), ClientError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut state = self.state.lock().unwrap();
        let before = state.tasks.len();
        state.tasks.retain(|t| !(t.id == id && t.user_id == user_id));

        if state.tasks.len() == before {
            return Err(ClientError::NotFound("Task not found".to_string()));
        }

        Ok(())
    }

    async fn toggle_completed(
        &self,
        _token: &str,
        user_id: &str,
        id: i64,
    ) -> Result<Task, ClientError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut state = self.state.lock().unwrap();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .ok_or_else(|| ClientError::NotFound("Task not found".to_string()))?;

        task.is_completed = !task.is_completed;
        task.updated_at = Self::now();

        Ok(task.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_create_assigns_sequential_ids() {
        let mock = MockTransport::new();

        let first = mock
            .create_task(
                "t",
                "user-1",
                &CreateTask {
                    title: "One".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let second = mock
            .create_task(
                "t",
                "user-1",
                &CreateTask {
                    title: "Two".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.is_completed);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure_consumed_once() {
        let mock = MockTransport::new();
        mock.fail_next(ClientError::Transport("offline".to_string()));

        let data = CreateTask {
            title: "One".to_string(),
            description: None,
        };

        let err = mock.create_task("t", "user-1", &data).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        // The failed request left no trace
        assert_eq!(mock.server_task_count(), 0);

        // The next call succeeds
        assert!(mock.create_task("t", "user-1", &data).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_isolates_users() {
        let mock = MockTransport::new();
        mock.create_task(
            "t",
            "user-1",
            &CreateTask {
                title: "Mine".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let other = mock.list_tasks("t", "user-2").await.unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn test_http_transport_url_building() {
        let transport = HttpTransport::new("http://localhost:8080/");
        assert_eq!(
            transport.url("/api/user-1/tasks"),
            "http://localhost:8080/api/user-1/tasks"
        );
    }
}
