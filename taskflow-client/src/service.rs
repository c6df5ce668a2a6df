/// Task service: the optimistic-update/rollback protocol
///
/// Every mutating operation (create, update, delete, toggle) follows the
/// same sequence:
///
/// 1. snapshot the current local list
/// 2. apply the mutation locally, assuming success
/// 3. issue the network request
/// 4. on success, replace the optimistic entry with the server-confirmed
///    entity (the server is authoritative for generated fields: id and
///    timestamps)
/// 5. on failure, restore the pre-mutation snapshot and surface the error
///
/// Each mutation runs `pending → applied` or `pending → rolled-back`, both
/// terminal. List fetch (`refresh`) is non-optimistic and replaces the full
/// local list.
///
/// # Concurrency policy
///
/// A new operation does not cancel an in-flight one. Two in-flight
/// mutations on the same task may race; the policy is last-write-wins by
/// response arrival, with no sequencing token. The store simply reflects
/// whichever confirmed entity landed last. In practice the UI thread
/// processes one user action at a time, so the race requires a deliberately
/// quick second edit.
///
/// # Example
///
/// ```no_run
/// use taskflow_client::service::TaskService;
/// use taskflow_client::transport::HttpTransport;
///
/// # async fn example() -> Result<(), taskflow_client::error::ClientError> {
/// let mut service = TaskService::new(HttpTransport::new("http://localhost:8080"));
///
/// service.login("user@example.com", "password123").await?;
/// service.refresh().await?;
///
/// let task = service.create("Buy milk", None).await?;
/// service.toggle_completed(task.id).await?;
/// service.delete(task.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    error::ClientError,
    session::Session,
    store::TaskStore,
    transport::TaskTransport,
};
use chrono::Utc;
use taskflow_shared::models::{
    task::{CreateTask, Task, UpdateTask, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS},
    user::UserProfile,
};
use tracing::{debug, warn};

/// Client task service
///
/// Owns the session, the task store, and the transport. All state flows
/// through the defined transitions; the UI renders `tasks()` and never
/// mutates it directly.
pub struct TaskService<T: TaskTransport> {
    transport: T,
    session: Session,
    store: TaskStore,
}

impl<T: TaskTransport> TaskService<T> {
    /// Creates a service over the given transport, with no session
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: Session::new(),
            store: TaskStore::new(),
        }
    }

    /// The underlying transport (test support)
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current local task list
    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Registers a new account and opens a session
    ///
    /// Any previously held state is dropped first.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ClientError> {
        let auth = self.transport.register(name, email, password).await?;

        self.store.clear();
        self.session.authenticate(auth.user.clone(), auth.token);

        Ok(auth.user)
    }

    /// Authenticates and opens a session
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let auth = self.transport.login(email, password).await?;

        self.store.clear();
        self.session.authenticate(auth.user.clone(), auth.token);

        Ok(auth.user)
    }

    /// Drops the session token and all local task state
    pub fn logout(&mut self) {
        self.session.clear();
        self.store.clear();
    }

    /// Fetches the task list and replaces local state (non-optimistic)
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let (token, user_id) = self.credentials()?;

        let tasks = self.transport.list_tasks(&token, &user_id).await?;
        debug!(count = tasks.len(), "Refreshed task list");

        self.store.replace_all(tasks);
        Ok(())
    }

    /// Fetches a single task from the server and folds it into the store
    pub async fn fetch(&mut self, id: i64) -> Result<Task, ClientError> {
        let (token, user_id) = self.credentials()?;

        let task = self.transport.get_task(&token, &user_id, id).await?;
        self.store.upsert(task.clone());

        Ok(task)
    }

    /// Creates a task optimistically
    ///
    /// The optimistic entry carries a negative placeholder id until the
    /// server responds; confirmation swaps it for the server entity through
    /// the duplicate guard, so a retried response cannot double-insert.
    pub async fn create(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, ClientError> {
        validate_title(title)?;
        validate_description(description)?;

        let (token, user_id) = self.credentials()?;

        let data = CreateTask {
            title: title.to_string(),
            description: description.map(|d| d.to_string()),
        };

        let snapshot = self.store.snapshot();
        let temp_id = self.store.allocate_temp_id();

        let now = Utc::now();
        self.store.insert(Task {
            id: temp_id,
            user_id: user_id.clone(),
            title: data.title.clone(),
            description: data.description.clone(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        });

        match self.transport.create_task(&token, &user_id, &data).await {
            Ok(confirmed) => {
                self.store.confirm(temp_id, confirmed.clone());
                Ok(confirmed)
            }
            Err(err) => {
                warn!(error = %err, "Create failed, rolling back");
                self.store.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Updates a task optimistically (partial update)
    pub async fn update(&mut self, id: i64, changes: UpdateTask) -> Result<Task, ClientError> {
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        validate_description(changes.description.as_deref())?;

        let (token, user_id) = self.credentials()?;

        let snapshot = self.store.snapshot();
        self.store.modify(id, |task| {
            if let Some(title) = &changes.title {
                task.title = title.clone();
            }
            if let Some(description) = &changes.description {
                task.description = Some(description.clone());
            }
            if let Some(is_completed) = changes.is_completed {
                task.is_completed = is_completed;
            }
            task.updated_at = Utc::now();
        });

        match self
            .transport
            .update_task(&token, &user_id, id, &changes)
            .await
        {
            Ok(confirmed) => {
                self.store.upsert(confirmed.clone());
                Ok(confirmed)
            }
            Err(err) => {
                warn!(error = %err, task_id = id, "Update failed, rolling back");
                self.store.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Deletes a task optimistically
    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        let (token, user_id) = self.credentials()?;

        let snapshot = self.store.snapshot();
        self.store.remove(id);

        match self.transport.delete_task(&token, &user_id, id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, task_id = id, "Delete failed, rolling back");
                self.store.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Toggles a task's completion flag optimistically
    pub async fn toggle_completed(&mut self, id: i64) -> Result<Task, ClientError> {
        let (token, user_id) = self.credentials()?;

        let snapshot = self.store.snapshot();
        self.store.modify(id, |task| {
            task.is_completed = !task.is_completed;
            task.updated_at = Utc::now();
        });

        match self.transport.toggle_completed(&token, &user_id, id).await {
            Ok(confirmed) => {
                self.store.upsert(confirmed.clone());
                Ok(confirmed)
            }
            Err(err) => {
                warn!(error = %err, task_id = id, "Toggle failed, rolling back");
                self.store.restore(snapshot);
                Err(err)
            }
        }
    }

    fn credentials(&self) -> Result<(String, String), ClientError> {
        Ok((
            self.session.token()?.to_string(),
            self.session.user_id()?.to_string(),
        ))
    }
}

/// Mirrors the server's title rule so doomed requests fail inline
fn validate_title(title: &str) -> Result<(), ClientError> {
    let chars = title.chars().count();
    if chars == 0 || chars > TITLE_MAX_CHARS {
        return Err(ClientError::Validation(format!(
            "Title must be 1-{} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(())
}

/// Mirrors the server's description rule
fn validate_description(description: Option<&str>) -> Result<(), ClientError> {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ClientError::Validation(format!(
                "Description must be at most {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }
    }
    Ok(())
}
