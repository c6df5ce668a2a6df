/// Integration tests for the client service over the mock transport
///
/// These exercise the full optimistic-update lifecycle through the public
/// API only: authenticate, mutate, observe confirmation or rollback. No
/// network or server is involved.

use taskflow_client::error::ClientError;
use taskflow_client::service::TaskService;
use taskflow_client::transport::MockTransport;
use taskflow_shared::models::task::{Task, UpdateTask};

async fn logged_in() -> TaskService<MockTransport> {
    let mut service = TaskService::new(MockTransport::new());
    service
        .login("user@example.com", "password123")
        .await
        .expect("mock login should succeed");
    service
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let mut service = logged_in().await;
    assert!(service.session().is_authenticated());
    assert_eq!(service.session().user_id().unwrap(), "user-1");

    let groceries = service.create("Buy groceries", None).await.unwrap();
    let laundry = service
        .create("Do laundry", Some("Whites and colors separately"))
        .await
        .unwrap();

    assert_eq!(service.tasks().len(), 2);

    let done = service.toggle_completed(groceries.id).await.unwrap();
    assert!(done.is_completed);

    service.delete(laundry.id).await.unwrap();
    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.tasks()[0].id, groceries.id);

    service.logout();
    assert!(service.tasks().is_empty());
    assert!(!service.session().is_authenticated());
}

#[tokio::test]
async fn test_refresh_reconciles_with_server() {
    let mut service = logged_in().await;
    service.create("One", None).await.unwrap();
    service.create("Two", None).await.unwrap();

    service.refresh().await.unwrap();

    let ids: Vec<i64> = service.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|&id| id > 0));
    assert_eq!(service.transport().server_task_count(), 2);
}

#[tokio::test]
async fn test_failed_mutation_leaves_no_trace_anywhere() {
    let mut service = logged_in().await;
    let kept = service.create("Keep me", None).await.unwrap();

    let before: Vec<Task> = service.tasks().to_vec();

    // Script one failure per mutation kind and verify each rolls back
    service
        .transport()
        .fail_next(ClientError::Transport("connection refused".to_string()));
    assert!(service.create("Ghost create", None).await.is_err());
    assert_eq!(service.tasks(), before.as_slice());

    service.transport().fail_next(ClientError::Api {
        status: 500,
        detail: "internal error".to_string(),
    });
    let changes = UpdateTask {
        title: Some("Ghost title".to_string()),
        ..Default::default()
    };
    assert!(service.update(kept.id, changes).await.is_err());
    assert_eq!(service.tasks(), before.as_slice());

    service
        .transport()
        .fail_next(ClientError::Transport("timeout".to_string()));
    assert!(service.delete(kept.id).await.is_err());
    assert_eq!(service.tasks(), before.as_slice());

    service
        .transport()
        .fail_next(ClientError::Transport("timeout".to_string()));
    assert!(service.toggle_completed(kept.id).await.is_err());
    assert_eq!(service.tasks(), before.as_slice());

    // The mock "server" still holds exactly the one successful create
    assert_eq!(service.transport().server_task_count(), 1);
}

#[tokio::test]
async fn test_expired_session_surfaces_relogin_signal() {
    let mut service = logged_in().await;
    let task = service.create("Pending", None).await.unwrap();

    service
        .transport()
        .fail_next(ClientError::Unauthorized("Token has expired".to_string()));

    let err = service.toggle_completed(task.id).await.unwrap_err();
    assert!(err.requires_login());

    // Rolled back, not half-applied
    assert!(!service.tasks()[0].is_completed);
}

#[tokio::test]
async fn test_update_confirms_server_fields() {
    let mut service = logged_in().await;
    let task = service.create("Draft", None).await.unwrap();

    let changes = UpdateTask {
        title: Some("Final".to_string()),
        description: Some("Reviewed".to_string()),
        is_completed: None,
    };
    let confirmed = service.update(task.id, changes).await.unwrap();

    assert_eq!(confirmed.title, "Final");
    assert_eq!(confirmed.description.as_deref(), Some("Reviewed"));
    // Partial update keeps the unset field
    assert!(!confirmed.is_completed);
    assert!(confirmed.updated_at >= task.updated_at);
    assert_eq!(service.tasks()[0], confirmed);
}
