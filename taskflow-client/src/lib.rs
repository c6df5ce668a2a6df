//! # TaskFlow Client Library
//!
//! Client-side half of TaskFlow: a typed task service implementing the
//! optimistic-update/rollback protocol against the TaskFlow REST API.
//!
//! ## Module Organization
//!
//! - `session`: holds the session token and authenticated identity
//! - `transport`: the REST surface as an async trait, with a reqwest
//!   implementation and an in-memory mock for tests
//! - `store`: the in-memory task list with snapshot/restore and a
//!   duplicate-guarded insert
//! - `service`: the optimistic mutation protocol tying the three together
//! - `error`: client error taxonomy
//!
//! ## Example
//!
//! ```no_run
//! use taskflow_client::service::TaskService;
//! use taskflow_client::transport::HttpTransport;
//!
//! # async fn example() -> Result<(), taskflow_client::error::ClientError> {
//! let transport = HttpTransport::new("http://localhost:8080");
//! let mut service = TaskService::new(transport);
//!
//! service.login("user@example.com", "password123").await?;
//! service.refresh().await?;
//!
//! let task = service.create("Buy milk", None).await?;
//! service.toggle_completed(task.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;
pub mod session;
pub mod store;
pub mod transport;

/// Current version of the TaskFlow client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
