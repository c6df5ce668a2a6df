//! # TaskFlow API Server Library
//!
//! This library provides the core functionality for the TaskFlow API server:
//! a multi-user task-management REST backend with JWT authentication and
//! per-user data isolation.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
