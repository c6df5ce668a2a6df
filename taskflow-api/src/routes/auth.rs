/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// Both return the same shape: the public user profile plus a signed JWT the
/// client holds for the session.
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user (201)
/// - `POST /auth/login` - Login and get a token (200)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserProfile},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(
        email(message = "Invalid email format"),
        length(min = 5, max = 255, message = "Email must be 5-255 characters")
    )]
    pub email: String,

    /// Password
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Successful authentication response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Public user data (no credential material)
    pub user: UserProfile,

    /// Signed JWT; `sub` claim equals `user.id`
    pub token: String,
}

/// Flattens validator errors into a single detail message
fn validation_detail(errors: validator::ValidationErrors) -> ApiError {
    let detail = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    ApiError::ValidationError(detail)
}

/// Normalizes an email for case-insensitive comparison
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register a new user
///
/// - Validates the request body
/// - Normalizes the email to lowercase
/// - Rejects duplicate emails with 409
/// - Hashes the password with Argon2id
/// - Returns a JWT for immediate login
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "name": "John Doe", "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(validation_detail)?;

    let email = normalize_email(&req.email);
    let name = req.name.trim().to_string();

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            name,
            password_hash,
        },
    )
    .await?;

    let claims = jwt::Claims::new(&user.id, &user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::from(&user),
            token,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates a user and returns a JWT.
///
/// The error message is identical for an unknown email and a wrong password,
/// so the endpoint cannot be used to enumerate registered addresses.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&req.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(&user.id, &user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Jo".to_string(),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            name: "Jo".to_string(),
            email: "user@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            name: "Jo".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_name = RegisterRequest {
            name: "".to_string(),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("a@b.co"), "a@b.co");
    }

    #[test]
    fn test_validation_detail_message() {
        let req = RegisterRequest {
            name: "Jo".to_string(),
            email: "user@example.com".to_string(),
            password: "short".to_string(),
        };

        let err = validation_detail(req.validate().unwrap_err());
        match err {
            ApiError::ValidationError(msg) => assert!(msg.contains("8-128")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
