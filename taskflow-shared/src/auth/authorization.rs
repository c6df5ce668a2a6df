/// Authorization helpers for resource ownership
///
/// TaskFlow resources are owned by exactly one user. The authorization model
/// is therefore a single check: the verified token subject must equal the
/// `user_id` addressed by the request path, byte for byte. There are no
/// roles, scopes, or shared resources.
///
/// The check runs before any query; a cross-user request never reaches the
/// data layer.
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::authorization::require_owner;
/// use taskflow_shared::auth::middleware::AuthContext;
///
/// let auth = AuthContext {
///     user_id: "user-a".to_string(),
///     email: "a@example.com".to_string(),
/// };
///
/// assert!(require_owner(&auth, "user-a").is_ok());
/// assert!(require_owner(&auth, "user-b").is_err());
/// ```

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Authenticated subject does not own the addressed resource
    #[error("Not authorized to access this user's data")]
    NotOwner,
}

/// Checks that the authenticated subject owns the addressed user scope
///
/// Compares the verified `sub` claim against the `user_id` path segment
/// byte-for-byte. On success the caller uses `auth.user_id` as the scoping
/// key for every subsequent query.
///
/// # Errors
///
/// Returns `AuthzError::NotOwner` on mismatch (surfaced as 403 Forbidden).
pub fn require_owner(auth: &AuthContext, target_user_id: &str) -> Result<(), AuthzError> {
    if auth.user_id.as_bytes() != target_user_id.as_bytes() {
        return Err(AuthzError::NotOwner);
    }

    Ok(())
}
