/// Session token store
///
/// Holds the current session token and the authenticated user identity.
/// Lifecycle is tied to login/logout: `authenticate` populates both fields
/// from a successful register/login response, `clear` drops them. Nothing
/// is persisted; the token lives exactly as long as the session object.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use taskflow_shared::models::user::UserProfile;

/// Client-held session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
}

impl Session {
    /// Creates an empty, unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the identity and token from a successful authentication
    pub fn authenticate(&mut self, user: UserProfile, token: String) {
        self.user = Some(user);
        self.token = Some(token);
    }

    /// Drops the token and identity (logout)
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// True if a token is held
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The session token, or `NotAuthenticated` if none is held
    pub fn token(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or(ClientError::NotAuthenticated)
    }

    /// The authenticated user id, or `NotAuthenticated`
    pub fn user_id(&self) -> Result<&str, ClientError> {
        self.user
            .as_ref()
            .map(|u| u.id.as_str())
            .ok_or(ClientError::NotAuthenticated)
    }

    /// The authenticated user profile, if any
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: "Jo".to_string(),
        }
    }

    #[test]
    fn test_empty_session_rejects_access() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(matches!(
            session.token(),
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            session.user_id(),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_authenticate_and_clear() {
        let mut session = Session::new();
        session.authenticate(profile(), "token-abc".to_string());

        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap(), "token-abc");
        assert_eq!(session.user_id().unwrap(), "user-1");
        assert_eq!(session.user().unwrap().email, "user@example.com");

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }
}
