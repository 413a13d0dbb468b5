use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::{ShellError, ShellResult};

/// Opaque credential bundle required to launch the game client.
///
/// Built lazily at launch time and handed to exactly one
/// `LaunchSpecification`; never persisted. The access token is kept out of
/// `Debug` output so it cannot leak into logs.
#[derive(Clone)]
pub struct AuthorizationToken {
    pub username: String,
    pub uuid: String,
    pub user_type: String,
    access_token: String,
}

impl AuthorizationToken {
    pub fn new(username: String, uuid: String, user_type: String, access_token: String) -> Self {
        Self {
            username,
            uuid,
            user_type,
            access_token,
        }
    }

    /// The raw token, for the launch command line only.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationToken")
            .field("username", &self.username)
            .field("uuid", &self.uuid)
            .field("user_type", &self.user_type)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Capability that turns identity material into an [`AuthorizationToken`].
///
/// The supervisor only depends on this trait, so the real provider can be
/// swapped for a stub in tests without touching the launch path. Failures are
/// surfaced as `ShellError::CredentialsRejected`; there is no retry here.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get_auth(&self, username: &str, password: &str) -> ShellResult<AuthorizationToken>;
}

/// Offline-style authenticator matching the classic launcher-core behavior:
/// validates the identity material and mints a session-local profile with a
/// generated UUID and token.
#[derive(Debug, Default)]
pub struct LegacyAuthenticator;

#[async_trait]
impl CredentialProvider for LegacyAuthenticator {
    async fn get_auth(&self, username: &str, password: &str) -> ShellResult<AuthorizationToken> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ShellError::CredentialsRejected("username is empty".into()));
        }
        if password.trim().is_empty() {
            return Err(ShellError::CredentialsRejected("password is empty".into()));
        }

        Ok(AuthorizationToken::new(
            username.to_string(),
            Uuid::new_v4().to_string(),
            "legacy".to_string(),
            Uuid::new_v4().simple().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mints_a_profile_for_valid_identity() {
        let token = LegacyAuthenticator
            .get_auth("Steve", "hunter2")
            .await
            .unwrap();
        assert_eq!(token.username, "Steve");
        assert_eq!(token.user_type, "legacy");
        assert!(!token.uuid.is_empty());
        assert!(!token.access_token().is_empty());
    }

    #[tokio::test]
    async fn rejects_blank_username() {
        let error = LegacyAuthenticator.get_auth("  ", "hunter2").await.unwrap_err();
        assert!(matches!(error, ShellError::CredentialsRejected(_)));
    }

    #[tokio::test]
    async fn rejects_blank_password() {
        let error = LegacyAuthenticator.get_auth("Steve", "").await.unwrap_err();
        assert!(matches!(error, ShellError::CredentialsRejected(_)));
    }

    #[tokio::test]
    async fn debug_output_redacts_the_token() {
        let token = LegacyAuthenticator
            .get_auth("Steve", "hunter2")
            .await
            .unwrap();
        let rendered = format!("{token:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(token.access_token()));
    }
}
