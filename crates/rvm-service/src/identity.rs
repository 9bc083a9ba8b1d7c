//! Static identity provider.
//!
//! Resolves credentials from a fixed table instead of calling out to an
//! identity service. Used by tests and by the CLI's `register` command, which
//! loads the table from a JSON file:
//!
//! ```json
//! [
//!   { "credential": "token-abc", "user_id": "alice",
//!     "display_name": "Alice Example", "email": "alice@example.com" }
//! ]
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use rvm_core::{UserId, UserProfile};
use serde::Deserialize;

use crate::error::IdentityError;
use crate::ports::IdentityProvider;

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    credential: String,
    user_id: UserId,
    display_name: String,
    email: String,
}

/// Identity provider backed by an in-process table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    credentials: HashMap<String, UserId>,
    profiles: HashMap<UserId, UserProfile>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a credential and the profile behind it.
    pub fn with_identity(
        mut self,
        credential: impl Into<String>,
        user_id: UserId,
        profile: UserProfile,
    ) -> Self {
        self.credentials.insert(credential.into(), user_id.clone());
        self.profiles.insert(user_id, profile);
        self
    }

    /// Registers a credential that verifies but whose profile lookup fails.
    pub fn with_credential_only(mut self, credential: impl Into<String>, user_id: UserId) -> Self {
        self.credentials.insert(credential.into(), user_id);
        self
    }

    /// Parses a JSON identity directory (see module docs).
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<DirectoryEntry> = serde_json::from_str(json)?;
        Ok(entries.into_iter().fold(Self::new(), |provider, entry| {
            provider.with_identity(
                entry.credential,
                entry.user_id,
                UserProfile {
                    display_name: entry.display_name,
                    email: entry.email,
                },
            )
        }))
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_identity(&self, credential: &str) -> Result<UserId, IdentityError> {
        self.credentials
            .get(credential)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("unknown credential".to_string()))
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, IdentityError> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownUser(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_from_json() {
        let provider = StaticIdentityProvider::from_json_str(
            r#"[{"credential": "token-abc", "user_id": "alice",
                 "display_name": "Alice Example", "email": "alice@example.com"}]"#,
        )
        .unwrap();

        let user_id = provider.verify_identity("token-abc").await.unwrap();
        assert_eq!(user_id.as_str(), "alice");
        let profile = provider.fetch_profile(&user_id).await.unwrap();
        assert_eq!(profile.display_name, "Alice Example");

        assert!(matches!(
            provider.verify_identity("forged").await,
            Err(IdentityError::Rejected(_))
        ));
    }

    #[test]
    fn test_directory_rejects_blank_user_id() {
        let result = StaticIdentityProvider::from_json_str(
            r#"[{"credential": "t", "user_id": "  ", "display_name": "X", "email": "x@example.com"}]"#,
        );
        assert!(result.is_err());
    }
}
