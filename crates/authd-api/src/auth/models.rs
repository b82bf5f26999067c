//! Account models
//!
//! `Account` is the persisted entity; `AccountProfile` is the minimal view
//! returned by login. The stored password digest is never serialized in any
//! API response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered account
///
/// Maps to the `accounts` table. Arbitrary extra signup fields live in the
/// `profile` JSON column; email is unique and matched exactly as stored
/// (case-sensitive).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Account {
    /// Unique account identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address (unique, used for login)
    pub email: String,

    /// Salted one-way password digest, never serialized in API responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Additional profile fields accepted at creation time
    #[schema(value_type = Object)]
    pub profile: serde_json::Value,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (password resets bump this)
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Minimal identity view returned by login (never includes the digest)
    pub fn profile_view(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing(
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
        profile: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            profile,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Minimal account identity (id, name, email)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let account = Account::for_testing(
            Uuid::new_v4(),
            "Jane",
            "jane@x.com",
            "$2b$10$secret-digest",
            json!({"campus": "north"}),
        );

        let body = serde_json::to_string(&account).unwrap();
        assert!(!body.contains("password_hash"));
        assert!(!body.contains("secret-digest"));
        assert!(body.contains("jane@x.com"));
        assert!(body.contains("campus"));
    }

    #[test]
    fn test_profile_view_is_minimal() {
        let account =
            Account::for_testing(Uuid::new_v4(), "Jane", "jane@x.com", "digest", json!({}));
        let view = account.profile_view();

        assert_eq!(view.id, account.id);
        assert_eq!(view.name, "Jane");
        assert_eq!(view.email, "jane@x.com");

        let body = serde_json::to_string(&view).unwrap();
        assert!(!body.contains("password"));
    }
}
