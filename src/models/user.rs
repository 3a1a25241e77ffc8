// ABOUTME: User resource models for the users CRUD API
// ABOUTME: User row plus the create and partial-update payload types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User resource models
//!
//! The store is the sole owner of `id`, `created_at`, and `updated_at`.
//! The payload types ([`NewUser`], [`UserUpdate`]) simply carry no such
//! fields, so callers cannot supply them; unknown fields in request
//! bodies are ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A persisted user row
///
/// Invariant: once created, `id` and `created_at` never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Email address (required, unique per business rule)
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Arbitrary additional profile fields
    pub profile: Option<Value>,
    /// Store-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    /// Store-assigned last-modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating a user
///
/// `email` defaults to empty when absent so that presence validation
/// happens in the service layer with a field-specific error, not as a
/// JSON deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address (validated non-empty before any store call)
    #[serde(default)]
    pub email: String,
    /// Optional display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Arbitrary additional profile fields
    #[serde(default)]
    pub profile: Option<Value>,
}

impl NewUser {
    /// Create a payload with just an email
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            profile: None,
        }
    }
}

/// Partial field set for updating a user
///
/// Only fields present in the payload are applied; `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New email address
    #[serde(default)]
    pub email: Option<String>,
    /// New display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// New profile fields (replaces the stored document)
    #[serde(default)]
    pub profile: Option<Value>,
}

impl UserUpdate {
    /// Check whether the payload carries no changes
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.display_name.is_none() && self.profile.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_missing_email_to_empty() {
        let draft: NewUser = serde_json::from_str("{}").unwrap();
        assert!(draft.email.is_empty());
        assert!(draft.display_name.is_none());
    }

    #[test]
    fn test_new_user_ignores_store_owned_fields() {
        // id/timestamps in the payload are silently dropped
        let draft: NewUser = serde_json::from_str(
            r#"{"email":"a@b.com","id":"not-a-uuid","created_at":"2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(draft.email, "a@b.com");
    }

    #[test]
    fn test_user_update_partial_deserialization() {
        let update: UserUpdate = serde_json::from_str(r#"{"email":"c@d.com"}"#).unwrap();
        assert_eq!(update.email.as_deref(), Some("c@d.com"));
        assert!(update.display_name.is_none());
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }
}
