// ABOUTME: Users CRUD service implementing the public fail-soft contract
// ABOUTME: Validates input before store calls and absorbs store errors into soft results
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # User Service
//!
//! The CRUD façade over the user store. This is where the public
//! failure semantics live: store errors are logged with the operation
//! name (and the id where one is involved) and converted into soft
//! empty/`None`/`false` results instead of being raised. Callers must
//! treat absence as ambiguous between not-found and store error; the
//! store layer underneath does distinguish them, so discriminating
//! later is a change to this module only.
//!
//! Validation failures, by contrast, are real errors: they are caller
//! mistakes, raised before any store round-trip is made.

use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User, UserUpdate};
use crate::store::UserStore;

/// Users CRUD façade
///
/// Takes the store as an injected dependency so tests can substitute a
/// double.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a service over the given store
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// List all users, newest first
    ///
    /// Fail-soft read: a store error yields an empty list, logged once.
    pub async fn list(&self) -> Vec<User> {
        match self.store.fetch_all().await {
            Ok(users) => users,
            Err(e) => {
                error!(operation = "list_users", "Error fetching users: {e}");
                Vec::new()
            }
        }
    }

    /// Create a user from caller-supplied fields
    ///
    /// Returns the persisted row with store-assigned id and timestamps.
    /// A store failure yields `Ok(None)` (logged); the route maps that
    /// to a 500-equivalent response.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `email` is missing or empty. No
    /// store call is made in that case.
    pub async fn create(&self, draft: NewUser) -> AppResult<Option<User>> {
        if draft.email.trim().is_empty() {
            return Err(AppError::missing_field("Email is required"));
        }

        match self.store.insert(&draft).await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                error!(operation = "create_user", "Error creating user: {e}");
                Ok(None)
            }
        }
    }

    /// Fetch a single user by id
    ///
    /// Not-found and store error both yield `None`; the store error is
    /// logged with the id.
    pub async fn get_by_id(&self, id: Uuid) -> Option<User> {
        match self.store.fetch(id).await {
            Ok(user) => user,
            Err(e) => {
                error!(operation = "get_user", user_id = %id, "Error fetching user: {e}");
                None
            }
        }
    }

    /// Apply a partial field set to a user
    ///
    /// Returns the updated row, or `None` when the id does not exist or
    /// the store fails (logged with the id).
    pub async fn update(&self, id: Uuid, changes: UserUpdate) -> Option<User> {
        match self.store.update(id, &changes).await {
            Ok(user) => user,
            Err(e) => {
                error!(operation = "update_user", user_id = %id, "Error updating user: {e}");
                None
            }
        }
    }

    /// Delete a user by id
    ///
    /// Deleting a missing id reports success: the store does not treat
    /// zero rows affected as an error, and neither does this service.
    /// `false` only on store error (logged with the id).
    pub async fn delete(&self, id: Uuid) -> bool {
        match self.store.delete(id).await {
            Ok(_rows) => true,
            Err(e) => {
                error!(operation = "delete_user", user_id = %id, "Error deleting user: {e}");
                false
            }
        }
    }
}
