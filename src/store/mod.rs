// ABOUTME: Relational store abstraction for the users table
// ABOUTME: Defines the UserStore trait implemented by the Postgres backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # User Store
//!
//! The store layer owns the network round-trips to the relational
//! backend. Errors here are real: every operation returns
//! `Result<_, AppError>`, and the fail-soft conversion the HTTP contract
//! requires happens exactly once, in the service layer above. This keeps
//! not-found distinguishable from store failure at this level even
//! though the public contract conflates them.

pub mod postgres;

pub use postgres::PostgresUserStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{NewUser, User, UserUpdate};

/// Persistence contract for the users table
///
/// Implementations are injected as `Arc<dyn UserStore>` so tests can
/// substitute an in-memory double.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a row from caller-supplied fields, returning the persisted
    /// row with store-assigned id and timestamps
    async fn insert(&self, draft: &NewUser) -> AppResult<User>;

    /// Fetch a single row by id, `None` when absent
    async fn fetch(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Fetch all rows, newest first (`created_at` descending)
    async fn fetch_all(&self) -> AppResult<Vec<User>>;

    /// Apply a partial field set, returning the updated row or `None`
    /// when the id does not exist
    async fn update(&self, id: Uuid, changes: &UserUpdate) -> AppResult<Option<User>>;

    /// Delete a row, returning the number of rows affected
    ///
    /// Deleting a missing id is not an error; it reports zero rows.
    async fn delete(&self, id: Uuid) -> AppResult<u64>;
}
