// ABOUTME: Postgres implementation of the user store over a sqlx connection pool
// ABOUTME: Owns schema migration and row mapping for the users table
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postgres-backed [`UserStore`]
//!
//! The pool is constructed once at startup from configuration and
//! threaded through the server as a dependency. Connection pooling is
//! managed by sqlx; the only timeout configured is on acquiring a
//! connection.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::config::DatabaseConfig;
use crate::errors::AppResult;
use crate::models::{NewUser, User, UserUpdate};

/// Timeout for acquiring a pooled connection
const ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Postgres user store
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Connect to the store and run schema migration
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or migration fails.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect(&config.url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("User store connected ({} pooled connections max)", config.max_connections);
        Ok(store)
    }

    /// Create a store over an existing pool (used by tests against a
    /// provisioned database)
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email TEXT NOT NULL,
                display_name TEXT,
                profile JSONB,
                created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Map a row to the user model
    fn user_from_row(row: &PgRow) -> User {
        User {
            id: row.get("id"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            profile: row.get("profile"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, draft: &NewUser) -> AppResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, display_name, profile)
            VALUES ($1, $2, $3)
            RETURNING id, email, display_name, profile, created_at, updated_at
            "#,
        )
        .bind(&draft.email)
        .bind(&draft.display_name)
        .bind(&draft.profile)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::user_from_row(&row))
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, display_name, profile, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::user_from_row))
    }

    async fn fetch_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, display_name, profile, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::user_from_row).collect())
    }

    async fn update(&self, id: Uuid, changes: &UserUpdate) -> AppResult<Option<User>> {
        // COALESCE applies only the supplied fields; id and created_at
        // are never part of the SET list
        let row = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                display_name = COALESCE($3, display_name),
                profile = COALESCE($4, profile),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, email, display_name, profile, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.display_name)
        .bind(&changes.profile)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::user_from_row))
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
