// ABOUTME: Users CRUD route handlers over the user service
// ABOUTME: Maps service results to the HTTP status and error body contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Users CRUD routes
//!
//! Thin handlers over [`UserService`](crate::services::UserService).
//! The status mapping is part of the public contract: validation
//! failures are 400 with a field-specific message, store write failures
//! are 500 with a generic message (store error text never reaches the
//! caller), and reads fail soft.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{NewUser, User, UserUpdate};
use crate::server::ServerResources;

/// Users routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all users routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/users", get(Self::list).post(Self::create))
            .route(
                "/users/:id",
                get(Self::get_by_id).put(Self::update).delete(Self::delete),
            )
            .with_state(resources)
    }

    /// Parse a path segment as a user id
    fn parse_id(id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(id).map_err(|_| AppError::invalid_input("Invalid user id"))
    }

    /// `GET /users` - list all users, newest first
    ///
    /// Always 200; an unreachable store yields an empty array.
    async fn list(State(resources): State<Arc<ServerResources>>) -> Json<Vec<User>> {
        Json(resources.user_service.list().await)
    }

    /// `POST /users` - create a user
    async fn create(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<NewUser>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(draft) = body.map_err(|_| AppError::invalid_input("Invalid request data"))?;

        let user = resources
            .user_service
            .create(draft)
            .await?
            .ok_or_else(|| AppError::database("Failed to create user"))?;

        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    /// `GET /users/:id` - fetch a single user
    async fn get_by_id(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Json<User>, AppError> {
        let id = Self::parse_id(&id)?;
        resources
            .user_service
            .get_by_id(id)
            .await
            .map(Json)
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// `PUT /users/:id` - apply a partial update
    async fn update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        body: Result<Json<UserUpdate>, JsonRejection>,
    ) -> Result<Json<User>, AppError> {
        let id = Self::parse_id(&id)?;
        let Json(changes) = body.map_err(|_| AppError::invalid_input("Invalid request data"))?;

        resources
            .user_service
            .update(id, changes)
            .await
            .map(Json)
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// `DELETE /users/:id` - delete a user
    ///
    /// 204 on success, including the delete-of-missing-row no-op; 500
    /// only when the store reports an error.
    async fn delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<StatusCode, AppError> {
        let id = Self::parse_id(&id)?;
        if resources.user_service.delete(id).await {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(AppError::database("Failed to delete user"))
        }
    }
}
