// ABOUTME: Server resource container, router assembly, and serve loop
// ABOUTME: Threads configuration, provider, and service handles through the routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Server assembly
//!
//! [`ServerResources`] is the dependency container threaded through
//! every route: configuration, the completion provider, and the user
//! service, all behind `Arc`. Nothing in it is mutable, so concurrent
//! requests share it without locks; per-request isolation is the
//! runtime's job.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};
use crate::llm::LlmProvider;
use crate::routes::{ChatRoutes, HealthRoutes, UserRoutes};
use crate::services::UserService;
use crate::store::UserStore;

/// Shared, immutable server dependencies
pub struct ServerResources {
    /// Runtime configuration
    pub config: Arc<ServerConfig>,
    /// Completion provider backing the chat relay
    pub provider: Arc<dyn LlmProvider>,
    /// Users CRUD service
    pub user_service: Arc<UserService>,
}

impl ServerResources {
    /// Assemble the resource container from its collaborators
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config,
            provider,
            user_service: Arc::new(UserService::new(store)),
        }
    }
}

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(ChatRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind the listen socket and serve until shutdown
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
/// while running.
pub async fn serve(resources: Arc<ServerResources>, port: u16) -> AppResult<()> {
    let app = router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind port {port}: {e}")))?;

    info!("HTTP server listening on port {port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Resolve when the process receives a shutdown request
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {e}");
    }
    info!("Shutdown signal received");
}
