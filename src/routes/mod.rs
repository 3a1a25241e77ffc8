// ABOUTME: Route module organization for the chat gateway HTTP endpoints
// ABOUTME: Routes are grouped by domain with thin handlers delegating to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP routes for the chat gateway
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the provider abstraction or the service
//! layer.

/// Chat relay route streaming completions from the provider
pub mod chat;
/// Health check and readiness routes
pub mod health;
/// Users CRUD routes
pub mod users;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
pub use users::UserRoutes;
