// ABOUTME: Main library entry point for the chat gateway service
// ABOUTME: Provides a streaming chat relay and a users CRUD API over Postgres
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Chat Gateway
//!
//! A small HTTP service with two independent, stateless request flows:
//!
//! - **Chat relay**: `POST /chat` forwards a conversation to an external
//!   completion provider with streaming enabled and relays the generated
//!   text back to the caller chunk by chunk, without buffering the full
//!   response.
//! - **Users CRUD**: `GET`/`POST /users` (plus per-id routes) backed by a
//!   hosted Postgres `users` table, with fail-soft read semantics.
//!
//! Both flows call out to external collaborators (the completion provider
//! and the relational store) configured via process environment; neither
//! retains state across requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chat_gateway::config::environment::ServerConfig;
//! use chat_gateway::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Chat gateway configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-based configuration management
pub mod config;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Completion-provider abstraction with streaming support
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// Common data models
pub mod models;

/// `HTTP` routes for the chat relay and users resource
pub mod routes;

/// Server resources and router assembly
pub mod server;

/// Domain service layer wrapping the store with the public CRUD contract
pub mod services;

/// Relational store abstraction with a Postgres implementation
pub mod store;
