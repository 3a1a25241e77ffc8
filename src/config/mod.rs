// ABOUTME: Configuration module for environment-based runtime settings
// ABOUTME: Re-exports the server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management for the chat gateway

/// Environment-based server configuration
pub mod environment;

pub use environment::{DatabaseConfig, LlmConfig, ServerConfig};
