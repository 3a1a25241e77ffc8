// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the HTTP test harness and collaborator doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod doubles;

use chat_gateway::config::{DatabaseConfig, LlmConfig, ServerConfig};
use chat_gateway::server::ServerResources;
use chat_gateway::store::UserStore;
use std::sync::Arc;

/// Build a server configuration for tests; nothing in it is contacted
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig {
            url: "postgres://localhost/chat_gateway_test".to_owned(),
            max_connections: 1,
        },
        llm: LlmConfig {
            base_url: "http://localhost:9".to_owned(),
            api_key: "test-key".to_owned(),
            default_model: "gpt-3.5-turbo".to_owned(),
        },
    }
}

/// Assemble server resources from test doubles
pub fn test_resources(
    provider: Arc<doubles::ScriptedProvider>,
    store: Arc<dyn UserStore>,
) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        Arc::new(test_config()),
        provider,
        store,
    ))
}
