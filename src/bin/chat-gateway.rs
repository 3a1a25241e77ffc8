// ABOUTME: Server binary for the chat gateway
// ABOUTME: Loads configuration, connects collaborators, and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chat Gateway Server Binary
//!
//! Starts the HTTP service with the chat relay and the users CRUD API.
//! All credentials come from the process environment; see
//! `ServerConfig::from_env` for the variable list.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use chat_gateway::config::ServerConfig;
use chat_gateway::llm::OpenAiCompatibleProvider;
use chat_gateway::logging;
use chat_gateway::server::{self, ServerResources};
use chat_gateway::store::PostgresUserStore;
use tracing::info;

#[derive(Parser)]
#[command(name = "chat-gateway")]
#[command(about = "Streaming chat relay and users CRUD service")]
struct Args {
    /// Override the HTTP port from the environment
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting chat gateway");
    info!("{}", config.summary());

    let store = PostgresUserStore::connect(&config.database).await?;
    let provider = OpenAiCompatibleProvider::from_config(&config.llm)?;

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        Arc::new(config),
        Arc::new(provider),
        Arc::new(store),
    ));

    display_available_endpoints(http_port);

    server::serve(resources, http_port).await?;
    Ok(())
}

/// Log the served endpoints at startup
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    info!("=== Available API Endpoints ===");
    info!("Chat relay:");
    info!("   Stream Completion: POST http://{host}:{port}/chat");
    info!("Users:");
    info!("   List Users:   GET    http://{host}:{port}/users");
    info!("   Create User:  POST   http://{host}:{port}/users");
    info!("   Get User:     GET    http://{host}:{port}/users/{{id}}");
    info!("   Update User:  PUT    http://{host}:{port}/users/{{id}}");
    info!("   Delete User:  DELETE http://{host}:{port}/users/{{id}}");
    info!("Monitoring:");
    info!("   Health Check: GET  http://{host}:{port}/health");
    info!("   Readiness:    GET  http://{host}:{port}/ready");
    info!("=== End of Endpoint List ===");
}
