// ABOUTME: Chat relay route streaming completion output back to the caller
// ABOUTME: Forwards the conversation to the provider and relays chunks without buffering
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat relay route
//!
//! `POST /chat` forwards the caller's conversation to the completion
//! provider with streaming enabled and relays the generated text back
//! as a chunked plain-text response. The first bytes reach the caller
//! before generation completes; chunk order is preserved; end of
//! generation closes the response body with no trailing metadata.
//!
//! The response body owns the provider stream, which owns the upstream
//! HTTP connection. When the caller disconnects mid-stream, the body is
//! dropped and that chain releases the upstream connection, so no
//! chunks are pulled for an abandoned response.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures_util::{future, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error};

use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest};
use crate::server::ServerResources;

/// Content type of the relayed stream: raw text, no envelope
const RELAY_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Request body for the chat relay
#[derive(Debug, Deserialize)]
pub struct ChatRelayRequest {
    /// Conversation messages, oldest first
    pub messages: Vec<ChatMessage>,
}

/// Chat relay routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat relay routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat", post(Self::relay))
            .with_state(resources)
    }

    /// Relay a conversation through the completion provider
    ///
    /// A provider rejection before the first chunk propagates as a
    /// failed HTTP response. An error after streaming has begun
    /// terminates the stream (logged); the prefix already sent stands.
    async fn relay(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<ChatRelayRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) =
            body.map_err(|_| AppError::invalid_input("Invalid request data"))?;

        let llm_request = ChatRequest::new(request.messages)
            .with_model(&resources.config.llm.default_model)
            .with_streaming();

        debug!(
            "Relaying conversation with {} messages to {}",
            llm_request.messages.len(),
            resources.provider.name()
        );

        if !resources.provider.capabilities().supports_streaming() {
            // Single-shot fallback: the whole completion as one chunk
            let response = resources.provider.complete(&llm_request).await?;
            return Self::text_response(Body::from(response.content));
        }

        let stream = resources.provider.complete_stream(&llm_request).await?;

        let byte_stream = stream
            .take_while(|item| {
                future::ready(match item {
                    Ok(_) => true,
                    Err(e) => {
                        error!("Chat relay stream terminated: {e}");
                        false
                    }
                })
            })
            .filter_map(|item| {
                future::ready(
                    item.ok()
                        .filter(|chunk| !chunk.delta.is_empty())
                        .map(|chunk| Ok::<Bytes, Infallible>(Bytes::from(chunk.delta))),
                )
            });

        Self::text_response(Body::from_stream(byte_stream))
    }

    /// Build a 200 response with the relay content type
    fn text_response(body: Body) -> Result<Response, AppError> {
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, RELAY_CONTENT_TYPE)
            .body(body)
            .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
    }
}
