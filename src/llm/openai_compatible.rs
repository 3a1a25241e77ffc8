// ABOUTME: OpenAI-compatible completion provider over the chat/completions API
// ABOUTME: Implements streamed and single-shot completions with SSE parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `OpenAI`-Compatible Provider
//!
//! Implementation of [`LlmProvider`] for any endpoint speaking the
//! `OpenAI` chat completions API, including api.openai.com itself and
//! self-hosted compatible servers. Streaming uses `stream: true` with
//! SSE `data:` frames terminated by `[DONE]`, parsed through
//! [`sse_parser`](super::sse_parser).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::sse_parser::create_sse_stream;
use crate::config::LlmConfig;
use crate::errors::{AppError, ErrorCode};

use super::{
    ChatMessage, ChatRequest, ChatResponse, ChatStream, LlmCapabilities, LlmProvider, StreamChunk,
    TokenUsage,
};

/// Connection timeout for the provider endpoint
const CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// API Request/Response Types (OpenAI wire format)
// ============================================================================

/// Chat completions request body
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Message in the wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

/// Choice in a non-streaming response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in a non-streaming response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in a response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// One SSE frame of a streaming response
#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    choices: Vec<OpenAiStreamChoice>,
}

/// Choice in a streaming frame
#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

/// Delta content in a streaming frame
#[derive(Debug, Deserialize)]
struct OpenAiDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Error response body
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.openai.com/v1>)
    pub base_url: String,
    /// API key (optional for self-hosted servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
}

impl From<&LlmConfig> for OpenAiCompatibleConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: Some(config.api_key.clone()),
            default_model: config.default_model.clone(),
            capabilities: LlmCapabilities::STREAMING
                | LlmCapabilities::SYSTEM_MESSAGES
                | LlmCapabilities::JSON_MODE,
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// `OpenAI`-compatible completion provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// The HTTP client carries a connect timeout only. Generation length
    /// is unbounded, so no overall request timeout is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from the server's completion-provider settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &LlmConfig) -> Result<Self, AppError> {
        Self::new(OpenAiCompatibleConfig::from(config))
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    /// Convert conversation messages to the wire format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages.iter().map(OpenAiMessage::from).collect()
    }

    /// Add the authorization header if an API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Build the request body for a completion call
    fn build_request(&self, request: &ChatRequest, stream: bool) -> OpenAiRequest {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        OpenAiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: stream.then_some(true),
        }
    }

    /// Map a connection-level failure to an application error
    fn connect_error(&self, e: &reqwest::Error) -> AppError {
        error!("Failed to send request to {}: {e}", self.config.base_url);
        if e.is_connect() {
            AppError::external_service(
                "OpenAI",
                format!("Cannot connect to {}", self.config.base_url),
            )
        } else {
            AppError::external_service("OpenAI", format!("Failed to connect: {e}"))
        }
    }

    /// Classify a non-2xx provider response
    ///
    /// 401 is an authentication failure, 429 an upstream rate limit, 400
    /// invalid input; anything else is a generic external-service error.
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::external_auth(format!(
                    "API authentication failed: {}",
                    error_response.error.message
                )),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    format!("Provider rate limit reached: {}", error_response.error.message),
                ),
                400 => AppError::invalid_input(format!(
                    "API validation error: {}",
                    error_response.error.message
                )),
                _ => AppError::external_service(
                    "OpenAI",
                    format!("{error_type} - {}", error_response.error.message),
                ),
            }
        } else {
            AppError::external_service(
                "OpenAI",
                format!(
                    "API error ({status}): {}",
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }

    /// Parse one streaming SSE payload into a chunk
    ///
    /// Returns `None` for frames carrying no choices (metadata-only) and
    /// for unparseable frames, which are logged and skipped.
    fn parse_stream_payload(json_str: &str) -> Option<Result<StreamChunk, AppError>> {
        match serde_json::from_str::<OpenAiStreamChunk>(json_str) {
            Ok(chunk) => {
                let choice = chunk.choices.into_iter().next()?;
                Some(Ok(StreamChunk {
                    delta: choice.delta.content.unwrap_or_default(),
                    is_final: choice.finish_reason.is_some(),
                    finish_reason: choice.finish_reason,
                }))
            }
            Err(e) => {
                warn!("Failed to parse stream chunk: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let body = self.build_request(request, false);
        debug!(
            "Sending chat completion request with {} messages",
            body.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.connect_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {e}");
            AppError::external_service("OpenAI", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {e}");
            AppError::external_service("OpenAI", format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("OpenAI", "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(
            "Received completion: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete_stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        let body = self.build_request(request, true);
        debug!(
            "Sending streaming chat completion request with {} messages",
            body.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.connect_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            // Rejection before the first chunk surfaces as a request failure
            let body = response.text().await.unwrap_or_default();
            return Err(Self::parse_error_response(status, &body));
        }

        Ok(create_sse_stream(
            response.bytes_stream(),
            Self::parse_stream_payload,
            "OpenAI",
        ))
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let http_request = self.client.get(self.api_url("models"));

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.connect_error(&e))?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!("Provider health check failed with status {}", response.status());
        }
        Ok(healthy)
    }
}
