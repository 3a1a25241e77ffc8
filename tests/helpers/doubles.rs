// ABOUTME: Test doubles for the user store and the completion provider
// ABOUTME: In-memory store with call counters plus a scripted streaming provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use chat_gateway::errors::{AppError, AppResult};
use chat_gateway::llm::{
    ChatRequest, ChatResponse, ChatStream, LlmCapabilities, LlmProvider, StreamChunk,
};
use chat_gateway::models::{NewUser, User, UserUpdate};
use chat_gateway::store::UserStore;

// ============================================================================
// User store double
// ============================================================================

/// In-memory user store with per-operation call counters
///
/// Rows are kept in insertion order; `fetch_all` returns them newest
/// first, matching the Postgres `created_at DESC` ordering. Flipping
/// `set_failing(true)` makes every operation return a store error.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    failing: AtomicBool,
    insert_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    fetch_all_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a store error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Seed a row directly, bypassing the counters
    pub fn seed(&self, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            display_name: None,
            profile: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    fn check_available(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::database("user store offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, draft: &NewUser) -> AppResult<User> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: draft.email.clone(),
            display_name: draft.display_name.clone(),
            profile: draft.profile.clone(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<User>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<User>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let users = self.users.lock().unwrap();
        Ok(users.iter().rev().cloned().collect())
    }

    async fn update(&self, id: Uuid, changes: &UserUpdate) -> AppResult<Option<User>> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(ref email) = changes.email {
            user.email = email.clone();
        }
        if let Some(ref display_name) = changes.display_name {
            user.display_name = Some(display_name.clone());
        }
        if let Some(ref profile) = changes.profile {
            user.profile = Some(profile.clone());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }
}

// ============================================================================
// Completion provider double
// ============================================================================

/// What the scripted provider should do when called
pub enum ProviderScript {
    /// Stream these chunks, then a clean final chunk
    Stream(Vec<&'static str>),
    /// Stream these chunks, then fail mid-stream
    StreamThenError(Vec<&'static str>),
    /// Reject before producing any output (e.g., invalid API key)
    RejectBeforeFirstChunk,
    /// Report no streaming capability; `complete` returns this text
    WithoutStreaming(&'static str),
}

/// Scripted completion provider recording the last request it received
pub struct ScriptedProvider {
    script: ProviderScript,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: ProviderScript) -> Self {
        Self {
            script,
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request forwarded to this provider
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }

    fn record(&self, request: &ChatRequest) {
        *self.last_request.lock().unwrap() = Some(request.clone());
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        match self.script {
            ProviderScript::WithoutStreaming(_) => LlmCapabilities::SYSTEM_MESSAGES,
            _ => LlmCapabilities::text_only(),
        }
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.record(request);
        let content = match &self.script {
            ProviderScript::Stream(chunks) | ProviderScript::StreamThenError(chunks) => {
                chunks.concat()
            }
            ProviderScript::WithoutStreaming(text) => (*text).to_owned(),
            ProviderScript::RejectBeforeFirstChunk => {
                return Err(AppError::external_auth("API authentication failed"));
            }
        };
        Ok(ChatResponse {
            content,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn complete_stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        self.record(request);

        let items: Vec<Result<StreamChunk, AppError>> = match &self.script {
            ProviderScript::Stream(chunks) => chunks
                .iter()
                .map(|delta| {
                    Ok(StreamChunk {
                        delta: (*delta).to_owned(),
                        is_final: false,
                        finish_reason: None,
                    })
                })
                .chain(std::iter::once(Ok(StreamChunk {
                    delta: String::new(),
                    is_final: true,
                    finish_reason: Some("stop".to_owned()),
                })))
                .collect(),
            ProviderScript::StreamThenError(chunks) => chunks
                .iter()
                .map(|delta| {
                    Ok(StreamChunk {
                        delta: (*delta).to_owned(),
                        is_final: false,
                        finish_reason: None,
                    })
                })
                .chain(std::iter::once(Err(AppError::external_service(
                    "scripted",
                    "connection reset mid-stream",
                ))))
                .collect(),
            ProviderScript::RejectBeforeFirstChunk => {
                return Err(AppError::external_auth("API authentication failed"));
            }
            ProviderScript::WithoutStreaming(_) => {
                return Err(AppError::internal("streaming not supported"));
            }
        };

        Ok(Box::pin(stream::iter(items)))
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(!matches!(self.script, ProviderScript::RejectBeforeFirstChunk))
    }
}
