//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! history for one interactive session and drives the remote chat call.

use serde_json::Value;

use crate::Gemini;
use crate::chat::backend::{ChatBackend, ChatRequest};
use crate::chat::config::ChatConfig;
use crate::chat::history::SessionHistory;
use crate::error::{Error, Result};
use crate::observability::{SESSION_FAILED_TURNS, SESSION_RETRIES, SESSION_TURNS};
use crate::types::{Model, Turn, UsageMetadata};

/// A chat session that manages conversation state and API interactions.
///
/// Each call to [`send`](Self::send) appends the user's turn, replays the
/// answered part of the history to the backend, and appends the reply.  A
/// failed call leaves the user's turn in place without a reply.
pub struct ChatSession<B: ChatBackend = Gemini> {
    backend: B,
    config: ChatConfig,
    history: SessionHistory,
    usage_totals: UsageMetadata,
    last_turn_usage: Option<UsageMetadata>,
    request_count: u64,
    failed_request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of turns in the conversation.
    pub message_count: usize,
    /// Whether the conversation ends with an unanswered user turn.
    pub awaiting_reply: bool,
    /// The maximum tokens per response, if set.
    pub max_output_tokens: Option<u32>,
    /// The system prompt, if any.
    pub system_prompt: Option<String>,
    /// Whether replies are requested as JSON.
    pub json_output: bool,
    /// Whether a response schema constrains JSON replies.
    pub has_response_schema: bool,
    /// Total prompt tokens across all requests.
    pub total_prompt_tokens: u64,
    /// Total reply tokens across all requests.
    pub total_reply_tokens: u64,
    /// Total number of API requests made.
    pub total_requests: u64,
    /// Number of API requests that failed.
    pub failed_requests: u64,
    /// Prompt tokens for the last successful turn, if any.
    pub last_turn_prompt_tokens: Option<u64>,
    /// Reply tokens for the last successful turn, if any.
    pub last_turn_reply_tokens: Option<u64>,
}

impl ChatSession<Gemini> {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Gemini, config: ChatConfig) -> Self {
        Self::with_backend(client, config)
    }
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new chat session with a custom backend.
    pub fn with_backend(backend: B, config: ChatConfig) -> Self {
        Self {
            backend,
            config,
            history: SessionHistory::new(),
            usage_totals: UsageMetadata::default(),
            last_turn_usage: None,
            request_count: 0,
            failed_request_count: 0,
        }
    }

    /// Sends a user message and waits for the complete reply.
    ///
    /// This method:
    /// 1. Adds the user message to history
    /// 2. Sends the answered prior turns plus the message to the backend
    /// 3. Adds the assistant reply to history and returns it
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.  The user message stays in
    /// history as an unanswered turn and can be re-sent with
    /// [`retry`](Self::retry).
    pub async fn send(&mut self, user_input: &str) -> Result<Turn> {
        self.history.append(Turn::user(user_input));
        let index = self.history.len() - 1;
        self.complete(index).await
    }

    /// Re-sends the trailing unanswered user turn without appending it again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the conversation does not end with
    /// an unanswered user turn, or the backend's error.
    pub async fn retry(&mut self) -> Result<Turn> {
        if self.history.pending_user_turn().is_none() {
            return Err(Error::validation("there is no unanswered message to retry", None));
        }
        SESSION_RETRIES.click();
        let index = self.history.len() - 1;
        self.complete(index).await
    }

    async fn complete(&mut self, index: usize) -> Result<Turn> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            system_instruction: self.config.system_prompt.clone(),
            history: self.history.prior_context(index),
            message: self.history.all()[index].content.clone(),
            generation_config: self.config.generation_config(),
        };
        self.request_count = self.request_count.saturating_add(1);

        match self.backend.send_message(&request).await {
            Ok(reply) => {
                SESSION_TURNS.click();
                self.last_turn_usage = Some(reply.usage);
                self.usage_totals = self.usage_totals + reply.usage;
                let turn = Turn::assistant(reply.text);
                self.history.append(turn.clone());
                Ok(turn)
            }
            Err(err) => {
                SESSION_FAILED_TURNS.click();
                self.failed_request_count = self.failed_request_count.saturating_add(1);
                tracing::warn!(
                    model = %request.model,
                    history_len = self.history.len(),
                    error = %err,
                    "chat turn failed"
                );
                Err(err)
            }
        }
    }

    /// The conversation so far.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// The backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Returns the number of turns in the conversation.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: Model) {
        self.config.model = model;
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Sets or clears the system prompt.
    pub fn set_system_prompt(&mut self, prompt: Option<String>) {
        self.config.system_prompt = prompt;
    }

    /// Returns the current system prompt, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.config.system_prompt.as_deref()
    }

    /// Sets the maximum tokens per response.
    pub fn set_max_output_tokens(&mut self, max_tokens: Option<u32>) {
        self.config.max_output_tokens = max_tokens;
    }

    /// Requests plain-text replies again, dropping any response schema.
    pub fn set_text_output(&mut self) {
        self.config.json_output = false;
        self.config.response_schema = None;
    }

    /// Requests JSON replies, optionally constrained by `schema`.
    pub fn set_json_output(&mut self, schema: Option<Value>) {
        self.config.json_output = true;
        self.config.response_schema = schema;
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let config = &self.config;
        SessionStats {
            model: config.model.clone(),
            message_count: self.message_count(),
            awaiting_reply: self.history.pending_user_turn().is_some(),
            max_output_tokens: config.max_output_tokens,
            system_prompt: config.system_prompt.clone(),
            json_output: config.wants_json(),
            has_response_schema: config.response_schema.is_some(),
            total_prompt_tokens: self.usage_totals.prompt_token_count,
            total_reply_tokens: self.usage_totals.candidates_token_count,
            total_requests: self.request_count,
            failed_requests: self.failed_request_count,
            last_turn_prompt_tokens: self.last_turn_usage.map(|u| u.prompt_token_count),
            last_turn_reply_tokens: self.last_turn_usage.map(|u| u.candidates_token_count),
        }
    }
}
