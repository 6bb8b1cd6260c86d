//! Chat application module for interactive conversations with Gemini.
//!
//! This module provides a REPL chat interface built on top of the gemchat
//! client. It supports:
//!
//! - A session-scoped history replayed to the model on every turn
//! - Role-tagged transcript rendering with optional ANSI styling
//! - Slash commands for session control
//! - Configurable model, system instruction, output length, and JSON replies
//!
//! # Architecture
//!
//! - [`history`]: the ordered log of turns
//! - [`backend`]: the remote chat call seam
//! - [`session`]: conversation state and the send/retry loop
//! - [`config`]: CLI argument parsing, configuration, and API key lookup
//! - [`commands`]: slash command parsing

pub mod backend;
pub mod history;

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use backend::{ChatBackend, ChatReply, ChatRequest};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{
    ChatArgs, ChatConfig, DEFAULT_SYSTEM_PROMPT, load_response_schema, resolve_api_key,
};
pub use history::SessionHistory;
pub use session::{ChatSession, SessionStats};
