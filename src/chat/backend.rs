//! The seam between a chat session and the remote model.

use crate::Gemini;
use crate::error::Result;
use crate::types::{GenerateContentRequest, GenerationConfig, Model, Turn, UsageMetadata};

/// Everything needed for one remote chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model to address.
    pub model: Model,
    /// System instruction, if any.
    pub system_instruction: Option<String>,
    /// Prior turns replayed as context, oldest first.
    pub history: Vec<Turn>,
    /// The new user message.
    pub message: String,
    /// Length and output-format settings.
    pub generation_config: GenerationConfig,
}

impl ChatRequest {
    /// Wire form of this request.
    pub fn to_generate_content(&self) -> GenerateContentRequest {
        GenerateContentRequest::new(&self.history, &self.message)
            .with_system_instruction(self.system_instruction.as_deref())
            .with_generation_config(self.generation_config.clone())
    }
}

/// A complete reply from the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// The reply text.
    pub text: String,
    /// Token usage for the call.
    pub usage: UsageMetadata,
}

impl ChatReply {
    /// Create a reply with no usage information.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: UsageMetadata::default(),
        }
    }
}

/// Something that can answer a chat request.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request and wait for the complete reply.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply>;
}

#[async_trait::async_trait]
impl ChatBackend for Gemini {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = self
            .generate_content(&request.model, &request.to_generate_content())
            .await?;
        Ok(ChatReply {
            text: response.text()?,
            usage: response.usage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_replays_history_before_message() {
        let request = ChatRequest {
            model: Model::default(),
            system_instruction: Some("You are a helpful assistant.".to_string()),
            history: vec![Turn::user("Hello"), Turn::assistant("Hi!")],
            message: "What's new?".to_string(),
            generation_config: GenerationConfig::default(),
        };
        let wire = to_value(request.to_generate_content()).unwrap();
        assert_eq!(
            wire["contents"],
            json!([
                {"role": "user", "parts": [{"text": "Hello"}]},
                {"role": "model", "parts": [{"text": "Hi!"}]},
                {"role": "user", "parts": [{"text": "What's new?"}]}
            ])
        );
        assert_eq!(
            wire["systemInstruction"],
            json!({"parts": [{"text": "You are a helpful assistant."}]})
        );
        assert!(wire.get("generationConfig").is_none());
    }
}
