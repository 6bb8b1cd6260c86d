use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Content, Turn};

/// MIME type that asks the model for a JSON reply.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Length and output-format settings for a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Maximum number of tokens in the reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// MIME type of the reply, e.g. `application/json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Schema the reply must follow; requires a JSON MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerationConfig {
    /// A config requesting JSON output, optionally constrained by `schema`.
    pub fn json(schema: Option<Value>) -> Self {
        Self {
            max_output_tokens: None,
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
            response_schema: schema,
        }
    }

    /// Returns true when no field is set, in which case the config is omitted.
    pub fn is_empty(&self) -> bool {
        self.max_output_tokens.is_none()
            && self.response_mime_type.is_none()
            && self.response_schema.is_none()
    }
}

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System instruction applied to the whole conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// The conversation, oldest first, ending with the new user message.
    pub contents: Vec<Content>,

    /// Generation settings; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Build a request from prior turns plus the new user message.
    pub fn new(history: &[Turn], message: &str) -> Self {
        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();
        contents.push(Content::from(&Turn::user(message)));
        Self {
            system_instruction: None,
            contents,
            generation_config: None,
        }
    }

    /// Set the system instruction; blank instructions are dropped.
    pub fn with_system_instruction(mut self, instruction: Option<&str>) -> Self {
        self.system_instruction = instruction
            .filter(|s| !s.trim().is_empty())
            .map(Content::system);
        self
    }

    /// Set the generation config; an empty config is dropped.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = if config.is_empty() {
            None
        } else {
            Some(config)
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn first_message_has_only_user_content() {
        let request = GenerateContentRequest::new(&[], "Hello");
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "Hello"}]}]})
        );
    }

    #[test]
    fn full_request_shape() {
        let history = vec![Turn::user("Hi"), Turn::assistant("Hello!")];
        let request = GenerateContentRequest::new(&history, "How are you?")
            .with_system_instruction(Some("You are a helpful assistant."))
            .with_generation_config(GenerationConfig {
                max_output_tokens: Some(256),
                ..Default::default()
            });
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "systemInstruction": {"parts": [{"text": "You are a helpful assistant."}]},
                "contents": [
                    {"role": "user", "parts": [{"text": "Hi"}]},
                    {"role": "model", "parts": [{"text": "Hello!"}]},
                    {"role": "user", "parts": [{"text": "How are you?"}]}
                ],
                "generationConfig": {"maxOutputTokens": 256}
            })
        );
    }

    #[test]
    fn blank_system_and_empty_config_are_omitted() {
        let request = GenerateContentRequest::new(&[], "x")
            .with_system_instruction(Some("   "))
            .with_generation_config(GenerationConfig::default());
        assert!(request.system_instruction.is_none());
        assert!(request.generation_config.is_none());
    }

    #[test]
    fn json_output_carries_mime_type_and_schema() {
        let schema = json!({"type": "OBJECT", "properties": {"answer": {"type": "STRING"}}});
        let request = GenerateContentRequest::new(&[], "x")
            .with_generation_config(GenerationConfig::json(Some(schema.clone())));
        assert_eq!(
            to_value(&request).unwrap()["generationConfig"],
            json!({"responseMimeType": "application/json", "responseSchema": schema})
        );

        let plain_json = GenerationConfig::json(None);
        assert!(!plain_json.is_empty());
        assert_eq!(
            to_value(&plain_json).unwrap(),
            json!({"responseMimeType": "application/json"})
        );
    }
}
