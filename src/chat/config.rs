//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, configuration
//! structures for controlling chat behavior, resolution of the API key
//! from the environment or a secrets file, and loading of response schemas.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::Deserialize;
use serde_json::Value;

use crate::client::API_KEY_ENV;
use crate::error::{Error, Result};
use crate::types::{GenerationConfig, Model};

/// System instruction used when none is given on the command line.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default HTTP timeout for a single call.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the gemchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.0-flash)", "MODEL")]
    pub model: Option<String>,

    /// System instruction for the conversation.
    #[arrrg(optional, "System instruction (default: a helpful assistant)", "PROMPT")]
    pub system: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max output tokens per response (default: model limit)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// YAML file holding GEMINI_API_KEY.
    #[arrrg(optional, "YAML secrets file containing GEMINI_API_KEY", "PATH")]
    pub secrets: Option<String>,

    /// Ask for JSON replies.
    #[arrrg(flag, "Ask the model to reply in JSON")]
    pub json: bool,

    /// Schema file constraining JSON replies.
    #[arrrg(optional, "YAML or JSON schema file for JSON replies (implies --json)", "PATH")]
    pub response_schema: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log requests and responses to stderr.
    #[arrrg(flag, "Enable debug logging on stderr")]
    pub verbose: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// System instruction sent with every request.
    pub system_prompt: Option<String>,

    /// Maximum tokens per response; `None` leaves it to the model.
    pub max_output_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether replies are requested as JSON.
    pub json_output: bool,

    /// Schema for JSON replies; implies JSON output.
    pub response_schema: Option<Value>,

    /// File the response schema is loaded from at startup.
    pub response_schema_path: Option<PathBuf>,

    /// HTTP timeout for a single call.
    pub timeout: Duration,

    /// YAML secrets file consulted before the environment.
    pub secrets_path: Option<PathBuf>,

    /// Whether debug logging was requested.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.0-flash
    /// - System prompt: "You are a helpful assistant."
    /// - Color: enabled
    /// - Timeout: 60 seconds
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_output_tokens: None,
            use_color: true,
            json_output: false,
            response_schema: None,
            response_schema_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secrets_path: None,
            verbose: false,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets or clears the system prompt.
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_output_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Requests JSON replies.
    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    /// Sets the schema that JSON replies must follow.
    pub fn with_response_schema(mut self, schema: Option<Value>) -> Self {
        self.response_schema = schema;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the secrets file.
    pub fn with_secrets_path(mut self, path: Option<PathBuf>) -> Self {
        self.secrets_path = path;
        self
    }

    /// Whether the next request asks for JSON.
    pub fn wants_json(&self) -> bool {
        self.json_output || self.response_schema.is_some()
    }

    /// Generation settings for the next request.
    pub fn generation_config(&self) -> GenerationConfig {
        let mut generation = if self.wants_json() {
            GenerationConfig::json(self.response_schema.clone())
        } else {
            GenerationConfig::default()
        };
        generation.max_output_tokens = self.max_output_tokens;
        generation
    }

    /// Loads the schema named by `response_schema_path`, if any.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not hold a schema mapping.
    pub fn load_response_schema(&mut self) -> Result<()> {
        if let Some(path) = self.response_schema_path.as_deref() {
            self.response_schema = Some(load_response_schema(path)?);
        }
        Ok(())
    }

    /// Resolves the API key from the secrets file or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when no key can be found, and an
    /// I/O or serialization error when the secrets file cannot be read.
    pub fn api_key(&self) -> Result<String> {
        resolve_api_key(
            self.secrets_path.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or_default();

        ChatConfig {
            model,
            system_prompt: args
                .system
                .or_else(|| Some(DEFAULT_SYSTEM_PROMPT.to_string())),
            max_output_tokens: args.max_tokens,
            use_color: !args.no_color,
            json_output: args.json || args.response_schema.is_some(),
            response_schema_path: args.response_schema.map(PathBuf::from),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            secrets_path: args.secrets.map(PathBuf::from),
            verbose: args.verbose,
            ..ChatConfig::new()
        }
    }
}

#[derive(Deserialize)]
struct SecretsFile {
    #[serde(rename = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,
}

/// Picks the API key from a secrets file, falling back to `env_value`.
///
/// A secrets file that exists but lacks the key falls through to the
/// environment; a file that cannot be read or parsed is an error.
pub fn resolve_api_key(secrets_path: Option<&Path>, env_value: Option<String>) -> Result<String> {
    if let Some(path) = secrets_path {
        let text = fs::read_to_string(path).map_err(|err| {
            Error::io(
                format!("failed to read secrets file {}", path.display()),
                err,
            )
        })?;
        let secrets: SecretsFile = serde_yaml::from_str(&text)?;
        if let Some(key) = non_blank(secrets.gemini_api_key) {
            return Ok(key);
        }
    }
    non_blank(env_value).ok_or_else(|| {
        Error::authentication(format!(
            "{API_KEY_ENV} is not set; export it or pass --secrets <file>"
        ))
    })
}

/// Reads a response schema from a YAML or JSON file.
///
/// The document must be a mapping, e.g. `{type: OBJECT, properties: ...}`.
pub fn load_response_schema(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|err| {
        Error::io(
            format!("failed to read schema file {}", path.display()),
            err,
        )
    })?;
    let schema: Value = serde_yaml::from_str(&text)?;
    if !schema.is_object() {
        return Err(Error::validation(
            format!("schema file {} must hold a mapping", path.display()),
            Some("response_schema".to_string()),
        ));
    }
    Ok(schema)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "gemchat-{}-{}-{name}",
            std::process::id(),
            line!()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini20Flash));
        assert_eq!(config.system_prompt.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
        assert!(config.max_output_tokens.is_none());
        assert!(config.use_color);
        assert!(!config.json_output);
        assert!(config.response_schema.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.secrets_path.is_none());
        assert!(config.generation_config().is_empty());
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            system: Some("Answer in French.".to_string()),
            max_tokens: Some(512),
            secrets: Some("secrets.yaml".to_string()),
            json: false,
            response_schema: Some("plan.yaml".to_string()),
            timeout_secs: Some(5),
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.system_prompt.as_deref(), Some("Answer in French."));
        assert_eq!(config.max_output_tokens, Some(512));
        assert_eq!(config.secrets_path, Some(PathBuf::from("secrets.yaml")));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.use_color);
        assert!(config.verbose);
        assert!(config.json_output);
        assert_eq!(config.response_schema_path, Some(PathBuf::from("plan.yaml")));
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini15Pro))
            .with_system_prompt(None)
            .with_max_output_tokens(Some(1024))
            .without_color()
            .with_json_output(true)
            .with_timeout(Duration::from_secs(10));

        let generation = config.generation_config();
        assert_eq!(generation.max_output_tokens, Some(1024));
        assert_eq!(generation.response_mime_type.as_deref(), Some("application/json"));
        assert!(generation.response_schema.is_none());
        assert!(config.system_prompt.is_none());
        assert!(!config.use_color);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn api_key_from_environment() {
        assert_eq!(
            resolve_api_key(None, Some(" env-key ".to_string())).unwrap(),
            "env-key"
        );
    }

    #[test]
    fn missing_api_key_is_an_authentication_error() {
        assert!(resolve_api_key(None, None).unwrap_err().is_authentication());
        assert!(
            resolve_api_key(None, Some(String::new()))
                .unwrap_err()
                .is_authentication()
        );
    }

    #[test]
    fn secrets_file_wins_over_environment() {
        let path = temp_file("secrets.yaml", "GEMINI_API_KEY: file-key\n");
        let key = resolve_api_key(Some(&path), Some("env-key".to_string())).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(key, "file-key");
    }

    #[test]
    fn secrets_file_without_key_falls_back() {
        let path = temp_file("other.yaml", "OTHER_KEY: nope\n");
        let key = resolve_api_key(Some(&path), Some("env-key".to_string())).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(key, "env-key");
    }

    #[test]
    fn unreadable_secrets_file_is_an_error() {
        let path = std::env::temp_dir().join("gemchat-definitely-missing.yaml");
        let err = resolve_api_key(Some(&path), Some("env-key".to_string())).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn schema_implies_json_output() {
        let schema = serde_json::json!({"type": "OBJECT"});
        let config = ChatConfig::new().with_response_schema(Some(schema.clone()));
        assert!(config.wants_json());
        let generation = config.generation_config();
        assert_eq!(generation.response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(generation.response_schema, Some(schema));
    }

    #[test]
    fn schema_file_is_loaded_from_yaml_or_json() {
        let yaml = temp_file(
            "schema.yaml",
            "type: OBJECT\nproperties:\n  answer:\n    type: STRING\n",
        );
        let mut config = ChatConfig::from(ChatArgs {
            response_schema: Some(yaml.display().to_string()),
            ..ChatArgs::default()
        });
        config.load_response_schema().unwrap();
        fs::remove_file(&yaml).unwrap();
        assert_eq!(
            config.response_schema,
            Some(serde_json::json!({"type": "OBJECT", "properties": {"answer": {"type": "STRING"}}}))
        );

        let json = temp_file("schema.json", r#"{"type": "ARRAY", "items": {"type": "STRING"}}"#);
        let schema = load_response_schema(&json).unwrap();
        fs::remove_file(&json).unwrap();
        assert_eq!(schema["items"]["type"], "STRING");
    }

    #[test]
    fn schema_file_must_hold_a_mapping() {
        let path = temp_file("scalar.yaml", "just a string\n");
        let err = load_response_schema(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.is_validation());
    }
}
