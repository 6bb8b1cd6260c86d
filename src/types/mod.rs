// Public modules
pub mod content;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod model;
pub mod turn;

// Re-exports
pub use content::{Content, Part};
pub use generate_content_request::{GenerateContentRequest, GenerationConfig, JSON_MIME_TYPE};
pub use generate_content_response::{
    Candidate, GenerateContentResponse, PromptFeedback, UsageMetadata,
};
pub use model::{KnownModel, Model};
pub use turn::{Role, Turn};
