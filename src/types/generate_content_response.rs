use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Content;

/// Token accounting reported with a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt, including history and system instruction.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens across all returned candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Prompt plus candidates (plus thinking, where applicable).
    #[serde(default)]
    pub total_token_count: u64,
}

impl std::ops::Add for UsageMetadata {
    type Output = UsageMetadata;

    fn add(self, rhs: UsageMetadata) -> UsageMetadata {
        UsageMetadata {
            prompt_token_count: self.prompt_token_count.saturating_add(rhs.prompt_token_count),
            candidates_token_count: self
                .candidates_token_count
                .saturating_add(rhs.candidates_token_count),
            total_token_count: self.total_token_count.saturating_add(rhs.total_token_count),
        }
    }
}

/// One generated reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content; absent when generation was blocked.
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped (`STOP`, `MAX_TOKENS`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked and no candidates were produced.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; the chat only uses the first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Prompt feedback, present when the prompt was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage.
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,

    /// The model version that served the request.
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResponse`] when there is no candidate or the
    /// first candidate carries no text.
    pub fn text(&self) -> Result<String> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.clone());
            return Err(Error::empty_response("no candidates returned", reason));
        };
        candidate
            .content
            .as_ref()
            .and_then(Content::text)
            .ok_or_else(|| {
                Error::empty_response(
                    "candidate contained no text",
                    candidate.finish_reason.clone(),
                )
            })
    }

    /// Usage metadata, or zeros if the API omitted it.
    pub fn usage(&self) -> UsageMetadata {
        self.usage_metadata.unwrap_or_default()
    }
}
