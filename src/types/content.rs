use serde::{Deserialize, Serialize};

use crate::types::{Role, Turn};

/// A single piece of content within a [`Content`].
///
/// Only text parts are produced or consumed by this crate; other part kinds
/// returned by the API (inline data, function calls) are ignored on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Text of this part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Marks model "thought" parts on thinking-capable models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

/// A role-tagged list of parts, the unit of `contents` in a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`; absent for `systemInstruction`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts making up this content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a content with the given role and a single text part.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.wire_name().to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a role-less content, as used for the system instruction.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of every non-thought part, or `None` if there is none.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        let mut found = false;
        for part in &self.parts {
            if part.thought == Some(true) {
                continue;
            }
            if let Some(t) = &part.text {
                text.push_str(t);
                found = true;
            }
        }
        if found { Some(text) } else { None }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content::new(turn.role, turn.content.clone())
    }
}
