//! Session-scoped conversation history.

use crate::types::{Role, Turn};

/// Ordered, append-only log of the turns in one chat session.
///
/// Nothing is validated on [`append`](Self::append): roles are taken as
/// given and alternation is not enforced.  A user turn with no assistant turn
/// after it is *dangling*; it is kept for display but left out of the
/// context replayed to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    turns: Vec<Turn>,
}

impl SessionHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a turn to the end.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Every turn, oldest first.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turn has been appended.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Drops every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The trailing user turn, if the conversation ends with one.
    pub fn pending_user_turn(&self) -> Option<&Turn> {
        self.turns.last().filter(|turn| turn.is_user())
    }

    /// Turns before index `upto`, with dangling user turns removed.
    ///
    /// A user turn counts as answered only when the turn right after it is
    /// an assistant turn that also lies before `upto`.
    pub fn prior_context(&self, upto: usize) -> Vec<Turn> {
        let prefix = &self.turns[..upto.min(self.turns.len())];
        prefix
            .iter()
            .enumerate()
            .filter(|(idx, turn)| match turn.role {
                Role::Assistant => true,
                Role::User => prefix
                    .get(idx + 1)
                    .is_some_and(|next| next.role == Role::Assistant),
            })
            .map(|(_, turn)| turn.clone())
            .collect()
    }
}
