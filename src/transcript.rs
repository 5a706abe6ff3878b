//! Rolling conversation transcript for prompt construction.
//!
//! Stores (role, text) turns in insertion order with a fixed retention
//! cap to prevent unbounded growth; prompts only ever read the most
//! recent few turns.

use std::collections::VecDeque;
use std::fmt;

/// Number of turns retained in memory. Prompts read far fewer.
const MAX_TURNS: usize = 200;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The end user speaking.
    User,
    /// The assistant's spoken response.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single immutable conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Who produced the text.
    pub role: Role,
    /// The utterance or response text.
    pub text: String,
}

/// Append-only transcript with bounded retention.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl Transcript {
    /// Create an empty transcript with the default retention cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_TURNS)
    }

    /// Create an empty transcript retaining at most `max_turns` turns.
    #[must_use]
    pub fn with_capacity(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    /// Append a turn, evicting the oldest when at capacity.
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        if self.turns.len() >= self.max_turns {
            self.turns.pop_front();
        }
        self.turns.push_back(Turn {
            role,
            text: text.into(),
        });
    }

    /// The last `n` turns in chronological order; fewer than `n` → all.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// Render the last `n` turns as `role: text` lines for a prompt.
    #[must_use]
    pub fn render(&self, n: usize) -> String {
        self.recent(n)
            .iter()
            .map(|t| format!("{}: {}", t.role, t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total turns currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript holds no turns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn recent_returns_last_n_in_order() {
        let mut transcript = Transcript::new();
        for i in 0..15 {
            transcript.append(Role::User, format!("turn {i}"));
        }

        let window = transcript.recent(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].text, "turn 5");
        assert_eq!(window[9].text, "turn 14");
    }

    #[test]
    fn recent_with_fewer_turns_returns_all() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "hello");
        transcript.append(Role::Assistant, "hi there");

        let window = transcript.recent(10);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].role, Role::User);
        assert_eq!(window[1].role, Role::Assistant);
    }

    #[test]
    fn retention_cap_evicts_oldest() {
        let mut transcript = Transcript::with_capacity(3);
        for i in 0..5 {
            transcript.append(Role::User, format!("turn {i}"));
        }

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.recent(3)[0].text, "turn 2");
    }

    #[test]
    fn render_formats_role_prefixed_lines() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "show me volunteering");
        transcript.append(Role::Assistant, "Here are some options.");

        assert_eq!(
            transcript.render(10),
            "user: show me volunteering\nassistant: Here are some options."
        );
    }

    #[test]
    fn render_empty_transcript_is_empty_string() {
        let transcript = Transcript::new();
        assert_eq!(transcript.render(10), "");
        assert!(transcript.is_empty());
    }
}
