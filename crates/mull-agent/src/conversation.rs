//! Conversation log: an append-only sequence of user and assistant turns.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Literal used in the prompt serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    /// Empty for user turns and for answers without a reasoning block
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    timestamp: i64,
}

impl Turn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            reasoning: String::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create an assistant turn with its (possibly empty) reasoning
    pub fn assistant(content: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            reasoning: reasoning.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Whether a reasoning block was captured for this turn
    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.is_empty()
    }

    /// Creation time in milliseconds since the epoch
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Ordered, append-only conversation history.
///
/// There is no way to edit or remove a turn; a correction is a new turn.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    id: Uuid,
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            turns: Vec::new(),
        }
    }

    /// Identifier for this conversation session
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append a turn at the end of the log
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in chronological order
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Serialize the whole log as a prompt
    pub fn prompt(&self) -> String {
        build_prompt(&self.turns)
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render turns as `"{role}: {content}\n"` each, in order, with no other
/// separators. Reasoning never enters the prompt.
pub fn build_prompt(turns: &[Turn]) -> String {
    let mut prompt = String::new();
    for turn in turns {
        prompt.push_str(turn.role.as_str());
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("one"));
        store.append(Turn::assistant("two", ""));
        store.append(Turn::user("three"));

        let contents: Vec<&str> = store.history().iter().map(|t| t.content()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ConversationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.prompt(), "");
    }

    #[test]
    fn test_prompt_format() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("Hello"));
        store.append(Turn::assistant("Hi there", "the user greeted me"));
        store.append(Turn::user("How are you?"));

        assert_eq!(
            store.prompt(),
            "user: Hello\nassistant: Hi there\nuser: How are you?\n"
        );
    }

    #[test]
    fn test_prompt_excludes_reasoning() {
        let turns = vec![Turn::assistant("answer", "secret chain of thought")];
        let prompt = build_prompt(&turns);
        assert!(!prompt.contains("secret"));
    }

    #[test]
    fn test_prompt_keeps_multiline_content_verbatim() {
        let turns = vec![Turn::user("line one\nline two")];
        assert_eq!(build_prompt(&turns), "user: line one\nline two\n");
    }

    #[test]
    fn test_role_literals() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_turn_reasoning() {
        assert!(!Turn::user("q").has_reasoning());
        assert!(!Turn::assistant("a", "").has_reasoning());
        assert!(Turn::assistant("a", "because").has_reasoning());
    }

    #[test]
    fn test_history_snapshot_is_unaffected_by_later_appends() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("first"));
        let snapshot = store.history().to_vec();
        store.append(Turn::assistant("second", ""));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_stores_have_distinct_ids() {
        assert_ne!(ConversationStore::new().id(), ConversationStore::new().id());
    }
}
