//! Conversation history shared between consecutive queries

use serde::Serialize;

use crate::domain::llm::{Message, MessageRole};

/// Session used when a request does not name one
pub const DEFAULT_SESSION: &str = "default";

/// Ordered prompt/reply history of one session.
///
/// Turns are stored as user/assistant message pairs. With a non-zero
/// `max_turns` the oldest pairs are evicted once the limit is reached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
    max_turns: usize,
}

impl Conversation {
    /// Create an empty conversation; `max_turns == 0` keeps every turn
    pub fn new(max_turns: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_turns,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record a completed exchange
    pub fn push_turn(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(Message::user(prompt));
        self.messages.push(Message::assistant(reply));

        if self.max_turns > 0 {
            let excess = self.turns().saturating_sub(self.max_turns);
            if excess > 0 {
                self.messages.drain(..excess * 2);
            }
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_turn_appends_pair() {
        let mut conversation = Conversation::new(0);
        conversation.push_turn("prompt", "reply");

        assert_eq!(conversation.turns(), 1);
        assert_eq!(conversation.messages()[0], Message::user("prompt"));
        assert_eq!(conversation.messages()[1], Message::assistant("reply"));
    }

    #[test]
    fn test_unbounded_history() {
        let mut conversation = Conversation::new(0);
        for i in 0..50 {
            conversation.push_turn(format!("q{}", i), format!("a{}", i));
        }

        assert_eq!(conversation.turns(), 50);
    }

    #[test]
    fn test_oldest_turns_evicted_first() {
        let mut conversation = Conversation::new(2);
        conversation.push_turn("q1", "a1");
        conversation.push_turn("q2", "a2");
        conversation.push_turn("q3", "a3");

        assert_eq!(conversation.turns(), 2);
        assert_eq!(conversation.messages()[0].content(), "q2");
        assert_eq!(conversation.messages()[3].content(), "a3");
    }

    #[test]
    fn test_clear() {
        let mut conversation = Conversation::new(5);
        conversation.push_turn("q", "a");
        conversation.clear();

        assert!(conversation.is_empty());
    }
}
