//! In-memory conversation store keyed by session id

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{Conversation, Message};

/// Sessions kept before the least recently used one is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug)]
struct SessionEntry {
    conversation: Conversation,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<String, SessionEntry>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            self.entries.remove(&id);
            debug!(session_id = %id, "Evicted least recently used session");
        }
    }
}

/// Process-wide conversation histories, lost on restart.
///
/// The lock is held only to read or append; two concurrent queries on the
/// same session both see the history as it was before either replied.
/// At most `max_sessions` sessions are kept (0 means no cap).
#[derive(Debug, Clone)]
pub struct ConversationStore {
    sessions: Arc<Mutex<Sessions>>,
    max_turns: usize,
    max_sessions: usize,
}

impl ConversationStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Sessions::default())),
            max_turns,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Snapshot of the messages recorded for a session; marks it as used
    pub async fn history(&self, session_id: &str) -> Vec<Message> {
        let mut sessions = self.sessions.lock().await;
        let now = sessions.tick();
        match sessions.entries.get_mut(session_id) {
            Some(entry) => {
                entry.last_used = now;
                entry.conversation.messages().to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Append a completed prompt/reply exchange to a session
    pub async fn record_turn(&self, session_id: &str, prompt: &str, reply: &str) {
        let mut sessions = self.sessions.lock().await;
        let now = sessions.tick();

        if !sessions.entries.contains_key(session_id)
            && self.max_sessions > 0
            && sessions.entries.len() >= self.max_sessions
        {
            sessions.evict_least_recent();
        }

        let entry = sessions
            .entries
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                conversation: Conversation::new(self.max_turns),
                last_used: now,
            });
        entry.last_used = now;
        entry.conversation.push_turn(prompt, reply);
    }

    /// Forget a session's history; returns whether it existed
    pub async fn reset(&self, session_id: &str) -> bool {
        self.sessions
            .lock()
            .await
            .entries
            .remove(session_id)
            .is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.entries.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(20)
    }
}
