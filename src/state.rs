use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::db::Db;

/// One line of the search assistant's conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

const GREETING: &str =
    "Hi! Type skills or keywords and I will rank postings or profiles by relevance.";

/// Per-session search transcripts. Process memory only: they are dropped
/// on logout and gone on restart, and a fresh session starts from the
/// greeting again.
#[derive(Clone, Default)]
pub struct TranscriptStore {
    inner: Arc<Mutex<HashMap<String, Vec<ChatMessage>>>>,
}

impl TranscriptStore {
    /// Current transcript for a session, seeding the greeting on first use.
    pub fn transcript(&self, session_key: &str) -> Vec<ChatMessage> {
        let mut transcripts = self.inner.lock().expect("transcripts lock poisoned");
        transcripts
            .entry(session_key.to_string())
            .or_insert_with(|| vec![ChatMessage::assistant(GREETING)])
            .clone()
    }

    /// Record one query/reply exchange.
    pub fn append_exchange(&self, session_key: &str, query: &str, reply: &str) {
        let mut transcripts = self.inner.lock().expect("transcripts lock poisoned");
        let transcript = transcripts
            .entry(session_key.to_string())
            .or_insert_with(|| vec![ChatMessage::assistant(GREETING)]);
        transcript.push(ChatMessage::user(query));
        transcript.push(ChatMessage::assistant(reply));
    }

    /// Drop a session's transcript (logout).
    pub fn clear(&self, session_key: &str) {
        let mut transcripts = self.inner.lock().expect("transcripts lock poisoned");
        transcripts.remove(session_key);
    }
}

/// Shared application state threaded through every route.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub session_ttl: chrono::Duration,
    pub transcripts: TranscriptStore,
}

impl AppState {
    pub fn new(db: Db, session_ttl_hours: i64) -> Self {
        AppState {
            db,
            session_ttl: chrono::Duration::hours(session_ttl_hours),
            transcripts: TranscriptStore::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_transcript_starts_with_greeting() {
        let store = TranscriptStore::default();
        let transcript = store.transcript("s1");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, "assistant");
    }

    #[test]
    fn test_append_exchange_keeps_order() {
        let store = TranscriptStore::default();
        store.append_exchange("s1", "rust", "Found 2 matches");
        let transcript = store.transcript("s1");
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, "user");
        assert_eq!(transcript[1].content, "rust");
        assert_eq!(transcript[2].role, "assistant");
    }

    #[test]
    fn test_sessions_are_isolated_and_clear_resets() {
        let store = TranscriptStore::default();
        store.append_exchange("s1", "rust", "reply");
        assert_eq!(store.transcript("s2").len(), 1);

        store.clear("s1");
        assert_eq!(store.transcript("s1").len(), 1);
    }
}
