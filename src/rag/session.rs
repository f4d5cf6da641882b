//! Conversation sessions.
//!
//! History is kept in memory per session and rendered as plain text for the
//! system instruction.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Exchange {
    question: String,
    answer: String,
}

/// In-memory session store keeping the last `max_history` exchanges.
#[derive(Debug)]
pub struct SessionStore {
    max_history: usize,
    sessions: Mutex<HashMap<String, Vec<Exchange>>>,
}

impl SessionStore {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Exchange>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new empty session and return its id.
    pub fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions().insert(id.clone(), Vec::new());
        id
    }

    /// Record one question/answer pair, dropping the oldest beyond the limit.
    ///
    /// Unknown session ids start a new session under that id.
    pub fn add_exchange(&self, session_id: &str, question: &str, answer: &str) {
        let mut sessions = self.sessions();
        let history = sessions.entry(session_id.to_string()).or_default();
        history.push(Exchange {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        if history.len() > self.max_history {
            let excess = history.len() - self.max_history;
            history.drain(..excess);
        }
    }

    /// Rendered history, or `None` when the session is unknown or empty.
    pub fn history(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions();
        let history = sessions.get(session_id)?;
        if history.is_empty() {
            return None;
        }

        Some(
            history
                .iter()
                .map(|e| format!("User: {}\nAssistant: {}", e.question, e.answer))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Forget a session's history, keeping the id valid.
    pub fn clear(&self, session_id: &str) {
        if let Some(history) = self.sessions().get_mut(session_id) {
            history.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_no_history() {
        let store = SessionStore::new(2);
        let id = store.create_session();
        assert!(Uuid::parse_str(&id).is_ok());
        assert!(store.history(&id).is_none());
        assert!(store.history("unknown").is_none());
    }

    #[test]
    fn test_history_format_and_limit() {
        let store = SessionStore::new(2);
        let id = store.create_session();
        store.add_exchange(&id, "q1", "a1");
        store.add_exchange(&id, "q2", "a2");
        store.add_exchange(&id, "q3", "a3");

        assert_eq!(
            store.history(&id).unwrap(),
            "User: q2\nAssistant: a2\nUser: q3\nAssistant: a3"
        );
    }

    #[test]
    fn test_zero_history_keeps_nothing() {
        let store = SessionStore::new(0);
        let id = store.create_session();
        store.add_exchange(&id, "q", "a");
        assert!(store.history(&id).is_none());
    }

    #[test]
    fn test_clear() {
        let store = SessionStore::new(2);
        let id = store.create_session();
        store.add_exchange(&id, "q", "a");
        store.clear(&id);
        assert!(store.history(&id).is_none());
    }
}
