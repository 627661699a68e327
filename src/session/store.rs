use std::collections::HashMap;
use tracing::debug;

use super::state::{transition, Action, Event, Session};

/// Per-chat sessions, owned by the polling loop.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chat_id: i64) -> Option<Session> {
        self.sessions.get(&chat_id).copied()
    }

    /// Run `event` through the transition table for `chat_id`, store the
    /// next state and return the actions to perform.
    pub fn apply(&mut self, chat_id: i64, event: Event) -> Vec<Action> {
        let current = self.get(chat_id);
        let t = transition(current, event);
        debug!(
            chat_id,
            from = current.map(|s| s.as_str()).unwrap_or("none"),
            to = t.next.map(|s| s.as_str()).unwrap_or("none"),
            "session transition"
        );
        match t.next {
            Some(next) => {
                self.sessions.insert(chat_id, next);
            }
            None => {
                self.sessions.remove(&chat_id);
            }
        }
        t.actions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_per_chat() {
        let mut store = SessionStore::new();
        assert!(store.is_empty());

        store.apply(1, Event::Start { first_name: None });
        assert_eq!(store.get(1), Some(Session::AwaitingQuery));
        assert_eq!(store.get(2), None);

        let actions = store.apply(2, Event::Text("мира".to_string()));
        assert_eq!(actions, vec![Action::NeedRestart]);
        assert_eq!(store.len(), 1);

        store.apply(1, Event::UpdateFileCommand);
        assert_eq!(store.get(1), Some(Session::AwaitingFile));
    }
}
