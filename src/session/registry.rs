use crate::game::{GameState, Phase};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

/// Public view of one live session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub phase: Phase,
    pub level: u32,
    pub score: u32,
    pub sequence_len: usize,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn new(session_id: Uuid, state: &GameState) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            phase: state.phase,
            level: state.level,
            score: state.score,
            sequence_len: state.sequence.len(),
            started_at: now,
            updated_at: now,
        }
    }

    fn refresh(&mut self, state: &GameState) {
        self.phase = state.phase;
        self.level = state.level;
        self.score = state.score;
        self.sequence_len = state.sequence.len();
        self.updated_at = Utc::now();
    }
}

/// Live sessions, keyed by session id
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionSummary>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, session_id: Uuid, state: &GameState) {
        self.sessions
            .insert(session_id, SessionSummary::new(session_id, state));
    }

    /// Refresh the summary of a registered session; unknown ids are ignored
    pub fn record(&self, session_id: Uuid, state: &GameState) {
        if let Some(mut summary) = self.sessions.get_mut(&session_id) {
            summary.refresh(state);
        }
    }

    pub fn remove(&self, session_id: &Uuid) -> Option<SessionSummary> {
        self.sessions.remove(session_id).map(|(_, summary)| summary)
    }

    pub fn get(&self, session_id: &Uuid) -> Option<SessionSummary> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// All live sessions, oldest first
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<SessionSummary> =
            self.sessions.iter().map(|s| s.value().clone()).collect();
        sessions.sort_by_key(|s| s.started_at);
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
