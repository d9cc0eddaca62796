//! [`ActionSink`] implementations.

use std::sync::Mutex;

use tracing::info;

use crate::application::actions::ActionSink;
use crate::cache::mutex_lock;

const SOURCE: &str = "infra::actions";

/// Emits each interaction as a structured `info` event.
#[derive(Debug, Clone, Default)]
pub struct TracingActionSink {
    session: Option<String>,
}

impl TracingActionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every event with a session identifier.
    pub fn for_session(session: impl Into<String>) -> Self {
        Self {
            session: Some(session.into()),
        }
    }
}

impl ActionSink for TracingActionSink {
    fn record(&self, post_id: &str, action: &str) {
        info!(
            target: "simfeed::actions",
            session = self.session.as_deref().unwrap_or(""),
            post_id,
            action,
            "Post action recorded"
        );
    }
}

/// Keeps every interaction in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryActionSink {
    events: Mutex<Vec<RecordedAction>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAction {
    pub post_id: String,
    pub action: String,
}

impl MemoryActionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedAction> {
        mutex_lock(&self.events, SOURCE, "events").clone()
    }

    pub fn actions_for(&self, post_id: &str) -> Vec<String> {
        mutex_lock(&self.events, SOURCE, "actions_for")
            .iter()
            .filter(|event| event.post_id == post_id)
            .map(|event| event.action.clone())
            .collect()
    }
}

impl ActionSink for MemoryActionSink {
    fn record(&self, post_id: &str, action: &str) {
        mutex_lock(&self.events, SOURCE, "record").push(RecordedAction {
            post_id: post_id.to_string(),
            action: action.to_string(),
        });
    }
}
