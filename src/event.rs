use crate::{ConnectionPatch, ConnectionStyle, Point, StatePatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scene mutation with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl SceneEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Types of mutations recorded by the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    StateCreated {
        id: String,
        position: Point,
    },

    StateMoved {
        id: String,
        from: Point,
        to: Point,
    },

    StateUpdated {
        id: String,
        title: Option<String>,
        description: Option<String>,
        color: Option<String>,
    },

    StateDeleted {
        id: String,
        /// Connections removed along with the state
        cascaded: Vec<String>,
    },

    StateDuplicated {
        source: String,
        copy: String,
    },

    ConnectionCreated {
        id: String,
        from: String,
        to: String,
    },

    ConnectionUpdated {
        id: String,
        label: Option<String>,
        style: Option<ConnectionStyle>,
        color: Option<String>,
    },

    ConnectionDeleted {
        id: String,
    },

    SceneLoaded {
        states: usize,
        connections: usize,
    },
}

impl EventType {
    pub(crate) fn state_updated(id: &str, patch: &StatePatch) -> Self {
        Self::StateUpdated {
            id: id.to_string(),
            title: patch.title.clone(),
            description: patch.description.clone(),
            color: patch.color.clone(),
        }
    }

    pub(crate) fn connection_updated(id: &str, patch: &ConnectionPatch) -> Self {
        Self::ConnectionUpdated {
            id: id.to_string(),
            label: patch.label.clone(),
            style: patch.style,
            color: patch.color.clone(),
        }
    }
}
