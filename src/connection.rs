use serde::{Deserialize, Serialize};
use std::fmt;

/// How a connection is stroked between its endpoints
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStyle {
    #[default]
    Straight,
    Curved,
}

impl fmt::Display for ConnectionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight => write!(f, "straight"),
            Self::Curved => write!(f, "curved"),
        }
    }
}

/// Directed, labeled link between two states
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    /// Unique identifier of the form `connection-<n>`
    pub id: String,

    /// Source state (arrow tail)
    pub from: String,

    /// Destination state (arrowhead)
    pub to: String,

    #[serde(default)]
    pub label: String,

    pub style: ConnectionStyle,

    pub color: String,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
        style: ConnectionStyle,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: label.into(),
            style,
            color: color.into(),
        }
    }

    /// Check if this connection involves a given state
    pub fn involves(&self, state_id: &str) -> bool {
        self.from == state_id || self.to == state_id
    }

    /// Check if this connection starts from a given state
    pub fn starts_from(&self, state_id: &str) -> bool {
        self.from == state_id
    }

    /// Check if this connection ends at a given state
    pub fn ends_at(&self, state_id: &str) -> bool {
        self.to == state_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Apply a partial property update
    pub fn apply(&mut self, patch: ConnectionPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

/// Partial update of a connection's editable properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionPatch {
    pub label: Option<String>,
    pub style: Option<ConnectionStyle>,
    pub color: Option<String>,
}

impl ConnectionPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn style(mut self, style: ConnectionStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.style.is_none() && self.color.is_none()
    }
}
