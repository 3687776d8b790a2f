use std::fmt;
use thiserror::Error;

/// Result alias for scene and session operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Kind of diagram element named in an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    State,
    Connection,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => write!(f, "state"),
            Self::Connection => write!(f, "connection"),
        }
    }
}

/// Why a connection request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceProblem {
    MissingSource,
    MissingDestination,
    SelfLoop,
}

impl fmt::Display for ReferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource => write!(f, "source state does not exist"),
            Self::MissingDestination => write!(f, "destination state does not exist"),
            Self::SelfLoop => write!(f, "a state cannot connect to itself"),
        }
    }
}

/// Errors raised by the scene model and the editing session.
///
/// All of them are recoverable: an operation that fails leaves the scene
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Connection creation named a missing or self-referential state
    #[error("invalid connection {from} -> {to}: {reason}")]
    InvalidReference {
        from: String,
        to: String,
        reason: ReferenceProblem,
    },

    /// A project document did not match the expected shape
    #[error("invalid project document: {0}")]
    InvalidDocument(String),

    /// Fit-to-view or a bounding-box query on a scene without states
    #[error("scene has no states")]
    EmptyScene,

    #[error("{kind} not found: {id}")]
    NotFound { kind: ElementKind, id: String },
}

impl EditorError {
    pub(crate) fn state_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: ElementKind::State,
            id: id.to_string(),
        }
    }

    pub(crate) fn connection_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: ElementKind::Connection,
            id: id.to_string(),
        }
    }
}
