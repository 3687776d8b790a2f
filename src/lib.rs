// Flowchart Editor - Core Library

pub mod color;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod event;
pub mod export;
pub mod geometry;
pub mod id_generator;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod session;
pub mod state;
pub mod svg;
pub mod ui;
pub mod validation;
pub mod view;

// Re-export main types for convenience
pub use color::Rgba;
pub use config::EditorConfig;
pub use connection::{Connection, ConnectionPatch, ConnectionStyle};
pub use document::{ProjectDocument, ProjectFile};
pub use error::{EditorError, EditorResult, ElementKind, ReferenceProblem};
pub use event::{EventType, SceneEvent};
pub use geometry::{Bounds, Point, Rectangle, Size};
pub use id_generator::IdGenerator;
pub use interaction::{
    ConnectionDefaults, ContextAction, Effect, Gesture, InputEvent, Key, Outcome, PointerButton,
    Prompt, Tool,
};
pub use render::{DrawCommand, Frame, Stroke};
pub use scene::{ElementId, Scene};
pub use session::Session;
pub use state::{State, StatePatch};
pub use ui::FlowchartApp;
pub use validation::{ValidationIssue, ValidationResult, ValidationSeverity, Validator};
pub use view::ViewState;

/// Install the global tracing subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
