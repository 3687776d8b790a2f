use crate::{
    geometry, Bounds, Connection, ConnectionPatch, ConnectionStyle, EditorConfig, EditorError,
    EditorResult, EventType, IdGenerator, Point, ProjectDocument, Rectangle, ReferenceProblem,
    SceneEvent, State, StatePatch,
};
use crate::id_generator::{CONNECTION_PREFIX, STATE_PREFIX};
use tracing::debug;

/// Reference to a single element of the scene
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementId {
    State(String),
    Connection(String),
}

impl ElementId {
    pub fn id(&self) -> &str {
        match self {
            Self::State(id) | Self::Connection(id) => id,
        }
    }
}

/// The in-memory flowchart: states, connections and their id counters.
///
/// Collection order is draw order; later states are drawn on top and win
/// hit-tests.
#[derive(Debug, Clone)]
pub struct Scene {
    states: Vec<State>,

    connections: Vec<Connection>,

    state_ids: IdGenerator,

    connection_ids: IdGenerator,

    /// Sizes, colors and offsets used for new elements
    config: EditorConfig,

    /// Event log for history tracking
    events: Vec<SceneEvent>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            states: Vec::new(),
            connections: Vec::new(),
            state_ids: IdGenerator::states(),
            connection_ids: IdGenerator::connections(),
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ========== State Operations ==========

    /// Create a state with the default size and color at `position`
    /// (its top-left corner). Returns the new id.
    pub fn create_state(
        &mut self,
        position: Point,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> String {
        let id = self.state_ids.next_id();
        let bounds = Rectangle::new(
            position.x,
            position.y,
            self.config.state_width,
            self.config.state_height,
        );
        let state = State::new(
            id.clone(),
            title,
            description,
            bounds,
            self.config.state_color.clone(),
        );

        debug!(id = %id, x = position.x, y = position.y, "state created");
        self.log_event(EventType::StateCreated {
            id: id.clone(),
            position,
        });

        self.states.push(state);
        id
    }

    /// Get a state by ID
    pub fn get_state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.get_state(id).is_some()
    }

    /// All states, in draw order
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Move a state's top-left corner. Absent ids are ignored.
    /// Returns whether a state was moved.
    pub fn move_state(&mut self, id: &str, position: Point) -> bool {
        match self.states.iter_mut().find(|s| s.id == id) {
            Some(state) => {
                state.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Record a completed drag in the event log
    pub(crate) fn log_move(&mut self, id: &str, from: Point, to: Point) {
        if from != to {
            self.log_event(EventType::StateMoved {
                id: id.to_string(),
                from,
                to,
            });
        }
    }

    /// Update a state's title, description and/or color
    pub fn update_state(&mut self, id: &str, patch: StatePatch) -> EditorResult<()> {
        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| EditorError::state_not_found(id))?;

        let event = EventType::state_updated(id, &patch);
        state.apply(patch);
        self.log_event(event);

        Ok(())
    }

    /// Delete a state and every connection that references it.
    /// Returns the ids of the cascaded connections.
    pub fn delete_state(&mut self, id: &str) -> EditorResult<Vec<String>> {
        if !self.contains_state(id) {
            return Err(EditorError::state_not_found(id));
        }

        // Collect first, then remove everything in one pass
        let cascaded: Vec<String> = self
            .connections
            .iter()
            .filter(|c| c.involves(id))
            .map(|c| c.id.clone())
            .collect();

        self.states.retain(|s| s.id != id);
        self.connections.retain(|c| !cascaded.contains(&c.id));

        debug!(id, cascaded = cascaded.len(), "state deleted");
        self.log_event(EventType::StateDeleted {
            id: id.to_string(),
            cascaded: cascaded.clone(),
        });

        Ok(cascaded)
    }

    /// Copy a state (not its connections) under a fresh id, offset by the
    /// configured duplicate offset and titled "<title> (Copy)"
    pub fn duplicate_state(&mut self, id: &str) -> EditorResult<String> {
        let original = self
            .get_state(id)
            .cloned()
            .ok_or_else(|| EditorError::state_not_found(id))?;

        let new_id = self.state_ids.next_id();
        let offset = self.config.duplicate_offset;
        let copy = State {
            id: new_id.clone(),
            title: format!("{} (Copy)", original.title),
            x: original.x + offset.x,
            y: original.y + offset.y,
            ..original
        };

        self.states.push(copy);
        self.log_event(EventType::StateDuplicated {
            source: id.to_string(),
            copy: new_id.clone(),
        });

        Ok(new_id)
    }

    // ========== Connection Operations ==========

    /// Create a connection between two existing, distinct states
    pub fn create_connection(
        &mut self,
        from: &str,
        to: &str,
        label: impl Into<String>,
        style: ConnectionStyle,
        color: impl Into<String>,
    ) -> EditorResult<String> {
        let reject = |reason| EditorError::InvalidReference {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        };
        if !self.contains_state(from) {
            return Err(reject(ReferenceProblem::MissingSource));
        }
        if !self.contains_state(to) {
            return Err(reject(ReferenceProblem::MissingDestination));
        }
        if from == to {
            return Err(reject(ReferenceProblem::SelfLoop));
        }

        let id = self.connection_ids.next_id();
        self.connections
            .push(Connection::new(id.clone(), from, to, label, style, color));

        debug!(id = %id, from, to, "connection created");
        self.log_event(EventType::ConnectionCreated {
            id: id.clone(),
            from: from.to_string(),
            to: to.to_string(),
        });

        Ok(id)
    }

    /// Get a connection by ID
    pub fn get_connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// All connections, in draw order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Update a connection's label, style and/or color
    pub fn update_connection(&mut self, id: &str, patch: ConnectionPatch) -> EditorResult<()> {
        let connection = self
            .connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EditorError::connection_not_found(id))?;

        let event = EventType::connection_updated(id, &patch);
        connection.apply(patch);
        self.log_event(event);

        Ok(())
    }

    /// Delete a connection
    pub fn delete_connection(&mut self, id: &str) -> EditorResult<()> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EditorError::connection_not_found(id))?;
        self.connections.remove(index);

        debug!(id, "connection deleted");
        self.log_event(EventType::ConnectionDeleted { id: id.to_string() });

        Ok(())
    }

    /// Delete whichever element `element` names
    pub fn delete_element(&mut self, element: &ElementId) -> EditorResult<()> {
        match element {
            ElementId::State(id) => self.delete_state(id).map(|_| ()),
            ElementId::Connection(id) => self.delete_connection(id),
        }
    }

    pub fn contains_element(&self, element: &ElementId) -> bool {
        match element {
            ElementId::State(id) => self.contains_state(id),
            ElementId::Connection(id) => self.get_connection(id).is_some(),
        }
    }

    /// Get all connections starting from a state
    pub fn outgoing_connections(&self, from: &str) -> Vec<&Connection> {
        self.connections.iter().filter(|c| c.starts_from(from)).collect()
    }

    /// Centers of a connection's endpoint states, if both exist
    pub fn connection_endpoints(&self, connection: &Connection) -> Option<(Point, Point)> {
        let from = self.get_state(&connection.from)?;
        let to = self.get_state(&connection.to)?;
        Some((from.center(), to.center()))
    }

    /// Connections naming at least one missing state
    pub fn dangling_connections(&self) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| !self.contains_state(&c.from) || !self.contains_state(&c.to))
            .collect()
    }

    // ========== Whole-Scene Operations ==========

    /// Bounding box of all states
    pub fn bounding_box(&self) -> EditorResult<Bounds> {
        let rects: Vec<Rectangle> = self.states.iter().map(State::bounds).collect();
        geometry::bounding_box(&rects)
    }

    /// Replace both collections with the document's contents.
    ///
    /// The document is checked before anything is touched, so a rejected
    /// document leaves the scene unchanged. Connection endpoints are not
    /// re-validated.
    pub fn load(&mut self, document: ProjectDocument) -> EditorResult<()> {
        document.validate()?;

        let ProjectDocument {
            states,
            connections,
        } = document;

        self.state_ids =
            IdGenerator::from_existing_ids(STATE_PREFIX, states.iter().map(|s| s.id.as_str()));
        self.connection_ids = IdGenerator::from_existing_ids(
            CONNECTION_PREFIX,
            connections.iter().map(|c| c.id.as_str()),
        );
        self.states = states;
        self.connections = connections;

        self.log_event(EventType::SceneLoaded {
            states: self.states.len(),
            connections: self.connections.len(),
        });

        Ok(())
    }

    /// Plain snapshot of both collections
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            states: self.states.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Id the next created state will receive
    pub fn next_state_id(&self) -> String {
        self.state_ids.peek()
    }

    /// Id the next created connection will receive
    pub fn next_connection_id(&self) -> String {
        self.connection_ids.peek()
    }

    // ========== Event Logging ==========

    /// Log an event
    fn log_event(&mut self, event: EventType) {
        self.events.push(SceneEvent::new(event));
    }

    /// Get all events
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Clear event log
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    // ========== Utility Methods ==========

    /// Count states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Count connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
