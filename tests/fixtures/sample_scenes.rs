// Helper functions to build test sessions and project documents

use flowchart_editor::{ConnectionStyle, EditorConfig, Point, Session, Size};

/// Small states so that points near a chord are not inside either endpoint
pub fn compact_config() -> EditorConfig {
    EditorConfig {
        state_width: 40.0,
        state_height: 20.0,
        ..EditorConfig::default()
    }
}

/// Session with states A at (0,0) and B at (200,0) joined by a straight edge.
/// Returns the session and the ids of A, B and the edge.
pub fn two_states_one_edge(config: EditorConfig) -> (Session, String, String, String) {
    let mut session = Session::new(config, Size::new(800.0, 600.0));
    let a = session.create_state(Point::new(0.0, 0.0), "A", "");
    let b = session.create_state(Point::new(200.0, 0.0), "B", "");
    let edge = session
        .create_connection(&a, &b, "", ConnectionStyle::Straight, "#6c757d")
        .unwrap();
    (session, a, b, edge)
}

/// Session with a three-step pipeline: Start → Work → Done, plus Done → Start
pub fn pipeline() -> Session {
    let mut session = Session::new(EditorConfig::default(), Size::new(1280.0, 800.0));
    let start = session.create_state(Point::new(0.0, 0.0), "Start", "Entry point");
    let work = session.create_state(Point::new(250.0, 0.0), "Work", "Does the thing");
    let done = session.create_state(Point::new(500.0, 0.0), "Done", "");
    session
        .create_connection(&start, &work, "begin", ConnectionStyle::Straight, "#6c757d")
        .unwrap();
    session
        .create_connection(&work, &done, "finish", ConnectionStyle::Straight, "#6c757d")
        .unwrap();
    session
        .create_connection(&done, &start, "again", ConnectionStyle::Curved, "#a02020")
        .unwrap();
    session
}

/// Project JSON whose ids are not contiguous
pub fn sparse_ids_json() -> &'static str {
    r##"{
        "states": [
            {"id": "state-2", "title": "Two", "description": "", "x": 0, "y": 0, "width": 120, "height": 80, "color": "#ffffff"},
            {"id": "state-5", "title": "Five", "description": "", "x": 300, "y": 0, "width": 120, "height": 80, "color": "#ffffff"}
        ],
        "connections": [
            {"id": "connection-9", "from": "state-2", "to": "state-5", "label": "", "style": "straight", "color": "#6c757d"}
        ]
    }"##
}

/// Project JSON carrying a self-loop saved by an older editor
pub fn legacy_self_loop_json() -> &'static str {
    r##"{
        "states": [
            {"id": "state-3", "title": "Loop", "description": "", "x": 0, "y": 0, "width": 120, "height": 80, "color": "#ffffff"}
        ],
        "connections": [
            {"id": "connection-7", "from": "state-3", "to": "state-3", "label": "", "style": "curved", "color": "#6c757d"}
        ]
    }"##
}
