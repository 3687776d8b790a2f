// End-to-end editing scenarios driven through the public session API

mod fixtures;

use assert_matches::assert_matches;
use fixtures::sample_scenes::*;
use flowchart_editor::validation::ValidationIssueType;
use flowchart_editor::{
    ConnectionStyle, EditorConfig, EditorError, Effect, ElementId, EventType, InputEvent, Key,
    Point, PointerButton, ProjectDocument, ProjectFile, Prompt, ReferenceProblem, Session, Size,
    Tool, Validator,
};
use pretty_assertions::assert_eq;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use tempfile::TempDir;

fn press(session: &mut Session, x: f32, y: f32) -> Option<Effect> {
    session
        .dispatch(InputEvent::PointerDown {
            screen: Point::new(x, y),
            button: PointerButton::Primary,
        })
        .effect
}

fn drag_to(session: &mut Session, x: f32, y: f32) {
    session.dispatch(InputEvent::PointerMove {
        screen: Point::new(x, y),
    });
}

fn release(session: &mut Session, x: f32, y: f32) -> Option<Effect> {
    session
        .dispatch(InputEvent::PointerUp {
            screen: Point::new(x, y),
            button: PointerButton::Primary,
        })
        .effect
}

#[test]
fn test_edge_hit_between_compact_states() {
    let (session, _, _, edge) = two_states_one_edge(compact_config());

    assert_eq!(
        session.hit_test(Point::new(100.0, 2.0)),
        Some(ElementId::Connection(edge))
    );
    assert_eq!(session.hit_test(Point::new(100.0, 50.0)), None);
}

#[test]
fn test_states_win_over_edges() {
    let (session, a, _, _) = two_states_one_edge(EditorConfig::default());

    // Default-sized A spans x in [0, 120], so it covers the chord here
    assert_eq!(
        session.hit_test(Point::new(100.0, 2.0)),
        Some(ElementId::State(a))
    );
}

#[test]
fn test_loading_sparse_ids_continues_numbering() {
    let mut session = Session::default();
    session.load_scene_json(sparse_ids_json()).unwrap();

    assert_eq!(session.scene().next_state_id(), "state-6");
    assert_eq!(session.scene().next_connection_id(), "connection-10");

    let id = session.create_state(Point::new(0.0, 200.0), "Six", "");
    assert_eq!(id, "state-6");
}

#[test]
fn test_legacy_self_loop_preserved_but_not_creatable() {
    let mut session = Session::default();
    session.load_scene_json(legacy_self_loop_json()).unwrap();

    let connection = session.scene().get_connection("connection-7").unwrap();
    assert_eq!(connection.from, connection.to);

    let report = Validator::validate(session.scene());
    assert!(report
        .issues
        .iter()
        .any(|issue| issue.issue_type == ValidationIssueType::SelfLoop));

    let result =
        session.create_connection("state-3", "state-3", "", ConnectionStyle::Straight, "#000");
    assert_matches!(
        result,
        Err(EditorError::InvalidReference {
            reason: ReferenceProblem::SelfLoop,
            ..
        })
    );
    assert_eq!(session.scene().connection_count(), 1);
}

#[test]
fn test_exhausted_id_suffix_is_rejected_on_load() {
    let mut session = pipeline();
    let json = sparse_ids_json().replace("state-5", &format!("state-{}", u64::MAX));

    assert_matches!(
        session.load_scene_json(&json),
        Err(EditorError::InvalidDocument(_))
    );
    assert_eq!(session.scene().next_state_id(), "state-4");
}

#[test]
fn test_rejected_document_leaves_session_untouched() {
    let mut session = pipeline();
    let before = session.serialize_scene();

    let result = session.load_scene_json(r#"{"states": [{"id": 1}]}"#);
    assert_matches!(result, Err(EditorError::InvalidDocument(_)));
    assert_eq!(session.serialize_scene(), before);
}

#[test]
fn test_wheel_zoom_saturates() {
    let mut session = Session::default();

    for _ in 0..100 {
        session.dispatch(InputEvent::Wheel { delta_y: -1.0 });
    }
    assert_eq!(session.view().zoom, 3.0);

    for _ in 0..200 {
        session.dispatch(InputEvent::Wheel { delta_y: 1.0 });
    }
    assert_eq!(session.view().zoom, 0.1);
}

#[test]
fn test_create_state_through_prompt() {
    let mut session = pipeline();
    session.set_tool(Tool::CreateState);

    assert_eq!(press(&mut session, 100.0, 300.0), Some(Effect::PromptOpened));
    assert_eq!(
        session.prompt(),
        Some(&Prompt::CreateState {
            at: Point::new(100.0, 300.0)
        })
    );

    let id = session.confirm_state_prompt("  ", "").unwrap();
    assert_eq!(id.as_deref(), Some("state-4"));
    let state = session.scene().get_state("state-4").unwrap();
    assert_eq!(state.title, "New State");
    assert_eq!(state.position(), Point::new(100.0, 300.0));
    assert!(session.prompt().is_none());
}

#[test]
fn test_cancelled_state_prompt_creates_nothing() {
    let mut session = pipeline();
    session.set_tool(Tool::CreateState);
    press(&mut session, 100.0, 300.0);

    session.dispatch(InputEvent::Key(Key::Escape));
    assert!(session.prompt().is_none());
    assert_eq!(session.scene().state_count(), 3);
}

#[test]
fn test_connect_by_dragging_between_states() {
    let mut session = pipeline();
    session.set_tool(Tool::CreateConnection);

    press(&mut session, 10.0, 10.0);
    drag_to(&mut session, 300.0, 200.0);
    assert_eq!(release(&mut session, 510.0, 10.0), Some(Effect::PromptOpened));

    assert_matches!(
        session.prompt(),
        Some(Prompt::CreateConnection { from, to, .. })
            if from == "state-1" && to == "state-3"
    );

    let id = session
        .confirm_connection_prompt("skip", ConnectionStyle::Curved, "#123456")
        .unwrap();
    assert_eq!(id.as_deref(), Some("connection-4"));
    let connection = session.scene().get_connection("connection-4").unwrap();
    assert_eq!(connection.label, "skip");
    assert_eq!(connection.style, ConnectionStyle::Curved);
}

#[test]
fn test_release_on_empty_canvas_cancels_connection() {
    let mut session = pipeline();
    session.set_tool(Tool::CreateConnection);

    press(&mut session, 10.0, 10.0);
    assert_eq!(release(&mut session, 300.0, 400.0), None);
    assert!(session.prompt().is_none());
    assert!(session.gesture().is_idle());
    assert_eq!(session.scene().connection_count(), 3);
}

#[test]
fn test_drag_moves_state_and_logs_once() {
    let mut session = pipeline();

    press(&mut session, 10.0, 10.0);
    drag_to(&mut session, 30.0, 60.0);
    drag_to(&mut session, 60.0, 110.0);
    release(&mut session, 60.0, 110.0);

    let start = session.scene().get_state("state-1").unwrap();
    assert_eq!(start.position(), Point::new(50.0, 100.0));

    let moves: Vec<_> = session
        .scene()
        .events()
        .iter()
        .filter(|e| matches!(e.event, EventType::StateMoved { .. }))
        .collect();
    assert_eq!(moves.len(), 1);
    assert_matches!(
        &moves[0].event,
        EventType::StateMoved { id, from, to }
            if id == "state-1" && *from == Point::ZERO && *to == Point::new(50.0, 100.0)
    );
}

#[test]
fn test_delete_key_cascades_connections() {
    let mut session = pipeline();

    press(&mut session, 260.0, 10.0);
    release(&mut session, 260.0, 10.0);
    assert_eq!(
        session.selection(),
        Some(&ElementId::State("state-2".to_string()))
    );

    session.dispatch(InputEvent::Key(Key::Delete));

    let scene = session.scene();
    assert!(scene.get_state("state-2").is_none());
    let remaining: Vec<_> = scene.connections().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(remaining, vec!["connection-3"]);
    assert!(scene.dangling_connections().is_empty());
    assert!(session.selection().is_none());
}

#[test]
fn test_duplicate_copies_state_without_connections() {
    let mut session = pipeline();
    session.select(Some(ElementId::State("state-1".to_string())));

    let copy = session.duplicate_selected().unwrap().unwrap();
    let state = session.scene().get_state(&copy).unwrap();
    assert_eq!(state.title, "Start (Copy)");
    assert_eq!(state.description, "Entry point");
    assert_eq!(state.position(), Point::new(20.0, 20.0));
    assert!(session.scene().outgoing_connections(&copy).is_empty());
    assert_eq!(session.selection(), Some(&ElementId::State(copy)));
}

#[test]
fn test_context_menu_on_connection() {
    let (mut session, _, _, edge) = two_states_one_edge(compact_config());

    let outcome = session.dispatch(InputEvent::PointerDown {
        screen: Point::new(100.0, 12.0),
        button: PointerButton::Secondary,
    });
    assert_eq!(
        outcome.effect,
        Some(Effect::ShowContextMenu {
            screen: Point::new(100.0, 12.0)
        })
    );
    assert_eq!(
        session.selection(),
        Some(&ElementId::Connection(edge.clone()))
    );

    let effect = session
        .apply_context_action(flowchart_editor::ContextAction::Edit)
        .unwrap();
    assert_eq!(
        effect,
        Some(Effect::EditProperties(ElementId::Connection(edge)))
    );
}

#[test]
fn test_fit_to_view_shows_every_state() {
    let mut session = pipeline();
    session.set_viewport(Size::new(400.0, 300.0));
    session.fit_to_view().unwrap();

    let view = session.view();
    for state in session.scene().states() {
        let top_left = view.to_screen(state.position());
        let bottom_right = view.to_screen(Point::new(
            state.x + state.width,
            state.y + state.height,
        ));
        assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
        assert!(bottom_right.x <= 400.0 && bottom_right.y <= 300.0);
    }
}

#[test]
fn test_markdown_export_structure() {
    let session = pipeline();
    let markdown = flowchart_editor::export::to_markdown(session.scene());

    let mut headings = Vec::new();
    let mut items = Vec::new();
    let mut current: Option<String> = None;
    let mut in_heading = false;

    for event in Parser::new(&markdown) {
        match event {
            Event::Start(Tag::Heading(HeadingLevel::H3, ..)) => in_heading = true,
            Event::End(Tag::Heading(HeadingLevel::H3, ..)) => in_heading = false,
            Event::Start(Tag::Item) => current = Some(String::new()),
            Event::End(Tag::Item) => items.extend(current.take()),
            Event::Text(text) => {
                if in_heading {
                    headings.push(text.to_string());
                } else if let Some(item) = current.as_mut() {
                    item.push_str(&text);
                }
            }
            _ => {}
        }
    }

    assert_eq!(headings, vec!["Start", "Work", "Done"]);
    assert_eq!(
        items,
        vec![
            "Start → Work: begin",
            "Work → Done: finish",
            "Done → Start: again"
        ]
    );
}

#[test]
fn test_project_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let session = pipeline();
    let project = ProjectFile::in_dir(temp_dir.path());

    project.save(&session.serialize_scene()).unwrap();
    let loaded: ProjectDocument = project.load().unwrap();

    let mut reopened = Session::default();
    reopened.load_scene(loaded).unwrap();
    assert_eq!(reopened.serialize_scene(), session.serialize_scene());
    assert_eq!(reopened.scene().next_state_id(), "state-4");
}

#[test]
fn test_render_is_pure() {
    let mut session = pipeline();
    session.select(Some(ElementId::State("state-1".to_string())));
    let before = session.serialize_scene();

    let first = session.render();
    let second = session.render();
    assert_eq!(first, second);
    assert_eq!(session.serialize_scene(), before);
}
