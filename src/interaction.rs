//! Tool modes, gestures and the input dispatcher.
//!
//! The UI layer turns raw pointer and keyboard events into [`InputEvent`]s
//! and feeds them to [`Session::dispatch`]. The returned [`Outcome`] says
//! whether the canvas needs repainting and whether the UI has to present
//! something (a prompt, a context menu, the label editor).

use crate::hit_test::{hit_state, hit_test};
use crate::{ConnectionStyle, ElementId, Point, Session};
use tracing::{debug, warn};

/// Active tool. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    CreateState,
    CreateConnection,
    Delete,
    Pan,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Select,
        Tool::CreateState,
        Tool::CreateConnection,
        Tool::Delete,
        Tool::Pan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::CreateState => "State",
            Self::CreateConnection => "Connection",
            Self::Delete => "Delete",
            Self::Pan => "Pan",
        }
    }

    /// Keyboard shortcut, if the tool has one
    pub fn shortcut(&self) -> Option<char> {
        match self {
            Self::Select => Some('v'),
            Self::CreateState => Some('s'),
            Self::CreateConnection => Some('c'),
            Self::Pan => Some('g'),
            Self::Delete => None,
        }
    }

    fn from_shortcut(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        Self::ALL.into_iter().find(|tool| tool.shortcut() == Some(c))
    }
}

/// In-flight multi-event interaction
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,

    /// Drawing a new connection out of `anchor`
    EdgePending {
        anchor: String,
        /// Model-space position of the loose end
        floating: Point,
    },

    /// Moving a state with the pointer
    Dragging {
        state: String,
        /// Pointer minus state origin at drag start
        grab_offset: Point,
        /// State origin at drag start
        origin: Point,
    },

    Panning {
        last_screen: Point,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
}

/// Typed input, positions in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { screen: Point, button: PointerButton },
    PointerMove { screen: Point },
    PointerUp { screen: Point, button: PointerButton },
    DoubleClick { screen: Point },
    /// Negative `delta_y` zooms in
    Wheel { delta_y: f32 },
    Key(Key),
}

/// Style and color a new connection prompt is pre-filled with
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDefaults {
    pub style: ConnectionStyle,
    pub color: String,
}

/// A confirmation step the UI must present before an element is created
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    CreateState {
        /// Model-space top-left of the new state
        at: Point,
    },
    CreateConnection {
        from: String,
        to: String,
        defaults: ConnectionDefaults,
    },
}

/// Something the UI layer has to present after an input
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A prompt was opened; read it from [`Session::prompt`]
    PromptOpened,
    /// Open the property editor with the label field focused
    EditConnectionLabel { id: String },
    /// Open the property editor for an element
    EditProperties(ElementId),
    /// Show the Edit / Delete / Duplicate menu at a screen position
    ShowContextMenu { screen: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Edit,
    Delete,
    Duplicate,
}

/// Result of dispatching one input event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub redraw: bool,
    pub effect: Option<Effect>,
}

impl Outcome {
    fn none() -> Self {
        Self::default()
    }

    fn redraw() -> Self {
        Self {
            redraw: true,
            effect: None,
        }
    }

    fn effect(effect: Effect) -> Self {
        Self {
            redraw: true,
            effect: Some(effect),
        }
    }
}

impl Session {
    /// Interpret one input event against the current tool and gesture
    pub fn dispatch(&mut self, event: InputEvent) -> Outcome {
        match event {
            InputEvent::Wheel { delta_y } => {
                let step = self.scene().config().wheel_zoom_step;
                self.view_mut().wheel(delta_y, step);
                Outcome::redraw()
            }
            InputEvent::Key(key) => self.on_key(key),
            // An open prompt is modal for the canvas
            _ if self.prompt().is_some() => Outcome::none(),
            InputEvent::PointerDown { screen, button } => match button {
                PointerButton::Primary => self.on_primary_down(screen),
                PointerButton::Secondary => self.on_secondary_down(screen),
                PointerButton::Middle => Outcome::none(),
            },
            InputEvent::PointerMove { screen } => self.on_pointer_move(screen),
            InputEvent::PointerUp { screen, button } => match button {
                PointerButton::Primary => self.on_primary_up(screen),
                _ => Outcome::none(),
            },
            InputEvent::DoubleClick { screen } => self.on_double_click(screen),
        }
    }

    fn on_key(&mut self, key: Key) -> Outcome {
        match key {
            Key::Escape => {
                self.cancel_gesture();
                self.cancel_prompt();
                self.clear_selection();
                Outcome::redraw()
            }
            // Keys belong to the prompt's text fields while it is open
            _ if self.prompt().is_some() => Outcome::none(),
            Key::Delete | Key::Backspace => {
                if let Err(e) = self.delete_selected() {
                    warn!(error = %e, "delete failed");
                }
                Outcome::redraw()
            }
            Key::Char(c) => match Tool::from_shortcut(c) {
                Some(tool) => {
                    self.set_tool(tool);
                    Outcome::redraw()
                }
                None => Outcome::none(),
            },
        }
    }

    fn on_primary_down(&mut self, screen: Point) -> Outcome {
        if !self.gesture().is_idle() {
            return Outcome::none();
        }
        let model = self.view().to_model(screen);

        match self.tool() {
            Tool::Select => match hit_test(self.scene(), model) {
                Some(element) => {
                    if let ElementId::State(id) = &element {
                        if let Some(state) = self.scene().get_state(id) {
                            let origin = state.position();
                            debug!(state = %id, "drag started");
                            self.set_gesture(Gesture::Dragging {
                                state: id.clone(),
                                grab_offset: model - origin,
                                origin,
                            });
                        }
                    }
                    self.select(Some(element));
                    Outcome::redraw()
                }
                None => {
                    self.clear_selection();
                    Outcome::redraw()
                }
            },
            Tool::CreateState => {
                self.open_prompt(Prompt::CreateState { at: model });
                Outcome::effect(Effect::PromptOpened)
            }
            Tool::CreateConnection => match hit_state(self.scene(), model) {
                Some(anchor) => {
                    let anchor = anchor.to_string();
                    debug!(anchor = %anchor, "connection gesture started");
                    self.set_gesture(Gesture::EdgePending {
                        anchor,
                        floating: model,
                    });
                    Outcome::redraw()
                }
                None => Outcome::none(),
            },
            Tool::Delete => match hit_test(self.scene(), model) {
                Some(element) => {
                    if let Err(e) = self.delete_element(&element) {
                        warn!(error = %e, "delete failed");
                    }
                    Outcome::redraw()
                }
                None => Outcome::none(),
            },
            Tool::Pan => {
                self.set_gesture(Gesture::Panning {
                    last_screen: screen,
                });
                Outcome::none()
            }
        }
    }

    fn on_secondary_down(&mut self, screen: Point) -> Outcome {
        if !self.gesture().is_idle() {
            return Outcome::none();
        }
        let model = self.view().to_model(screen);
        match hit_test(self.scene(), model) {
            Some(element) => {
                self.select(Some(element));
                Outcome::effect(Effect::ShowContextMenu { screen })
            }
            None => Outcome::none(),
        }
    }

    fn on_pointer_move(&mut self, screen: Point) -> Outcome {
        let model = self.view().to_model(screen);

        match self.gesture().clone() {
            Gesture::Idle => Outcome::none(),
            Gesture::EdgePending { anchor, .. } => {
                self.set_gesture(Gesture::EdgePending {
                    anchor,
                    floating: model,
                });
                Outcome::redraw()
            }
            Gesture::Dragging {
                state, grab_offset, ..
            } => {
                self.scene_mut().move_state(&state, model - grab_offset);
                Outcome::redraw()
            }
            Gesture::Panning { last_screen } => {
                self.view_mut().pan_by(screen - last_screen);
                self.set_gesture(Gesture::Panning {
                    last_screen: screen,
                });
                Outcome::redraw()
            }
        }
    }

    fn on_primary_up(&mut self, screen: Point) -> Outcome {
        let model = self.view().to_model(screen);

        match self.take_gesture() {
            Gesture::Idle => Outcome::none(),
            Gesture::EdgePending { anchor, .. } => {
                let target = hit_state(self.scene(), model)
                    .filter(|target| *target != anchor)
                    .map(str::to_string);
                match target {
                    Some(to) => {
                        let config = self.scene().config();
                        let defaults = ConnectionDefaults {
                            style: config.connection_style,
                            color: config.connection_color.clone(),
                        };
                        debug!(from = %anchor, to = %to, "connection gesture completed");
                        self.open_prompt(Prompt::CreateConnection {
                            from: anchor,
                            to,
                            defaults,
                        });
                        Outcome::effect(Effect::PromptOpened)
                    }
                    None => {
                        debug!(anchor = %anchor, "connection gesture cancelled");
                        Outcome::redraw()
                    }
                }
            }
            Gesture::Dragging { state, origin, .. } => {
                let to = self.scene().get_state(&state).map(|s| s.position());
                if let Some(to) = to {
                    self.scene_mut().log_move(&state, origin, to);
                }
                debug!(state = %state, "drag finished");
                Outcome::redraw()
            }
            Gesture::Panning { .. } => Outcome::none(),
        }
    }

    fn on_double_click(&mut self, screen: Point) -> Outcome {
        let model = self.view().to_model(screen);
        match hit_test(self.scene(), model) {
            Some(ElementId::Connection(id)) => {
                self.select(Some(ElementId::Connection(id.clone())));
                Outcome::effect(Effect::EditConnectionLabel { id })
            }
            _ => Outcome::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorConfig, Size};
    use assert_matches::assert_matches;

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            screen: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn mv(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove {
            screen: Point::new(x, y),
        }
    }

    fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp {
            screen: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn session_with_two_states() -> (Session, String, String) {
        let mut session = Session::new(EditorConfig::default(), Size::new(800.0, 600.0));
        let a = session.create_state(Point::new(0.0, 0.0), "A", "");
        let b = session.create_state(Point::new(300.0, 0.0), "B", "");
        (session, a, b)
    }

    #[test]
    fn test_drag_moves_state_by_grab_offset() {
        let (mut session, a, _) = session_with_two_states();

        session.dispatch(down(10.0, 10.0));
        assert_eq!(session.selection(), Some(&ElementId::State(a.clone())));
        assert_matches!(session.gesture(), Gesture::Dragging { .. });

        session.dispatch(mv(50.0, 30.0));
        session.dispatch(mv(110.0, 60.0));
        assert_eq!(
            session.scene().get_state(&a).unwrap().position(),
            Point::new(100.0, 50.0)
        );

        session.dispatch(up(110.0, 60.0));
        assert!(session.gesture().is_idle());

        // One move event for the whole drag
        let moves = session
            .scene()
            .events()
            .iter()
            .filter(|e| matches!(e.event, crate::EventType::StateMoved { .. }))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn test_drag_respects_zoom_and_pan() {
        let (mut session, a, _) = session_with_two_states();
        session.set_zoom(2.0);
        session.pan(Point::new(100.0, 100.0));

        // Model (10, 10) is screen (120, 120)
        session.dispatch(down(120.0, 120.0));
        session.dispatch(mv(140.0, 160.0));
        assert_eq!(
            session.scene().get_state(&a).unwrap().position(),
            Point::new(10.0, 20.0)
        );
    }

    #[test]
    fn test_select_connection_does_not_drag() {
        let (mut session, a, b) = session_with_two_states();
        let edge = session
            .create_connection(&a, &b, "", ConnectionStyle::Straight, "#000")
            .unwrap();

        session.dispatch(down(200.0, 42.0));
        assert_eq!(session.selection(), Some(&ElementId::Connection(edge)));
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_click_empty_canvas_clears_selection() {
        let (mut session, _, _) = session_with_two_states();
        session.dispatch(down(10.0, 10.0));
        session.dispatch(up(10.0, 10.0));
        session.dispatch(down(600.0, 500.0));
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_create_state_prompt() {
        let (mut session, _, _) = session_with_two_states();
        session.set_tool(Tool::CreateState);

        let outcome = session.dispatch(down(500.0, 300.0));
        assert_eq!(outcome.effect, Some(Effect::PromptOpened));
        assert_eq!(
            session.prompt(),
            Some(&Prompt::CreateState {
                at: Point::new(500.0, 300.0)
            })
        );
        assert_eq!(session.scene().state_count(), 2);

        // Canvas input is ignored while the prompt is open
        session.dispatch(down(10.0, 10.0));
        assert_eq!(session.scene().state_count(), 2);

        let id = session.confirm_state_prompt("", "").unwrap().unwrap();
        let state = session.scene().get_state(&id).unwrap();
        assert_eq!(state.title, "New State");
        assert_eq!(state.position(), Point::new(500.0, 300.0));
        assert!(session.prompt().is_none());
    }

    #[test]
    fn test_connection_gesture() {
        let (mut session, a, b) = session_with_two_states();
        session.set_tool(Tool::CreateConnection);

        session.dispatch(down(60.0, 40.0));
        session.dispatch(mv(200.0, 40.0));
        assert_eq!(
            session.gesture(),
            &Gesture::EdgePending {
                anchor: a.clone(),
                floating: Point::new(200.0, 40.0)
            }
        );
        assert_eq!(session.scene().connection_count(), 0);

        let outcome = session.dispatch(up(350.0, 40.0));
        assert_eq!(outcome.effect, Some(Effect::PromptOpened));
        assert!(session.gesture().is_idle());
        assert_matches!(
            session.prompt(),
            Some(Prompt::CreateConnection { from, to, defaults })
                if *from == a && *to == b && defaults.style == ConnectionStyle::Straight
        );

        let id = session
            .confirm_connection_prompt("next", ConnectionStyle::Curved, "#123456")
            .unwrap()
            .unwrap();
        let connection = session.scene().get_connection(&id).unwrap();
        assert_eq!(connection.label, "next");
        assert_eq!(connection.style, ConnectionStyle::Curved);
    }

    #[test]
    fn test_connection_gesture_cancelled_on_miss_or_same_state() {
        let (mut session, _, _) = session_with_two_states();
        session.set_tool(Tool::CreateConnection);

        session.dispatch(down(60.0, 40.0));
        session.dispatch(up(70.0, 50.0));
        assert!(session.gesture().is_idle());
        assert!(session.prompt().is_none());

        session.dispatch(down(60.0, 40.0));
        session.dispatch(up(200.0, 300.0));
        assert!(session.gesture().is_idle());
        assert!(session.prompt().is_none());

        // Pressing on empty canvas starts nothing
        session.dispatch(down(200.0, 300.0));
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_escape_cancels_gesture() {
        let (mut session, _, _) = session_with_two_states();
        session.set_tool(Tool::CreateConnection);
        session.dispatch(down(60.0, 40.0));

        session.dispatch(InputEvent::Key(Key::Escape));
        assert!(session.gesture().is_idle());

        session.dispatch(up(350.0, 40.0));
        assert!(session.prompt().is_none());
    }

    #[test]
    fn test_tool_switch_cancels_gesture() {
        let (mut session, _, _) = session_with_two_states();
        session.set_tool(Tool::CreateConnection);
        session.dispatch(down(60.0, 40.0));

        session.dispatch(InputEvent::Key(Key::Char('V')));
        assert_eq!(session.tool(), Tool::Select);
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_delete_tool() {
        let (mut session, a, b) = session_with_two_states();
        session
            .create_connection(&a, &b, "", ConnectionStyle::Straight, "#000")
            .unwrap();
        session.set_tool(Tool::Delete);

        session.dispatch(down(10.0, 10.0));
        assert!(session.scene().get_state(&a).is_none());
        assert_eq!(session.scene().connection_count(), 0);
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_pan_gesture() {
        let (mut session, _, _) = session_with_two_states();
        session.set_tool(Tool::Pan);

        session.dispatch(down(10.0, 10.0));
        session.dispatch(mv(30.0, 5.0));
        session.dispatch(mv(40.0, 15.0));
        session.dispatch(up(40.0, 15.0));

        assert_eq!(session.view().pan, Point::new(30.0, 5.0));
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_wheel_zoom_any_tool() {
        let (mut session, _, _) = session_with_two_states();
        session.set_tool(Tool::Pan);
        session.dispatch(InputEvent::Wheel { delta_y: -1.0 });
        assert!((session.view().zoom - 1.1).abs() < 1e-6);
        session.dispatch(InputEvent::Wheel { delta_y: 1.0 });
        assert!((session.view().zoom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let (mut session, a, _) = session_with_two_states();
        for (c, tool) in [
            ('s', Tool::CreateState),
            ('C', Tool::CreateConnection),
            ('g', Tool::Pan),
            ('v', Tool::Select),
        ] {
            session.dispatch(InputEvent::Key(Key::Char(c)));
            assert_eq!(session.tool(), tool);
        }

        session.dispatch(down(10.0, 10.0));
        session.dispatch(up(10.0, 10.0));
        session.dispatch(InputEvent::Key(Key::Backspace));
        assert!(session.scene().get_state(&a).is_none());
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_context_menu_and_double_click() {
        let (mut session, a, b) = session_with_two_states();
        let edge = session
            .create_connection(&a, &b, "", ConnectionStyle::Straight, "#000")
            .unwrap();

        let outcome = session.dispatch(InputEvent::PointerDown {
            screen: Point::new(10.0, 10.0),
            button: PointerButton::Secondary,
        });
        assert_eq!(
            outcome.effect,
            Some(Effect::ShowContextMenu {
                screen: Point::new(10.0, 10.0)
            })
        );
        assert_eq!(session.selection(), Some(&ElementId::State(a)));
        assert!(session.gesture().is_idle());

        let outcome = session.dispatch(InputEvent::PointerDown {
            screen: Point::new(600.0, 500.0),
            button: PointerButton::Secondary,
        });
        assert_eq!(outcome.effect, None);

        let outcome = session.dispatch(InputEvent::DoubleClick {
            screen: Point::new(200.0, 40.0),
        });
        assert_eq!(
            outcome.effect,
            Some(Effect::EditConnectionLabel { id: edge.clone() })
        );
        assert_eq!(session.selection(), Some(&ElementId::Connection(edge)));
    }
}
