//! Frame building: turns the session into a backend-neutral display list.
//!
//! Rendering is a read-only pass. The same [`Frame`] is painted by the egui
//! canvas, written out as SVG and rasterized to PNG.

use crate::{
    Connection, ConnectionStyle, EditorConfig, ElementId, Gesture, Point, Rectangle, Rgba, Scene,
    Session, Size, State, ViewState,
};

pub const SELECTED_COLOR: Rgba = Rgba::rgb(0x63, 0x20, 0x20);
pub const STATE_BORDER_COLOR: Rgba = Rgba::rgb(0x25, 0x34, 0x47);
pub const TITLE_COLOR: Rgba = Rgba::rgb(0x25, 0x34, 0x47);
pub const DESCRIPTION_COLOR: Rgba = Rgba::rgb(0x61, 0x78, 0x91);
pub const LABEL_FILL: Rgba = Rgba::rgba(213, 184, 147, 230);
pub const CANVAS_BACKGROUND: Rgba = Rgba::rgb(0xf8, 0xf9, 0xfa);

const STATE_CORNER_RADIUS: f32 = 8.0;
const TITLE_SIZE: f32 = 12.0;
const DESCRIPTION_SIZE: f32 = 10.0;
const LABEL_SIZE: f32 = 10.0;
const LABEL_PADDING: f32 = 4.0;
/// Rough advance width per character, as a fraction of the font size
const CHAR_WIDTH: f32 = 0.6;
const PREVIEW_DASH: [f32; 2] = [5.0, 5.0];

/// Line style for strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    /// Dash and gap lengths; solid when `None`
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn new(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(mut self, dash: [f32; 2]) -> Self {
        self.dash = Some(dash);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// One primitive of the display list
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    QuadCurve {
        from: Point,
        control: Point,
        to: Point,
        stroke: Stroke,
    },
    Rect {
        rect: Rectangle,
        corner_radius: f32,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Rgba,
    },
    /// Text centered on `position`
    Text {
        position: Point,
        text: String,
        size: f32,
        color: Rgba,
        weight: FontWeight,
    },
}

/// Display list for one frame.
///
/// Layers are drawn in field order. All layers but `overlay` are in model
/// space and go through the view transform; `overlay` is in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Size,
    pub zoom: f32,
    pub pan: Point,
    pub background: Rgba,
    pub grid: Vec<DrawCommand>,
    pub connections: Vec<DrawCommand>,
    pub states: Vec<DrawCommand>,
    pub preview: Vec<DrawCommand>,
    pub overlay: Vec<DrawCommand>,
}

impl Frame {
    /// Model-space layers in paint order
    pub fn model_layers(&self) -> impl Iterator<Item = &DrawCommand> {
        self.grid
            .iter()
            .chain(&self.connections)
            .chain(&self.states)
            .chain(&self.preview)
    }

    pub fn to_screen(&self, model: Point) -> Point {
        crate::geometry::to_screen_space(model, self.pan, self.zoom)
    }
}

/// Build the frame for the current session state
pub fn render(session: &Session) -> Frame {
    render_parts(
        session.scene(),
        session.view(),
        session.viewport(),
        session.selection(),
        session.gesture(),
    )
}

/// Build a frame from explicit inputs
pub fn render_parts(
    scene: &Scene,
    view: &ViewState,
    viewport: Size,
    selection: Option<&ElementId>,
    gesture: &Gesture,
) -> Frame {
    let config = scene.config();
    let is_selected = |element: ElementId| selection == Some(&element);

    let connections = scene
        .connections()
        .iter()
        .filter_map(|connection| {
            let (from, to) = scene.connection_endpoints(connection)?;
            let selected = is_selected(ElementId::Connection(connection.id.clone()));
            Some(connection_commands(connection, from, to, selected, config))
        })
        .flatten()
        .collect();

    let states = scene
        .states()
        .iter()
        .flat_map(|state| {
            let selected = is_selected(ElementId::State(state.id.clone()));
            state_commands(state, selected, config)
        })
        .collect();

    let preview = match gesture {
        Gesture::EdgePending { anchor, floating } => scene
            .get_state(anchor)
            .map(|state| DrawCommand::Line {
                from: state.center(),
                to: *floating,
                stroke: Stroke::new(SELECTED_COLOR, 2.0).dashed(PREVIEW_DASH),
            })
            .into_iter()
            .collect(),
        _ => Vec::new(),
    };

    let overlay = if scene.is_empty() {
        welcome_overlay(viewport)
    } else {
        Vec::new()
    };

    Frame {
        viewport,
        zoom: view.zoom,
        pan: view.pan,
        background: CANVAS_BACKGROUND,
        grid: grid_commands(view, viewport, config),
        connections,
        states,
        preview,
        overlay,
    }
}

/// Grid lines covering the visible region, snapped outward to the grid
fn grid_commands(view: &ViewState, viewport: Size, config: &EditorConfig) -> Vec<DrawCommand> {
    let size = config.grid_size;
    let region = view.visible_region(viewport);
    let start_x = (region.min.x / size).floor() * size;
    let start_y = (region.min.y / size).floor() * size;
    let end_x = (region.max.x / size).ceil() * size;
    let end_y = (region.max.y / size).ceil() * size;

    let color =
        Rgba::parse_or(&config.grid_color, DESCRIPTION_COLOR).with_opacity(config.grid_alpha);
    let stroke = Stroke::new(color, 1.0);

    let columns = ((end_x - start_x) / size).round() as i64;
    let rows = ((end_y - start_y) / size).round() as i64;

    let vertical = (0..=columns).map(|i| {
        let x = start_x + i as f32 * size;
        DrawCommand::Line {
            from: Point::new(x, start_y),
            to: Point::new(x, end_y),
            stroke,
        }
    });
    let horizontal = (0..=rows).map(|i| {
        let y = start_y + i as f32 * size;
        DrawCommand::Line {
            from: Point::new(start_x, y),
            to: Point::new(end_x, y),
            stroke,
        }
    });
    vertical.chain(horizontal).collect()
}

fn connection_commands(
    connection: &Connection,
    from: Point,
    to: Point,
    selected: bool,
    config: &EditorConfig,
) -> Vec<DrawCommand> {
    let own_color = Rgba::parse_or(&connection.color, Rgba::BLACK);
    let stroke = if selected {
        Stroke::new(SELECTED_COLOR, 3.0)
    } else {
        Stroke::new(own_color, 2.0)
    };

    let mut commands = Vec::new();
    commands.push(match connection.style {
        ConnectionStyle::Straight => DrawCommand::Line { from, to, stroke },
        ConnectionStyle::Curved => DrawCommand::QuadCurve {
            from,
            control: curve_control_point(from, to, config.curve_bulge),
            to,
            stroke,
        },
    });

    // Angle follows the chord for both styles
    let [left, right] = arrowhead(from, to, config.arrow_length);
    commands.push(DrawCommand::Line {
        from: to,
        to: left,
        stroke,
    });
    commands.push(DrawCommand::Line {
        from: to,
        to: right,
        stroke,
    });

    if !connection.label.is_empty() {
        let mid = from.midpoint(to);
        let text_width = text_width(&connection.label, LABEL_SIZE);
        commands.push(DrawCommand::Rect {
            rect: Rectangle::new(
                mid.x - text_width / 2.0 - LABEL_PADDING,
                mid.y - 15.0 - LABEL_PADDING,
                text_width + LABEL_PADDING * 2.0,
                20.0 + LABEL_PADDING * 2.0,
            ),
            corner_radius: 0.0,
            fill: Some(LABEL_FILL),
            stroke: Some(Stroke::new(own_color, 1.0)),
        });
        commands.push(DrawCommand::Text {
            position: Point::new(mid.x, mid.y - 5.0),
            text: connection.label.clone(),
            size: LABEL_SIZE,
            color: TITLE_COLOR,
            weight: FontWeight::Normal,
        });
    }

    commands
}

fn state_commands(state: &State, selected: bool, config: &EditorConfig) -> Vec<DrawCommand> {
    let border = if selected {
        Stroke::new(SELECTED_COLOR, 3.0)
    } else {
        Stroke::new(STATE_BORDER_COLOR, 2.0)
    };
    let center = state.center();

    let mut commands = vec![
        DrawCommand::Rect {
            rect: state.bounds(),
            corner_radius: STATE_CORNER_RADIUS,
            fill: Some(Rgba::parse_or(&state.color, Rgba::WHITE)),
            stroke: Some(border),
        },
        DrawCommand::Text {
            position: Point::new(center.x, center.y - 10.0),
            text: state.title.clone(),
            size: TITLE_SIZE,
            color: TITLE_COLOR,
            weight: FontWeight::Normal,
        },
    ];

    if !state.description.is_empty() {
        commands.push(DrawCommand::Text {
            position: Point::new(center.x, center.y + 10.0),
            text: state.truncated_description(config.description_max_chars),
            size: DESCRIPTION_SIZE,
            color: DESCRIPTION_COLOR,
            weight: FontWeight::Normal,
        });
    }

    commands
}

fn welcome_overlay(viewport: Size) -> Vec<DrawCommand> {
    let c = viewport.center();
    let body = Rgba::rgb(0x6c, 0x75, 0x7d);
    let line = |dy: f32, text: &str, size: f32, color: Rgba, weight: FontWeight| DrawCommand::Text {
        position: Point::new(c.x, c.y + dy),
        text: text.to_string(),
        size,
        color,
        weight,
    };

    vec![
        DrawCommand::Circle {
            center: Point::new(c.x, c.y - 30.0),
            radius: 80.0,
            fill: Rgba::rgb(213, 184, 147).with_opacity(0.1),
        },
        line(-50.0, "Welcome to the flowchart editor!", 28.0, body, FontWeight::Bold),
        line(
            -10.0,
            "Create your first flowchart",
            16.0,
            Rgba::rgb(0xad, 0xb5, 0xbd),
            FontWeight::Normal,
        ),
        line(20.0, "1. Pick the state tool (S)", 14.0, body, FontWeight::Normal),
        line(40.0, "2. Click anywhere on the canvas", 14.0, body, FontWeight::Normal),
        line(
            60.0,
            "3. Connect states with the connection tool (C)",
            14.0,
            body,
            FontWeight::Normal,
        ),
        line(80.0, "4. Use the pan tool (G) to move around", 14.0, body, FontWeight::Normal),
    ]
}

/// Quadratic control point for curved connections: chord midpoint pushed
/// down by `bulge`
pub fn curve_control_point(from: Point, to: Point, bulge: f32) -> Point {
    let mid = from.midpoint(to);
    Point::new(mid.x, mid.y + bulge)
}

/// The two barb end points of an arrowhead at `to`, 30 degrees either side
/// of the line direction
pub fn arrowhead(from: Point, to: Point, length: f32) -> [Point; 2] {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let spread = std::f32::consts::FRAC_PI_6;
    let barb = |a: f32| Point::new(to.x - length * a.cos(), to.y - length * a.sin());
    [barb(angle - spread), barb(angle + spread)]
}

/// Estimated rendered width of `text`
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH
}
