use crate::export::{self, MARKDOWN_FILE, PNG_FILE, SVG_FILE};
use crate::render::FontWeight;
use crate::{
    ConnectionPatch, ConnectionStyle, ContextAction, DrawCommand, EditorConfig, Effect, ElementId,
    Frame, InputEvent, Key, Outcome, Point, PointerButton, ProjectFile, Prompt, Rgba, Session,
    Size, StatePatch, Tool, ValidationSeverity, Validator,
};
use anyhow::Result;
use egui::{
    epaint::QuadraticBezierShape, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Vec2,
};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Main application state
pub struct FlowchartApp {
    /// Scene, view and interaction state
    session: Session,

    /// Where File > Save writes and File > Load reads
    project_path: PathBuf,

    /// UI state
    ui_state: UiState,

    /// Status message
    status_message: String,
}

#[derive(Default)]
struct UiState {
    /// Buffers for the open prompt
    state_form: StateForm,
    connection_form: ConnectionForm,

    /// The open context menu, if any
    context_menu: Option<ContextMenu>,

    /// Whether the properties panel is visible
    show_properties: bool,

    /// Focus the connection label field on the next frame
    focus_label: bool,

    /// Focus the first field of a freshly opened prompt
    focus_prompt: bool,

    /// Whether validation panel is visible
    show_validation_panel: bool,

    /// Editable copy of `project_path` shown in the File menu
    path_input: String,
}

struct ContextMenu {
    /// Screen position of the top-left corner
    pos: Pos2,
    /// Frame the menu opened on; the press that opened it must not close it
    opened_frame: u64,
}

#[derive(Default)]
struct StateForm {
    title: String,
    description: String,
}

#[derive(Default)]
struct ConnectionForm {
    label: String,
    style: ConnectionStyle,
    color: String,
}

impl Default for FlowchartApp {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FlowchartApp {
    pub fn new(config: EditorConfig) -> Self {
        let project_path = PathBuf::from(crate::document::DEFAULT_PROJECT_FILE);
        Self {
            session: Session::new(config, Size::new(1280.0, 800.0)),
            ui_state: UiState {
                path_input: project_path.display().to_string(),
                ..Default::default()
            },
            project_path,
            status_message: "Ready".to_string(),
        }
    }

    /// Create app from a project file
    pub fn from_project(path: &Path, config: EditorConfig) -> Result<Self> {
        let document = ProjectFile::new(path).load()?;

        let mut app = Self::new(config);
        app.session.load_scene(document)?;
        app.project_path = path.to_path_buf();
        app.ui_state.path_input = path.display().to_string();
        app.status_message = format!("Loaded project from {}", path.display());
        Ok(app)
    }

    /// Save current project
    fn save_project(&mut self) {
        self.project_path = PathBuf::from(self.ui_state.path_input.trim());
        let project = ProjectFile::new(&self.project_path);
        self.status_message = match project.save(&self.session.serialize_scene()) {
            Ok(()) => format!("✓ Project saved to {}", self.project_path.display()),
            Err(e) => format!("❌ Save failed: {e:#}"),
        };
    }

    /// Replace the scene with the project at the path in the File menu
    fn load_project(&mut self) {
        let path = PathBuf::from(self.ui_state.path_input.trim());
        let loaded = ProjectFile::new(&path)
            .load()
            .and_then(|document| Ok(self.session.load_scene(document)?));

        self.status_message = match loaded {
            Ok(()) => {
                self.project_path = path;
                self.ui_state.context_menu = None;
                format!("Loaded project from {}", self.project_path.display())
            }
            Err(e) => format!("❌ Error loading project file: {e:#}"),
        };
    }

    /// Directory exports are written to
    fn export_dir(&self) -> PathBuf {
        self.project_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn export_markdown(&mut self) {
        let path = self.export_dir().join(MARKDOWN_FILE);
        self.status_message = match export::export_markdown(self.session.scene(), &path) {
            Ok(()) => format!("✓ Exported {}", path.display()),
            Err(e) => format!("❌ Export failed: {e:#}"),
        };
    }

    fn export_image(&mut self, png: bool) {
        let frame = self.session.render();
        let (path, result) = if png {
            let path = self.export_dir().join(PNG_FILE);
            let result = export::export_png(&frame, 1.0, &path);
            (path, result)
        } else {
            let path = self.export_dir().join(SVG_FILE);
            let result = export::export_svg(&frame, &path);
            (path, result)
        };
        self.status_message = match result {
            Ok(()) => format!("✓ Exported {}", path.display()),
            Err(e) => format!("❌ Export failed: {e:#}"),
        };
    }

    /// Copy text to clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<(), String> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new().map_err(|e| format!("{}", e))?;
        clipboard.set_text(text).map_err(|e| format!("{}", e))?;
        Ok(())
    }

    fn fit_to_view(&mut self) {
        if self.session.fit_to_view().is_err() {
            self.status_message = "Nothing to fit: the canvas is empty".to_string();
        }
    }

    /// Render the entire UI
    fn render_ui(&mut self, ctx: &egui::Context) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Project:");
                        ui.text_edit_singleline(&mut self.ui_state.path_input);
                    });
                    if ui.button("Save").clicked() {
                        self.save_project();
                        ui.close_menu();
                    }
                    if ui.button("Load").clicked() {
                        self.load_project();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export Markdown").clicked() {
                        self.export_markdown();
                        ui.close_menu();
                    }
                    if ui.button("Copy Markdown").clicked() {
                        let markdown = export::to_markdown(self.session.scene());
                        self.status_message = match self.copy_to_clipboard(&markdown) {
                            Ok(()) => "✓ Markdown copied to clipboard".to_string(),
                            Err(e) => format!("❌ Clipboard error: {}", e),
                        };
                        ui.close_menu();
                    }
                    if ui.button("Export PNG").clicked() {
                        self.export_image(true);
                        ui.close_menu();
                    }
                    if ui.button("Export SVG").clicked() {
                        self.export_image(false);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.ui_state.show_properties, "Show Properties");
                    ui.checkbox(&mut self.ui_state.show_validation_panel, "Show Validation Panel");
                    if ui.button("Fit to Screen").clicked() {
                        self.fit_to_view();
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.session.reset_view();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    ui.label("V: select, S: add state, C: connect, G: pan");
                    ui.label("Delete / Backspace removes the selection");
                    ui.label("Escape cancels the current action");
                    ui.label("Scroll to zoom, double-click a connection to edit its label");
                    ui.label("Right-click an element for more actions");
                });
            });
        });

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tool in Tool::ALL {
                    let text = match tool.shortcut() {
                        Some(key) => format!("{} ({})", tool.label(), key.to_ascii_uppercase()),
                        None => tool.label().to_string(),
                    };
                    if ui
                        .selectable_label(self.session.tool() == tool, text)
                        .clicked()
                    {
                        self.session.set_tool(tool);
                    }
                }

                ui.separator();

                if ui.button("➕").on_hover_text("Zoom in").clicked() {
                    self.session.zoom_in();
                }
                if ui.button("➖").on_hover_text("Zoom out").clicked() {
                    self.session.zoom_out();
                }
                if ui.button("⛶").on_hover_text("Fit to screen").clicked() {
                    self.fit_to_view();
                }

                ui.separator();

                // Stats
                let scene = self.session.scene();
                ui.label(format!("States: {}", scene.state_count()));
                ui.label(format!("Connections: {}", scene.connection_count()));
                ui.label(format!("Zoom: {:.0}%", self.session.view().zoom * 100.0));
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
            });
        });

        if self.ui_state.show_validation_panel {
            egui::TopBottomPanel::bottom("validation_panel")
                .default_height(160.0)
                .show(ctx, |ui| {
                    self.render_validation_panel(ui);
                });
        }

        if self.ui_state.show_properties && self.session.selection().is_some() {
            egui::SidePanel::right("properties_panel")
                .default_width(280.0)
                .show(ctx, |ui| {
                    self.render_properties_panel(ui);
                });
        }

        // Central panel (canvas)
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.render_canvas(ui);
            });

        self.render_prompt(ctx);
        self.render_context_menu(ctx);
    }

    /// Render the properties panel for the selected element
    fn render_properties_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Properties");
            if ui.small_button("✖").clicked() {
                self.ui_state.show_properties = false;
            }
        });
        ui.separator();

        match self.session.selection().cloned() {
            Some(ElementId::State(id)) => {
                let Some(state) = self.session.scene().get_state(&id) else {
                    return;
                };
                let (mut title, mut description, mut color) =
                    (state.title.clone(), state.description.clone(), state.color.clone());

                ui.label(format!("State: {}", id));
                let mut patch = StatePatch::default();
                ui.label("Title");
                if ui.text_edit_singleline(&mut title).changed() {
                    patch = patch.title(title);
                }
                ui.label("Description");
                if ui.text_edit_multiline(&mut description).changed() {
                    patch = patch.description(description);
                }
                ui.label("Color");
                if color_picker(ui, &mut color) {
                    patch = patch.color(color);
                }

                if !patch.is_empty() {
                    if let Err(e) = self.session.update_state(&id, patch) {
                        self.status_message = format!("❌ {}", e);
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Duplicate").clicked() {
                        self.run_context_action(ContextAction::Duplicate);
                    }
                    if ui.button("Delete").clicked() {
                        self.run_context_action(ContextAction::Delete);
                    }
                });
            }
            Some(ElementId::Connection(id)) => {
                let Some(connection) = self.session.scene().get_connection(&id) else {
                    return;
                };
                let (mut label, mut style, mut color) = (
                    connection.label.clone(),
                    connection.style,
                    connection.color.clone(),
                );

                ui.label(format!("Connection: {}", id));
                let mut patch = ConnectionPatch::default();
                ui.label("Label");
                let response = ui.text_edit_singleline(&mut label);
                if std::mem::take(&mut self.ui_state.focus_label) {
                    response.request_focus();
                }
                if response.changed() {
                    patch = patch.label(label);
                }
                if style_picker(ui, &mut style) {
                    patch = patch.style(style);
                }
                ui.label("Color");
                if color_picker(ui, &mut color) {
                    patch = patch.color(color);
                }

                if !patch.is_empty() {
                    if let Err(e) = self.session.update_connection(&id, patch) {
                        self.status_message = format!("❌ {}", e);
                    }
                }

                ui.separator();
                if ui.button("Delete").clicked() {
                    self.run_context_action(ContextAction::Delete);
                }
            }
            None => {
                ui.label("Nothing selected");
            }
        }
    }

    fn render_validation_panel(&mut self, ui: &mut egui::Ui) {
        let result = Validator::validate(self.session.scene());
        ui.heading("Validation");
        if result.issues.is_empty() {
            ui.label("✓ No issues");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for issue in &result.issues {
                let (icon, color) = match issue.severity {
                    ValidationSeverity::Error => ("❌", Color32::from_rgb(220, 50, 50)),
                    ValidationSeverity::Warning => ("⚠", Color32::from_rgb(230, 160, 0)),
                    ValidationSeverity::Info => ("ℹ", Color32::from_rgb(60, 120, 220)),
                };
                let clicked = ui
                    .horizontal(|ui| {
                        ui.colored_label(color, icon);
                        ui.link(issue.message.as_str()).clicked()
                    })
                    .inner;
                if clicked {
                    self.session.select(issue.affected.first().cloned());
                }
            }
        });
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;
        let origin = canvas_rect.left_top();
        self.session
            .set_viewport(Size::new(canvas_rect.width(), canvas_rect.height()));

        let frame_nr = ui.ctx().cumulative_pass_nr();
        for event in self.collect_input(ui, &response, origin) {
            let outcome = self.session.dispatch(event);
            self.handle_outcome(outcome, origin, frame_nr);
        }

        let frame = self.session.render();
        paint_frame(&painter, &frame, origin);
    }

    /// Translate this frame's egui input into editor input events
    fn collect_input(
        &self,
        ui: &egui::Ui,
        response: &egui::Response,
        origin: Pos2,
    ) -> Vec<InputEvent> {
        let to_local = |p: Pos2| Point::new(p.x - origin.x, p.y - origin.y);
        let mut events = Vec::new();
        let menu_open = self.ui_state.context_menu.is_some();

        ui.input(|i| {
            let pointer = i.pointer.latest_pos().map(to_local);

            if response.hovered() && !menu_open {
                if let Some(screen) = pointer {
                    if i.pointer.primary_pressed() {
                        events.push(InputEvent::PointerDown {
                            screen,
                            button: PointerButton::Primary,
                        });
                    }
                    if i.pointer.secondary_pressed() {
                        events.push(InputEvent::PointerDown {
                            screen,
                            button: PointerButton::Secondary,
                        });
                    }
                }
                if i.raw_scroll_delta.y != 0.0 {
                    events.push(InputEvent::Wheel {
                        delta_y: -i.raw_scroll_delta.y,
                    });
                }
            }

            if let Some(screen) = pointer {
                if i.pointer.is_moving() {
                    events.push(InputEvent::PointerMove { screen });
                }
                if i.pointer.primary_released() {
                    events.push(InputEvent::PointerUp {
                        screen,
                        button: PointerButton::Primary,
                    });
                }
            }

            if i.key_pressed(egui::Key::Escape) {
                events.push(InputEvent::Key(Key::Escape));
            }
        });

        if response.double_clicked() {
            if let Some(p) = response.interact_pointer_pos() {
                events.push(InputEvent::DoubleClick {
                    screen: to_local(p),
                });
            }
        }

        if !ui.ctx().wants_keyboard_input() {
            let keys = [
                (egui::Key::V, Key::Char('v')),
                (egui::Key::S, Key::Char('s')),
                (egui::Key::C, Key::Char('c')),
                (egui::Key::G, Key::Char('g')),
                (egui::Key::Delete, Key::Delete),
                (egui::Key::Backspace, Key::Backspace),
            ];
            ui.input(|i| {
                for (egui_key, key) in keys {
                    if i.key_pressed(egui_key) {
                        events.push(InputEvent::Key(key));
                    }
                }
            });
        }

        events
    }

    fn handle_outcome(&mut self, outcome: Outcome, origin: Pos2, frame_nr: u64) {
        match outcome.effect {
            Some(Effect::PromptOpened) => self.reset_prompt_forms(),
            Some(Effect::EditConnectionLabel { .. }) => {
                self.ui_state.show_properties = true;
                self.ui_state.focus_label = true;
            }
            Some(Effect::EditProperties(_)) => {
                self.ui_state.show_properties = true;
            }
            Some(Effect::ShowContextMenu { screen }) => {
                self.ui_state.context_menu = Some(ContextMenu {
                    pos: origin + vec2(screen.x, screen.y),
                    opened_frame: frame_nr,
                });
            }
            None => {}
        }
    }

    fn reset_prompt_forms(&mut self) {
        self.ui_state.focus_prompt = true;
        match self.session.prompt() {
            Some(Prompt::CreateState { .. }) => {
                self.ui_state.state_form = StateForm::default();
            }
            Some(Prompt::CreateConnection { defaults, .. }) => {
                self.ui_state.connection_form = ConnectionForm {
                    label: String::new(),
                    style: defaults.style,
                    color: defaults.color.clone(),
                };
            }
            None => {}
        }
    }

    /// Modal window for the open prompt
    fn render_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.session.prompt().cloned() else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        let title = match prompt {
            Prompt::CreateState { .. } => "Add New State",
            Prompt::CreateConnection { .. } => "Add Connection",
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                match &prompt {
                    Prompt::CreateState { .. } => {
                        let form = &mut self.ui_state.state_form;
                        ui.label("Title");
                        let title = ui.text_edit_singleline(&mut form.title);
                        if std::mem::take(&mut self.ui_state.focus_prompt) {
                            title.request_focus();
                        }
                        if title.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            confirmed = true;
                        }
                        ui.label("Description");
                        ui.text_edit_multiline(&mut form.description);
                    }
                    Prompt::CreateConnection { from, to, .. } => {
                        let scene = self.session.scene();
                        let name = |id: &str| {
                            scene
                                .get_state(id)
                                .map(|s| s.title.clone())
                                .unwrap_or_else(|| id.to_string())
                        };
                        ui.label(format!("{} → {}", name(from), name(to)));

                        let form = &mut self.ui_state.connection_form;
                        ui.label("Label");
                        let label = ui.text_edit_singleline(&mut form.label);
                        if std::mem::take(&mut self.ui_state.focus_prompt) {
                            label.request_focus();
                        }
                        if label.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            confirmed = true;
                        }
                        style_picker(ui, &mut form.style);
                        ui.label("Color");
                        color_picker(ui, &mut form.color);
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Create").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancelled = true;
        }

        if cancelled {
            self.session.cancel_prompt();
        } else if confirmed {
            let result = match prompt {
                Prompt::CreateState { .. } => {
                    let form = &self.ui_state.state_form;
                    self.session
                        .confirm_state_prompt(&form.title, &form.description)
                }
                Prompt::CreateConnection { .. } => {
                    let form = &self.ui_state.connection_form;
                    self.session
                        .confirm_connection_prompt(&form.label, form.style, &form.color)
                }
            };
            match result {
                Ok(Some(id)) => self.status_message = format!("✓ Created {}", id),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "creation rejected");
                    self.status_message = format!("❌ {}", e);
                }
            }
        }
    }

    fn render_context_menu(&mut self, ctx: &egui::Context) {
        let Some(ContextMenu { pos, opened_frame }) = self.ui_state.context_menu else {
            return;
        };

        let mut chosen = None;
        let area = egui::Area::new(egui::Id::new("context_menu"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if ui.button("Edit").clicked() {
                        chosen = Some(ContextAction::Edit);
                    }
                    if ui.button("Duplicate").clicked() {
                        chosen = Some(ContextAction::Duplicate);
                    }
                    if ui.button("Delete").clicked() {
                        chosen = Some(ContextAction::Delete);
                    }
                });
            });

        if let Some(action) = chosen {
            self.ui_state.context_menu = None;
            self.run_context_action(action);
        } else if ctx.cumulative_pass_nr() > opened_frame
            && ctx.input(|i| i.pointer.any_pressed())
            && !area.response.contains_pointer()
        {
            self.ui_state.context_menu = None;
        }
    }

    fn run_context_action(&mut self, action: ContextAction) {
        match self.session.apply_context_action(action) {
            Ok(Some(Effect::EditProperties(_))) => self.ui_state.show_properties = true,
            Ok(_) => {}
            Err(e) => self.status_message = format!("❌ {}", e),
        }
    }
}

/// Hex color field with a picker next to it. Returns whether it changed.
fn color_picker(ui: &mut egui::Ui, color: &mut String) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        let mut rgba = to_color32(Rgba::parse_or(color, Rgba::WHITE));
        if ui.color_edit_button_srgba(&mut rgba).changed() {
            *color = Rgba::rgb(rgba.r(), rgba.g(), rgba.b()).to_hex();
            changed = true;
        }
        let response = ui.text_edit_singleline(color);
        changed |= response.changed() && Rgba::parse_hex(color).is_some();
    });
    changed
}

/// Straight/curved selector. Returns whether it changed.
fn style_picker(ui: &mut egui::Ui, style: &mut ConnectionStyle) -> bool {
    let before = *style;
    egui::ComboBox::from_label("Style")
        .selected_text(style.to_string())
        .show_ui(ui, |ui| {
            ui.selectable_value(style, ConnectionStyle::Straight, "straight");
            ui.selectable_value(style, ConnectionStyle::Curved, "curved");
        });
    *style != before
}

fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn to_stroke(stroke: &crate::Stroke, scale: f32) -> egui::Stroke {
    egui::Stroke::new(stroke.width * scale, to_color32(stroke.color))
}

/// Paint a frame into the canvas whose top-left corner is `origin`
fn paint_frame(painter: &egui::Painter, frame: &Frame, origin: Pos2) {
    painter.rect_filled(painter.clip_rect(), 0.0, to_color32(frame.background));

    let model = |p: Point| {
        let s = frame.to_screen(p);
        pos2(origin.x + s.x, origin.y + s.y)
    };
    for command in frame.model_layers() {
        paint_command(painter, command, &model, frame.zoom);
    }

    let screen = |p: Point| pos2(origin.x + p.x, origin.y + p.y);
    for command in &frame.overlay {
        paint_command(painter, command, &screen, 1.0);
    }
}

fn paint_command(
    painter: &egui::Painter,
    command: &DrawCommand,
    to_pos: &dyn Fn(Point) -> Pos2,
    scale: f32,
) {
    match command {
        DrawCommand::Line { from, to, stroke } => {
            let points = [to_pos(*from), to_pos(*to)];
            match stroke.dash {
                Some([dash, gap]) => {
                    painter.extend(egui::Shape::dashed_line(
                        &points,
                        to_stroke(stroke, scale),
                        dash * scale,
                        gap * scale,
                    ));
                }
                None => {
                    painter.line_segment(points, to_stroke(stroke, scale));
                }
            }
        }
        DrawCommand::QuadCurve {
            from,
            control,
            to,
            stroke,
        } => {
            painter.add(QuadraticBezierShape::from_points_stroke(
                [to_pos(*from), to_pos(*control), to_pos(*to)],
                false,
                Color32::TRANSPARENT,
                to_stroke(stroke, scale),
            ));
        }
        DrawCommand::Rect {
            rect,
            corner_radius,
            fill,
            stroke,
        } => {
            let screen_rect = Rect::from_two_pos(
                to_pos(rect.origin()),
                to_pos(Point::new(rect.right(), rect.bottom())),
            );
            painter.rect(
                screen_rect,
                corner_radius * scale,
                fill.map(to_color32).unwrap_or(Color32::TRANSPARENT),
                stroke
                    .as_ref()
                    .map(|s| to_stroke(s, scale))
                    .unwrap_or(egui::Stroke::NONE),
            );
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
        } => {
            painter.circle_filled(to_pos(*center), radius * scale, to_color32(*fill));
        }
        DrawCommand::Text {
            position,
            text,
            size,
            color,
            weight,
        } => {
            let font = match weight {
                FontWeight::Bold => FontId::proportional(size * scale * 1.05),
                FontWeight::Normal => FontId::proportional(size * scale),
            };
            painter.text(
                to_pos(*position),
                Align2::CENTER_CENTER,
                text,
                font,
                to_color32(*color),
            );
        }
    }
}

impl eframe::App for FlowchartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_ui(ctx);
    }
}
