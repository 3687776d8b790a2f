use crate::hit_test;
use crate::validation::{ValidationSeverity, Validator};
use crate::{
    ConnectionPatch, ConnectionStyle, ContextAction, EditorConfig, EditorResult, Effect, ElementId,
    Frame, Gesture, Point, ProjectDocument, Prompt, Scene, Size, StatePatch, Tool, ViewState,
};
use tracing::{debug, info, warn};

/// One editing session: the scene plus everything transient around it.
///
/// All mutation goes through here (or through [`Session::dispatch`]), so
/// selection, gesture and prompt never point at elements that are gone.
#[derive(Debug, Clone)]
pub struct Session {
    scene: Scene,

    view: ViewState,

    /// Canvas size in screen pixels
    viewport: Size,

    tool: Tool,

    /// At most one selected element
    selection: Option<ElementId>,

    gesture: Gesture,

    /// Confirmation step waiting on the UI
    prompt: Option<Prompt>,
}

impl Session {
    pub fn new(config: EditorConfig, viewport: Size) -> Self {
        Self::with_scene(Scene::with_config(config), viewport)
    }

    pub fn with_scene(scene: Scene, viewport: Size) -> Self {
        let view = ViewState::new(scene.config());
        Self {
            scene,
            view,
            viewport,
            tool: Tool::default(),
            selection: None,
            gesture: Gesture::Idle,
            prompt: None,
        }
    }

    // ========== Accessors ==========

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        self.scene.config()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub(crate) fn set_gesture(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    pub(crate) fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }

    pub(crate) fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
    }

    // ========== Tool, Selection, Gesture ==========

    /// Switch tools, discarding any in-flight gesture and open prompt
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            debug!(?tool, "tool changed");
        }
        self.tool = tool;
        self.cancel_gesture();
        self.cancel_prompt();
    }

    /// Select an element, or clear the selection with `None`.
    /// Elements that do not exist are not selected.
    pub fn select(&mut self, element: Option<ElementId>) {
        self.selection = element.filter(|e| self.scene.contains_element(e));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn cancel_gesture(&mut self) {
        if !self.gesture.is_idle() {
            debug!(gesture = ?self.gesture, "gesture cancelled");
        }
        self.gesture = Gesture::Idle;
    }

    // ========== Prompts ==========

    /// Discard the open prompt, if any
    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Confirm a state-creation prompt. An empty title falls back to the
    /// configured default. Returns `None` when no such prompt is open.
    pub fn confirm_state_prompt(
        &mut self,
        title: &str,
        description: &str,
    ) -> EditorResult<Option<String>> {
        match self.prompt.take() {
            Some(Prompt::CreateState { at }) => {
                let title = match title.trim() {
                    "" => self.config().default_state_title.clone(),
                    title => title.to_string(),
                };
                let id = self.scene.create_state(at, title, description.trim());
                Ok(Some(id))
            }
            other => {
                self.prompt = other;
                Ok(None)
            }
        }
    }

    /// Confirm a connection-creation prompt. Fails with `InvalidReference`
    /// if an endpoint was deleted while the prompt was open; the prompt is
    /// closed either way.
    pub fn confirm_connection_prompt(
        &mut self,
        label: &str,
        style: ConnectionStyle,
        color: &str,
    ) -> EditorResult<Option<String>> {
        match self.prompt.take() {
            Some(Prompt::CreateConnection { from, to, .. }) => self
                .scene
                .create_connection(&from, &to, label.trim(), style, color)
                .map(Some),
            other => {
                self.prompt = other;
                Ok(None)
            }
        }
    }

    // ========== Scene Operations ==========

    pub fn create_state(&mut self, position: Point, title: &str, description: &str) -> String {
        self.scene.create_state(position, title, description)
    }

    pub fn update_state(&mut self, id: &str, patch: StatePatch) -> EditorResult<()> {
        self.scene.update_state(id, patch)
    }

    pub fn create_connection(
        &mut self,
        from: &str,
        to: &str,
        label: &str,
        style: ConnectionStyle,
        color: &str,
    ) -> EditorResult<String> {
        self.scene.create_connection(from, to, label, style, color)
    }

    pub fn update_connection(&mut self, id: &str, patch: ConnectionPatch) -> EditorResult<()> {
        self.scene.update_connection(id, patch)
    }

    /// Delete an element (states cascade) and drop anything transient that
    /// referred to it
    pub fn delete_element(&mut self, element: &ElementId) -> EditorResult<()> {
        self.scene.delete_element(element)?;
        self.drop_stale_references();
        Ok(())
    }

    /// Delete the selected element. No-op without a selection.
    pub fn delete_selected(&mut self) -> EditorResult<()> {
        match self.selection.take() {
            Some(element) => self.delete_element(&element),
            None => Ok(()),
        }
    }

    /// Duplicate the selected state and select the copy. No-op for a
    /// selected connection or no selection.
    pub fn duplicate_selected(&mut self) -> EditorResult<Option<String>> {
        let Some(ElementId::State(id)) = &self.selection else {
            return Ok(None);
        };
        let copy = self.scene.duplicate_state(id)?;
        self.selection = Some(ElementId::State(copy.clone()));
        Ok(Some(copy))
    }

    /// Run a context-menu action on the current selection
    pub fn apply_context_action(&mut self, action: ContextAction) -> EditorResult<Option<Effect>> {
        match action {
            ContextAction::Edit => Ok(self.selection.clone().map(Effect::EditProperties)),
            ContextAction::Delete => self.delete_selected().map(|_| None),
            ContextAction::Duplicate => self.duplicate_selected().map(|_| None),
        }
    }

    fn drop_stale_references(&mut self) {
        if let Some(selected) = &self.selection {
            if !self.scene.contains_element(selected) {
                self.selection = None;
            }
        }

        let gesture_target = match &self.gesture {
            Gesture::EdgePending { anchor, .. } => Some(anchor),
            Gesture::Dragging { state, .. } => Some(state),
            _ => None,
        };
        if gesture_target.is_some_and(|id| !self.scene.contains_state(id)) {
            self.cancel_gesture();
        }
    }

    /// Display list for the current state. Never mutates the session.
    pub fn render(&self) -> Frame {
        crate::render::render(self)
    }

    /// Element under a screen position
    pub fn hit_test(&self, screen: Point) -> Option<ElementId> {
        hit_test::hit_test(&self.scene, self.view.to_model(screen))
    }

    // ========== View ==========

    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        let step = self.config().button_zoom_step;
        self.view.scale_zoom(step);
    }

    pub fn zoom_out(&mut self) {
        let step = self.config().button_zoom_step;
        self.view.scale_zoom(1.0 / step);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Translate the view by a screen-space delta
    pub fn pan(&mut self, delta: Point) {
        self.view.pan_by(delta);
    }

    /// Zoom and center the view on all states. Leaves the view untouched
    /// and returns `EmptyScene` when there are none.
    pub fn fit_to_view(&mut self) -> EditorResult<()> {
        let bounds = self.scene.bounding_box()?;
        let padding = self.config().fit_padding;
        self.view.fit_to_view(bounds, self.viewport, padding);
        debug!(zoom = self.view.zoom, "view fitted");
        Ok(())
    }

    // ========== Persistence ==========

    pub fn serialize_scene(&self) -> ProjectDocument {
        self.scene.to_document()
    }

    /// Replace the scene with a document. On failure the session is
    /// unchanged. Selection, gesture and prompt are cleared on success;
    /// the view is kept.
    pub fn load_scene(&mut self, document: ProjectDocument) -> EditorResult<()> {
        if let Err(e) = self.scene.load(document) {
            warn!(error = %e, "rejected project document");
            return Err(e);
        }
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.prompt = None;

        info!(
            states = self.scene.state_count(),
            connections = self.scene.connection_count(),
            "scene loaded"
        );
        let report = Validator::validate(&self.scene);
        for issue in &report.issues {
            if issue.severity != ValidationSeverity::Info {
                warn!(severity = ?issue.severity, "{}", issue.message);
            }
        }
        Ok(())
    }

    /// Parse and load a JSON project document
    pub fn load_scene_json(&mut self, text: &str) -> EditorResult<()> {
        let document = ProjectDocument::from_json(text)?;
        self.load_scene(document)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Size::new(1280.0, 800.0))
    }
}
