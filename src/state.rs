use crate::{Point, Rectangle};
use serde::{Deserialize, Serialize};

/// A state in the flowchart: a titled rectangle placed on the canvas.
///
/// Field names match the project document's `states` records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct State {
    /// Unique identifier of the form `state-<n>`
    pub id: String,

    pub title: String,

    /// Free text shown (truncated) under the title
    #[serde(default)]
    pub description: String,

    /// Top-left corner in model space
    pub x: f32,
    pub y: f32,

    /// Fixed at creation
    pub width: f32,
    pub height: f32,

    /// Fill color as a CSS hex string
    pub color: String,
}

impl State {
    /// Create a new state with the given parameters
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        bounds: Rectangle,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            color: color.into(),
        }
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center point, used as the anchor for connections
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Apply a partial property update
    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }

    /// Description cut to `max_chars` characters, with "..." when cut
    pub fn truncated_description(&self, max_chars: usize) -> String {
        if self.description.chars().count() > max_chars {
            let head: String = self.description.chars().take(max_chars).collect();
            format!("{head}...")
        } else {
            self.description.clone()
        }
    }
}

/// Partial update of a state's editable properties.
/// `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl StatePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> State {
        State::new(
            "state-1",
            "Start",
            "Entry point",
            Rectangle::new(10.0, 20.0, 120.0, 80.0),
            "#ffffff",
        )
    }

    #[test]
    fn test_state_creation() {
        let state = sample();

        assert_eq!(state.id, "state-1");
        assert_eq!(state.bounds(), Rectangle::new(10.0, 20.0, 120.0, 80.0));
        assert_eq!(state.center(), Point::new(70.0, 60.0));
    }

    #[test]
    fn test_partial_update() {
        let mut state = sample();

        state.apply(StatePatch::default().color("#ff0000"));
        assert_eq!(state.title, "Start");
        assert_eq!(state.description, "Entry point");
        assert_eq!(state.color, "#ff0000");

        state.apply(StatePatch::default().title("Begin").description(""));
        assert_eq!(state.title, "Begin");
        assert_eq!(state.description, "");
        assert_eq!(state.color, "#ff0000");
    }

    #[test]
    fn test_truncated_description() {
        let mut state = sample();
        assert_eq!(state.truncated_description(20), "Entry point");

        state.description = "A rather long description of the state".to_string();
        assert_eq!(state.truncated_description(20), "A rather long descri...");

        state.description = "ünïcödé ünïcödé ünïcödé".to_string();
        assert_eq!(state.truncated_description(7), "ünïcödé...");
    }

    #[test]
    fn test_document_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["id", "title", "description", "x", "y", "width", "height", "color"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
