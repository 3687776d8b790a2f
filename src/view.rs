use crate::geometry::{to_model_space, to_screen_space};
use crate::{Bounds, EditorConfig, Point, Size};

/// Region of model space covered by the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRegion {
    pub min: Point,
    pub max: Point,
}

/// Pan and zoom of the canvas. Never persisted with the project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f32,
    /// Screen-space translation
    pub pan: Point,
    min_zoom: f32,
    max_zoom: f32,
}

impl ViewState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ZERO,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    pub fn to_model(&self, screen: Point) -> Point {
        to_model_space(screen, self.pan, self.zoom)
    }

    pub fn to_screen(&self, model: Point) -> Point {
        to_screen_space(model, self.pan, self.zoom)
    }

    /// Set the zoom, clamped to the configured limits
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Multiply the zoom by `factor`, clamped
    pub fn scale_zoom(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// One wheel notch: `delta_y < 0` zooms in by `step`, otherwise out by
    /// `1 / step`
    pub fn wheel(&mut self, delta_y: f32, step: f32) {
        if delta_y < 0.0 {
            self.scale_zoom(step);
        } else if delta_y > 0.0 {
            self.scale_zoom(1.0 / step);
        }
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    /// Back to zoom 1 with no pan
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::ZERO;
    }

    /// Model-space rectangle under the viewport, from its inverse-transformed
    /// corners
    pub fn visible_region(&self, viewport: Size) -> VisibleRegion {
        VisibleRegion {
            min: self.to_model(Point::ZERO),
            max: self.to_model(Point::new(viewport.width, viewport.height)),
        }
    }

    /// Fit `bounds` into `viewport` minus padding, never zooming past 1,
    /// and center it
    pub fn fit_to_view(&mut self, bounds: Bounds, viewport: Size, padding: f32) {
        let avail_w = (viewport.width - 2.0 * padding).max(1.0);
        let avail_h = (viewport.height - 2.0 * padding).max(1.0);
        let scale_x = if bounds.width() > 0.0 {
            avail_w / bounds.width()
        } else {
            1.0
        };
        let scale_y = if bounds.height() > 0.0 {
            avail_h / bounds.height()
        } else {
            1.0
        };

        self.set_zoom(scale_x.min(scale_y).min(1.0));
        self.pan = Point::new(
            (viewport.width - bounds.width() * self.zoom) / 2.0 - bounds.min_x * self.zoom,
            (viewport.height - bounds.height() * self.zoom) / 2.0 - bounds.min_y * self.zoom,
        );
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
