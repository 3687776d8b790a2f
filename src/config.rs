use crate::{ConnectionStyle, Point};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tunable editor constants.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Size given to every new state
    pub state_width: f32,
    pub state_height: f32,
    pub state_color: String,
    /// Title used when the creation prompt is confirmed with an empty title
    pub default_state_title: String,

    pub connection_color: String,
    pub connection_style: ConnectionStyle,

    /// Offset applied to duplicated states
    pub duplicate_offset: Point,

    /// Max distance (model units) between a point and a connection chord
    /// for the point to hit that connection
    pub hit_threshold: f32,

    pub grid_size: f32,
    pub grid_color: String,
    pub grid_alpha: f32,

    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Multiplicative zoom per wheel step
    pub wheel_zoom_step: f32,
    /// Multiplicative zoom per zoom-in/zoom-out command
    pub button_zoom_step: f32,
    /// Screen padding kept around the scene by fit-to-view
    pub fit_padding: f32,

    /// Vertical offset of the quadratic control point for curved connections
    pub curve_bulge: f32,
    pub arrow_length: f32,
    /// Descriptions longer than this many characters are truncated on canvas
    pub description_max_chars: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            state_width: 120.0,
            state_height: 80.0,
            state_color: "#ffffff".to_string(),
            default_state_title: "New State".to_string(),
            connection_color: "#6c757d".to_string(),
            connection_style: ConnectionStyle::Straight,
            duplicate_offset: Point::new(20.0, 20.0),
            hit_threshold: 10.0,
            grid_size: 20.0,
            grid_color: "#617891".to_string(),
            grid_alpha: 0.4,
            min_zoom: 0.1,
            max_zoom: 3.0,
            wheel_zoom_step: 1.1,
            button_zoom_step: 1.2,
            fit_padding: 50.0,
            curve_bulge: 20.0,
            arrow_length: 10.0,
            description_max_chars: 20,
        }
    }
}

impl EditorConfig {
    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config from: {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<()> {
        if !(self.state_width > 0.0 && self.state_height > 0.0) {
            anyhow::bail!(
                "state size must be positive, got {}x{}",
                self.state_width,
                self.state_height
            );
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            anyhow::bail!(
                "zoom limits must satisfy 0 < min <= max, got [{}, {}]",
                self.min_zoom,
                self.max_zoom
            );
        }
        if self.grid_size <= 0.0 {
            anyhow::bail!("grid size must be positive, got {}", self.grid_size);
        }
        Ok(())
    }
}
