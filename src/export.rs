use crate::svg::{frame_to_svg, render_png};
use crate::{Frame, Scene};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

pub const MARKDOWN_FILE: &str = "flowchart.md";
pub const PNG_FILE: &str = "flowchart.png";
pub const SVG_FILE: &str = "flowchart.svg";

/// Textual outline of the scene: states with descriptions, then one line
/// per connection whose endpoints both exist
pub fn to_markdown(scene: &Scene) -> String {
    let mut markdown = String::from("# Flowchart\n\n## States\n\n");

    for state in scene.states() {
        let _ = writeln!(markdown, "### {}", state.title);
        if !state.description.is_empty() {
            let _ = writeln!(markdown, "{}", state.description);
        }
        markdown.push('\n');
    }

    markdown.push_str("## Connections\n\n");
    for connection in scene.connections() {
        let (Some(from), Some(to)) = (
            scene.get_state(&connection.from),
            scene.get_state(&connection.to),
        ) else {
            continue;
        };
        let _ = write!(markdown, "- **{}** → **{}**", from.title, to.title);
        if !connection.label.is_empty() {
            let _ = write!(markdown, ": {}", connection.label);
        }
        markdown.push('\n');
    }

    markdown
}

/// Write the markdown outline to `path`
pub fn export_markdown(scene: &Scene, path: &Path) -> Result<()> {
    fs::write(path, to_markdown(scene))
        .with_context(|| format!("Failed to write markdown export: {}", path.display()))?;
    info!(path = %path.display(), "markdown exported");
    Ok(())
}

/// Write the frame as SVG to `path`
pub fn export_svg(frame: &Frame, path: &Path) -> Result<()> {
    let svg = frame_to_svg(frame)?;
    fs::write(path, svg)
        .with_context(|| format!("Failed to write SVG export: {}", path.display()))?;
    info!(path = %path.display(), "svg exported");
    Ok(())
}

/// Rasterize the frame and write it as PNG to `path`
pub fn export_png(frame: &Frame, scale: f32, path: &Path) -> Result<()> {
    let png = render_png(frame, scale)?;
    fs::write(path, png)
        .with_context(|| format!("Failed to write PNG export: {}", path.display()))?;
    info!(path = %path.display(), scale, "png exported");
    Ok(())
}
