use crate::render::{DrawCommand, FontWeight, Frame, Stroke};
use crate::Rgba;
use anyhow::{anyhow, bail, Result};
use std::fmt::Write;
use tiny_skia::{Pixmap, Transform};

const FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

/// Write a frame as a standalone SVG document the size of its viewport
pub fn frame_to_svg(frame: &Frame) -> Result<String> {
    let (width, height) = (frame.viewport.width, frame.viewport.height);

    let mut svg = String::new();
    write!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="{}">
  <rect width="100%" height="100%" fill="{}" />
"#,
        width,
        height,
        width,
        height,
        FONT_FAMILY,
        frame.background.to_hex(),
    )?;

    write!(
        svg,
        "  <g transform=\"translate({:.3} {:.3}) scale({:.5})\">\n",
        frame.pan.x, frame.pan.y, frame.zoom
    )?;
    for command in frame.model_layers() {
        write_command(&mut svg, command, "    ")?;
    }
    svg.push_str("  </g>\n");

    for command in &frame.overlay {
        write_command(&mut svg, command, "  ")?;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn write_command(svg: &mut String, command: &DrawCommand, indent: &str) -> Result<()> {
    match command {
        DrawCommand::Line { from, to, stroke } => writeln!(
            svg,
            "{indent}<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"{} />",
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attrs(stroke)
        )?,
        DrawCommand::QuadCurve {
            from,
            control,
            to,
            stroke,
        } => writeln!(
            svg,
            "{indent}<path d=\"M{:.2},{:.2} Q{:.2},{:.2} {:.2},{:.2}\" fill=\"none\"{} />",
            from.x,
            from.y,
            control.x,
            control.y,
            to.x,
            to.y,
            stroke_attrs(stroke)
        )?,
        DrawCommand::Rect {
            rect,
            corner_radius,
            fill,
            stroke,
        } => writeln!(
            svg,
            "{indent}<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.1}\" ry=\"{:.1}\"{}{} />",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            corner_radius,
            corner_radius,
            fill_attrs(*fill),
            stroke.as_ref().map(stroke_attrs).unwrap_or_default()
        )?,
        DrawCommand::Circle {
            center,
            radius,
            fill,
        } => writeln!(
            svg,
            "{indent}<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\"{} />",
            center.x,
            center.y,
            radius,
            fill_attrs(Some(*fill))
        )?,
        DrawCommand::Text {
            position,
            text,
            size,
            color,
            weight,
        } => writeln!(
            svg,
            "{indent}<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.1}\"{}{} text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
            position.x,
            position.y,
            size,
            if *weight == FontWeight::Bold {
                " font-weight=\"bold\""
            } else {
                ""
            },
            fill_attrs(Some(*color)),
            escape_xml(text)
        )?,
    }
    Ok(())
}

fn fill_attrs(fill: Option<Rgba>) -> String {
    match fill {
        None => " fill=\"none\"".to_string(),
        Some(color) if color.a == 255 => format!(" fill=\"{}\"", color.to_hex()),
        Some(color) => format!(
            " fill=\"{}\" fill-opacity=\"{:.3}\"",
            color.to_hex(),
            color.opacity()
        ),
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{:.1}\" stroke-linecap=\"round\"",
        stroke.color.to_hex(),
        stroke.width
    );
    if stroke.color.a != 255 {
        attrs.push_str(&format!(" stroke-opacity=\"{:.3}\"", stroke.color.opacity()));
    }
    if let Some([dash, gap]) = stroke.dash {
        attrs.push_str(&format!(" stroke-dasharray=\"{dash} {gap}\""));
    }
    attrs
}

/// Escape text for use inside SVG markup
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Rasterize a frame to PNG bytes at `scale` times its viewport size
pub fn render_png(frame: &Frame, scale: f32) -> Result<Vec<u8>> {
    if scale <= 0.0 {
        bail!("scale must be greater than zero when rendering PNG output");
    }

    let svg = frame_to_svg(frame)?;

    let mut options = resvg::usvg::Options::default();
    options.font_family = "Inter".to_string();
    options.fontdb_mut().load_system_fonts();

    let tree = resvg::usvg::Tree::from_str(&svg, &options)
        .map_err(|err| anyhow!("failed to parse generated SVG for PNG export: {err}"))?;

    let size = tree.size().to_int_size();
    let scaled_width = (size.width() as f32 * scale).ceil();
    let scaled_height = (size.height() as f32 * scale).ceil();

    if !scaled_width.is_finite() || !scaled_height.is_finite() {
        bail!("scaled dimensions are not finite; try a smaller scale factor");
    }
    if scaled_width < 1.0 || scaled_height < 1.0 {
        bail!("scaled dimensions collapsed below 1px; try a larger scale factor");
    }
    if scaled_width > u32::MAX as f32 || scaled_height > u32::MAX as f32 {
        bail!("scaled dimensions exceed supported limits; try a smaller scale factor");
    }

    let (scaled_width, scaled_height) = (scaled_width as u32, scaled_height as u32);
    let mut pixmap = Pixmap::new(scaled_width, scaled_height).ok_or_else(|| {
        anyhow!("failed to allocate {scaled_width}x{scaled_height} surface for PNG export")
    })?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| anyhow!("failed to encode PNG output: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionStyle, EditorConfig, Point, Session, Size};

    fn sample_session() -> Session {
        let mut session = Session::new(EditorConfig::default(), Size::new(400.0, 200.0));
        let a = session.create_state(Point::new(0.0, 0.0), "Start & <go>", "");
        let b = session.create_state(Point::new(200.0, 0.0), "End", "");
        session
            .create_connection(&a, &b, "", ConnectionStyle::Straight, "#6c757d")
            .unwrap();
        session
    }

    #[test]
    fn test_svg_document_structure() {
        let svg = frame_to_svg(&sample_session().render()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("width=\"400\" height=\"200\""));
        assert!(svg.contains("translate(0.000 0.000) scale(1.00000)"));
        assert!(svg.contains("Start &amp; &lt;go&gt;"));
        assert!(svg.contains("rx=\"8.0\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_layer_order() {
        let svg = frame_to_svg(&sample_session().render()).unwrap();
        let connection = svg.find("stroke=\"#6c757d\"").unwrap();
        let state = svg.find("rx=\"8.0\"").unwrap();
        assert!(connection < state);
    }

    #[test]
    fn test_welcome_overlay_outside_transform() {
        let session = Session::new(EditorConfig::default(), Size::new(400.0, 200.0));
        let svg = frame_to_svg(&session.render()).unwrap();
        let group_end = svg.find("</g>").unwrap();
        let welcome = svg.find("Welcome to the flowchart editor!").unwrap();
        assert!(welcome > group_end);
    }

    #[test]
    fn test_png_rejects_bad_scale() {
        let frame = sample_session().render();
        assert!(render_png(&frame, 0.0).is_err());
        assert!(render_png(&frame, -1.0).is_err());
    }

    #[test]
    fn test_png_signature() {
        let png = render_png(&sample_session().render(), 0.5).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
