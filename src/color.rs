use egui::Color32;
use std::fmt;

/// An sRGB color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled by `opacity` in `0.0..=1.0`
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Alpha stays straight, so it
    /// is read separately instead of through egui's premultiplied color.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let text = text.trim();
        let hex = text.strip_prefix('#')?;
        let rgb = |text: &str| Color32::from_hex(text).ok().map(|c| (c.r(), c.g(), c.b()));
        match hex.len() {
            3 | 6 => rgb(text).map(|(r, g, b)| Self::rgb(r, g, b)),
            8 => {
                let (r, g, b) = rgb(text.get(..7)?)?;
                let alpha = hex.get(6..).filter(|a| a.bytes().all(|b| b.is_ascii_hexdigit()))?;
                let a = u8::from_str_radix(alpha, 16).ok()?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse a stored color string, falling back when it is not a hex color
    pub fn parse_or(text: &str, fallback: Rgba) -> Self {
        Self::parse_hex(text).unwrap_or(fallback)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.opacity()
            )
        }
    }
}
