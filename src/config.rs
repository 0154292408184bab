// ============================================================================
// COLOR & WIDGET CONFIGURATION
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bon::Builder;
use rusttype::Font;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::animation::Easing;
use crate::error::RadarError;
use crate::layout::Padding;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0x00, 0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed `0xAARRGGBB`.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected #rrggbb or #aarrggbb")]
pub struct ColorParseError(pub String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }
        let packed = u32::from_str_radix(hex, 16).map_err(|_| ColorParseError(s.to_string()))?;
        match hex.len() {
            6 => Ok(Color::from_argb(0xff00_0000 | packed)),
            8 => Ok(Color::from_argb(packed)),
            _ => Err(ColorParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Construction-time options for a radar widget and the window hosting it.
///
/// Lengths suffixed `_dp` are density independent and scaled by `density`;
/// text sizes are scaled by `scaled_density`.
#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    // Window configuration
    #[builder(default = "Radar".to_string())]
    pub title: String,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    #[builder(default = 1.0)]
    pub density: f32,
    #[builder(default = 1.0)]
    pub scaled_density: f32,
    #[builder(default)]
    pub padding: Padding,

    // Score text
    #[builder(default = 40.0)]
    pub text_size_sp: f32,
    #[builder(default = Color::new(0x01, 0xb0, 0xf1))]
    pub text_color: Color,
    pub text: Option<String>,
    #[builder(default = 16.0)]
    pub label_text_size_sp: f32,
    /// Falls back to `text_color`.
    pub label_text_color: Option<Color>,
    pub label_text: Option<String>,
    pub format: Option<String>,
    #[builder(default = 12.0)]
    pub text_offset_y_dp: f32,
    #[builder(default = 36.0)]
    pub label_text_offset_y_dp: f32,

    // Colors
    #[builder(default = Color::new(0x52, 0xff, 0xf9))]
    pub side_color: Color,
    #[builder(default = Color::new(0x1b, 0xb8, 0xf2))]
    pub outside_background_color: Color,
    #[builder(default = Color::WHITE)]
    pub inside_background_color: Color,
    #[builder(default = Color::new(0x52, 0xff, 0xf9))]
    pub circle_color: Color,
    #[builder(default = Color::new(0x1e, 0xcd, 0xf4))]
    pub line_color: Color,

    // Stroke widths
    #[builder(default = 3.0)]
    pub inside_stroke_width_dp: f32,
    #[builder(default = 8.0)]
    pub outside_stroke_width_dp: f32,
    #[builder(default = 0.3)]
    pub line_stroke_width_dp: f32,

    // Animation
    #[builder(default = 500)]
    pub duration_ms: u64,
    #[builder(default)]
    pub easing: Easing,
    #[builder(default = 2)]
    pub scan_time_ms: u64,
    #[builder(default = 0)]
    pub rotation: i32,

    // Toggles
    #[builder(default = true)]
    pub show_line: bool,
    #[builder(default = true)]
    pub show_text: bool,
    #[builder(default = true)]
    pub show_label: bool,
    #[builder(default = true)]
    pub show_animation: bool,

    // Font configuration
    pub font_path: Option<PathBuf>,
    #[serde(skip)]
    pub font_data: Option<Vec<u8>>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RadarConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded radar config");
        Ok(config)
    }

    pub fn dp(&self, value: f32) -> f32 {
        value * self.density
    }

    pub fn sp(&self, value: f32) -> f32 {
        value * self.scaled_density
    }

    /// Loads the text font, preferring in-memory data over `font_path`.
    pub fn load_font(&self) -> Result<Option<Font<'static>>, RadarError> {
        let data = match (&self.font_data, &self.font_path) {
            (Some(data), _) => data.clone(),
            (None, Some(path)) => std::fs::read(path).map_err(|source| RadarError::FontIo {
                path: path.clone(),
                source,
            })?,
            (None, None) => {
                tracing::warn!("no font configured; score text will not be rasterized");
                return Ok(None);
            }
        };
        Font::try_from_vec(data)
            .map(Some)
            .ok_or(RadarError::InvalidFont)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#52fff9".parse::<Color>().unwrap(), Color::new(0x52, 0xff, 0xf9));
        assert_eq!(
            "#8001b0f1".parse::<Color>().unwrap(),
            Color::rgba(0x01, 0xb0, 0xf1, 0x80)
        );
        assert!("52fff9".parse::<Color>().is_err());
        assert!("#52ff".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("#+fffff".parse::<Color>().is_err());
        assert!("#-0000000".parse::<Color>().is_err());
        assert!("# fffff".parse::<Color>().is_err());
    }

    #[test]
    fn builder_defaults_match_the_widget_defaults() {
        let config = RadarConfig::default();
        assert_eq!(config.duration_ms, 500);
        assert_eq!(config.scan_time_ms, 2);
        assert_eq!(config.circle_color, Color::new(0x52, 0xff, 0xf9));
        assert_eq!(config.inside_background_color, Color::WHITE);
        assert!(config.show_line && config.show_text && config.show_label);
        assert!(config.format.is_none());
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = RadarConfig::from_toml_str(
            r##"
            title = "Scanner"
            density = 2.0
            circle_color = "#ff0000"
            format = "%.1f"
            show_line = false
            easing = "linear"

            [padding]
            left = 4
            "##,
        )
        .unwrap();
        assert_eq!(config.title, "Scanner");
        assert_eq!(config.dp(8.0), 16.0);
        assert_eq!(config.circle_color, Color::new(0xff, 0, 0));
        assert_eq!(config.format.as_deref(), Some("%.1f"));
        assert!(!config.show_line);
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(config.padding.left, 4);
        assert_eq!(config.padding.right, 0);
        assert_eq!(config.duration_ms, 500);
    }

    #[test]
    fn load_reads_a_file_and_reports_bad_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scan_time_ms = 5").unwrap();
        let config = RadarConfig::load(file.path()).unwrap();
        assert_eq!(config.scan_time_ms, 5);

        assert!(matches!(
            RadarConfig::from_toml_str("circle_color = \"red\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RadarConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn missing_font_is_not_an_error() {
        assert!(RadarConfig::default().load_font().unwrap().is_none());
        let bad = RadarConfig::builder().font_data(vec![0, 1, 2, 3]).build();
        assert!(matches!(bad.load_font(), Err(RadarError::InvalidFont)));
    }
}
