//! Configuration persistence for shotmark settings

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::AnnotationKind;
use crate::render::geometry::arrow;

/// Annotation color, stored as `#RRGGBB` in config and exported metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // First palette entry (red)
        Self::rgb(0xEF, 0x44, 0x44)
    }
}

impl ShapeColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to RGBA bytes with the given opacity (0.0-1.0)
    pub fn to_rgba_u8(self, opacity: f32) -> [u8; 4] {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.r, self.g, self.b, a]
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ShapeColor> for String {
    fn from(c: ShapeColor) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for ShapeColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #RRGGBB"))
    }
}

/// Default annotation palette: red, amber, emerald, blue, violet, pink
pub const DEFAULT_PALETTE: [ShapeColor; 6] = [
    ShapeColor::rgb(0xEF, 0x44, 0x44),
    ShapeColor::rgb(0xF5, 0x9E, 0x0B),
    ShapeColor::rgb(0x10, 0xB9, 0x81),
    ShapeColor::rgb(0x3B, 0x82, 0xF6),
    ShapeColor::rgb(0x8B, 0x5C, 0xF6),
    ShapeColor::rgb(0xEC, 0x48, 0x99),
];

/// Editor configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Colors offered in the color picker
    pub palette: Vec<ShapeColor>,
    /// Color selected when a session starts
    pub default_color: ShapeColor,
    /// Tool selected when a session starts
    pub default_tool: AnnotationKind,
    /// Stroke width for the highlight marker, in image pixels
    pub highlight_width: f32,
    /// Opacity of the highlight marker (0.0-1.0)
    pub highlight_opacity: f32,
    /// Stroke width for arrows, rectangles and circles, in image pixels
    pub stroke_width: f32,
    /// Length of each arrowhead stroke, in image pixels
    pub arrow_head_length: f32,
    /// Text annotation font size, in image pixels
    pub font_size: f32,
    /// Horizontal padding subtracted from the container width
    pub viewport_padding: f32,
    /// Fraction of the window height available to the drawing surface
    pub viewport_height_fraction: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
            default_color: DEFAULT_PALETTE[0],
            default_tool: AnnotationKind::Pointer,
            highlight_width: 20.0,
            highlight_opacity: 0.3,
            stroke_width: 2.0,
            arrow_head_length: arrow::HEAD_LENGTH,
            font_size: 16.0,
            viewport_padding: 48.0,
            viewport_height_fraction: 0.6,
        }
    }
}

impl EditorConfig {
    /// Application directory name under the user config dir
    pub const ID: &'static str = "shotmark";

    const FILE_NAME: &'static str = "config.json";

    /// Stroke width a new annotation of `kind` is drawn with
    pub fn stroke_width_for(&self, kind: AnnotationKind) -> f32 {
        match kind {
            AnnotationKind::Highlight => self.highlight_width,
            _ => self.stroke_width,
        }
    }

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                log::warn!("Could not read config {}: {:?}", path.display(), err);
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&contents) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Replace out-of-range values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.palette.is_empty() {
            self.palette = defaults.palette;
        }
        self.highlight_width = positive_or(self.highlight_width, defaults.highlight_width);
        self.stroke_width = positive_or(self.stroke_width, defaults.stroke_width);
        self.font_size = positive_or(self.font_size, defaults.font_size);
        if self.arrow_head_length.is_nan() || self.arrow_head_length < 0.0 {
            self.arrow_head_length = defaults.arrow_head_length;
        }
        self.highlight_opacity = self.highlight_opacity.clamp(0.0, 1.0);
        if self.viewport_height_fraction.is_nan()
            || self.viewport_height_fraction <= 0.0
            || self.viewport_height_fraction > 1.0
        {
            self.viewport_height_fraction = defaults.viewport_height_fraction;
        }
        self
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
