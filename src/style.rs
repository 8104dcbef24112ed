use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

const BACKGROUND: &str = "#ffffff";
const NODE_FILL: &str = "#6aa84f";
const NODE_STROKE: &str = "#e6e6e6";
const NODE_LABEL: &str = "#ffffff";
const RING_FILL: &str = "#a3a3a3";
const RING_STROKE: &str = "#a3a3a3";
const ARROW_FILL: &str = "#a3a3a3";
const ARROW_STROKE: &str = "#a3a3a3";
const ANNOTATION_TEXT: &str = "#000000";
const INITIAL_TEXT: &str = "#ffc34c";
const FONT_FAMILY: &str = "sans-serif";

const LABEL_FONT_SIZE: f32 = 22.0;
const PROBABILITY_FONT_SIZE: f32 = 18.0;
const INITIAL_FONT_SIZE: f32 = 14.0;
const MEAN_FONT_SIZE: f32 = 11.0;
const TITLE_FONT_SIZE: f32 = 24.0;

const ARROW_WIDTH: f32 = 0.03;
const ARROW_HEAD_WIDTH: f32 = 0.20;
const ARROW_HEAD_LENGTH: f32 = 0.30;
const ARROW_BEND: f32 = 0.12;
const RING_WIDTH: f32 = 0.03;
const DPI: f32 = 100.0;

/// Width of a stroke that stands for probability `p`.
///
/// Zero still gets `0.3 * base` so the stroke stays visible; certainty gets
/// `2.8 * base`.
pub fn proportional_width(base: f32, probability: f64) -> f32 {
    base * (0.3 + 2.5 * probability as f32)
}

/// Colours, fonts and stroke sizes for a chain diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainStyle {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_node_fill")]
    pub node_fill: String,
    #[serde(default = "default_node_stroke")]
    pub node_stroke: String,
    #[serde(default = "default_node_label")]
    pub node_label: String,
    #[serde(default = "default_ring_fill")]
    pub ring_fill: String,
    #[serde(default = "default_ring_stroke")]
    pub ring_stroke: String,
    #[serde(default = "default_arrow_fill")]
    pub arrow_fill: String,
    #[serde(default = "default_arrow_stroke")]
    pub arrow_stroke: String,
    #[serde(default = "default_annotation_text")]
    pub annotation_text: String,
    #[serde(default = "default_initial_text")]
    pub initial_text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_label_font_size")]
    pub label_font_size: f32,
    #[serde(default = "default_probability_font_size")]
    pub probability_font_size: f32,
    #[serde(default = "default_initial_font_size")]
    pub initial_font_size: f32,
    #[serde(default = "default_mean_font_size")]
    pub mean_font_size: f32,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f32,

    /// Arrow shaft width at probability zero is `0.3 *` this, in diagram units.
    #[serde(default = "default_arrow_width")]
    pub arrow_width: f32,
    #[serde(default = "default_arrow_head_width")]
    pub arrow_head_width: f32,
    #[serde(default = "default_arrow_head_length")]
    pub arrow_head_length: f32,
    #[serde(default = "default_arrow_bend")]
    pub arrow_bend: f32,
    #[serde(default = "default_ring_width")]
    pub ring_width: f32,

    /// Leave out an arrow whose probability is zero instead of drawing it
    /// unlabelled at minimum width next to its nonzero partner.
    #[serde(default)]
    pub skip_zero_arrows: bool,

    #[serde(default = "default_dpi")]
    pub dpi: f32,
}

fn default_background() -> String {
    BACKGROUND.to_string()
}
fn default_node_fill() -> String {
    NODE_FILL.to_string()
}
fn default_node_stroke() -> String {
    NODE_STROKE.to_string()
}
fn default_node_label() -> String {
    NODE_LABEL.to_string()
}
fn default_ring_fill() -> String {
    RING_FILL.to_string()
}
fn default_ring_stroke() -> String {
    RING_STROKE.to_string()
}
fn default_arrow_fill() -> String {
    ARROW_FILL.to_string()
}
fn default_arrow_stroke() -> String {
    ARROW_STROKE.to_string()
}
fn default_annotation_text() -> String {
    ANNOTATION_TEXT.to_string()
}
fn default_initial_text() -> String {
    INITIAL_TEXT.to_string()
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_label_font_size() -> f32 {
    LABEL_FONT_SIZE
}
fn default_probability_font_size() -> f32 {
    PROBABILITY_FONT_SIZE
}
fn default_initial_font_size() -> f32 {
    INITIAL_FONT_SIZE
}
fn default_mean_font_size() -> f32 {
    MEAN_FONT_SIZE
}
fn default_title_font_size() -> f32 {
    TITLE_FONT_SIZE
}
fn default_arrow_width() -> f32 {
    ARROW_WIDTH
}
fn default_arrow_head_width() -> f32 {
    ARROW_HEAD_WIDTH
}
fn default_arrow_head_length() -> f32 {
    ARROW_HEAD_LENGTH
}
fn default_arrow_bend() -> f32 {
    ARROW_BEND
}
fn default_ring_width() -> f32 {
    RING_WIDTH
}
fn default_dpi() -> f32 {
    DPI
}

impl Default for ChainStyle {
    fn default() -> Self {
        Self {
            background: default_background(),
            node_fill: default_node_fill(),
            node_stroke: default_node_stroke(),
            node_label: default_node_label(),
            ring_fill: default_ring_fill(),
            ring_stroke: default_ring_stroke(),
            arrow_fill: default_arrow_fill(),
            arrow_stroke: default_arrow_stroke(),
            annotation_text: default_annotation_text(),
            initial_text: default_initial_text(),
            font_family: default_font_family(),

            label_font_size: LABEL_FONT_SIZE,
            probability_font_size: PROBABILITY_FONT_SIZE,
            initial_font_size: INITIAL_FONT_SIZE,
            mean_font_size: MEAN_FONT_SIZE,
            title_font_size: TITLE_FONT_SIZE,

            arrow_width: ARROW_WIDTH,
            arrow_head_width: ARROW_HEAD_WIDTH,
            arrow_head_length: ARROW_HEAD_LENGTH,
            arrow_bend: ARROW_BEND,
            ring_width: RING_WIDTH,
            skip_zero_arrows: false,
            dpi: DPI,
        }
    }
}

impl ChainStyle {
    pub fn from_toml(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a style file, picking the parser from the extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Err(LoadError::UnsupportedStyleFormat(
                path.display().to_string(),
            )),
        }
    }

    pub fn arrow_width_for(&self, probability: f64) -> f32 {
        proportional_width(self.arrow_width, probability)
    }

    pub fn ring_width_for(&self, probability: f64) -> f32 {
        proportional_width(self.ring_width, probability)
    }
}
