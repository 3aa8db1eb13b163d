//! Font and layout settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;

use super::kerning::DEFAULT_KERNING_CACHE_SIZE;
use super::layout::TextAlignment;

/// Settings for opening and sizing a font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file to open
    pub font_path: Option<PathBuf>,
    /// Size in points
    pub point_size: f32,
    /// Resolution in dots per inch
    pub resolution: u32,
    /// Render outlines instead of filled glyphs
    pub stroke: bool,
    /// Glyph indices covered by the precomputed kerning table, 0 disables it
    pub kerning_cache_size: usize,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            point_size: 12.0,
            resolution: 72,
            stroke: false,
            kerning_cache_size: DEFAULT_KERNING_CACHE_SIZE,
        }
    }
}

/// Settings for wrapping and aligning text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum line width in pixels
    pub line_length: f32,
    /// Multiplier on the font's line height
    pub line_spacing: f32,
    /// Horizontal alignment
    pub alignment: TextAlignment,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_length: 100.0,
            line_spacing: 1.0,
            alignment: TextAlignment::Left,
        }
    }
}

/// Complete text engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font settings
    pub font: FontConfig,
    /// Layout settings
    pub layout: LayoutConfig,
}

impl Config for TextConfig {}
