//! Error types for font loading, sizing and glyph realization

use crate::render::BackendError;

use super::face::{Encoding, GlyphIndex};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Font data could not be parsed
    #[error("Failed to load font face: {0}")]
    FaceLoad(String),

    /// Font file could not be read
    #[error("Failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    /// The rasterizer rejected a point size or resolution
    #[error("Invalid face size {point_size}pt at {resolution}dpi")]
    InvalidSize {
        /// Requested size in points
        point_size: f32,
        /// Requested resolution in dots per inch
        resolution: u32,
    },

    /// The face does not provide the requested character map
    #[error("Character map {0:?} is not available")]
    InvalidCharmap(Encoding),

    /// The face has no character map at all
    #[error("Face has no character map")]
    NoCharmap,

    /// The rasterizer failed to load or render a glyph
    #[error("Failed to load glyph {index}: {reason}")]
    GlyphLoad {
        /// Glyph index inside the face
        index: GlyphIndex,
        /// Rasterizer message
        reason: String,
    },

    /// Glyph index outside the face's glyph range
    #[error("Glyph index {0} is out of range")]
    InvalidGlyphIndex(GlyphIndex),

    /// Code point outside the Unicode range
    #[error("Code point {0:#X} is outside the Unicode range")]
    InvalidCodepoint(u32),

    /// No face size has been set successfully yet
    #[error("No face size set")]
    NoSize,

    /// Texture allocation or upload failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}
