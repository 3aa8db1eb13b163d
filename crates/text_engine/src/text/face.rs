//! Font faces
//!
//! [`FontFace`] is the boundary to the outline rasterizer: everything the
//! engine needs from a font file goes through it. [`Face`] owns one raw face
//! together with its kerning cache and current size, and keeps the
//! [`FontLibrary`] it was opened from alive.

use bitflags::bitflags;

use crate::foundation::math::{BBox, Vec2, Vec3};

use super::error::{FontError, FontResult};
use super::kerning::KerningCache;
use super::library::FontLibrary;

/// Glyph identifier inside one face; 0 is the missing glyph
pub type GlyphIndex = i32;

/// Character map encodings a face may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Unicode code points
    Unicode,
    /// Microsoft symbol encoding
    Symbol,
    /// ISO 8859-1
    Latin1,
    /// Apple Roman
    AppleRoman,
}

bitflags! {
    /// Glyph loading options passed to the rasterizer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LoadFlags: u32 {
        /// Rasterizer defaults
        const DEFAULT = 0;
        /// Disable hinting
        const NO_HINTING = 1 << 1;
        /// Ignore embedded bitmap strikes
        const NO_BITMAP = 1 << 3;
    }
}

/// Metrics for one point size and resolution, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeMetrics {
    /// Size in points
    pub point_size: f32,
    /// Horizontal resolution in dpi
    pub x_resolution: u32,
    /// Vertical resolution in dpi
    pub y_resolution: u32,
    /// Distance from baseline to the top of the tallest glyphs
    pub ascender: f32,
    /// Distance from baseline to the bottom of descenders (negative)
    pub descender: f32,
    /// Height of the face bounding box, used as line height
    pub height: f32,
    /// Width of the face bounding box
    pub width: f32,
}

/// Coverage bitmap of a rendered glyph, one byte per pixel, top row first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels
    pub width: u32,
    /// Number of rows
    pub rows: u32,
    /// Horizontal offset from the pen to the left edge
    pub left: i32,
    /// Vertical offset from the baseline to the top row (y up)
    pub top: i32,
    /// Row-major coverage values
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Whether the bitmap covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }
}

/// A loaded glyph as reported by the rasterizer
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSlot {
    /// Glyph index inside the face
    pub index: GlyphIndex,
    /// Pen advance
    pub advance: Vec3,
    /// Outline bounding box relative to the pen
    pub bbox: BBox,
    /// Rendered coverage
    pub bitmap: Bitmap,
}

/// Outline rasterizer interface for a single font face
pub trait FontFace {
    /// Number of glyphs in the face
    fn glyph_count(&self) -> usize;

    /// Whether the face carries kerning data
    fn has_kerning(&self) -> bool;

    /// Character maps the face provides
    fn charmaps(&self) -> &[Encoding];

    /// Currently selected character map
    fn active_charmap(&self) -> Option<Encoding>;

    /// Select a character map by encoding
    fn select_charmap(&mut self, encoding: Encoding) -> FontResult<()>;

    /// Scale the face and report the metrics at that size
    fn set_char_size(&mut self, point_size: f32, x_resolution: u32, y_resolution: u32) -> FontResult<SizeMetrics>;

    /// Glyph index for a code point in the active character map, 0 if missing
    fn char_index(&self, codepoint: u32) -> GlyphIndex;

    /// Load and render one glyph at the current size
    fn load_glyph(&mut self, index: GlyphIndex, flags: LoadFlags) -> FontResult<GlyphSlot>;

    /// Kerning between two glyphs at the current size
    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> FontResult<Vec2>;
}

/// An opened face with its kerning cache and current size
pub struct Face<F: FontFace> {
    raw: F,
    kerning: KerningCache,
    size: Option<SizeMetrics>,
    library: FontLibrary,
}

impl<F: FontFace> Face<F> {
    pub(crate) fn new(library: FontLibrary, raw: F) -> Self {
        let kerning = KerningCache::new(&raw, library.kerning_cache_size());
        library.face_opened();
        Self {
            raw,
            kerning,
            size: None,
            library,
        }
    }

    /// Underlying rasterizer face
    pub fn raw(&self) -> &F {
        &self.raw
    }

    /// Mutable access to the underlying rasterizer face
    pub fn raw_mut(&mut self) -> &mut F {
        &mut self.raw
    }

    /// Library the face was opened from
    pub fn library(&self) -> &FontLibrary {
        &self.library
    }

    /// Metrics of the current size, if one was set
    pub fn size(&self) -> Option<&SizeMetrics> {
        self.size.as_ref()
    }

    /// Kerning cache for this face
    pub fn kerning_cache(&self) -> &KerningCache {
        &self.kerning
    }

    /// Set the character size; a request matching the current size is not
    /// sent to the rasterizer again
    pub fn set_size(&mut self, point_size: f32, resolution: u32) -> FontResult<SizeMetrics> {
        if let Some(current) = self.size {
            if current.point_size == point_size && current.y_resolution == resolution {
                return Ok(current);
            }
        }

        self.size = None;
        let metrics = self.raw.set_char_size(point_size, resolution, resolution)?;
        self.kerning.rebuild(&self.raw);
        log::debug!(
            "Face sized to {}pt at {}dpi (line height {:.1}px)",
            point_size,
            resolution,
            metrics.height
        );
        self.size = Some(metrics);
        Ok(metrics)
    }

    /// Kerning offset between two glyph indices
    pub fn kern_advance(&self, left: GlyphIndex, right: GlyphIndex) -> Vec2 {
        self.kerning.advance(&self.raw, left, right)
    }

    /// Number of glyphs in the face
    pub fn glyph_count(&self) -> usize {
        self.raw.glyph_count()
    }

    /// Character maps the face provides
    pub fn charmaps(&self) -> &[Encoding] {
        self.raw.charmaps()
    }

    /// Load a glyph at the current size
    pub fn load_glyph(&mut self, index: GlyphIndex, flags: LoadFlags) -> FontResult<GlyphSlot> {
        if self.size.is_none() {
            return Err(FontError::NoSize);
        }
        self.raw.load_glyph(index, flags)
    }
}

impl<F: FontFace> Drop for Face<F> {
    fn drop(&mut self) {
        self.library.face_closed();
    }
}
