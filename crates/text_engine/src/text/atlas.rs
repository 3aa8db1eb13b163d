//! Glyph texture atlas
//!
//! Packs glyph bitmaps into power-of-two alpha textures using shelf packing:
//! glyphs are placed left to right on the current shelf, a glyph that does
//! not fit starts a new shelf below, and a shelf that does not fit starts a
//! new texture. Texture dimensions are fixed once allocated.

use crate::render::{GraphicsBackend, TextureHandle, TextureRegion};

use super::error::FontResult;
use super::face::Bitmap;

/// Padding between glyphs and around texture edges, in texels
pub const GLYPH_PADDING: u32 = 3;

/// Extra padding when glyphs are stroked
pub const STROKE_PADDING: u32 = 4;

/// Overflow warnings logged per atlas before going quiet
const MAX_OVERFLOW_WARNINGS: u32 = 8;

/// Round up to a power of two and clamp to `max`
pub fn clamp_size(size: u32, max: u32) -> u32 {
    size.max(1).checked_next_power_of_two().unwrap_or(u32::MAX).min(max)
}

/// One texture of the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasPage {
    /// Backend texture
    pub texture: TextureHandle,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
}

/// Where a glyph was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasPlacement {
    /// Texture holding the glyph
    pub page: AtlasPage,
    /// Left edge inside the texture
    pub x: u32,
    /// Top edge inside the texture
    pub y: u32,
}

/// Shelf packer over a growing list of textures
#[derive(Debug)]
pub struct GlyphAtlas {
    pages: Vec<AtlasPage>,
    padding: u32,
    cell_width: u32,
    cell_height: u32,
    remaining_glyphs: usize,
    x: u32,
    y: u32,
    shelf_height: u32,
    warnings: u32,
}

impl GlyphAtlas {
    /// Create an empty atlas; no texture is allocated until the first glyph
    pub fn new(stroke: bool) -> Self {
        Self {
            pages: Vec::new(),
            padding: if stroke { GLYPH_PADDING + STROKE_PADDING } else { GLYPH_PADDING },
            cell_width: 1,
            cell_height: 1,
            remaining_glyphs: 0,
            x: 0,
            y: 0,
            shelf_height: 0,
            warnings: 0,
        }
    }

    /// Size new textures for glyph cells of `cell_width` x `cell_height`
    /// with `glyph_count` glyphs still to come
    pub fn configure(&mut self, cell_width: f32, cell_height: f32, glyph_count: usize) {
        self.cell_width = (cell_width.round() as u32).max(1);
        self.cell_height = (cell_height.round() as u32).max(1);
        self.remaining_glyphs = glyph_count;
    }

    /// Padding in texels
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Textures allocated so far
    pub fn pages(&self) -> &[AtlasPage] {
        &self.pages
    }

    /// Glyphs not yet placed, as estimated from the face's glyph count
    pub fn remaining_glyphs(&self) -> usize {
        self.remaining_glyphs
    }

    /// Dimensions for the next texture
    ///
    /// Wide enough to hold every remaining glyph on one line if the backend
    /// allows it, and tall enough for the lines that width implies.
    pub fn calculate_texture_size(&self, max_size: u32) -> (u32, u32) {
        let glyphs = self.remaining_glyphs.max(1) as u32;
        let padding = self.padding * 2;

        let width = clamp_size(
            self.cell_width.saturating_mul(glyphs).saturating_add(padding),
            max_size,
        );
        let per_line = (width.saturating_sub(padding) / self.cell_width).max(1);
        let lines = glyphs.div_ceil(per_line);
        let height = clamp_size(
            self.cell_height.saturating_mul(lines).saturating_add(padding),
            max_size,
        );

        (width, height)
    }

    fn create_page<B: GraphicsBackend + ?Sized>(&mut self, backend: &mut B) -> FontResult<AtlasPage> {
        let (width, height) = self.calculate_texture_size(backend.max_texture_size());
        let texture = backend.create_texture(width, height)?;
        let page = AtlasPage { texture, width, height };

        log::debug!("Allocated {}x{} glyph atlas texture #{}", width, height, self.pages.len());
        self.pages.push(page);
        self.x = self.padding;
        self.y = self.padding;
        self.shelf_height = 0;
        Ok(page)
    }

    /// Reserve a `width` x `height` rectangle
    pub fn place<B: GraphicsBackend + ?Sized>(&mut self, backend: &mut B, width: u32, height: u32) -> FontResult<AtlasPlacement> {
        let mut page = match self.pages.last() {
            Some(&page) => page,
            None => self.create_page(backend)?,
        };

        if page.width.saturating_sub(self.x) < width {
            self.x = self.padding;
            self.y += self.shelf_height;
            self.shelf_height = 0;

            if self.y + height > page.height {
                page = self.create_page(backend)?;
            }
        }

        let placement = AtlasPlacement {
            page,
            x: self.x,
            y: self.y,
        };
        self.x += width + self.padding;
        self.shelf_height = self.shelf_height.max(height);
        self.remaining_glyphs = self.remaining_glyphs.saturating_sub(1);
        Ok(placement)
    }

    /// Copy a bitmap into its placed rectangle and return the region
    /// actually written
    ///
    /// A bitmap that runs past the texture edge is cut to what fits.
    pub fn upload<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        placement: &AtlasPlacement,
        bitmap: &Bitmap,
    ) -> FontResult<TextureRegion> {
        let page = placement.page;
        let width = bitmap.width.min(page.width.saturating_sub(placement.x));
        let height = bitmap.rows.min(page.height.saturating_sub(placement.y));

        if width < bitmap.width || height < bitmap.rows {
            self.warn_overflow(placement, bitmap);
        }

        let region = TextureRegion {
            x: placement.x,
            y: placement.y,
            width,
            height,
        };
        if width > 0 && height > 0 {
            backend.write_texture(page.texture, region, &bitmap.pixels, bitmap.width)?;
        }
        Ok(region)
    }

    fn warn_overflow(&mut self, placement: &AtlasPlacement, bitmap: &Bitmap) {
        if self.warnings >= MAX_OVERFLOW_WARNINGS {
            return;
        }
        self.warnings += 1;

        log::warn!(
            "Glyph {}x{} at ({}, {}) overflows {}x{} atlas texture, clipping",
            bitmap.width,
            bitmap.rows,
            placement.x,
            placement.y,
            placement.page.width,
            placement.page.height
        );
        if self.warnings == MAX_OVERFLOW_WARNINGS {
            log::warn!("Last atlas overflow warning, further overflows are clipped silently");
        }
    }

    /// Delete every texture and reset the packer
    pub fn release<B: GraphicsBackend + ?Sized>(&mut self, backend: &mut B) {
        for page in self.pages.drain(..) {
            backend.delete_texture(page.texture);
        }
        self.x = 0;
        self.y = 0;
        self.shelf_height = 0;
        self.warnings = 0;
    }
}
