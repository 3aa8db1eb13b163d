//! CPU glyph realization
//!
//! Keeps each glyph's coverage bitmap and composites it into a [`Canvas`].

use crate::foundation::math::Vec3;
use crate::render::Canvas;

use super::error::FontResult;
use super::face::{Bitmap, GlyphSlot};
use super::glyph::{Glyph, GlyphRealizer, RenderMode};

/// Glyph realizer that draws into a [`Canvas`]
#[derive(Debug, Default)]
pub struct PixmapGlyphs;

impl PixmapGlyphs {
    /// Create the realizer
    pub fn new() -> Self {
        Self
    }
}

impl GlyphRealizer for PixmapGlyphs {
    type Payload = Bitmap;
    type Target = Canvas;

    fn realize(&mut self, _canvas: &mut Canvas, slot: &GlyphSlot) -> FontResult<Bitmap> {
        Ok(slot.bitmap.clone())
    }

    fn draw(&mut self, canvas: &mut Canvas, glyph: &Glyph<Bitmap>, pen: Vec3, _mode: RenderMode) {
        let bitmap = &glyph.payload;
        if bitmap.is_empty() {
            return;
        }
        let x = pen.x.floor() as i32 + bitmap.left;
        let top = pen.y.floor() as i32 + bitmap.top;
        canvas.blit(x, top, bitmap.width, bitmap.rows, &bitmap.pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::BBox;

    #[test]
    fn test_draw_places_bitmap_at_bearing() {
        let mut canvas = Canvas::with_origin(16, 16, 0, 12);
        let mut glyphs = PixmapGlyphs::new();
        let glyph = Glyph {
            advance: Vec3::new(3.0, 0.0, 0.0),
            bbox: BBox::from_extents(1.0, 0.0, 3.0, 2.0),
            payload: Bitmap {
                width: 2,
                rows: 2,
                left: 1,
                top: 2,
                pixels: vec![9, 9, 9, 9],
            },
        };

        glyphs.draw(&mut canvas, &glyph, Vec3::new(4.7, 0.0, 0.0), RenderMode::FRONT);
        assert_eq!(canvas.pixel(5, 10), Some(9));
        assert_eq!(canvas.pixel(6, 11), Some(9));
        assert_eq!(canvas.covered_pixels(), 4);
    }
}
