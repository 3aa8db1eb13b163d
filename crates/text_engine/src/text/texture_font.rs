//! Atlas-backed glyph realization
//!
//! [`TextureGlyphs`] uploads each glyph bitmap into a [`GlyphAtlas`] and
//! draws it as one textured quad through a [`GraphicsBackend`]. The backend
//! type is a parameter so calls are statically dispatched; it defaults to
//! `dyn GraphicsBackend` for callers that hold a boxed backend.

use std::marker::PhantomData;

use crate::foundation::math::{Vec2, Vec3};
use crate::render::{GraphicsBackend, QuadVertex, TextureHandle, TexturedQuad};

use super::atlas::GlyphAtlas;
use super::error::FontResult;
use super::face::{Bitmap, GlyphSlot, LoadFlags, SizeMetrics};
use super::glyph::{Glyph, GlyphRealizer, RenderMode};

/// Outline stroke radius in pixels (180 in 26.6 fixed point)
pub const STROKE_RADIUS: f32 = 180.0 / 64.0;

/// Atlas location and geometry of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureGlyph {
    /// Atlas texture, `None` for glyphs without pixels
    pub texture: Option<TextureHandle>,
    /// Top-left texture coordinate
    pub uv_min: Vec2,
    /// Bottom-right texture coordinate
    pub uv_max: Vec2,
    /// Quad size in pixels
    pub width: u32,
    /// Quad height in pixels
    pub height: u32,
    /// Offset from the pen to the quad's top-left corner (y up)
    pub corner: Vec2,
}

/// Glyph realizer that packs bitmaps into atlas textures of backend `B`
pub struct TextureGlyphs<B: GraphicsBackend + ?Sized = dyn GraphicsBackend> {
    atlas: GlyphAtlas,
    stroke: bool,
    active_texture: Option<TextureHandle>,
    backend: PhantomData<fn(&mut B)>,
}

impl<B: GraphicsBackend + ?Sized> TextureGlyphs<B> {
    /// Create a realizer; `stroke` renders glyph outlines dilated by
    /// [`STROKE_RADIUS`]
    pub fn new(stroke: bool) -> Self {
        Self {
            atlas: GlyphAtlas::new(stroke),
            stroke,
            active_texture: None,
            backend: PhantomData,
        }
    }

    /// Whether glyphs are stroked
    pub fn stroke(&self) -> bool {
        self.stroke
    }

    /// Underlying atlas
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }
}

impl<B: GraphicsBackend + ?Sized> GlyphRealizer for TextureGlyphs<B> {
    type Payload = TextureGlyph;
    type Target = B;

    fn load_flags(&self) -> LoadFlags {
        LoadFlags::NO_HINTING | LoadFlags::NO_BITMAP
    }

    fn realize(&mut self, backend: &mut B, slot: &GlyphSlot) -> FontResult<TextureGlyph> {
        let stroked;
        let bitmap = if self.stroke && !slot.bitmap.is_empty() {
            stroked = stroke_bitmap(&slot.bitmap, STROKE_RADIUS);
            &stroked
        } else {
            &slot.bitmap
        };

        let corner = Vec2::new(bitmap.left as f32, bitmap.top as f32);
        if bitmap.is_empty() {
            return Ok(TextureGlyph {
                texture: None,
                uv_min: Vec2::zeros(),
                uv_max: Vec2::zeros(),
                width: 0,
                height: 0,
                corner,
            });
        }

        let placement = self.atlas.place(backend, bitmap.width, bitmap.rows)?;
        let region = self.atlas.upload(backend, &placement, bitmap)?;

        let (tex_w, tex_h) = (placement.page.width as f32, placement.page.height as f32);
        Ok(TextureGlyph {
            texture: Some(placement.page.texture),
            uv_min: Vec2::new(region.x as f32 / tex_w, region.y as f32 / tex_h),
            uv_max: Vec2::new(
                (region.x + region.width) as f32 / tex_w,
                (region.y + region.height) as f32 / tex_h,
            ),
            width: region.width,
            height: region.height,
            corner,
        })
    }

    fn begin_render(&mut self, _backend: &mut B) {
        self.active_texture = None;
    }

    fn draw(&mut self, backend: &mut B, glyph: &Glyph<TextureGlyph>, pen: Vec3, _mode: RenderMode) {
        let quad = &glyph.payload;
        let Some(texture) = quad.texture else {
            return;
        };

        if self.active_texture != Some(texture) {
            backend.bind_texture(texture);
            self.active_texture = Some(texture);
        }

        let dx = (pen.x + quad.corner.x).floor();
        let dy = (pen.y + quad.corner.y).floor();
        let (w, h) = (quad.width as f32, quad.height as f32);
        let (u0, v0, u1, v1) = (quad.uv_min.x, quad.uv_min.y, quad.uv_max.x, quad.uv_max.y);

        backend.draw_quad(&TexturedQuad {
            vertices: [
                QuadVertex {
                    position: [dx, dy, pen.z],
                    uv: [u0, v0],
                },
                QuadVertex {
                    position: [dx, dy - h, pen.z],
                    uv: [u0, v1],
                },
                QuadVertex {
                    position: [dx + w, dy - h, pen.z],
                    uv: [u1, v1],
                },
                QuadVertex {
                    position: [dx + w, dy, pen.z],
                    uv: [u1, v0],
                },
            ],
        });
    }

    fn resize(&mut self, metrics: &SizeMetrics, glyph_count: usize) {
        self.atlas.configure(metrics.width, metrics.height, glyph_count);
    }

    fn release(&mut self, backend: &mut B) {
        self.atlas.release(backend);
        self.active_texture = None;
    }
}

/// Dilate a coverage bitmap by a round brush of `radius` pixels
///
/// The result grows by `ceil(radius)` on every side and its bearing moves
/// accordingly. Coverage fades out over the last pixel of the brush.
pub fn stroke_bitmap(bitmap: &Bitmap, radius: f32) -> Bitmap {
    let grow = radius.ceil() as i32;
    let width = bitmap.width as i32 + 2 * grow;
    let rows = bitmap.rows as i32 + 2 * grow;

    let mut kernel = Vec::new();
    for ky in -grow..=grow {
        for kx in -grow..=grow {
            let distance = ((kx * kx + ky * ky) as f32).sqrt();
            let weight = (radius + 0.5 - distance).clamp(0.0, 1.0);
            if weight > 0.0 {
                kernel.push((kx, ky, weight));
            }
        }
    }

    let source = |x: i32, y: i32| -> f32 {
        if x < 0 || y < 0 || x >= bitmap.width as i32 || y >= bitmap.rows as i32 {
            return 0.0;
        }
        bitmap
            .pixels
            .get((y * bitmap.width as i32 + x) as usize)
            .map_or(0.0, |&alpha| f32::from(alpha))
    };

    let mut pixels = vec![0u8; (width * rows) as usize];
    for y in 0..rows {
        for x in 0..width {
            let coverage = kernel
                .iter()
                .map(|&(kx, ky, weight)| source(x - grow + kx, y - grow + ky) * weight)
                .fold(0.0f32, f32::max);
            pixels[(y * width + x) as usize] = coverage.round().min(255.0) as u8;
        }
    }

    Bitmap {
        width: width as u32,
        rows: rows as u32,
        left: bitmap.left - grow,
        top: bitmap.top + grow,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::BBox;
    use crate::render::SoftwareBackend;
    use approx::assert_relative_eq;

    fn slot(width: u32, rows: u32) -> GlyphSlot {
        GlyphSlot {
            index: 1,
            advance: Vec3::new(width as f32, 0.0, 0.0),
            bbox: BBox::from_extents(0.0, 0.0, width as f32, rows as f32),
            bitmap: Bitmap {
                width,
                rows,
                left: 1,
                top: rows as i32,
                pixels: vec![200; (width * rows) as usize],
            },
        }
    }

    fn sized_realizer(stroke: bool) -> TextureGlyphs<SoftwareBackend> {
        let mut glyphs = TextureGlyphs::new(stroke);
        let metrics = SizeMetrics {
            point_size: 12.0,
            x_resolution: 72,
            y_resolution: 72,
            ascender: 10.0,
            descender: -2.0,
            height: 12.0,
            width: 10.0,
        };
        glyphs.resize(&metrics, 10);
        glyphs
    }

    #[test]
    fn test_realize_uploads_and_computes_uvs() {
        let mut backend = SoftwareBackend::new(1024);
        let mut glyphs = sized_realizer(false);

        let payload = glyphs.realize(&mut backend, &slot(8, 10)).unwrap();
        let page = glyphs.atlas().pages()[0];
        assert_eq!((page.width, page.height), (128, 32));

        assert_eq!(payload.texture, Some(page.texture));
        assert_relative_eq!(payload.uv_min.x, 3.0 / 128.0);
        assert_relative_eq!(payload.uv_min.y, 3.0 / 32.0);
        assert_relative_eq!(payload.uv_max.x, 11.0 / 128.0);
        assert_relative_eq!(payload.uv_max.y, 13.0 / 32.0);
        assert_relative_eq!(payload.corner.y, 10.0);

        let texture = backend.texture(page.texture).unwrap();
        assert_eq!(texture.pixel(3, 3), Some(200));
        assert_eq!(texture.pixel(2, 3), Some(0));
    }

    #[test]
    fn test_empty_bitmap_takes_no_space() {
        let mut backend = SoftwareBackend::new(1024);
        let mut glyphs = sized_realizer(false);

        let payload = glyphs.realize(&mut backend, &slot(0, 0)).unwrap();
        assert_eq!(payload.texture, None);
        assert!(glyphs.atlas().pages().is_empty());

        let glyph = Glyph {
            advance: Vec3::new(4.0, 0.0, 0.0),
            bbox: BBox::default(),
            payload,
        };
        glyphs.draw(&mut backend, &glyph, Vec3::zeros(), RenderMode::FRONT);
        assert!(backend.draw_calls().is_empty());
    }

    #[test]
    fn test_draw_quad_corners_and_bind_once() {
        let mut backend = SoftwareBackend::new(1024);
        let mut glyphs = sized_realizer(false);
        let payload = glyphs.realize(&mut backend, &slot(8, 10)).unwrap();
        let glyph = Glyph {
            advance: Vec3::new(8.0, 0.0, 0.0),
            bbox: BBox::default(),
            payload,
        };

        glyphs.begin_render(&mut backend);
        glyphs.draw(&mut backend, &glyph, Vec3::new(10.6, 20.2, 0.0), RenderMode::FRONT);
        glyphs.draw(&mut backend, &glyph, Vec3::new(18.6, 20.2, 0.0), RenderMode::FRONT);
        assert_eq!(backend.bind_count(), 1);

        let quad = backend.draw_calls()[0].quad;
        // corner (1, 10) from the pen, floored
        assert_eq!(quad.vertices[0].position, [11.0, 30.0, 0.0]);
        assert_eq!(quad.vertices[1].position, [11.0, 20.0, 0.0]);
        assert_eq!(quad.vertices[2].position, [19.0, 20.0, 0.0]);
        assert_eq!(quad.vertices[3].position, [19.0, 30.0, 0.0]);
        assert_eq!(quad.vertices[1].uv, [payload.uv_min.x, payload.uv_max.y]);

        glyphs.begin_render(&mut backend);
        glyphs.draw(&mut backend, &glyph, Vec3::zeros(), RenderMode::FRONT);
        assert_eq!(backend.bind_count(), 2);
    }

    #[test]
    fn test_stroke_grows_bitmap_and_bearing() {
        let source = Bitmap {
            width: 1,
            rows: 1,
            left: 2,
            top: 5,
            pixels: vec![255],
        };
        let stroked = stroke_bitmap(&source, STROKE_RADIUS);

        assert_eq!((stroked.width, stroked.rows), (7, 7));
        assert_eq!((stroked.left, stroked.top), (-1, 8));
        assert_eq!(stroked.pixels[3 * 7 + 3], 255);
        assert_eq!(stroked.pixels[3 * 7 + 5], 255);
        // Corner of the 7x7 box lies outside the round brush
        assert_eq!(stroked.pixels[0], 0);
    }

    #[test]
    fn test_stroked_font_uses_wider_padding() {
        let mut backend = SoftwareBackend::new(1024);
        let mut glyphs = sized_realizer(true);
        assert_eq!(glyphs.atlas().padding(), 7);

        let payload = glyphs.realize(&mut backend, &slot(4, 4)).unwrap();
        assert_eq!((payload.width, payload.height), (10, 10));
        assert_relative_eq!(payload.corner.x, -2.0);
    }
}
