//! Fonts: a face at one size with a glyph realization strategy
//!
//! [`Font`] ties together the [`Face`], the per-size [`GlyphStore`] and the
//! [`GlyphRealizer`] that turns glyphs into something drawable. Until a
//! face size has been set successfully every measuring or drawing call
//! returns an empty result.

use crate::foundation::math::{BBox, Vec3};

use super::error::{FontError, FontResult};
use super::face::{Encoding, Face, FontFace, LoadFlags, SizeMetrics};
use super::glyph::{Glyph, GlyphRealizer, RenderMode};
use super::glyph_store::GlyphStore;
use super::unicode::{decode, UnicodeText};

/// A sized font
pub struct Font<F: FontFace, R: GlyphRealizer> {
    face: Face<F>,
    realizer: R,
    store: Option<GlyphStore<R::Payload>>,
    load_flags: LoadFlags,
}

impl<F: FontFace, R: GlyphRealizer> Font<F, R> {
    /// Create a font without a size; call [`Font::set_face_size`] before use
    pub fn new(face: Face<F>, realizer: R) -> Self {
        let load_flags = realizer.load_flags();
        Self {
            face,
            realizer,
            store: None,
            load_flags,
        }
    }

    /// Create a font and set its size
    pub fn with_size(
        face: Face<F>,
        realizer: R,
        target: &mut R::Target,
        point_size: f32,
        resolution: u32,
    ) -> FontResult<Self> {
        let mut font = Self::new(face, realizer);
        font.set_face_size(target, point_size, resolution)?;
        Ok(font)
    }

    /// Change the point size and resolution
    ///
    /// Every realized glyph is dropped and resources held in `target` are
    /// released. On failure the font stays unusable until a size succeeds.
    pub fn set_face_size(&mut self, target: &mut R::Target, point_size: f32, resolution: u32) -> FontResult<()> {
        self.realizer.release(target);
        self.store = None;

        let metrics = self.face.set_size(point_size, resolution)?;
        let store = GlyphStore::attach(self.face.raw_mut())?;
        self.realizer.resize(&metrics, self.face.glyph_count());
        self.store = Some(store);

        log::info!("Font set to {}pt at {}dpi", point_size, resolution);
        Ok(())
    }

    /// Current size metrics
    pub fn size(&self) -> Option<&SizeMetrics> {
        self.store.as_ref().and(self.face.size())
    }

    /// Current size in points, 0 when unsized
    pub fn face_size(&self) -> f32 {
        self.size().map_or(0.0, |metrics| metrics.point_size)
    }

    /// Flags used to load glyphs
    pub fn load_flags(&self) -> LoadFlags {
        self.load_flags
    }

    /// Override the load flags chosen by the realizer
    pub fn set_load_flags(&mut self, flags: LoadFlags) {
        self.load_flags = flags;
    }

    /// Character maps provided by the face
    pub fn charmaps(&self) -> &[Encoding] {
        self.face.charmaps()
    }

    /// Select a character map
    pub fn select_charmap(&mut self, encoding: Encoding) -> FontResult<()> {
        match self.store.as_mut() {
            Some(store) => store.select_charmap(self.face.raw_mut(), encoding),
            None => self.face.raw_mut().select_charmap(encoding),
        }
    }

    /// Ascender in pixels
    pub fn ascender(&self) -> f32 {
        self.size().map_or(0.0, |metrics| metrics.ascender)
    }

    /// Descender in pixels (negative below the baseline)
    pub fn descender(&self) -> f32 {
        self.size().map_or(0.0, |metrics| metrics.descender)
    }

    /// Distance between baselines in pixels
    pub fn line_height(&self) -> f32 {
        self.size().map_or(0.0, |metrics| metrics.height)
    }

    /// Face this font renders
    pub fn face(&self) -> &Face<F> {
        &self.face
    }

    /// Realization strategy
    pub fn realizer(&self) -> &R {
        &self.realizer
    }

    /// Number of glyphs realized at the current size
    pub fn glyph_count(&self) -> usize {
        self.store.as_ref().map_or(0, GlyphStore::len)
    }

    /// Realized glyph for a code point
    pub fn glyph(&self, codepoint: u32) -> Option<&Glyph<R::Payload>> {
        self.store.as_ref()?.glyph(codepoint)
    }

    /// Realize the glyph for `codepoint` if it is not cached yet
    pub fn ensure(&mut self, target: &mut R::Target, codepoint: u32) -> FontResult<()> {
        let store = self.store.as_mut().ok_or(FontError::NoSize)?;
        store.ensure(&mut self.face, &mut self.realizer, target, codepoint, self.load_flags)
    }

    /// Whether a glyph is available for `codepoint`, realizing it if needed
    pub fn check_glyph(&mut self, target: &mut R::Target, codepoint: u32) -> bool {
        match self.ensure(target, codepoint) {
            Ok(()) => true,
            Err(FontError::NoSize) => false,
            Err(e) => {
                log::debug!("Glyph U+{:04X} unavailable: {}", codepoint, e);
                false
            }
        }
    }

    /// Bounding box of a single glyph, empty if it is unavailable
    pub fn glyph_bbox(&mut self, target: &mut R::Target, codepoint: u32) -> BBox {
        if !self.check_glyph(target, codepoint) {
            return BBox::default();
        }
        self.store.as_ref().map(|store| store.bbox(codepoint)).unwrap_or_default()
    }

    /// Advance of `codepoint` followed by `next`, kerning included
    pub fn glyph_advance(&mut self, target: &mut R::Target, codepoint: u32, next: Option<u32>) -> f32 {
        if !self.check_glyph(target, codepoint) {
            return 0.0;
        }
        match self.store.as_mut() {
            Some(store) => store.advance(&self.face, codepoint, next),
            None => 0.0,
        }
    }

    /// Draw one glyph at `pen` and return the pen for the next glyph
    pub fn render_glyph(
        &mut self,
        target: &mut R::Target,
        codepoint: u32,
        next: Option<u32>,
        pen: Vec3,
        mode: RenderMode,
    ) -> Vec3 {
        if !self.check_glyph(target, codepoint) {
            return pen;
        }
        match self.store.as_mut() {
            Some(store) => store.render(&self.face, &mut self.realizer, target, codepoint, next, pen, mode),
            None => pen,
        }
    }

    /// Prepare the realizer for a batch of glyph draws
    pub fn begin_render(&mut self, target: &mut R::Target) {
        self.realizer.begin_render(target);
    }

    /// Bounding box of a whole string laid out on one line from `position`
    ///
    /// `spacing` is added between glyphs. Unavailable glyphs are skipped.
    pub fn bbox<T: UnicodeText + ?Sized>(
        &mut self,
        target: &mut R::Target,
        text: &T,
        position: Vec3,
        spacing: Vec3,
    ) -> BBox {
        let mut total: Option<BBox> = None;
        let mut position = position;
        let mut chars = decode(text);

        for i in 0.. {
            let Some(codepoint) = chars.get() else {
                break;
            };
            let next = chars.peek();
            chars.advance();

            if !self.check_glyph(target, codepoint) {
                continue;
            }
            if i > 0 {
                position += spacing;
            }

            let glyph_box = self.glyph_bbox(target, codepoint) + position;
            total = Some(match total {
                Some(total) => total | glyph_box,
                None => glyph_box,
            });
            position.x += self.glyph_advance(target, codepoint, next);
        }

        total.unwrap_or_default()
    }

    /// Total advance of a string with `spacing` between glyphs
    pub fn advance<T: UnicodeText + ?Sized>(&mut self, target: &mut R::Target, text: &T, spacing: Vec3) -> f32 {
        let mut advance = 0.0;
        let mut chars = decode(text);

        while let Some(codepoint) = chars.get() {
            let next = chars.peek();
            chars.advance();

            advance += self.glyph_advance(target, codepoint, next);
            if next.is_some() {
                advance += spacing.x;
            }
        }
        advance
    }

    /// Draw a string on one line starting at `position` and return the pen
    /// after the last glyph
    pub fn render<T: UnicodeText + ?Sized>(
        &mut self,
        target: &mut R::Target,
        text: &T,
        position: Vec3,
        spacing: Vec3,
        mode: RenderMode,
    ) -> Vec3 {
        self.begin_render(target);

        let mut pen = position;
        let mut chars = decode(text);
        while let Some(codepoint) = chars.get() {
            let next = chars.peek();
            chars.advance();

            pen = self.render_glyph(target, codepoint, next, pen, mode);
            if next.is_some() {
                pen += spacing;
            }
        }
        pen
    }
}
