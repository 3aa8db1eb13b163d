//! Per-size glyph cache
//!
//! A [`GlyphStore`] realizes each code point at most once and keeps the
//! result until the face size changes, at which point the owning font drops
//! the whole store.

use crate::foundation::math::{BBox, Vec3};

use super::charmap::{CodepointIndexCache, SparseIndexMap, UNICODE_LIMIT};
use super::error::{FontError, FontResult};
use super::face::{Encoding, Face, FontFace, GlyphIndex, LoadFlags};
use super::glyph::{Glyph, GlyphRealizer, RenderMode};

/// Glyphs realized for one face size
pub struct GlyphStore<P> {
    charmap: CodepointIndexCache,
    /// Code point to 1-based position in `glyphs`; 0 means not realized
    slots: SparseIndexMap,
    glyphs: Vec<Glyph<P>>,
}

impl<P> GlyphStore<P> {
    /// Create an empty store bound to the face's active character map
    pub fn attach<F: FontFace + ?Sized>(face: &mut F) -> FontResult<Self> {
        Ok(Self {
            charmap: CodepointIndexCache::attach(face)?,
            slots: SparseIndexMap::new(),
            glyphs: Vec::new(),
        })
    }

    /// Character map in use
    pub fn encoding(&self) -> Encoding {
        self.charmap.encoding()
    }

    /// Switch character maps; glyphs realized under the old map are dropped
    pub fn select_charmap<F: FontFace + ?Sized>(&mut self, face: &mut F, encoding: Encoding) -> FontResult<()> {
        if self.charmap.encoding() == encoding {
            return Ok(());
        }
        self.charmap.select_charmap(face, encoding)?;
        self.slots.clear();
        self.glyphs.clear();
        Ok(())
    }

    /// Glyph index of a code point in the active character map
    pub fn font_index<F: FontFace + ?Sized>(&mut self, face: &F, codepoint: u32) -> GlyphIndex {
        self.charmap.font_index(face, codepoint)
    }

    /// Realized glyph for a code point
    pub fn glyph(&self, codepoint: u32) -> Option<&Glyph<P>> {
        match self.slots.find(codepoint) {
            0 => None,
            slot => self.glyphs.get(slot as usize - 1),
        }
    }

    /// Whether the code point has been realized
    pub fn contains(&self, codepoint: u32) -> bool {
        self.slots.find(codepoint) != 0
    }

    /// Number of realized glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether nothing has been realized yet
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn insert(&mut self, codepoint: u32, glyph: Glyph<P>) {
        self.glyphs.push(glyph);
        self.slots.insert(codepoint, self.glyphs.len() as GlyphIndex);
    }

    /// Make sure a glyph exists for `codepoint`, loading and realizing it on
    /// a miss
    ///
    /// Code points past the Unicode range have no slot and are rejected.
    pub fn ensure<F, R>(
        &mut self,
        face: &mut Face<F>,
        realizer: &mut R,
        target: &mut R::Target,
        codepoint: u32,
        flags: LoadFlags,
    ) -> FontResult<()>
    where
        F: FontFace,
        R: GlyphRealizer<Payload = P>,
    {
        if codepoint >= UNICODE_LIMIT {
            return Err(FontError::InvalidCodepoint(codepoint));
        }
        if self.contains(codepoint) {
            return Ok(());
        }

        let index = self.font_index(face.raw(), codepoint);
        let slot = face.load_glyph(index, flags)?;
        let payload = realizer.realize(target, &slot)?;

        self.insert(
            codepoint,
            Glyph {
                advance: slot.advance,
                bbox: slot.bbox,
                payload,
            },
        );
        Ok(())
    }

    /// Bounding box of a realized glyph, empty if it was never realized
    pub fn bbox(&self, codepoint: u32) -> BBox {
        self.glyph(codepoint).map(|glyph| glyph.bbox).unwrap_or_default()
    }

    /// Horizontal advance of `codepoint` followed by `next`, kerning
    /// included; 0 if the glyph was never realized
    pub fn advance<F: FontFace>(&mut self, face: &Face<F>, codepoint: u32, next: Option<u32>) -> f32 {
        let left = self.font_index(face.raw(), codepoint);
        let right = next.map_or(0, |next| self.font_index(face.raw(), next));

        match self.glyph(codepoint) {
            Some(glyph) => face.kern_advance(left, right).x + glyph.advance_x(),
            None => 0.0,
        }
    }

    /// Draw a realized glyph at `pen` and return the pen for the next glyph
    ///
    /// The pen is returned unchanged for a glyph that was never realized.
    pub fn render<F, R>(
        &mut self,
        face: &Face<F>,
        realizer: &mut R,
        target: &mut R::Target,
        codepoint: u32,
        next: Option<u32>,
        pen: Vec3,
        mode: RenderMode,
    ) -> Vec3
    where
        F: FontFace,
        R: GlyphRealizer<Payload = P>,
    {
        let left = self.font_index(face.raw(), codepoint);
        let right = next.map_or(0, |next| self.font_index(face.raw(), next));

        let Some(glyph) = self.glyph(codepoint) else {
            return pen;
        };
        let kern = face.kern_advance(left, right);
        realizer.draw(target, glyph, pen, mode);

        pen + glyph.advance + Vec3::new(kern.x, kern.y, 0.0)
    }
}
