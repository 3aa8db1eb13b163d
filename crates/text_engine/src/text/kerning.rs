//! Precomputed kerning table
//!
//! Pairs of glyph indices below the table size are answered from a flat
//! array filled once per face size. Larger indices are queried from the face
//! on every call.

use crate::foundation::math::Vec2;

use super::face::{FontFace, GlyphIndex};

/// Default number of glyph indices covered by the table on each axis
pub const DEFAULT_KERNING_CACHE_SIZE: usize = 128;

/// Kerning lookup for one face
#[derive(Debug, Clone)]
pub struct KerningCache {
    size: usize,
    has_kerning: bool,
    table: Option<Vec<f32>>,
    disabled: bool,
}

impl KerningCache {
    /// Record whether the face kerns; no pair is queried until
    /// [`Self::rebuild`]
    ///
    /// The table covers at most `size` indices and never more than the face
    /// has glyphs. `size` 0 never builds a table.
    pub fn new<F: FontFace + ?Sized>(face: &F, size: usize) -> Self {
        let size = size.min(face.glyph_count());
        Self {
            size,
            has_kerning: face.has_kerning(),
            table: None,
            disabled: size == 0,
        }
    }

    /// Query every pair below the table size and store the results
    ///
    /// A single failed query drops the table for good and every later call
    /// goes to the face directly.
    pub fn build<F: FontFace + ?Sized>(face: &F, size: usize) -> Self {
        let mut cache = Self::new(face, size);
        cache.rebuild(face);
        cache
    }

    /// Refill the table after the face changed size
    pub fn rebuild<F: FontFace + ?Sized>(&mut self, face: &F) {
        self.table = None;
        if self.disabled || !self.has_kerning {
            return;
        }

        let n = self.size;
        let mut table = vec![0.0; n * n * 2];
        for j in 0..n {
            for i in 0..n {
                match face.kerning(i as GlyphIndex, j as GlyphIndex) {
                    Ok(kern) => {
                        table[2 * (j * n + i)] = kern.x;
                        table[2 * (j * n + i) + 1] = kern.y;
                    }
                    Err(e) => {
                        log::debug!("Kerning table disabled, pair ({}, {}) failed: {}", i, j, e);
                        self.disabled = true;
                        return;
                    }
                }
            }
        }
        self.table = Some(table);
    }

    /// Whether pairs below the table size are served from memory
    pub fn is_cached(&self) -> bool {
        self.table.is_some()
    }

    /// Number of glyph indices covered on each axis
    pub fn size(&self) -> usize {
        self.size
    }

    /// Kerning offset between `left` and `right`
    ///
    /// Zero when the face has no kerning data or either index is the
    /// missing glyph. A failed direct query is reported as zero.
    pub fn advance<F: FontFace + ?Sized>(&self, face: &F, left: GlyphIndex, right: GlyphIndex) -> Vec2 {
        if !self.has_kerning || left == 0 || right == 0 {
            return Vec2::zeros();
        }

        if let (Some(table), Ok(i), Ok(j)) = (&self.table, usize::try_from(left), usize::try_from(right)) {
            if i < self.size && j < self.size {
                let at = 2 * (j * self.size + i);
                return Vec2::new(table[at], table[at + 1]);
            }
        }

        face.kerning(left, right).unwrap_or_else(|e| {
            log::debug!("Kerning query ({}, {}) failed: {}", left, right, e);
            Vec2::zeros()
        })
    }
}
