//! Test doubles: a rasterizer face with fixed metrics and a realizer that
//! records what it draws

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::foundation::math::{BBox, Vec2, Vec3};

use super::error::{FontError, FontResult};
use super::face::{Bitmap, Encoding, FontFace, GlyphIndex, GlyphSlot, LoadFlags, SizeMetrics};
use super::glyph::{Glyph, GlyphRealizer, RenderMode};
use super::unicode::is_whitespace;

/// Every glyph advances the pen by this much
pub const MOCK_ADVANCE: f32 = 10.0;

/// Face where code point N maps to glyph N and every glyph is a 10x10 block
///
/// Whitespace glyphs have no ink. Under the symbol charmap, code point N maps
/// to glyph N + 1.
pub struct MockFace {
    charmaps: Vec<Encoding>,
    active: Option<Encoding>,
    has_kerning: bool,
    kerning: HashMap<(GlyphIndex, GlyphIndex), f32>,
    failing_kerning: bool,
    failing_glyphs: HashSet<GlyphIndex>,
    glyph_limit: Option<usize>,
    char_index_queries: Cell<usize>,
    kerning_queries: Cell<usize>,
    size_requests: usize,
    glyph_loads: usize,
}

impl MockFace {
    pub fn new() -> Self {
        Self {
            charmaps: vec![Encoding::Unicode, Encoding::Symbol],
            active: Some(Encoding::Unicode),
            has_kerning: true,
            kerning: HashMap::new(),
            failing_kerning: false,
            failing_glyphs: HashSet::new(),
            glyph_limit: None,
            char_index_queries: Cell::new(0),
            kerning_queries: Cell::new(0),
            size_requests: 0,
            glyph_loads: 0,
        }
    }

    pub fn without_active_charmap(mut self) -> Self {
        self.active = None;
        self
    }

    pub fn with_charmaps(mut self, charmaps: &[Encoding]) -> Self {
        self.charmaps = charmaps.to_vec();
        self.active = charmaps.first().copied();
        self
    }

    pub fn with_kerning(mut self, left: GlyphIndex, right: GlyphIndex, x: f32) -> Self {
        self.kerning.insert((left, right), x);
        self
    }

    pub fn with_failing_kerning(mut self) -> Self {
        self.failing_kerning = true;
        self
    }

    pub fn without_kerning_table(mut self) -> Self {
        self.has_kerning = false;
        self
    }

    pub fn with_failing_glyph(mut self, index: GlyphIndex) -> Self {
        self.failing_glyphs.insert(index);
        self
    }

    /// Report `count` glyphs and reject kerning queries past them
    pub fn with_glyph_count(mut self, count: usize) -> Self {
        self.glyph_limit = Some(count);
        self
    }

    pub fn char_index_queries(&self) -> usize {
        self.char_index_queries.get()
    }

    pub fn kerning_queries(&self) -> usize {
        self.kerning_queries.get()
    }

    pub fn size_requests(&self) -> usize {
        self.size_requests
    }

    pub fn glyph_loads(&self) -> usize {
        self.glyph_loads
    }
}

impl FontFace for MockFace {
    fn glyph_count(&self) -> usize {
        self.glyph_limit.unwrap_or(256)
    }

    fn has_kerning(&self) -> bool {
        self.has_kerning
    }

    fn charmaps(&self) -> &[Encoding] {
        &self.charmaps
    }

    fn active_charmap(&self) -> Option<Encoding> {
        self.active
    }

    fn select_charmap(&mut self, encoding: Encoding) -> FontResult<()> {
        if !self.charmaps.contains(&encoding) {
            return Err(FontError::InvalidCharmap(encoding));
        }
        self.active = Some(encoding);
        Ok(())
    }

    fn set_char_size(&mut self, point_size: f32, x_resolution: u32, y_resolution: u32) -> FontResult<SizeMetrics> {
        self.size_requests += 1;
        if point_size <= 0.0 {
            return Err(FontError::InvalidSize {
                point_size,
                resolution: y_resolution,
            });
        }

        let height = point_size * y_resolution as f32 / 72.0;
        Ok(SizeMetrics {
            point_size,
            x_resolution,
            y_resolution,
            ascender: height * 0.75,
            descender: -height * 0.25,
            height,
            width: height * 10.0 / 12.0,
        })
    }

    fn char_index(&self, codepoint: u32) -> GlyphIndex {
        self.char_index_queries.set(self.char_index_queries.get() + 1);
        match self.active {
            Some(Encoding::Unicode) if codepoint < 0x3_0000 => codepoint as GlyphIndex,
            Some(Encoding::Symbol) => codepoint as GlyphIndex + 1,
            _ => 0,
        }
    }

    fn load_glyph(&mut self, index: GlyphIndex, _flags: LoadFlags) -> FontResult<GlyphSlot> {
        self.glyph_loads += 1;
        if self.failing_glyphs.contains(&index) {
            return Err(FontError::GlyphLoad {
                index,
                reason: "mock failure".to_string(),
            });
        }

        let blank = u32::try_from(index).is_ok_and(is_whitespace);
        let (width, rows) = if blank { (0, 0) } else { (10, 10) };
        Ok(GlyphSlot {
            index,
            advance: Vec3::new(MOCK_ADVANCE, 0.0, 0.0),
            bbox: BBox::from_extents(0.0, 0.0, width as f32, rows as f32),
            bitmap: Bitmap {
                width,
                rows,
                left: 0,
                top: rows as i32,
                pixels: vec![255; (width * rows) as usize],
            },
        })
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> FontResult<Vec2> {
        self.kerning_queries.set(self.kerning_queries.get() + 1);
        if self.failing_kerning {
            return Err(FontError::GlyphLoad {
                index: left,
                reason: "mock kerning failure".to_string(),
            });
        }
        if let Some(limit) = self.glyph_limit {
            for index in [left, right] {
                if usize::try_from(index).map_or(true, |i| i >= limit) {
                    return Err(FontError::InvalidGlyphIndex(index));
                }
            }
        }
        let x = self.kerning.get(&(left, right)).copied().unwrap_or(0.0);
        Ok(Vec2::new(x, 0.0))
    }
}

/// One recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub index: GlyphIndex,
    pub pen: Vec3,
}

/// Draw target that only remembers what happened to it
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub draws: Vec<DrawRecord>,
    pub begins: usize,
    pub releases: usize,
}

/// Realizer whose payload is the glyph index
#[derive(Debug, Default)]
pub struct RecordingGlyphs {
    realized: usize,
}

impl RecordingGlyphs {
    pub fn realized(&self) -> usize {
        self.realized
    }
}

impl GlyphRealizer for RecordingGlyphs {
    type Payload = GlyphIndex;
    type Target = RecordingTarget;

    fn realize(&mut self, _target: &mut RecordingTarget, slot: &GlyphSlot) -> FontResult<GlyphIndex> {
        self.realized += 1;
        Ok(slot.index)
    }

    fn begin_render(&mut self, target: &mut RecordingTarget) {
        target.begins += 1;
    }

    fn draw(&mut self, target: &mut RecordingTarget, glyph: &Glyph<GlyphIndex>, pen: Vec3, _mode: RenderMode) {
        target.draws.push(DrawRecord {
            index: glyph.payload,
            pen,
        });
    }

    fn release(&mut self, target: &mut RecordingTarget) {
        target.releases += 1;
    }
}
