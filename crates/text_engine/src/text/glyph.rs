//! Realized glyphs and realization strategies

use bitflags::bitflags;

use crate::foundation::math::{BBox, Vec3};

use super::error::FontResult;
use super::face::{GlyphSlot, LoadFlags, SizeMetrics};

bitflags! {
    /// Which faces of a glyph to draw; flat glyphs only have a front
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderMode: u32 {
        /// Front face
        const FRONT = 0x0001;
        /// Back face
        const BACK = 0x0002;
        /// Extruded sides
        const SIDE = 0x0004;
        /// Everything
        const ALL = 0xffff;
    }
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::FRONT
    }
}

/// A glyph ready to be measured and drawn
///
/// Immutable once created. `payload` is whatever the realization strategy
/// needs to draw it again, such as an atlas rectangle or a bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph<P> {
    /// Pen advance
    pub advance: Vec3,
    /// Bounding box relative to the pen
    pub bbox: BBox,
    /// Strategy specific render data
    pub payload: P,
}

impl<P> Glyph<P> {
    /// Horizontal advance
    pub fn advance_x(&self) -> f32 {
        self.advance.x
    }
}

/// Strategy that turns loaded glyph slots into drawable payloads
///
/// `Target` is what the strategy draws into: a graphics backend for atlas
/// glyphs, a CPU canvas for pixmaps.
pub trait GlyphRealizer {
    /// Render data stored with each glyph
    type Payload;

    /// Draw destination
    type Target: ?Sized;

    /// Load flags to request from the rasterizer
    fn load_flags(&self) -> LoadFlags {
        LoadFlags::DEFAULT
    }

    /// Build the payload for a freshly loaded glyph
    fn realize(&mut self, target: &mut Self::Target, slot: &GlyphSlot) -> FontResult<Self::Payload>;

    /// Prepare for a batch of draws
    fn begin_render(&mut self, _target: &mut Self::Target) {}

    /// Draw a glyph with its origin at `pen`
    fn draw(&mut self, target: &mut Self::Target, glyph: &Glyph<Self::Payload>, pen: Vec3, mode: RenderMode);

    /// Adapt to a new face size; `glyph_count` glyphs may be realized
    fn resize(&mut self, _metrics: &SizeMetrics, _glyph_count: usize) {}

    /// Free every resource held in `target`; previously realized payloads
    /// become invalid
    fn release(&mut self, _target: &mut Self::Target) {}
}
