//! Text rendering system
//!
//! Font faces, glyph caching, atlas packing and text layout.
//!
//! The pipeline for drawing a string is:
//! 1. [`FontLibrary`] opens a [`Face`] from font data
//! 2. [`Font`] sizes the face and realizes glyphs on demand through a
//!    [`GlyphRealizer`] ([`TextureGlyphs`] or [`PixmapGlyphs`])
//! 3. [`SimpleLayout`] wraps and aligns the text, then measures or draws it

pub mod atlas;
pub mod charmap;
pub mod config;
pub mod error;
pub mod face;
pub mod font;
pub mod fontdue_face;
pub mod glyph;
pub mod glyph_store;
pub mod kerning;
pub mod layout;
pub mod library;
pub mod pixmap_font;
pub mod texture_font;
pub mod unicode;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;

pub use atlas::{AtlasPage, AtlasPlacement, GlyphAtlas};
pub use charmap::{CodepointIndexCache, SparseIndexMap};
pub use config::{FontConfig, LayoutConfig, TextConfig};
pub use error::{FontError, FontResult};
pub use face::{Bitmap, Encoding, Face, FontFace, GlyphIndex, GlyphSlot, LoadFlags, SizeMetrics};
pub use font::Font;
pub use fontdue_face::FontdueFace;
pub use glyph::{Glyph, GlyphRealizer, RenderMode};
pub use glyph_store::GlyphStore;
pub use kerning::KerningCache;
pub use layout::{Layout, SimpleLayout, TextAlignment};
pub use library::FontLibrary;
pub use pixmap_font::PixmapGlyphs;
pub use texture_font::{TextureGlyph, TextureGlyphs};
pub use unicode::{CodeUnit, UnicodeCursor, UnicodeText};
