//! # Text Engine
//!
//! Glyph-atlas font rendering and text layout for the Rust engine.
//!
//! ## Features
//!
//! - **Font Faces**: TrueType/OpenType loading through `fontdue`
//! - **Glyph Caching**: per-size glyph store with eager ASCII lookup and a
//!   sparse table for everything else
//! - **Kerning**: precomputed pair table with direct queries past its range
//! - **Texture Atlas**: shelf packing into power-of-two alpha textures
//! - **Layout**: greedy word wrap with left, center, right and justified lines
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let library = FontLibrary::new();
//!     let face = library.open_face_from_file("fonts/DejaVuSans.ttf")?;
//!
//!     let mut backend = SoftwareBackend::default();
//!     let mut font: Font<_, TextureGlyphs<SoftwareBackend>> = Font::new(face, TextureGlyphs::new(false));
//!     font.set_face_size(&mut backend, 16.0, 72)?;
//!
//!     let mut layout = SimpleLayout::new();
//!     layout.set_alignment(TextAlignment::Justify);
//!     layout.render(&mut font, &mut backend, "Hello, world", Vec3::zeros(), RenderMode::FRONT);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod text;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::{BBox, Vec2, Vec3},
        render::{Canvas, GraphicsBackend, SoftwareBackend},
        text::{
            Font, FontConfig, FontError, FontLibrary, FontResult, Layout, LayoutConfig, PixmapGlyphs, RenderMode,
            SimpleLayout, TextAlignment, TextConfig, TextureGlyphs,
        },
    };
}
