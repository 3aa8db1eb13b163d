//! Glyph Render Backend Trait
//!
//! Defines the interface between the glyph atlas and rendering backends.
//! Keeps the text system independent of Vulkan/OpenGL/software specifics:
//! a backend only has to allocate single-channel textures, accept
//! sub-rectangle uploads and draw textured quads.

use bytemuck::{Pod, Zeroable};

slotmap::new_key_type! {
    /// Handle to a single-channel (alpha) texture owned by a backend
    pub struct TextureHandle;
}

/// Errors reported by a graphics backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Requested texture is larger than the backend supports
    #[error("Texture {width}x{height} exceeds the maximum dimension {max}")]
    TextureTooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Largest supported dimension
        max: u32,
    },

    /// The handle does not refer to a live texture
    #[error("Unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),

    /// Upload region does not fit inside the texture
    #[error("Region {region:?} is outside a {width}x{height} texture")]
    RegionOutOfBounds {
        /// Rejected region
        region: TextureRegion,
        /// Texture width
        width: u32,
        /// Texture height
        height: u32,
    },

    /// Pixel buffer is shorter than the region requires
    #[error("Pixel data too short: expected {expected} bytes, got {actual}")]
    ShortPixelData {
        /// Bytes required by the region and row stride
        expected: usize,
        /// Bytes provided
        actual: usize,
    },
}

/// Rectangle inside a texture, in texels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRegion {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
}

/// Vertex data for glyph quads
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct QuadVertex {
    /// Position in layout space (y up)
    pub position: [f32; 3],
    /// Texture coordinates (normalized 0.0-1.0, v down)
    pub uv: [f32; 2],
}

/// One glyph quad: top-left, bottom-left, bottom-right, top-right
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TexturedQuad {
    /// Corner vertices in drawing order
    pub vertices: [QuadVertex; 4],
}

impl TexturedQuad {
    /// Minimum x/y of the quad in layout space
    pub fn origin(&self) -> [f32; 2] {
        let xs = self.vertices.iter().map(|v| v.position[0]);
        let ys = self.vertices.iter().map(|v| v.position[1]);
        [xs.fold(f32::INFINITY, f32::min), ys.fold(f32::INFINITY, f32::min)]
    }
}

/// Backend-agnostic glyph rendering interface
pub trait GraphicsBackend {
    /// Allocate a zero-filled single-channel texture
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureHandle, BackendError>;

    /// Release a texture; unknown handles are ignored
    fn delete_texture(&mut self, texture: TextureHandle);

    /// Write a sub-rectangle of pixel data into an existing texture
    ///
    /// # Arguments
    /// * `texture` - Destination texture
    /// * `region` - Destination rectangle, must lie inside the texture
    /// * `data` - Source pixels, one byte per texel
    /// * `bytes_per_row` - Source row stride, at least `region.width`
    fn write_texture(
        &mut self,
        texture: TextureHandle,
        region: TextureRegion,
        data: &[u8],
        bytes_per_row: u32,
    ) -> Result<(), BackendError>;

    /// Largest texture dimension the backend supports
    fn max_texture_size(&self) -> u32;

    /// Make `texture` the source for subsequent quads
    fn bind_texture(&mut self, texture: TextureHandle);

    /// Draw one textured quad with the bound texture
    fn draw_quad(&mut self, quad: &TexturedQuad);
}
