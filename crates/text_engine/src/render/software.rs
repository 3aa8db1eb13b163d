//! In-memory graphics backend
//!
//! Keeps every texture as a CPU-side alpha buffer and records quad draw
//! calls instead of rasterizing them. Used by tooling (atlas dumps) and by
//! tests that need to inspect exactly what the glyph atlas uploaded.

use std::path::Path;

use slotmap::SlotMap;

use super::backend::{BackendError, GraphicsBackend, TextureHandle, TextureRegion, TexturedQuad};
use super::ExportError;

/// Default maximum texture dimension, matching common GPU limits
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 2048;

/// CPU-side single-channel texture
#[derive(Debug, Clone)]
pub struct SoftwareTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SoftwareTexture {
    /// Width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major alpha values
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Alpha value at a texel, `None` outside the texture
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// A recorded quad draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Texture bound when the quad was drawn
    pub texture: Option<TextureHandle>,
    /// Quad geometry
    pub quad: TexturedQuad,
}

/// Graphics backend that keeps textures in memory
pub struct SoftwareBackend {
    textures: SlotMap<TextureHandle, SoftwareTexture>,
    max_texture_size: u32,
    bound: Option<TextureHandle>,
    bind_count: usize,
    draws: Vec<DrawCall>,
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXTURE_SIZE)
    }
}

impl SoftwareBackend {
    /// Create a backend reporting `max_texture_size` as its limit
    pub fn new(max_texture_size: u32) -> Self {
        Self {
            textures: SlotMap::with_key(),
            max_texture_size: max_texture_size.max(1),
            bound: None,
            bind_count: 0,
            draws: Vec::new(),
        }
    }

    /// Look up a live texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&SoftwareTexture> {
        self.textures.get(handle)
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Quads drawn since the last [`Self::clear_draws`]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Number of texture binds since creation
    pub fn bind_count(&self) -> usize {
        self.bind_count
    }

    /// Forget recorded draw calls
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    /// Recorded quads as raw vertex bytes, ready for a GPU vertex buffer
    pub fn vertex_bytes(&self) -> Vec<u8> {
        let quads: Vec<TexturedQuad> = self.draws.iter().map(|draw| draw.quad).collect();
        bytemuck::cast_slice(&quads).to_vec()
    }

    /// Write a texture to disk as a grayscale PNG
    pub fn save_texture_png(&self, handle: TextureHandle, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let texture = self.textures.get(handle).ok_or(ExportError::UnknownTexture)?;
        let image = image::GrayImage::from_raw(texture.width, texture.height, texture.pixels.clone())
            .ok_or(ExportError::InvalidDimensions {
                width: texture.width,
                height: texture.height,
            })?;
        image.save(path.as_ref())?;
        log::debug!("Saved texture {:?} to {}", handle, path.as_ref().display());
        Ok(())
    }
}

impl GraphicsBackend for SoftwareBackend {
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureHandle, BackendError> {
        if width > self.max_texture_size || height > self.max_texture_size {
            return Err(BackendError::TextureTooLarge {
                width,
                height,
                max: self.max_texture_size,
            });
        }

        let handle = self.textures.insert(SoftwareTexture {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        });
        log::debug!("Created {}x{} texture {:?}", width, height, handle);
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(texture).is_some() && self.bound == Some(texture) {
            self.bound = None;
        }
    }

    fn write_texture(
        &mut self,
        texture: TextureHandle,
        region: TextureRegion,
        data: &[u8],
        bytes_per_row: u32,
    ) -> Result<(), BackendError> {
        let target = self
            .textures
            .get_mut(texture)
            .ok_or(BackendError::UnknownTexture(texture))?;

        if region.x + region.width > target.width || region.y + region.height > target.height {
            return Err(BackendError::RegionOutOfBounds {
                region,
                width: target.width,
                height: target.height,
            });
        }

        let stride = bytes_per_row.max(region.width) as usize;
        let expected = if region.height == 0 {
            0
        } else {
            stride * (region.height as usize - 1) + region.width as usize
        };
        if data.len() < expected {
            return Err(BackendError::ShortPixelData {
                expected,
                actual: data.len(),
            });
        }

        let width = region.width as usize;
        for row in 0..region.height as usize {
            let src = &data[row * stride..row * stride + width];
            let dst_start = (region.y as usize + row) * target.width as usize + region.x as usize;
            target.pixels[dst_start..dst_start + width].copy_from_slice(src);
        }
        Ok(())
    }

    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.bound = Some(texture);
        self.bind_count += 1;
    }

    fn draw_quad(&mut self, quad: &TexturedQuad) {
        self.draws.push(DrawCall {
            texture: self.bound,
            quad: *quad,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_texture_respects_limit() {
        let mut backend = SoftwareBackend::new(64);
        assert!(backend.create_texture(64, 32).is_ok());
        assert!(matches!(
            backend.create_texture(128, 32),
            Err(BackendError::TextureTooLarge { max: 64, .. })
        ));
    }

    #[test]
    fn test_write_sub_rectangle_with_stride() {
        let mut backend = SoftwareBackend::new(64);
        let handle = backend.create_texture(8, 8).unwrap();

        // 2x2 region taken from a 3-wide source buffer
        let data = [1, 2, 99, 3, 4, 99];
        let region = TextureRegion { x: 5, y: 6, width: 2, height: 2 };
        backend.write_texture(handle, region, &data, 3).unwrap();

        let texture = backend.texture(handle).unwrap();
        assert_eq!(texture.pixel(5, 6), Some(1));
        assert_eq!(texture.pixel(6, 6), Some(2));
        assert_eq!(texture.pixel(5, 7), Some(3));
        assert_eq!(texture.pixel(6, 7), Some(4));
        assert_eq!(texture.pixel(7, 7), Some(0));
    }

    #[test]
    fn test_write_outside_texture_is_rejected() {
        let mut backend = SoftwareBackend::new(64);
        let handle = backend.create_texture(4, 4).unwrap();
        let region = TextureRegion { x: 3, y: 0, width: 2, height: 1 };
        assert!(matches!(
            backend.write_texture(handle, region, &[0, 0], 2),
            Err(BackendError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_delete_texture_clears_binding() {
        let mut backend = SoftwareBackend::default();
        let handle = backend.create_texture(16, 16).unwrap();
        backend.bind_texture(handle);
        backend.delete_texture(handle);

        assert_eq!(backend.texture_count(), 0);
        backend.draw_quad(&TexturedQuad::default());
        assert_eq!(backend.draw_calls()[0].texture, None);
    }
}
