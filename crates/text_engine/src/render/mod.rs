//! Rendering targets for glyphs
//!
//! [`GraphicsBackend`] is the texture/quad interface the glyph atlas draws
//! through. [`SoftwareBackend`] implements it in memory and [`Canvas`] is the
//! CPU target used by pixmap fonts.

pub mod backend;
pub mod canvas;
pub mod software;

pub use backend::{BackendError, GraphicsBackend, QuadVertex, TextureHandle, TextureRegion, TexturedQuad};
pub use canvas::Canvas;
pub use software::{DrawCall, SoftwareBackend, SoftwareTexture};

/// Errors raised when writing render targets to image files
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The texture handle is not live
    #[error("Texture does not exist")]
    UnknownTexture,

    /// Pixel buffer does not match the reported dimensions
    #[error("Pixel buffer does not match {width}x{height}")]
    InvalidDimensions {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Encoding or file error from the image crate
    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),
}
