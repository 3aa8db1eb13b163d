//! Font library context
//!
//! One [`FontLibrary`] stands for one initialized rasterizer. It is passed
//! explicitly to every face constructor; each [`Face`] holds a clone, so the
//! library is torn down exactly once, after the last face is gone.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use super::error::FontResult;
use super::face::{Face, FontFace};
use super::fontdue_face::FontdueFace;
use super::kerning::DEFAULT_KERNING_CACHE_SIZE;

struct LibraryInner {
    kerning_cache_size: usize,
    faces: Cell<usize>,
}

impl Drop for LibraryInner {
    fn drop(&mut self) {
        log::debug!("Font library shut down");
    }
}

/// Shared rasterizer context
#[derive(Clone)]
pub struct FontLibrary {
    inner: Rc<LibraryInner>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// Initialize a library with the default kerning table size
    pub fn new() -> Self {
        Self::with_kerning_cache_size(DEFAULT_KERNING_CACHE_SIZE)
    }

    /// Initialize a library whose faces precompute kerning for the first
    /// `size` glyph indices; 0 disables the table
    pub fn with_kerning_cache_size(size: usize) -> Self {
        log::debug!("Font library initialized (kerning table {}x{})", size, size);
        Self {
            inner: Rc::new(LibraryInner {
                kerning_cache_size: size,
                faces: Cell::new(0),
            }),
        }
    }

    /// Kerning table size applied to new faces
    pub fn kerning_cache_size(&self) -> usize {
        self.inner.kerning_cache_size
    }

    /// Number of faces currently open
    pub fn face_count(&self) -> usize {
        self.inner.faces.get()
    }

    pub(crate) fn face_opened(&self) {
        self.inner.faces.set(self.inner.faces.get() + 1);
    }

    pub(crate) fn face_closed(&self) {
        self.inner.faces.set(self.inner.faces.get().saturating_sub(1));
    }

    /// Wrap an already constructed rasterizer face
    pub fn attach<F: FontFace>(&self, raw: F) -> Face<F> {
        Face::new(self.clone(), raw)
    }

    /// Open the first face of a font file
    pub fn open_face_from_file(&self, path: impl AsRef<Path>) -> FontResult<Face<FontdueFace>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::info!("Loading font {}", path.display());
        self.open_face_from_bytes(bytes, 0)
    }

    /// Open a face from font data in memory
    ///
    /// `collection_index` picks the face inside a font collection and is
    /// ignored for single-face files.
    pub fn open_face_from_bytes(&self, bytes: Vec<u8>, collection_index: u32) -> FontResult<Face<FontdueFace>> {
        let raw = FontdueFace::from_bytes(bytes, collection_index)?;
        log::info!(
            "Opened face with {} glyphs (kerning: {})",
            raw.glyph_count(),
            if raw.has_kerning() { "yes" } else { "no" }
        );
        Ok(self.attach(raw))
    }
}
