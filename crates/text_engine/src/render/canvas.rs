//! CPU alpha canvas
//!
//! Target for pixmap glyphs. Layout space has y pointing up with the origin
//! on the first baseline; the canvas maps that origin to a pixel position and
//! flips y when blitting.

use std::path::Path;

use super::ExportError;

/// Single-channel image that glyph bitmaps are composited into
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    origin: (i32, i32),
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a cleared canvas whose layout origin is the bottom-left pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_origin(width, height, 0, height as i32)
    }

    /// Create a cleared canvas with the layout origin at pixel `(x, y)`
    pub fn with_origin(width: u32, height: u32, x: i32, y: i32) -> Self {
        Self {
            width,
            height,
            origin: (x, y),
            pixels: vec![0; (width * height) as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major alpha values, top row first
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Alpha value at a pixel, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Number of pixels with any coverage
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&a| a > 0).count()
    }

    /// Reset every pixel to zero
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Composite a coverage bitmap whose top-left corner sits at `(x, top)`
    /// in layout space. Overlapping coverage keeps the maximum; pixels
    /// outside the canvas are dropped.
    pub fn blit(&mut self, x: i32, top: i32, width: u32, rows: u32, coverage: &[u8]) {
        let left = self.origin.0 + x;
        let upper = self.origin.1 - top;

        for row in 0..rows as i32 {
            let py = upper + row;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for col in 0..width as i32 {
                let px = left + col;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }
                let Some(&alpha) = coverage.get((row * width as i32 + col) as usize) else {
                    continue;
                };
                let dst = &mut self.pixels[(py as u32 * self.width + px as u32) as usize];
                *dst = (*dst).max(alpha);
            }
        }
    }

    /// Write the canvas to disk as a grayscale PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let image = image::GrayImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            ExportError::InvalidDimensions {
                width: self.width,
                height: self.height,
            },
        )?;
        image.save(path.as_ref())?;
        log::debug!("Saved canvas to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_flips_y_around_origin() {
        let mut canvas = Canvas::with_origin(8, 8, 2, 6);
        // 2x2 bitmap whose top edge sits 2 units above the baseline
        canvas.blit(1, 2, 2, 2, &[10, 20, 30, 40]);

        assert_eq!(canvas.pixel(3, 4), Some(10));
        assert_eq!(canvas.pixel(4, 4), Some(20));
        assert_eq!(canvas.pixel(3, 5), Some(30));
        assert_eq!(canvas.pixel(4, 5), Some(40));
        assert_eq!(canvas.covered_pixels(), 4);
    }

    #[test]
    fn test_blit_clips_and_keeps_maximum() {
        let mut canvas = Canvas::new(4, 4);
        canvas.blit(-1, 4, 2, 1, &[200, 50]);
        canvas.blit(0, 4, 1, 1, &[10]);

        assert_eq!(canvas.pixel(0, 0), Some(50));
        assert_eq!(canvas.covered_pixels(), 1);

        canvas.clear();
        assert_eq!(canvas.covered_pixels(), 0);
    }
}
