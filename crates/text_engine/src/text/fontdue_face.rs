//! [`FontFace`] implementation backed by `fontdue`

use fontdue::{Font, FontSettings};

use crate::foundation::math::{BBox, Vec2, Vec3};

use super::error::{FontError, FontResult};
use super::face::{Bitmap, Encoding, FontFace, GlyphIndex, GlyphSlot, LoadFlags, SizeMetrics};

const CHARMAPS: [Encoding; 1] = [Encoding::Unicode];

/// Points per inch
const POINTS_PER_INCH: f32 = 72.0;

/// TrueType/OpenType face rasterized with `fontdue`
///
/// `fontdue` has a single Unicode character map and no hinter, so hinting
/// related [`LoadFlags`] have no effect.
pub struct FontdueFace {
    font: Font,
    has_kerning: bool,
    /// Union of all glyph outlines in font units
    face_bbox: BBox,
    px: f32,
    active_charmap: Encoding,
}

impl FontdueFace {
    /// Parse font data; `collection_index` selects a face of a collection
    pub fn from_bytes(bytes: Vec<u8>, collection_index: u32) -> FontResult<Self> {
        let has_kerning = has_kerning_table(&bytes, collection_index);
        let settings = FontSettings {
            collection_index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(|e| FontError::FaceLoad(format!("fontdue error: {e}")))?;

        let upem = font.units_per_em();
        let mut face_bbox = BBox::invalid();
        for index in 0..font.glyph_count() {
            let bounds = font.metrics_indexed(index, upem).bounds;
            if bounds.width > 0.0 && bounds.height > 0.0 {
                face_bbox.merge(&BBox::from_extents(
                    bounds.xmin,
                    bounds.ymin,
                    bounds.xmin + bounds.width,
                    bounds.ymin + bounds.height,
                ));
            }
        }
        if !face_bbox.is_valid() {
            face_bbox = BBox::default();
        }

        Ok(Self {
            font,
            has_kerning,
            face_bbox,
            px: 0.0,
            active_charmap: Encoding::Unicode,
        })
    }

    /// Current size in pixels per em
    pub fn pixels_per_em(&self) -> f32 {
        self.px
    }

    fn glyph_id(&self, index: GlyphIndex) -> FontResult<u16> {
        match u16::try_from(index) {
            Ok(id) if id < self.font.glyph_count() => Ok(id),
            _ => Err(FontError::InvalidGlyphIndex(index)),
        }
    }
}

impl FontFace for FontdueFace {
    fn glyph_count(&self) -> usize {
        usize::from(self.font.glyph_count())
    }

    fn has_kerning(&self) -> bool {
        self.has_kerning
    }

    fn charmaps(&self) -> &[Encoding] {
        &CHARMAPS
    }

    fn active_charmap(&self) -> Option<Encoding> {
        Some(self.active_charmap)
    }

    fn select_charmap(&mut self, encoding: Encoding) -> FontResult<()> {
        if !CHARMAPS.contains(&encoding) {
            return Err(FontError::InvalidCharmap(encoding));
        }
        self.active_charmap = encoding;
        Ok(())
    }

    fn set_char_size(&mut self, point_size: f32, x_resolution: u32, y_resolution: u32) -> FontResult<SizeMetrics> {
        if point_size.is_nan() || point_size <= 0.0 || x_resolution == 0 || y_resolution == 0 {
            return Err(FontError::InvalidSize {
                point_size,
                resolution: y_resolution,
            });
        }

        let px = point_size * y_resolution as f32 / POINTS_PER_INCH;
        let scale = px / self.font.units_per_em();
        let (ascender, descender) = self
            .font
            .horizontal_line_metrics(px)
            .map_or((self.face_bbox.upper.y * scale, self.face_bbox.lower.y * scale), |m| {
                (m.ascent, m.descent)
            });

        self.px = px;
        Ok(SizeMetrics {
            point_size,
            x_resolution,
            y_resolution,
            ascender,
            descender,
            height: self.face_bbox.height() * scale,
            width: self.face_bbox.width() * scale,
        })
    }

    fn char_index(&self, codepoint: u32) -> GlyphIndex {
        char::from_u32(codepoint).map_or(0, |ch| GlyphIndex::from(self.font.lookup_glyph_index(ch)))
    }

    fn load_glyph(&mut self, index: GlyphIndex, _flags: LoadFlags) -> FontResult<GlyphSlot> {
        let id = self.glyph_id(index)?;
        if self.px <= 0.0 {
            return Err(FontError::NoSize);
        }

        let (metrics, pixels) = self.font.rasterize_indexed(id, self.px);
        let bounds = metrics.bounds;

        Ok(GlyphSlot {
            index,
            advance: Vec3::new(metrics.advance_width, 0.0, 0.0),
            bbox: BBox::from_extents(
                bounds.xmin,
                bounds.ymin,
                bounds.xmin + bounds.width,
                bounds.ymin + bounds.height,
            ),
            bitmap: Bitmap {
                width: metrics.width as u32,
                rows: metrics.height as u32,
                left: metrics.xmin,
                top: metrics.ymin + metrics.height as i32,
                pixels,
            },
        })
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> FontResult<Vec2> {
        let left = self.glyph_id(left)?;
        let right = self.glyph_id(right)?;
        let x = self.font.horizontal_kern_indexed(left, right, self.px).unwrap_or(0.0);
        Ok(Vec2::new(x, 0.0))
    }
}

/// Whether the face's table directory lists a `kern` or `GPOS` table
fn has_kerning_table(bytes: &[u8], collection_index: u32) -> bool {
    let read_u16 = |at: usize| bytes.get(at..at + 2).map(|b| u16::from_be_bytes([b[0], b[1]]));
    let read_u32 = |at: usize| {
        bytes
            .get(at..at + 4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    };

    let offset = if bytes.starts_with(b"ttcf") {
        let num_fonts = read_u32(8).unwrap_or(0);
        if collection_index >= num_fonts {
            return false;
        }
        match read_u32(12 + 4 * collection_index as usize) {
            Some(offset) => offset as usize,
            None => return false,
        }
    } else {
        0
    };

    let Some(num_tables) = read_u16(offset + 4) else {
        return false;
    };
    (0..usize::from(num_tables)).any(|table| {
        let record = offset + 12 + table * 16;
        matches!(bytes.get(record..record + 4), Some(b"kern" | b"GPOS"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_directory(tags: &[&[u8; 4]]) -> Vec<u8> {
        let mut bytes = vec![0, 1, 0, 0];
        bytes.extend_from_slice(&(tags.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);
        for tag in tags {
            bytes.extend_from_slice(*tag);
            bytes.extend_from_slice(&[0; 12]);
        }
        bytes
    }

    #[test]
    fn test_kerning_table_detection() {
        assert!(has_kerning_table(&table_directory(&[b"cmap", b"kern"]), 0));
        assert!(has_kerning_table(&table_directory(&[b"GPOS"]), 0));
        assert!(!has_kerning_table(&table_directory(&[b"cmap", b"glyf"]), 0));
        assert!(!has_kerning_table(&[0, 1], 0));
    }

    #[test]
    fn test_kerning_table_detection_in_collection() {
        let face = table_directory(&[b"kern"]);
        let mut bytes = b"ttcf".to_vec();
        bytes.extend_from_slice(&[0, 1, 0, 0]);
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&16u32.to_be_bytes());
        bytes.extend_from_slice(&face);

        assert!(has_kerning_table(&bytes, 0));
        assert!(!has_kerning_table(&bytes, 1));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            FontdueFace::from_bytes(b"not a font".to_vec(), 0),
            Err(FontError::FaceLoad(_))
        ));
    }
}
