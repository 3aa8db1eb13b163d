//! Multi-line text layout
//!
//! [`SimpleLayout`] wraps text greedily at a fixed line length and aligns
//! each line left, right, centered or justified. Measuring and rendering
//! share one traversal: with a bounds accumulator it measures, without one
//! it draws.
//!
//! # Coordinate System
//!
//! - The first baseline passes through `position`
//! - +X points right, +Y points up
//! - Each new line moves the pen down by `line_height * line_spacing`

use serde::{Deserialize, Serialize};

use crate::foundation::math::{BBox, Vec3};

use super::config::LayoutConfig;
use super::face::FontFace;
use super::font::Font;
use super::glyph::{GlyphRealizer, RenderMode};
use super::unicode::{is_whitespace, CodeUnit, UnicodeCursor, UnicodeText};

const NEWLINE: u32 = '\n' as u32;

/// Horizontal alignment of wrapped lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    /// Flush left
    #[default]
    Left,
    /// Centered in the line length
    Center,
    /// Flush right
    Right,
    /// Stretch whitespace so lines fill the line length; the last line is
    /// left aligned
    Justify,
}

/// A strategy for laying out text with a [`Font`]
pub trait Layout {
    /// Bounding box the text would cover when rendered at `position`
    fn measure<F, R, T>(&mut self, font: &mut Font<F, R>, target: &mut R::Target, text: &T, position: Vec3) -> BBox
    where
        F: FontFace,
        R: GlyphRealizer,
        T: UnicodeText + ?Sized;

    /// Draw the text at `position` and return the final pen position
    fn render<F, R, T>(
        &mut self,
        font: &mut Font<F, R>,
        target: &mut R::Target,
        text: &T,
        position: Vec3,
        mode: RenderMode,
    ) -> Vec3
    where
        F: FontFace,
        R: GlyphRealizer,
        T: UnicodeText + ?Sized;
}

/// Last whitespace run seen on the current line
#[derive(Debug, Clone, Copy)]
struct BreakPoint {
    /// Offset of the first whitespace of the run
    run_start: usize,
    /// Offset just past the latest whitespace of the run
    resume: usize,
}

/// Greedy word-wrapping layout
#[derive(Debug, Clone)]
pub struct SimpleLayout {
    line_length: f32,
    line_spacing: f32,
    alignment: TextAlignment,
    pen: Vec3,
}

impl Default for SimpleLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl SimpleLayout {
    /// Create a layout with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout from configuration
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            line_length: config.line_length,
            line_spacing: config.line_spacing,
            alignment: config.alignment,
            pen: Vec3::zeros(),
        }
    }

    /// Maximum line width in pixels
    pub fn line_length(&self) -> f32 {
        self.line_length
    }

    /// Set the maximum line width in pixels
    pub fn set_line_length(&mut self, line_length: f32) {
        self.line_length = line_length;
    }

    /// Multiplier applied to the font's line height
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    /// Set the multiplier applied to the font's line height
    pub fn set_line_spacing(&mut self, line_spacing: f32) {
        self.line_spacing = line_spacing;
    }

    /// Current alignment
    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Set the alignment
    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
    }

    /// Wrap `units` into lines and emit each one
    ///
    /// Widths are tracked per code point: `next_start` is the pen position
    /// of the next glyph, `current_width` the right edge of the current
    /// glyph and `word_length` the advance accumulated since the last
    /// whitespace.
    fn wrap_text<F, R, U>(
        &mut self,
        font: &mut Font<F, R>,
        target: &mut R::Target,
        units: &[U],
        position: Vec3,
        mode: RenderMode,
        mut bounds: Option<&mut BBox>,
    ) where
        F: FontFace,
        R: GlyphRealizer,
        U: CodeUnit,
    {
        let mut line_start = 0;
        let mut break_point: Option<BreakPoint> = None;
        let mut next_start = 0.0;
        let mut break_width = 0.0;
        let mut current_width = 0.0f32;
        let mut word_length = 0.0;
        let mut prev_whitespace = false;

        self.pen = Vec3::zeros();
        if let Some(bounds) = bounds.as_deref_mut() {
            *bounds = BBox::invalid();
        }

        let mut itr = UnicodeCursor::new(units);
        while let Some(codepoint) = itr.get() {
            let pos = itr.position();
            let next_pos = itr.next_position();
            let next = itr.peek();
            itr.advance();

            let is_newline = codepoint == NEWLINE;
            let (glyph_width, advance) = if is_newline {
                (0.0, 0.0)
            } else {
                (
                    font.glyph_bbox(target, codepoint).width(),
                    font.glyph_advance(target, codepoint, next),
                )
            };

            let mut start = next_start;
            let prev_width = current_width;
            current_width = start + glyph_width;
            next_start += advance;

            let overflow = current_width > self.line_length && pos != line_start;
            if overflow || is_newline {
                let usable = break_point.filter(|bp| bp.run_start != line_start && !is_newline);
                let (line_end, resume, line_width) = match usable {
                    Some(bp) => (bp.run_start, bp.resume, break_width),
                    None => {
                        word_length = 0.0;
                        (pos, if is_newline { next_pos } else { pos }, prev_width)
                    }
                };

                self.output_line(
                    font,
                    target,
                    &units[line_start..line_end],
                    position,
                    mode,
                    self.line_length - line_width,
                    self.alignment,
                    bounds.as_deref_mut(),
                );

                line_start = resume;
                self.pen.y -= font.line_height() * self.line_spacing;

                start = word_length;
                next_start = start + advance;
                current_width = start + glyph_width;
                word_length = start + advance;
                break_point = None;

                if is_newline {
                    prev_whitespace = false;
                    continue;
                }
            }

            if is_whitespace(codepoint) {
                word_length = 0.0;
                let first_in_run = pos == line_start || !prev_whitespace || break_point.is_none();
                if first_in_run {
                    break_width = start;
                }
                break_point = Some(BreakPoint {
                    run_start: match break_point {
                        Some(bp) if !first_in_run => bp.run_start,
                        _ => pos,
                    },
                    resume: next_pos,
                });
                prev_whitespace = true;
            } else {
                if !overflow {
                    word_length += advance;
                }
                prev_whitespace = false;
            }
        }

        // The last line is never justified
        let alignment = match self.alignment {
            TextAlignment::Justify => TextAlignment::Left,
            other => other,
        };
        self.output_line(
            font,
            target,
            &units[line_start..],
            position,
            mode,
            self.line_length - current_width,
            alignment,
            bounds,
        );
    }

    /// Align one line and either measure or draw it
    fn output_line<F, R, U>(
        &mut self,
        font: &mut Font<F, R>,
        target: &mut R::Target,
        line: &[U],
        position: Vec3,
        mode: RenderMode,
        remaining: f32,
        alignment: TextAlignment,
        bounds: Option<&mut BBox>,
    ) where
        F: FontFace,
        R: GlyphRealizer,
        U: CodeUnit,
    {
        let runs = count_whitespace_runs(line);
        let mut distribute = 0.0;
        self.pen.x = match alignment {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => remaining / 2.0,
            TextAlignment::Right => remaining,
            TextAlignment::Justify => {
                if runs > 0 && remaining > 0.0 {
                    distribute = remaining;
                }
                0.0
            }
        };

        match bounds {
            Some(bounds) => {
                if line.is_empty() {
                    return;
                }
                let mut line_box = font.bbox(target, line, Vec3::zeros(), Vec3::zeros());
                line_box.lower += self.pen + position;
                line_box.upper += self.pen + position + Vec3::new(distribute, 0.0, 0.0);
                bounds.merge(&line_box);
            }
            None => {
                let space = if runs > 0 { distribute / runs as f32 } else { 0.0 };
                self.render_space(font, target, line, position, mode, space);
            }
        }
    }

    /// Draw a line, adding `space` at the end of every whitespace run
    fn render_space<F, R, U>(
        &mut self,
        font: &mut Font<F, R>,
        target: &mut R::Target,
        line: &[U],
        position: Vec3,
        mode: RenderMode,
        space: f32,
    ) where
        F: FontFace,
        R: GlyphRealizer,
        U: CodeUnit,
    {
        let mut itr = UnicodeCursor::new(line);
        let mut prev_whitespace = false;

        while let Some(codepoint) = itr.get() {
            let next = itr.peek();
            itr.advance();

            let whitespace = is_whitespace(codepoint);
            if prev_whitespace && !whitespace {
                self.pen.x += space;
            }
            prev_whitespace = whitespace;

            let pen = font.render_glyph(target, codepoint, next, position + self.pen, mode);
            self.pen = pen - position;
        }
    }
}

/// Number of whitespace runs followed by a non-whitespace code point
fn count_whitespace_runs<U: CodeUnit>(line: &[U]) -> usize {
    let mut runs = 0;
    let mut prev_whitespace = false;
    for codepoint in UnicodeCursor::new(line) {
        let whitespace = is_whitespace(codepoint);
        if prev_whitespace && !whitespace {
            runs += 1;
        }
        prev_whitespace = whitespace;
    }
    runs
}

impl Layout for SimpleLayout {
    fn measure<F, R, T>(&mut self, font: &mut Font<F, R>, target: &mut R::Target, text: &T, position: Vec3) -> BBox
    where
        F: FontFace,
        R: GlyphRealizer,
        T: UnicodeText + ?Sized,
    {
        let mut bounds = BBox::invalid();
        self.wrap_text(font, target, text.code_units(), position, RenderMode::FRONT, Some(&mut bounds));
        if bounds.is_valid() {
            bounds
        } else {
            BBox::default()
        }
    }

    fn render<F, R, T>(
        &mut self,
        font: &mut Font<F, R>,
        target: &mut R::Target,
        text: &T,
        position: Vec3,
        mode: RenderMode,
    ) -> Vec3
    where
        F: FontFace,
        R: GlyphRealizer,
        T: UnicodeText + ?Sized,
    {
        font.begin_render(target);
        self.wrap_text(font, target, text.code_units(), position, mode, None);
        position + self.pen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_runs_ignore_leading_and_trailing() {
        assert_eq!(count_whitespace_runs("a b c".as_bytes()), 2);
        assert_eq!(count_whitespace_runs("a  \t b".as_bytes()), 1);
        assert_eq!(count_whitespace_runs(" ab ".as_bytes()), 1);
        assert_eq!(count_whitespace_runs("abc".as_bytes()), 0);
        assert_eq!(count_whitespace_runs::<u8>(&[]), 0);
    }
}
