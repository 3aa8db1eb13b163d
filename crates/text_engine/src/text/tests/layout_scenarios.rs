//! Layout tests against a face where every glyph is 10px wide and 10px tall
//! and whitespace has no ink

use crate::foundation::math::{BBox, Vec3};
use crate::text::font::Font;
use crate::text::glyph::RenderMode;
use crate::text::layout::{Layout, SimpleLayout, TextAlignment};
use crate::text::library::FontLibrary;
use crate::text::testing::{DrawRecord, MockFace, RecordingGlyphs, RecordingTarget};
use approx::assert_relative_eq;

fn font(mock: MockFace) -> (Font<MockFace, RecordingGlyphs>, RecordingTarget) {
    let mut target = RecordingTarget::default();
    let face = FontLibrary::new().attach(mock);
    let font = Font::with_size(face, RecordingGlyphs::default(), &mut target, 12.0, 72).unwrap();
    (font, target)
}

fn layout(line_length: f32, alignment: TextAlignment) -> SimpleLayout {
    let mut layout = SimpleLayout::new();
    layout.set_line_length(line_length);
    layout.set_alignment(alignment);
    layout
}

/// Draws of glyphs with ink, as (character, x, y)
fn inked(draws: &[DrawRecord]) -> Vec<(char, f32, f32)> {
    draws
        .iter()
        .filter_map(|draw| {
            let ch = u32::try_from(draw.index).ok().and_then(char::from_u32)?;
            (!ch.is_whitespace()).then_some((ch, draw.pen.x, draw.pen.y))
        })
        .collect()
}

fn assert_draws(actual: &[(char, f32, f32)], expected: &[(char, f32, f32)]) {
    assert_eq!(actual.len(), expected.len(), "draws: {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert_eq!(a.0, e.0);
        assert_relative_eq!(a.1, e.1);
        assert_relative_eq!(a.2, e.2);
    }
}

#[test]
fn test_word_wrap_breaks_at_whitespace_then_forces() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(50.0, TextAlignment::Left);

    let pen = layout.render(&mut font, &mut target, "ab cd efghij", Vec3::zeros(), RenderMode::FRONT);

    assert_draws(
        &inked(&target.draws),
        &[
            ('a', 0.0, 0.0),
            ('b', 10.0, 0.0),
            ('c', 30.0, 0.0),
            ('d', 40.0, 0.0),
            ('e', 0.0, -12.0),
            ('f', 10.0, -12.0),
            ('g', 20.0, -12.0),
            ('h', 30.0, -12.0),
            ('i', 40.0, -12.0),
            ('j', 0.0, -24.0),
        ],
    );
    assert_relative_eq!(pen.x, 10.0);
    assert_relative_eq!(pen.y, -24.0);
    assert_eq!(target.begins, 1);
}

#[test]
fn test_justify_distributes_remaining_width() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(60.0, TextAlignment::Justify);

    let pen = layout.render(&mut font, &mut target, "a b c dddddd", Vec3::zeros(), RenderMode::FRONT);

    // First line is 50px wide with two gaps, so each gap grows by 5
    let draws = inked(&target.draws);
    assert_draws(&draws[..3], &[('a', 0.0, 0.0), ('b', 25.0, 0.0), ('c', 50.0, 0.0)]);
    assert_draws(&draws[3..4], &[('d', 0.0, -12.0)]);
    assert_eq!(draws.len(), 9);
    assert_relative_eq!(pen.x, 60.0);
}

#[test]
fn test_last_line_is_never_justified() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(100.0, TextAlignment::Justify);

    layout.render(&mut font, &mut target, "a b", Vec3::zeros(), RenderMode::FRONT);
    assert_draws(&inked(&target.draws), &[('a', 0.0, 0.0), ('b', 20.0, 0.0)]);
}

#[test]
fn test_identical_lines_justify_only_before_the_end() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(50.0, TextAlignment::Justify);

    layout.render(&mut font, &mut target, "a b\na b", Vec3::zeros(), RenderMode::FRONT);

    // Line one is 30px wide, so its single gap takes all 20px left over
    assert_draws(
        &inked(&target.draws),
        &[('a', 0.0, 0.0), ('b', 40.0, 0.0), ('a', 0.0, -12.0), ('b', 20.0, -12.0)],
    );
    assert_eq!(layout.alignment(), TextAlignment::Justify);
}

#[test]
fn test_newline_starts_a_line() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(100.0, TextAlignment::Left);

    layout.render(&mut font, &mut target, "line1\nline2", Vec3::zeros(), RenderMode::FRONT);

    let draws = inked(&target.draws);
    assert_eq!(draws.len(), 10);
    assert_draws(&draws[4..6], &[('1', 40.0, 0.0), ('l', 0.0, -12.0)]);
    assert_draws(&draws[9..], &[('2', 40.0, -12.0)]);

    let bounds = layout.measure(&mut font, &mut target, "line1\nline2", Vec3::zeros());
    assert_eq!(bounds, BBox::from_extents(0.0, -12.0, 50.0, 10.0));
}

#[test]
fn test_center_and_right_alignment() {
    let (mut font, mut target) = font(MockFace::new());

    layout(100.0, TextAlignment::Center).render(&mut font, &mut target, "ab", Vec3::zeros(), RenderMode::FRONT);
    assert_draws(&inked(&target.draws), &[('a', 40.0, 0.0), ('b', 50.0, 0.0)]);

    target.draws.clear();
    layout(50.0, TextAlignment::Right).render(&mut font, &mut target, "ab cd efghij", Vec3::zeros(), RenderMode::FRONT);
    let draws = inked(&target.draws);
    assert_draws(&draws[..1], &[('a', 0.0, 0.0)]);
    assert_draws(&draws[9..], &[('j', 40.0, -24.0)]);
}

#[test]
fn test_measure_wrapped_text_at_position() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(50.0, TextAlignment::Left);

    let bounds = layout.measure(&mut font, &mut target, "ab cd efghij", Vec3::new(5.0, 100.0, 0.0));
    assert_relative_eq!(bounds.lower.x, 5.0);
    assert_relative_eq!(bounds.lower.y, 76.0);
    assert_relative_eq!(bounds.upper.x, 55.0);
    assert_relative_eq!(bounds.upper.y, 110.0);
    assert!(target.draws.is_empty());
}

#[test]
fn test_measure_justified_line_covers_line_length() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(60.0, TextAlignment::Justify);

    let bounds = layout.measure(&mut font, &mut target, "a b c dddddd", Vec3::zeros());
    assert_relative_eq!(bounds.upper.x, 60.0);
    assert_relative_eq!(bounds.lower.y, -12.0);
}

#[test]
fn test_overlong_glyph_at_line_start_stays_on_its_line() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(5.0, TextAlignment::Left);

    layout.render(&mut font, &mut target, "ab", Vec3::zeros(), RenderMode::FRONT);
    assert_draws(&inked(&target.draws), &[('a', 0.0, 0.0), ('b', 0.0, -12.0)]);
}

#[test]
fn test_failing_glyph_is_skipped() {
    let (mut font, mut target) = font(MockFace::new().with_failing_glyph('b' as i32));
    let mut layout = layout(100.0, TextAlignment::Left);

    let pen = layout.render(&mut font, &mut target, "abc", Vec3::zeros(), RenderMode::FRONT);
    assert_draws(&inked(&target.draws), &[('a', 0.0, 0.0), ('c', 10.0, 0.0)]);
    assert_relative_eq!(pen.x, 20.0);
}

#[test]
fn test_position_and_line_spacing() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(100.0, TextAlignment::Left);
    layout.set_line_spacing(1.5);

    let position = Vec3::new(7.0, 3.0, 0.0);
    let pen = layout.render(&mut font, &mut target, "a\nb", position, RenderMode::FRONT);

    assert_draws(&inked(&target.draws), &[('a', 7.0, 3.0), ('b', 7.0, -15.0)]);
    assert_relative_eq!(pen.x, 17.0);
    assert_relative_eq!(pen.y, -15.0);
}

#[test]
fn test_empty_text() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = SimpleLayout::new();

    assert_eq!(layout.measure(&mut font, &mut target, "", Vec3::zeros()), BBox::default());
    let position = Vec3::new(1.0, 2.0, 0.0);
    assert_eq!(layout.render(&mut font, &mut target, "", position, RenderMode::FRONT), position);
    assert!(target.draws.is_empty());
}

#[test]
fn test_wide_text_layout_matches_utf8() {
    let (mut font, mut target) = font(MockFace::new());
    let mut layout = layout(50.0, TextAlignment::Left);
    let wide: Vec<u16> = "ab cd efghij".encode_utf16().collect();

    let narrow = layout.measure(&mut font, &mut target, "ab cd efghij", Vec3::zeros());
    assert_eq!(layout.measure(&mut font, &mut target, wide.as_slice(), Vec3::zeros()), narrow);
}
