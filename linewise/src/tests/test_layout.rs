// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::atomic::Ordering;

use super::utils::{MockObject, TestEnv};
use crate::layout::{LayoutMode, LayoutOptions, LayoutRegion, LayoutStatus};
use crate::style::{
    Alignment, Direction, LineAlignment, LineHeight, OverflowWrap, Spacing, WordBreak,
};
use crate::{Paragraph, Style, StyleProperty};

fn approx(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn short_text_fits_on_one_line() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("01", TestEnv::style(1.0));
    let (region, status) = env.layout(&mut paragraph, 3.0, 2.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::Complete);
    assert_eq!(region.line_count(), 1);
    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..2);
    approx(line.width(), 2.0);
    approx(line.height(), 1.0);
    approx(line.baseline(), 0.75);
    assert_eq!(region.content_size(), (2.0, 1.0));
    assert!(!region.is_full());
}

#[test]
fn definite_extents_are_reported_as_is() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("01", TestEnv::style(1.0));
    let (region, _) = env.layout(&mut paragraph, 10.0, 5.0, LayoutMode::Definite, LayoutMode::Definite);
    assert_eq!(region.content_size(), (10.0, 5.0));
}

#[test]
fn break_all_splits_inside_words() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.default_style.set(StyleProperty::WordBreak(WordBreak::BreakAll));
    let mut paragraph = env.paragraph("01234", style);

    let (region, status) = env.layout(&mut paragraph, 3.0, 2.0, LayoutMode::AtMost, LayoutMode::AtMost);
    assert_eq!(status, LayoutStatus::Complete);
    let ranges: Vec<_> = region.lines().iter().map(|line| line.char_range()).collect();
    assert_eq!(ranges, vec![0..3, 3..5]);
    assert_eq!(region.content_size(), (3.0, 2.0));
}

#[test]
fn overflow_wrap_breaks_words_that_do_not_fit() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.overflow_wrap = OverflowWrap::Anywhere;
    let mut paragraph = env.paragraph("01234", style);
    assert_eq!(env.line_ranges(&mut paragraph, 3.0, 2.0), vec![0..3, 3..5]);

    let mut style = TestEnv::style(1.0);
    style.overflow_wrap = OverflowWrap::BreakWord;
    let mut paragraph = env.paragraph("01234", style);
    assert_eq!(env.line_ranges(&mut paragraph, 3.0, 2.0), vec![0..3, 3..5]);
}

#[test]
fn long_word_overflows_without_wrapping() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("01234", TestEnv::style(1.0));
    let (region, _) = env.layout(&mut paragraph, 3.0, 2.0, LayoutMode::AtMost, LayoutMode::AtMost);
    assert_eq!(region.line_count(), 1);
    approx(region.lines()[0].width(), 5.0);
}

#[test]
fn lines_break_after_spaces() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("aa bb cc", TestEnv::style(1.0));
    assert_eq!(
        env.line_ranges(&mut paragraph, 6.0, 10.0),
        vec![0..6, 6..8]
    );
    // Trailing spaces hang past the width instead of wrapping.
    assert_eq!(
        env.line_ranges(&mut paragraph, 5.0, 10.0),
        vec![0..6, 6..8]
    );
    assert_eq!(
        env.line_ranges(&mut paragraph, 4.0, 10.0),
        vec![0..3, 3..6, 6..8]
    );
}

#[test]
fn right_alignment_counts_trailing_space() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.alignment = Alignment::Right;
    let mut paragraph = env.paragraph("Hello world!", style);
    let (region, _) = env.layout(&mut paragraph, 10.5, 10.0, LayoutMode::Definite, LayoutMode::AtMost);

    let lines = region.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].char_range(), 0..6);
    approx(lines[0].left(), 4.5);
    approx(lines[0].right(), 10.5);
    assert_eq!(lines[1].char_range(), 6..12);
    approx(lines[1].right(), 10.5);
}

#[test]
fn center_alignment_splits_free_space() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.alignment = Alignment::Center;
    let mut paragraph = env.paragraph("ab", style);
    let (region, _) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::Definite, LayoutMode::AtMost);
    approx(region.lines()[0].left(), 4.0);
}

#[test]
fn justify_stretches_all_but_the_last_line() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.alignment = Alignment::Justify;
    let mut paragraph = env.paragraph("aa bb cc", style);
    let (region, _) = env.layout(&mut paragraph, 7.0, 10.0, LayoutMode::Definite, LayoutMode::AtMost);

    let lines = region.lines();
    assert_eq!(lines[0].char_range(), 0..6);
    assert_eq!(lines[0].pieces().len(), 4);
    approx(lines[0].left(), 0.0);
    approx(lines[0].right(), 7.0);
    approx(lines[0].pieces()[2].x(), 3.0 + 2.0 / 3.0);
    approx(lines[1].right(), 2.0);
}

#[test]
fn distributed_stretches_the_last_line_too() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.alignment = Alignment::Distributed;
    let mut paragraph = env.paragraph("a b", style);
    let (region, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::Definite, LayoutMode::AtMost);

    let line = &region.lines()[0];
    let xs: Vec<f32> = line.pieces().iter().map(|piece| piece.x()).collect();
    assert_eq!(xs, vec![0.0, 2.0, 4.0]);
    approx(line.right(), 5.0);

    let mut style = TestEnv::style(1.0);
    style.alignment = Alignment::Justify;
    let mut paragraph = env.paragraph("a b", style);
    let (region, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::Definite, LayoutMode::AtMost);
    approx(region.lines()[0].right(), 3.0);
}

#[test]
fn alignment_can_be_overridden_per_line() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("ab", TestEnv::style(1.0));
    let (mut region, _) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::Definite, LayoutMode::AtMost);
    approx(region.lines()[0].left(), 0.0);

    region.lines_mut()[0].set_alignment(Alignment::Right);
    assert_eq!(region.lines()[0].alignment(), Alignment::Right);
    approx(region.lines()[0].right(), 10.0);
}

#[test]
fn empty_paragraph_has_one_empty_line() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("", TestEnv::style(1.0));
    let (region, status) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::Complete);
    assert_eq!(region.line_count(), 1);
    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..0);
    approx(line.width(), 0.0);
    approx(line.height(), 1.0);
}

#[test]
fn max_lines_stops_layout() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.max_lines = 2;
    let mut paragraph = env.paragraph("aa bb cc", style);
    let (region, status) = env.layout(&mut paragraph, 3.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::RegionFull);
    assert_eq!(region.line_count(), 2);
    assert_eq!(region.lines()[1].char_range(), 3..6);
    assert!(region.is_full());
    assert!(region.exceeded_max_lines());
}

#[test]
fn content_that_fits_max_lines_is_complete() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.max_lines = 2;
    let mut paragraph = env.paragraph("aa bb", style);
    let (region, status) = env.layout(&mut paragraph, 3.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::Complete);
    assert_eq!(region.line_count(), 2);
    assert!(!region.exceeded_max_lines());
    assert!(!region.is_full());
}

#[test]
fn last_line_may_overflow_the_height() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("aa bb cc", TestEnv::style(1.0));
    let (region, status) = env.layout(&mut paragraph, 3.0, 1.5, LayoutMode::AtMost, LayoutMode::AtMost);
    assert_eq!(status, LayoutStatus::RegionFull);
    assert_eq!(region.line_count(), 2);
    assert!(region.is_full());
    assert!(!region.exceeded_max_lines());

    let options = LayoutOptions {
        last_line_can_overflow: false,
        ..LayoutOptions::default()
    };
    let mut region = LayoutRegion::new(3.0, 1.5, LayoutMode::AtMost, LayoutMode::AtMost);
    let status = env.context.layout(&mut paragraph, &mut region, &options);
    assert_eq!(status, LayoutStatus::RegionFull);
    assert_eq!(region.line_count(), 1);
}

#[test]
fn region_without_room_gets_no_lines() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("ab", TestEnv::style(1.0));
    let (region, status) = env.layout(&mut paragraph, 0.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    assert_eq!(status, LayoutStatus::RegionFull);
    assert!(region.is_empty());

    let (region, status) = env.layout(&mut paragraph, 10.0, -1.0, LayoutMode::AtMost, LayoutMode::Definite);
    assert_eq!(status, LayoutStatus::RegionFull);
    assert!(region.is_empty());
}

#[test]
fn indefinite_width_never_wraps() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.alignment = Alignment::Right;
    let mut paragraph = env.paragraph("aa bb cc", style);
    let (region, _) = env.layout(&mut paragraph, 0.0, 0.0, LayoutMode::Indefinite, LayoutMode::Indefinite);

    assert_eq!(region.line_count(), 1);
    approx(region.lines()[0].left(), 0.0);
    assert_eq!(region.content_size(), (8.0, 1.0));
}

#[test]
fn paragraphs_stack_with_spacing() {
    let env = TestEnv::new();
    let mut first_style = TestEnv::style(1.0);
    first_style.spacing = Spacing {
        before: 3.0,
        after: 2.0,
        ..Spacing::default()
    };
    let mut second_style = TestEnv::style(1.0);
    second_style.spacing.before = 1.0;
    let mut first = env.paragraph("a", first_style);
    let mut second = env.paragraph("b", second_style);

    let mut region = LayoutRegion::new(10.0, 20.0, LayoutMode::AtMost, LayoutMode::AtMost);
    let options = LayoutOptions::default();
    env.context.layout(&mut first, &mut region, &options);
    env.context.layout(&mut second, &mut region, &options);
    approx(region.lines()[0].top(), 3.0);
    approx(region.lines()[1].top(), 4.0 + 1.0 + 2.0);

    let options = LayoutOptions {
        skip_spacing_before_first_line: true,
        ..LayoutOptions::default()
    };
    let mut region = LayoutRegion::new(10.0, 20.0, LayoutMode::AtMost, LayoutMode::AtMost);
    env.context.layout(&mut first, &mut region, &options);
    approx(region.lines()[0].top(), 0.0);
}

#[test]
fn exact_line_height_places_content_by_line_alignment() {
    let env = TestEnv::new();
    for (alignment, baseline) in [
        (LineAlignment::Top, 0.75),
        (LineAlignment::Center, 1.75),
        (LineAlignment::Bottom, 2.75),
    ] {
        let mut style = TestEnv::style(1.0);
        style.spacing.line_height = LineHeight::Exact(3.0);
        style.line_alignment = alignment;
        let mut paragraph = env.paragraph("ab", style);
        let (region, _) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
        let line = &region.lines()[0];
        approx(line.height(), 3.0);
        approx(line.baseline(), baseline);
    }
}

#[test]
fn relative_line_height_scales_the_line_box() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.spacing.line_height = LineHeight::Auto(200.0);
    let mut paragraph = env.paragraph("ab", style);
    let (region, _) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    approx(region.lines()[0].height(), 2.0);
}

#[test]
fn hard_break_starts_a_new_line() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("ab\ncd", TestEnv::style(1.0));
    let (region, _) = env.layout(&mut paragraph, 100.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    let ranges: Vec<_> = region.lines().iter().map(|line| line.char_range()).collect();
    assert_eq!(ranges, vec![0..3, 3..5]);
    approx(region.lines()[0].width(), 2.0);
}

#[test]
fn layout_is_idempotent() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("aa bb cc dd", TestEnv::style(1.0));
    let (first, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    let calls = env.shaper.calls();
    let (second, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(env.shaper.calls(), calls);
    assert_eq!(first.line_count(), second.line_count());
    for (a, b) in first.lines().iter().zip(second.lines()) {
        assert_eq!(a.char_range(), b.char_range());
        assert_eq!(a.baseline(), b.baseline());
        assert_eq!(a.pieces(), b.pieces());
    }
}

#[test]
fn right_to_left_pieces_are_reordered() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.direction = Direction::Rtl;
    let mut paragraph = env.paragraph("ab \u{5d0}\u{5d1}", style);
    let (region, _) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    let line = &region.lines()[0];
    let pieces = line.pieces();
    assert_eq!(pieces.len(), 2);
    assert!(pieces[0].is_rtl());
    assert_eq!(pieces[0].chars(), 2..5);
    approx(pieces[0].x(), 0.0);
    assert!(!pieces[1].is_rtl());
    assert_eq!(pieces[1].chars(), 0..2);
    approx(pieces[1].x(), 3.0);

    // Offsets grow leftwards inside the right to left piece.
    assert_eq!(line.char_at_x(0.1), 5);
    assert_eq!(line.char_at_x(2.9), 2);
    assert_eq!(line.char_at_x(3.1), 0);
}

#[test]
fn hit_testing_and_selection_rects() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("abcd", TestEnv::style(1.0));
    let (region, _) = env.layout(&mut paragraph, 10.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    let line = &region.lines()[0];

    assert_eq!(line.char_at_x(1.4), 1);
    assert_eq!(line.char_at_x(1.6), 2);
    assert_eq!(line.char_at_x(-5.0), 0);
    assert_eq!(line.char_at_x(100.0), 4);

    let rects = line.bounding_rects(1..3);
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].x0, 1.0);
    assert_eq!(rects[0].x1, 3.0);
    assert_eq!(rects[0].y0, 0.0);
    assert_eq!(rects[0].y1, 1.0);
}

#[test]
fn inline_objects_grow_the_line() {
    let env = TestEnv::new();
    let object = MockObject::new(2.0, 3.0, 1.0);
    let mut paragraph = Paragraph::new(TestEnv::style(1.0));
    paragraph.add_text_run(None, "ab").unwrap();
    paragraph.add_shape_run(None, object.clone(), true);
    paragraph.add_text_run(None, "cd").unwrap();
    assert_eq!(object.layouts.load(Ordering::SeqCst), 1);

    let (region, _) = env.layout(&mut paragraph, 20.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    let line = &region.lines()[0];
    approx(line.ascent(), 3.0);
    approx(line.descent(), 1.0);
    approx(line.height(), 4.0);
    approx(line.width(), 6.0);
}

#[test]
fn objects_are_break_opportunities() {
    let env = TestEnv::new();
    let mut paragraph = Paragraph::new(TestEnv::style(1.0));
    paragraph.add_text_run(None, "abc").unwrap();
    paragraph.add_shape_run(Some(&Style::new()), MockObject::new(2.0, 1.0, 0.0), true);
    paragraph.add_text_run(None, "def").unwrap();
    assert_eq!(
        env.line_ranges(&mut paragraph, 4.0, 10.0),
        vec![0..3, 3..4, 4..7]
    );
}
