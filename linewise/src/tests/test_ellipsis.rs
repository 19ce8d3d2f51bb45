// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::{MockObject, TestEnv};
use crate::layout::{LayoutMode, LayoutStatus};
use crate::style::Ellipsis;

fn single_line_style(ellipsis: Ellipsis) -> crate::ParagraphStyle {
    let mut style = TestEnv::style(1.0);
    style.max_lines = 1;
    style.ellipsis = ellipsis;
    style
}

#[test]
fn text_ellipsis_replaces_the_overflowing_tail() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph(
        "aaaa bbbb",
        single_line_style(Ellipsis::Text("\u{2026}".into())),
    );
    let (region, status) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::RegionFull);
    assert!(region.exceeded_max_lines());
    assert_eq!(region.line_count(), 1);
    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..4);
    assert!(line.has_ellipsis());
    assert!(!line.is_last_line_of_paragraph());
    assert_eq!(line.width(), 5.0);

    let ellipsis = line
        .pieces()
        .iter()
        .find(|piece| piece.run_index().is_none())
        .expect("ellipsis piece");
    assert_eq!(ellipsis.x(), 4.0);
    assert_eq!(ellipsis.width(), 1.0);
    let run = line.piece_run(ellipsis).expect("ellipsis run");
    assert!(run.is_ghost());
}

#[test]
fn object_ellipsis_uses_its_advance() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph(
        "aaaa bbbb",
        single_line_style(Ellipsis::Object(MockObject::new(2.0, 0.5, 0.0))),
    );
    let (region, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..3);
    assert!(line.has_ellipsis());
    assert_eq!(line.width(), 5.0);
}

#[test]
fn without_ellipsis_the_line_breaks_normally() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("aaaa bbbb", single_line_style(Ellipsis::None));
    let (region, status) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::RegionFull);
    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..5);
    assert!(!line.has_ellipsis());
}

#[test]
fn empty_text_ellipsis_is_ignored() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("aaaa bbbb", single_line_style(Ellipsis::Text(String::new())));
    let (region, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    assert_eq!(region.lines()[0].char_range(), 0..5);
    assert!(!region.lines()[0].has_ellipsis());
}

#[test]
fn height_truncation_also_gets_an_ellipsis() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.ellipsis = Ellipsis::Text("\u{2026}".into());
    let mut paragraph = env.paragraph("aa bb cc", style);
    let (region, status) = env.layout(&mut paragraph, 3.0, 1.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::RegionFull);
    assert!(region.is_full());
    assert!(!region.exceeded_max_lines());
    assert_eq!(region.line_count(), 1);
    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..2);
    assert!(line.has_ellipsis());
    assert_eq!(line.right(), 3.0);
}

#[test]
fn ellipsis_is_dropped_when_nothing_fits() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph(
        "aaaa bbbb",
        single_line_style(Ellipsis::Object(MockObject::new(9.0, 0.5, 0.0))),
    );
    let (region, status) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);

    assert_eq!(status, LayoutStatus::RegionFull);
    let line = &region.lines()[0];
    assert_eq!(line.char_range(), 0..0);
    assert!(!line.has_ellipsis());
}
