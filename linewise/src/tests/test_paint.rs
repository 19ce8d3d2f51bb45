// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::palette::css;
use peniko::kurbo::{Point, Rect};

use super::utils::{Command, MockObject, RecordingSink, TestEnv};
use crate::layout::{LayoutMode, LayoutRegion};
use crate::paint::PositionedGlyph;
use crate::style::{Decoration, Direction, LineStyle, TextShadow};
use crate::{Paragraph, StyleProperty, draw_region};

fn draw(env: &TestEnv, paragraph: &mut Paragraph, origin: Point) -> RecordingSink {
    let (region, _) = env.layout(paragraph, 20.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    record(&region, origin)
}

fn record(region: &LayoutRegion, origin: Point) -> RecordingSink {
    let mut sink = RecordingSink::default();
    draw_region(region, origin, &mut sink);
    sink
}

#[test]
fn background_then_glyphs_then_decorations() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.default_style.set(StyleProperty::Background(css::YELLOW));
    style
        .default_style
        .set(StyleProperty::Decoration(Decoration::underline()));
    let mut paragraph = env.paragraph("ab", style);
    let sink = draw(&env, &mut paragraph, Point::new(10.0, 20.0));

    assert_eq!(sink.commands.len(), 3);
    assert_eq!(
        sink.commands[0],
        Command::Rect(Rect::new(10.0, 20.0, 12.0, 21.0), css::YELLOW)
    );
    assert_eq!(
        sink.commands[1],
        Command::Glyphs {
            glyphs: vec![
                PositionedGlyph {
                    id: u32::from('a'),
                    x: 10.0,
                    y: 20.75,
                },
                PositionedGlyph {
                    id: u32::from('b'),
                    x: 11.0,
                    y: 20.75,
                },
            ],
            color: css::BLACK,
            skew: 0.0,
            blur_radius: 0.0,
        }
    );
    let Command::Decoration(rect, style) = &sink.commands[2] else {
        panic!("expected a decoration, got {:?}", sink.commands[2]);
    };
    assert_eq!(*style, LineStyle::Solid);
    assert_eq!(rect.x0, 10.0);
    assert_eq!(rect.x1, 12.0);
    assert!((rect.y0 - 20.875).abs() < 1e-4);
}

#[test]
fn transparent_backgrounds_are_skipped() {
    let env = TestEnv::new();
    let mut paragraph = env.paragraph("ab", TestEnv::style(1.0));
    let sink = draw(&env, &mut paragraph, Point::ZERO);
    assert_eq!(sink.commands.len(), 1);
    assert_eq!(sink.glyph_runs().count(), 1);
}

#[test]
fn shadows_are_drawn_below_the_glyphs() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.default_style.set(StyleProperty::Shadows(vec![TextShadow {
        color: css::GRAY,
        offset: [1.0, 2.0],
        blur_radius: 3.0,
    }]));
    let mut paragraph = env.paragraph("a", style);
    let sink = draw(&env, &mut paragraph, Point::ZERO);

    let runs: Vec<_> = sink.glyph_runs().collect();
    assert_eq!(runs.len(), 2);
    let Command::Glyphs {
        glyphs,
        color,
        blur_radius,
        ..
    } = runs[0]
    else {
        unreachable!();
    };
    assert_eq!(*color, css::GRAY);
    assert_eq!(*blur_radius, 3.0);
    assert_eq!(glyphs[0].x, 1.0);
    assert_eq!(glyphs[0].y, 2.75);
    let Command::Glyphs { color, .. } = runs[1] else {
        unreachable!();
    };
    assert_eq!(*color, css::BLACK);
}

#[test]
fn right_to_left_glyphs_are_drawn_in_visual_order() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.direction = Direction::Rtl;
    let mut paragraph = env.paragraph("\u{5d0}\u{5d1}", style);
    let sink = draw(&env, &mut paragraph, Point::ZERO);

    let Some(Command::Glyphs { glyphs, .. }) = sink.glyph_runs().next() else {
        panic!("no glyphs drawn");
    };
    let ids: Vec<_> = glyphs.iter().map(|glyph| (glyph.id, glyph.x)).collect();
    assert_eq!(ids, vec![(0x5d1, 0.0), (0x5d0, 1.0)]);
}

#[test]
fn synthetic_italic_skews_glyphs() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.default_style.set(StyleProperty::Italic(true));
    let mut paragraph = env.paragraph("a", style);
    let sink = draw(&env, &mut paragraph, Point::ZERO);

    let Some(Command::Glyphs { skew, .. }) = sink.glyph_runs().next() else {
        panic!("no glyphs drawn");
    };
    assert!((skew - 14_f32.to_radians().tan()).abs() < 1e-6);
}

#[test]
fn objects_get_their_own_rect() {
    let env = TestEnv::new();
    let mut paragraph = Paragraph::new(TestEnv::style(1.0));
    paragraph.add_text_run(None, "a").unwrap();
    paragraph.add_shape_run(None, MockObject::new(2.0, 3.0, 1.0), true);
    let sink = draw(&env, &mut paragraph, Point::ZERO);

    assert_eq!(sink.glyph_runs().count(), 1);
    assert_eq!(
        sink.commands.last(),
        Some(&Command::Object(Rect::new(1.0, 0.0, 3.0, 4.0)))
    );
}

#[test]
fn ellipsis_is_drawn_after_the_text() {
    let env = TestEnv::new();
    let mut style = TestEnv::style(1.0);
    style.max_lines = 1;
    style.ellipsis = crate::style::Ellipsis::Text("\u{2026}".into());
    let mut paragraph = env.paragraph("aaaa bbbb", style);
    let (region, _) = env.layout(&mut paragraph, 5.0, 10.0, LayoutMode::AtMost, LayoutMode::AtMost);
    let sink = record(&region, Point::ZERO);

    let runs: Vec<_> = sink.glyph_runs().collect();
    assert_eq!(runs.len(), 2);
    let Command::Glyphs { glyphs, .. } = runs[1] else {
        unreachable!();
    };
    assert_eq!(glyphs.len(), 1);
    assert_eq!(glyphs[0].id, 0x2026);
    assert_eq!(glyphs[0].x, 4.0);
}
