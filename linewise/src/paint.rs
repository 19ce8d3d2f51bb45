// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing laid out lines through a caller supplied canvas.

use alloc::sync::Arc;
use alloc::vec::Vec;

use peniko::Color;
use peniko::kurbo::{Point, Rect};

use crate::font::{FontMetrics, GlyphId};
use crate::layout::{LayoutRegion, LinePiece, TextLine};
use crate::run::{Run, RunDelegate};
use crate::shape::ResolvedFont;
use crate::style::LineStyle;

/// Slant applied to fonts that lack a requested italic, in degrees.
const FAKE_ITALIC_ANGLE: f32 = 14.0;

/// Stroke added to fonts that lack a requested weight, relative to the size.
const FAKE_BOLD_STRENGTH: f32 = 1.0 / 48.0;

/// A glyph at its final position. `y` is the baseline, pointing down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph in the run's font.
    pub id: GlyphId,
    /// Pen position.
    pub x: f32,
    /// Baseline position.
    pub y: f32,
}

/// Glyphs that share a font and a paint.
#[derive(Clone, Copy, Debug)]
pub struct GlyphRun<'a> {
    /// Font of every glyph.
    pub font: &'a ResolvedFont,
    /// Pixels per em.
    pub size: f32,
    /// Glyphs in visual order.
    pub glyphs: &'a [PositionedGlyph],
    /// Fill color.
    pub color: Color,
    /// Horizontal skew, as the tangent of the slant angle.
    pub skew: f32,
    /// Outline stroke width for synthetic bold, or zero.
    pub embolden: f32,
    /// Blur radius, nonzero for shadows.
    pub blur_radius: f32,
}

/// Receives drawing commands.
pub trait CanvasSink {
    /// Fills a rectangle, used for backgrounds.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws a run of glyphs.
    fn draw_glyphs(&mut self, run: GlyphRun<'_>);

    /// Draws a decoration line covering `rect`.
    fn draw_decoration(&mut self, rect: Rect, style: LineStyle, color: Color);

    /// Draws an inline object into `rect`.
    fn draw_object(&mut self, delegate: &Arc<dyn RunDelegate>, rect: Rect);
}

/// Draws every line of `region`, offset by `origin`.
pub fn draw_region(region: &LayoutRegion, origin: Point, sink: &mut dyn CanvasSink) {
    for line in region.lines() {
        draw_line(line, origin, sink);
    }
}

/// Draws one line, offset by `origin`.
///
/// Backgrounds go first, then shadows, glyphs, decorations and objects.
pub fn draw_line(line: &TextLine, origin: Point, sink: &mut dyn CanvasSink) {
    let (dx, dy) = (origin.x as f32, origin.y as f32);
    let pieces: Vec<(&LinePiece, &Run)> = line
        .pieces()
        .iter()
        .filter_map(|piece| line.piece_run(piece).map(|run| (piece, run)))
        .collect();

    for &(piece, run) in &pieces {
        let background = run.style().background();
        if background.components[3] > 0.0 && piece.width() > 0.0 {
            sink.fill_rect(piece_rect(piece, run, dx, dy), background);
        }
    }

    let glyph_runs: Vec<_> = pieces
        .iter()
        .map(|&(piece, run)| (run, place_glyphs(piece, run, dx, dy)))
        .collect();
    for (run, groups) in &glyph_runs {
        for shadow in run.style().shadows() {
            let [sx, sy] = shadow.offset;
            for (font, glyphs) in groups {
                let shifted: Vec<PositionedGlyph> = glyphs
                    .iter()
                    .map(|glyph| PositionedGlyph {
                        id: glyph.id,
                        x: glyph.x + sx,
                        y: glyph.y + sy,
                    })
                    .collect();
                sink.draw_glyphs(glyph_run(run, font, &shifted, shadow.color, shadow.blur_radius));
            }
        }
    }
    for (run, groups) in &glyph_runs {
        for (font, glyphs) in groups {
            sink.draw_glyphs(glyph_run(run, font, glyphs, run.style().foreground(), 0.0));
        }
    }

    for &(piece, run) in &pieces {
        draw_decorations(piece, run, dx, dy, sink);
    }

    for &(piece, run) in &pieces {
        if let Some(delegate) = run.delegate() {
            sink.draw_object(delegate, piece_rect(piece, run, dx, dy));
        }
    }
}

fn glyph_run<'a>(
    run: &Run,
    font: &'a ResolvedFont,
    glyphs: &'a [PositionedGlyph],
    color: Color,
    blur_radius: f32,
) -> GlyphRun<'a> {
    let size = run.shape().map_or(run.style().scaled_size(), |shape| shape.result().size());
    GlyphRun {
        font,
        size,
        glyphs,
        color,
        skew: if font.fake_italic || run.style().italic() {
            FAKE_ITALIC_ANGLE.to_radians().tan()
        } else {
            0.0
        },
        embolden: if font.fake_bold || run.style().bold() {
            size * FAKE_BOLD_STRENGTH
        } else {
            0.0
        },
        blur_radius,
    }
}

fn piece_rect(piece: &LinePiece, run: &Run, dx: f32, dy: f32) -> Rect {
    let metrics = run.metrics();
    let x = dx + piece.x();
    let baseline = dy + piece.baseline();
    Rect::new(
        f64::from(x),
        f64::from(baseline - metrics.ascent),
        f64::from(x + piece.width()),
        f64::from(baseline + metrics.descent),
    )
}

/// Positions the glyphs of a piece, grouped by font, in visual order.
fn place_glyphs(
    piece: &LinePiece,
    run: &Run,
    dx: f32,
    dy: f32,
) -> Vec<(ResolvedFont, Vec<PositionedGlyph>)> {
    let Some(shape) = run.shape() else {
        return Vec::new();
    };
    if run.is_control() {
        return Vec::new();
    }
    let result = shape.result();
    let view_start = shape.char_range().start;
    let chars = if piece.run_index().is_none() || run.is_ghost() {
        0..shape.char_count()
    } else {
        piece.chars().start - run.start()..piece.chars().end - run.start()
    };

    let chars: Vec<usize> = if piece.is_rtl() {
        chars.rev().collect()
    } else {
        chars.collect()
    };

    let baseline = dy + piece.baseline();
    let mut x = dx + piece.x();
    let mut groups: Vec<(ResolvedFont, Vec<PositionedGlyph>)> = Vec::new();
    for char in chars {
        let width = run.char_width(char);
        let absolute = view_start + char;
        let Some(font) = result.font_for_char(absolute) else {
            x += width;
            continue;
        };
        // Glyphs of the cluster starting at this char; none for the rest of
        // a cluster.
        let mut pen = x;
        let mut glyph = result.char_to_glyph(absolute);
        while glyph < result.glyph_count() && result.glyph_to_char(glyph) == absolute {
            if groups.last().is_none_or(|(current, _)| current != font) {
                groups.push((font.clone(), Vec::new()));
            }
            if let Some((_, glyphs)) = groups.last_mut() {
                let [ox, oy] = result.offsets()[glyph];
                glyphs.push(PositionedGlyph {
                    id: result.glyphs()[glyph],
                    x: pen + ox,
                    y: baseline - oy,
                });
            }
            pen += result.advances()[glyph];
            glyph += 1;
        }
        x += width;
    }
    groups
}

fn draw_decorations(piece: &LinePiece, run: &Run, dx: f32, dy: f32, sink: &mut dyn CanvasSink) {
    let decoration = run.style().decoration();
    if !decoration.is_visible() || piece.width() <= 0.0 || run.is_control() {
        return;
    }
    let size = run.style().scaled_size();
    let metrics = run
        .shape()
        .and_then(|shape| shape.font_for_char(0))
        .map_or_else(
            || FontMetrics::from_extents(run.metrics().ascent, run.metrics().descent),
            |font| font.typeface.metrics(size),
        );
    let color = decoration.color.unwrap_or(run.style().foreground());
    let x0 = f64::from(dx + piece.x());
    let x1 = x0 + f64::from(piece.width());
    let baseline = dy + piece.baseline();
    let line = |top: f32, thickness: f32| {
        let thickness = thickness * decoration.thickness_scale;
        Rect::new(x0, f64::from(top), x1, f64::from(top + thickness))
    };
    if decoration.underline {
        let rect = line(baseline + metrics.underline_offset, metrics.underline_thickness);
        sink.draw_decoration(rect, decoration.style, color);
    }
    if decoration.overline {
        let rect = line(baseline - run.metrics().ascent, metrics.underline_thickness);
        sink.draw_decoration(rect, decoration.style, color);
    }
    if decoration.line_through {
        let thickness = metrics.strikeout_thickness;
        let rect = line(baseline + metrics.strikeout_offset - thickness / 2.0, thickness);
        sink.draw_decoration(rect, decoration.style, color);
    }
}
