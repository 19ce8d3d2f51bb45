// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use peniko::Color;
use peniko::kurbo::Rect;

use crate::font::{FontMetrics, GlyphBounds, GlyphId, Typeface, TypefaceProvider, next_typeface_id};
use crate::paint::{CanvasSink, GlyphRun, PositionedGlyph};
use crate::run::RunDelegate;
use crate::shape::{CharMapShaper, ShapedGlyph, ShapingBackend};
use crate::style::{FontStyle, LineStyle};

/// A typeface where every glyph is a square of the font size.
///
/// Ascent is three quarters of the size and descent one quarter, so a line
/// of text is exactly one size tall.
#[derive(Debug)]
pub(crate) struct MockTypeface {
    id: u64,
    family: String,
    style: FontStyle,
    coverage: Option<Vec<RangeInclusive<char>>>,
}

impl MockTypeface {
    pub(crate) fn new(family: &str) -> Self {
        Self {
            id: next_typeface_id(),
            family: family.into(),
            style: FontStyle::default(),
            coverage: None,
        }
    }

    /// Limits the covered chars.
    pub(crate) fn covering(mut self, ranges: &[RangeInclusive<char>]) -> Self {
        self.coverage = Some(ranges.to_vec());
        self
    }

    pub(crate) fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub(crate) fn shared(self) -> Typeface {
        Arc::new(self)
    }
}

impl TypefaceProvider for MockTypeface {
    fn id(&self) -> u64 {
        self.id
    }

    fn family_name(&self) -> &str {
        &self.family
    }

    fn font_style(&self) -> FontStyle {
        self.style
    }

    fn metrics(&self, size: f32) -> FontMetrics {
        FontMetrics::from_extents(size * 0.75, size * 0.25)
    }

    fn glyph_id(&self, ch: char) -> GlyphId {
        let covered = self
            .coverage
            .as_ref()
            .is_none_or(|ranges| ranges.iter().any(|range| range.contains(&ch)));
        if covered { u32::from(ch) } else { 0 }
    }

    fn advance(&self, _glyph: GlyphId, size: f32) -> f32 {
        size
    }

    fn bounds(&self, _glyph: GlyphId, size: f32) -> Option<GlyphBounds> {
        Some(GlyphBounds {
            x_min: 0.0,
            y_min: -size * 0.25,
            x_max: size,
            y_max: size * 0.75,
        })
    }
}

/// Nominal glyph shaping that counts its invocations.
#[derive(Debug, Default)]
pub(crate) struct CountingShaper {
    calls: AtomicUsize,
}

impl CountingShaper {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ShapingBackend for CountingShaper {
    fn shape(
        &self,
        text: &[char],
        typeface: &Typeface,
        size: f32,
        rtl: bool,
        locale: Option<&str>,
    ) -> Vec<ShapedGlyph> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CharMapShaper.shape(text, typeface, size, rtl, locale)
    }
}

/// An inline object with fixed extents.
#[derive(Debug)]
pub(crate) struct MockObject {
    pub(crate) advance: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) layouts: AtomicUsize,
}

impl MockObject {
    pub(crate) fn new(advance: f32, ascent: f32, descent: f32) -> Arc<Self> {
        Arc::new(Self {
            advance,
            ascent,
            descent,
            layouts: AtomicUsize::new(0),
        })
    }
}

impl RunDelegate for MockObject {
    fn advance(&self) -> f32 {
        self.advance
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn layout(&self) {
        self.layouts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Drawing commands, recorded for assertions.
#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Rect(Rect, Color),
    Glyphs {
        glyphs: Vec<PositionedGlyph>,
        color: Color,
        skew: f32,
        blur_radius: f32,
    },
    Decoration(Rect, LineStyle),
    Object(Rect),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub(crate) commands: Vec<Command>,
}

impl RecordingSink {
    pub(crate) fn glyph_runs(&self) -> impl Iterator<Item = &Command> {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::Glyphs { .. }))
    }
}

impl CanvasSink for RecordingSink {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(Command::Rect(rect, color));
    }

    fn draw_glyphs(&mut self, run: GlyphRun<'_>) {
        self.commands.push(Command::Glyphs {
            glyphs: run.glyphs.to_vec(),
            color: run.color,
            skew: run.skew,
            blur_radius: run.blur_radius,
        });
    }

    fn draw_decoration(&mut self, rect: Rect, style: LineStyle, _color: Color) {
        self.commands.push(Command::Decoration(rect, style));
    }

    fn draw_object(&mut self, _delegate: &Arc<dyn RunDelegate>, rect: Rect) {
        self.commands.push(Command::Object(rect));
    }
}
