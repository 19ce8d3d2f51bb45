// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs: spans of a paragraph that share a style and shaping treatment.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Debug;
use core::ops::Range;

use crate::analysis::BoundaryType;
use crate::font::{FontMetrics, Typeface};
use crate::shape::ShapeView;
use crate::style::{ParagraphStyle, Style, VerticalAlign};
use crate::util::{fuzzy_le, nearly_zero};

/// Offset of the sub- and superscript mid line from the middle of the line
/// box, as a fraction of its height.
const SCRIPT_OFFSET: f32 = 0.33;

/// An inline object laid out with the text.
///
/// Ascent and descent are positive distances from the baseline.
pub trait RunDelegate: Debug + Send + Sync {
    /// Horizontal advance.
    fn advance(&self) -> f32;

    /// Height above the baseline.
    fn ascent(&self) -> f32;

    /// Depth below the baseline.
    fn descent(&self) -> f32;

    /// Called once when the object is added to a paragraph.
    fn layout(&self) {}
}

/// Hard break sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// `\n`
    LineFeed,
    /// A lone `\r`.
    CarriageReturn,
    /// `\r\n`
    CrLf,
    /// U+2028
    LineSeparator,
    /// U+2029
    ParagraphSeparator,
    /// Form feed, U+000C.
    FormFeed,
}

impl ControlKind {
    /// Classifies a hard break sequence.
    pub fn from_chars(chars: &[char]) -> Option<Self> {
        match chars {
            ['\r', '\n'] => Some(Self::CrLf),
            ['\n'] => Some(Self::LineFeed),
            ['\r'] => Some(Self::CarriageReturn),
            ['\u{2028}'] => Some(Self::LineSeparator),
            ['\u{2029}'] => Some(Self::ParagraphSeparator),
            ['\u{c}'] => Some(Self::FormFeed),
            _ => None,
        }
    }
}

/// What a run contains.
#[derive(Clone, Debug)]
pub enum RunKind {
    /// Shaped text.
    Text,
    /// An inline object. With a placeholder it covers one U+FFFC char,
    /// otherwise it covers no chars.
    InlineObject {
        /// The object.
        delegate: Arc<dyn RunDelegate>,
        /// Whether a placeholder char was inserted.
        placeholder: bool,
    },
    /// Content that takes space but covers no chars, such as an ellipsis.
    Ghost {
        /// Shaped content; empty for an object ghost.
        content: String,
        /// Object content.
        delegate: Option<Arc<dyn RunDelegate>>,
    },
    /// A hard break.
    Control(ControlKind),
}

/// Vertical extent of a run or line around its baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    /// Height above the baseline, positive.
    pub ascent: f32,
    /// Depth below the baseline, positive.
    pub descent: f32,
}

impl LayoutMetrics {
    /// Creates metrics from an ascent and a descent.
    pub fn new(ascent: f32, descent: f32) -> Self {
        Self { ascent, descent }
    }

    /// Ascent and descent of a font.
    pub fn from_font(metrics: &FontMetrics) -> Self {
        Self::new(metrics.ascent, metrics.descent)
    }

    /// Grows to include `other`.
    pub fn update_max(&mut self, other: &Self) {
        self.ascent = self.ascent.max(other.ascent);
        self.descent = self.descent.max(other.descent);
    }

    /// Ascent plus descent.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Accounts for a baseline shift; positive offsets move down.
    pub fn apply_baseline_offset(&mut self, offset: f32) {
        if offset > 0.0 {
            self.descent += offset;
        } else {
            self.ascent -= offset;
        }
    }

    /// Scales both extents so that the height becomes `height`.
    pub fn scale_to_height(&mut self, height: f32) {
        let current = self.height();
        if nearly_zero(current) {
            return;
        }
        let ratio = height / current;
        self.ascent *= ratio;
        self.descent *= ratio;
    }
}

/// A span of a paragraph.
#[derive(Clone, Debug)]
pub struct Run {
    pub(crate) range: Range<usize>,
    pub(crate) kind: RunKind,
    /// The style given when the run was added.
    pub(crate) source: Style,
    /// The run style merged onto the paragraph default.
    pub(crate) style: Style,
    pub(crate) boundary: BoundaryType,
    pub(crate) shape: Option<ShapeView>,
    pub(crate) metrics: LayoutMetrics,
    /// Baseline shift, positive downwards.
    pub(crate) baseline_offset: f32,
    /// Extra shift that centers the glyph bounding box in the run.
    pub(crate) bounds_offset: f32,
    pub(crate) rtl: bool,
}

impl Run {
    pub(crate) fn new(range: Range<usize>, kind: RunKind, style: Style) -> Self {
        Self {
            range,
            kind,
            source: style.clone(),
            style,
            boundary: BoundaryType::None,
            shape: None,
            metrics: LayoutMetrics::default(),
            baseline_offset: 0.0,
            bounds_offset: 0.0,
            rtl: false,
        }
    }

    /// Char range in the paragraph.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// First char.
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// One past the last char.
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Number of chars covered.
    pub fn char_count(&self) -> usize {
        self.range.len()
    }

    /// The run kind.
    pub fn kind(&self) -> &RunKind {
        &self.kind
    }

    /// The resolved style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Boundary after the last char.
    pub fn boundary(&self) -> BoundaryType {
        self.boundary
    }

    /// Shaped glyphs, once formatted.
    pub fn shape(&self) -> Option<&ShapeView> {
        self.shape.as_ref()
    }

    /// Vertical metrics, once formatted.
    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    /// Baseline shift, positive downwards.
    pub fn baseline_offset(&self) -> f32 {
        self.baseline_offset
    }

    /// Returns true if the run is right to left.
    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    /// Returns true for text runs.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, RunKind::Text)
    }

    /// Returns true for inline objects with a placeholder char.
    pub fn is_object(&self) -> bool {
        matches!(self.kind, RunKind::InlineObject { .. }) && !self.range.is_empty()
    }

    /// Returns true for runs that cover no chars but take space.
    pub fn is_ghost(&self) -> bool {
        match self.kind {
            RunKind::Ghost { .. } => true,
            RunKind::InlineObject { .. } => self.range.is_empty(),
            _ => false,
        }
    }

    /// Returns true for hard breaks.
    pub fn is_control(&self) -> bool {
        matches!(self.kind, RunKind::Control(_))
    }

    /// The object delegate, if any.
    pub fn delegate(&self) -> Option<&Arc<dyn RunDelegate>> {
        match &self.kind {
            RunKind::InlineObject { delegate, .. } => Some(delegate),
            RunKind::Ghost { delegate, .. } => delegate.as_ref(),
            _ => None,
        }
    }

    /// Width of the whole run.
    pub fn width(&self) -> f32 {
        if let Some(delegate) = self.delegate() {
            return delegate.advance();
        }
        match &self.kind {
            RunKind::Ghost { .. } => self.shape.as_ref().map_or(0.0, |shape| {
                shape.width(self.style.letter_spacing())
            }),
            _ => self.width_of(0, self.char_count()),
        }
    }

    /// Width of `count` chars starting at `start`, relative to the run.
    pub fn width_of(&self, start: usize, count: usize) -> f32 {
        if let Some(delegate) = self.delegate() {
            return if count > 0 && start == 0 {
                delegate.advance()
            } else {
                0.0
            };
        }
        let end = (start + count).min(self.char_count());
        (start.min(end)..end).map(|index| self.char_width(index)).sum()
    }

    /// Advance of one char, with letter and word spacing.
    pub(crate) fn char_width(&self, index: usize) -> f32 {
        if self.is_control() {
            return 0.0;
        }
        let Some(shape) = &self.shape else {
            return 0.0;
        };
        let advance = shape.char_advance(index);
        if advance == 0.0 {
            return 0.0;
        }
        let mut width = advance + self.style.letter_spacing();
        if shape.result().is_space(shape.char_range().start + index) {
            width += self.style.word_spacing();
        }
        width
    }

    /// Counts how many chars from `start` fit in `max_width`.
    ///
    /// Returns the number of chars that fit and their width. Zero advance
    /// chars after the last fitting char are included.
    pub fn measure_by_width(&self, start: usize, max_width: f32) -> (usize, f32) {
        if self.delegate().is_some() {
            let width = self.width();
            return if start == 0 && fuzzy_le(width, max_width) {
                (self.char_count(), width)
            } else {
                (0, 0.0)
            };
        }
        let mut width = 0.0;
        let mut index = start;
        while index < self.char_count() {
            let advance = self.char_width(index);
            if advance > 0.0 && !fuzzy_le(width + advance, max_width) {
                break;
            }
            width += advance;
            index += 1;
        }
        (index - start.min(index), width)
    }

    /// Returns true if `other` can be shaped in one batch with this run.
    pub fn can_share_shaping(&self, other: &Self) -> bool {
        if !self.is_text() || !other.is_text() {
            return false;
        }
        self.rtl == other.rtl && self.style.shape_style() == other.style.shape_style()
    }

    /// Computes vertical metrics from the shaped fonts.
    ///
    /// `primary` provides metrics for runs that shaped nothing.
    pub(crate) fn layout(&mut self, paragraph: &ParagraphStyle, primary: Option<&Typeface>) {
        if let Some(delegate) = self.delegate().cloned() {
            self.metrics = LayoutMetrics::new(delegate.ascent(), delegate.descent());
            self.baseline_offset = self.style.baseline_offset();
            return;
        }

        let script = matches!(
            self.style.vertical_align(),
            VerticalAlign::Superscript | VerticalAlign::Subscript
        );
        let base_size = if script {
            self.style.text_size()
        } else {
            self.style.scaled_size()
        };

        let mut base: Option<FontMetrics> = None;
        let mut last_face = primary.cloned();
        if let Some(shape) = &self.shape {
            for (_, font) in shape.fonts() {
                let metrics = font.typeface.metrics(base_size);
                base = Some(match base {
                    Some(mut current) => {
                        current.ascent = current.ascent.max(metrics.ascent);
                        current.descent = current.descent.max(metrics.descent);
                        current.leading = current.leading.max(metrics.leading);
                        current
                    }
                    None => metrics,
                });
                last_face = Some(font.typeface.clone());
            }
        }
        let base = base
            .or_else(|| primary.map(|face| face.metrics(base_size)))
            .unwrap_or_default();

        if script {
            let scaled = last_face
                .map(|face| face.metrics(self.style.scaled_size()))
                .unwrap_or_default();
            let direction = if self.style.vertical_align() == VerticalAlign::Superscript {
                -SCRIPT_OFFSET
            } else {
                SCRIPT_OFFSET
            };
            let mid_line = base.height() * (0.5 + direction);
            self.baseline_offset = mid_line + scaled.ascent - scaled.height() / 2.0 - base.ascent;
            self.metrics = LayoutMetrics::from_font(&scaled);
        } else {
            self.metrics = LayoutMetrics::from_font(&base);
            if paragraph.line_height_override && base.height() > 0.0 {
                let size = self.style.text_size();
                if paragraph.half_leading {
                    self.metrics.ascent -= base.height() - size;
                } else {
                    self.metrics.scale_to_height(size);
                }
            }
            self.baseline_offset = self.style.baseline_offset();
        }

        if paragraph.text_bounds {
            self.bounds_offset = self.bounds_centering().unwrap_or(0.0);
        }
    }

    /// Shift that centers the glyph bounding box between ascent and descent.
    fn bounds_centering(&self) -> Option<f32> {
        let shape = self.shape.as_ref()?;
        let size = shape.result().size();
        let glyphs = shape.result().glyphs();
        let mut y_max = f32::MIN;
        let mut y_min = f32::MAX;
        for (range, font) in shape.fonts() {
            for &glyph in &glyphs[range] {
                if let Some(bounds) = font.typeface.bounds(glyph, size) {
                    y_max = y_max.max(bounds.y_max);
                    y_min = y_min.min(bounds.y_min);
                }
            }
        }
        if y_max < y_min {
            return None;
        }
        let slack = self.metrics.height() - (y_max - y_min);
        Some(slack / 2.0 - self.metrics.ascent + y_max)
    }
}
