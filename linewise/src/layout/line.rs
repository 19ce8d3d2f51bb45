// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use peniko::kurbo::Rect;

use super::alignment;
use crate::analysis::BoundaryType;
use crate::paragraph::{Paragraph, includes_point};
use crate::run::{LayoutMetrics, Run, RunKind};
use crate::shape::{ShapeView, Shaper};
use crate::style::{Alignment, Ellipsis, LineAlignment, LineHeight};
use crate::util::fuzzy_le;

/// A run, or part of one, placed on a line.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePiece {
    /// Index of the run in the paragraph; `None` for the ellipsis.
    pub(crate) run: Option<usize>,
    /// Paragraph chars covered; empty for runs without chars.
    pub(crate) chars: Range<usize>,
    pub(crate) level: u8,
    pub(crate) width: f32,
    pub(crate) x: f32,
    pub(crate) baseline: f32,
}

impl LinePiece {
    /// Index of the run in the paragraph, or `None` for the ellipsis.
    pub fn run_index(&self) -> Option<usize> {
        self.run
    }

    /// Paragraph chars covered.
    pub fn chars(&self) -> Range<usize> {
        self.chars.clone()
    }

    /// Returns true if the piece is drawn right to left.
    pub fn is_rtl(&self) -> bool {
        self.level & 1 == 1
    }

    /// Advance width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Left edge in region coordinates.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Baseline in region coordinates.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }
}

/// One line of a laid out paragraph.
///
/// Holds a shared handle to the paragraph it was laid out from.
#[derive(Clone, Debug)]
pub struct TextLine {
    pub(crate) paragraph: Paragraph,
    pub(crate) range: Range<usize>,
    pub(crate) top: f32,
    pub(crate) height: f32,
    pub(crate) metrics: LayoutMetrics,
    /// Space between the top of the line box and the top of the content.
    pub(crate) top_extra: f32,
    pub(crate) start_indent: f32,
    pub(crate) end_indent: f32,
    /// Width content may fill between the indents.
    pub(crate) max_width: f32,
    /// Width free space is measured against between the indents.
    pub(crate) align_width: Option<f32>,
    pub(crate) alignment: Alignment,
    /// The line ends in a hard break.
    pub(crate) hard_break: bool,
    /// The line ends the paragraph.
    pub(crate) last: bool,
    pub(crate) pieces: Vec<LinePiece>,
    pub(crate) ellipsis: Option<Run>,
}

impl TextLine {
    pub(crate) fn new(
        paragraph: Paragraph,
        range: Range<usize>,
        top: f32,
        max_width: f32,
        align_width: Option<f32>,
    ) -> Self {
        let style = paragraph.style();
        let start_indent = style.start_indent(range.start == 0);
        let end_indent = style.end_indent();
        let alignment = style.alignment;
        let hard_break =
            range.end > 0 && paragraph.boundaries().get(range.end - 1) >= BoundaryType::MustBreak;
        let last = range.end >= paragraph.char_count();
        let mut line = Self {
            paragraph,
            range,
            top,
            height: 0.0,
            metrics: LayoutMetrics::default(),
            top_extra: 0.0,
            start_indent,
            end_indent,
            max_width,
            align_width: align_width.map(|width| width - start_indent - end_indent),
            alignment,
            hard_break,
            last,
            pieces: Vec::new(),
            ellipsis: None,
        };
        line.measure();
        line.rebuild();
        line
    }

    /// The paragraph the line belongs to.
    pub fn paragraph(&self) -> &Paragraph {
        &self.paragraph
    }

    /// Paragraph chars on the line.
    pub fn char_range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Top of the line box.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Bottom of the line box.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Height of the line box.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Baseline in region coordinates.
    pub fn baseline(&self) -> f32 {
        self.content_top() + self.metrics.ascent
    }

    /// Largest ascent on the line.
    pub fn ascent(&self) -> f32 {
        self.metrics.ascent
    }

    /// Largest descent on the line.
    pub fn descent(&self) -> f32 {
        self.metrics.descent
    }

    /// Natural width of the content, trailing whitespace included.
    pub fn width(&self) -> f32 {
        self.pieces.iter().map(|piece| piece.width).sum()
    }

    /// Left edge of the content.
    pub fn left(&self) -> f32 {
        self.pieces.first().map_or(self.start_indent, |piece| piece.x)
    }

    /// Right edge of the content.
    pub fn right(&self) -> f32 {
        self.pieces
            .last()
            .map_or(self.start_indent, |piece| piece.x + piece.width)
    }

    /// Indent before the content.
    pub fn start_indent(&self) -> f32 {
        self.start_indent
    }

    /// Indent after the content.
    pub fn end_indent(&self) -> f32 {
        self.end_indent
    }

    /// Pieces in visual order, left to right.
    pub fn pieces(&self) -> &[LinePiece] {
        &self.pieces
    }

    /// The run a piece was cut from.
    pub fn piece_run(&self, piece: &LinePiece) -> Option<&Run> {
        match piece.run {
            Some(index) => self.paragraph.runs().get(index),
            None => self.ellipsis.as_ref(),
        }
    }

    /// Horizontal alignment in effect.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Overrides the horizontal alignment of this line.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.rebuild();
    }

    /// Returns true if the line ends in an ellipsis.
    pub fn has_ellipsis(&self) -> bool {
        self.ellipsis.is_some()
    }

    /// Returns true if the line ends the paragraph.
    pub fn is_last_line_of_paragraph(&self) -> bool {
        self.last
    }

    /// Rectangles covering the chars of `range` on this line, one per piece.
    pub fn bounding_rects(&self, range: Range<usize>) -> Vec<Rect> {
        let mut rects = Vec::new();
        for piece in &self.pieces {
            let Some(run) = self.piece_run(piece) else {
                continue;
            };
            if piece.run.is_none() || piece.chars.is_empty() {
                continue;
            }
            let start = range.start.max(piece.chars.start);
            let end = range.end.min(piece.chars.end);
            if start >= end {
                continue;
            }
            let before = run.width_of(piece.chars.start - run.start(), start - piece.chars.start);
            let inside = run.width_of(start - run.start(), end - start);
            let x0 = if piece.is_rtl() {
                piece.x + piece.width - before - inside
            } else {
                piece.x + before
            };
            let metrics = run.metrics();
            rects.push(Rect::new(
                f64::from(x0),
                f64::from(piece.baseline - metrics.ascent),
                f64::from(x0 + inside),
                f64::from(piece.baseline + metrics.descent),
            ));
        }
        rects
    }

    /// The paragraph char offset closest to `x`.
    pub fn char_at_x(&self, x: f32) -> usize {
        let mut nearest = (f32::MAX, self.range.start);
        for piece in &self.pieces {
            let Some(run) = self.piece_run(piece) else {
                continue;
            };
            if piece.run.is_none() || piece.chars.is_empty() {
                continue;
            }
            let right = piece.x + piece.width;
            if x >= piece.x && x <= right {
                return self.offset_in_piece(piece, run, x - piece.x);
            }
            let (left_char, right_char) = if piece.is_rtl() {
                (piece.chars.end, piece.chars.start)
            } else {
                (piece.chars.start, piece.chars.end)
            };
            let left_distance = (piece.x - x).abs();
            let right_distance = (x - right).abs();
            if left_distance < nearest.0 {
                nearest = (left_distance, left_char);
            }
            if right_distance < nearest.0 {
                nearest = (right_distance, right_char);
            }
        }
        if nearest.0 == f32::MAX {
            return self.range.end;
        }
        nearest.1
    }

    fn offset_in_piece(&self, piece: &LinePiece, run: &Run, x: f32) -> usize {
        let chars = piece.chars.clone();
        let mut advance = 0.0;
        if piece.is_rtl() {
            for char in chars.clone().rev() {
                let width = run.char_width(char - run.start());
                if x < advance + width / 2.0 {
                    return char + 1;
                }
                advance += width;
            }
            chars.start
        } else {
            for char in chars.clone() {
                let width = run.char_width(char - run.start());
                if x < advance + width / 2.0 {
                    return char;
                }
                advance += width;
            }
            chars.end
        }
    }

    /// Top of the content inside the line box.
    pub(crate) fn content_top(&self) -> f32 {
        self.top + self.top_extra
    }

    /// Runs on the line with their index, in logical order.
    pub(crate) fn runs(&self) -> impl Iterator<Item = (usize, &Run)> + '_ {
        let count = self.paragraph.char_count();
        self.paragraph
            .runs()
            .iter()
            .enumerate()
            .filter(move |(_, run)| {
                if run.char_count() == 0 {
                    includes_point(&self.range, run.start(), count)
                } else {
                    run.start() < self.range.end && run.end() > self.range.start
                }
            })
    }

    /// Computes the content metrics and the line box height.
    fn measure(&mut self) {
        let style = self.paragraph.style();
        let rule = style.spacing.line_height;
        let mut content = LayoutMetrics::default();
        let mut desired: f32 = 0.0;
        for (_, run) in self.runs() {
            let line_height = match rule {
                LineHeight::Exact(px) => px,
                LineHeight::Auto(_) | LineHeight::AtLeast(_) => {
                    let mut scaled = run.metrics();
                    if run.delegate().is_none() {
                        scaled.scale_to_height(rule.resolve(scaled.height()));
                    }
                    scaled.apply_baseline_offset(run.baseline_offset());
                    let mut candidate = content;
                    candidate.update_max(&scaled);
                    candidate.height()
                }
            };
            desired = desired.max(line_height);
            let mut shifted = run.metrics();
            shifted.apply_baseline_offset(run.baseline_offset());
            content.update_max(&shifted);
        }
        let extra = desired - content.height();
        self.top_extra = match style.line_alignment {
            LineAlignment::Top => 0.0,
            LineAlignment::Center => extra / 2.0,
            LineAlignment::Bottom => extra,
        };
        self.metrics = content;
        self.height = desired;
        log::trace!(
            "line {:?}: height {desired}, ascent {}, descent {}",
            self.range,
            content.ascent,
            content.descent
        );
    }

    /// Recreates the pieces and places them.
    pub(crate) fn rebuild(&mut self) {
        self.pieces = alignment::build_pieces(self);
        alignment::align(self);
    }

    /// Truncates the line so that the paragraph's ellipsis fits after it.
    pub(crate) fn apply_ellipsis(&mut self, shaper: &Shaper) {
        let style = self.paragraph.style();
        let kind = match &style.ellipsis {
            Ellipsis::None => return,
            Ellipsis::Text(text) if text.is_empty() => return,
            Ellipsis::Text(text) => RunKind::Ghost {
                content: text.clone(),
                delegate: None,
            },
            Ellipsis::Object(delegate) => RunKind::Ghost {
                content: String::new(),
                delegate: Some(delegate.clone()),
            },
        };
        let run_style = self
            .runs()
            .filter(|(_, run)| run.is_text() && run.char_count() > 0)
            .last()
            .map_or_else(|| style.default_style.clone(), |(_, run)| run.style().clone());
        let mut ellipsis = Run::new(self.range.end..self.range.end, kind, run_style);
        ellipsis.rtl = self.paragraph.bidi().is_base_rtl();
        if let RunKind::Ghost { content, delegate: None } = &ellipsis.kind {
            let chars: Vec<char> = content.chars().collect();
            let result = shaper.shape(&chars, ellipsis.style.shape_style(), ellipsis.rtl);
            ellipsis.shape = Some(ShapeView::new(result, 0..chars.len()));
        }
        let primary = shaper.primary_typeface(ellipsis.style.font());
        ellipsis.layout(style, primary.as_ref());
        let ellipsis_width = ellipsis.width();

        let boundaries = self.paragraph.boundaries();
        let start = self.range.start;
        let mut end = self.range.end;
        while end > start
            && !fuzzy_le(
                self.paragraph.measure_range(start..end) + ellipsis_width,
                self.max_width,
            )
        {
            end = boundaries.find_prev(end - 1, BoundaryType::Grapheme).max(start);
        }
        let fits = fuzzy_le(
            self.paragraph.measure_range(start..end) + ellipsis_width,
            self.max_width,
        );
        log::debug!(
            "ellipsis after {:?} (fits: {fits}), dropping {}..{}",
            start..end,
            end,
            self.range.end
        );
        self.range.end = end;
        self.last = false;
        self.hard_break = false;
        if fits {
            ellipsis.range = end..end;
            self.ellipsis = Some(ellipsis);
        }
        self.rebuild();
    }
}
