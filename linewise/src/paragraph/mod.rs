// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paragraph model.
//!
//! A [`Paragraph`] owns its text, the runs added to it and the tables derived
//! from them. Formatting splits the added runs at forced boundaries, resolves
//! their styles, shapes them and computes their vertical metrics.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use crate::analysis::{
    BidiResolution, BoundaryTable, BoundaryType, RuleBasedSegmenter, SegmentOptions,
    SegmentationBackend,
};
use crate::context::LayoutContext;
use crate::cursor::LayoutPosition;
use crate::error::TextError;
use crate::run::{ControlKind, Run, RunDelegate, RunKind};
use crate::shape::ShapeView;
use crate::style::{AttributeSet, ParagraphStyle, Style, StyleRanges};
use crate::text::TextContent;
use crate::util::is_space_char;

/// Object replacement character inserted for placeholder objects.
const OBJECT_REPLACEMENT: &str = "\u{fffc}";

#[derive(Clone, Debug, Default)]
struct ParagraphData {
    style: ParagraphStyle,
    content: TextContent,
    /// Runs as they were added.
    added: Vec<Run>,
    /// Runs after formatting.
    runs: Vec<Run>,
    style_ranges: StyleRanges,
    boundaries: BoundaryTable,
    bidi: BidiResolution,
    formatted: bool,
}

/// A paragraph of styled text and inline objects.
///
/// Cloning is cheap: the data is shared and copied on the next mutation.
/// Laid out lines keep such a clone, so they stay valid while the owner keeps
/// editing the paragraph.
#[derive(Clone, Debug, Default)]
pub struct Paragraph {
    data: Arc<ParagraphData>,
}

impl Paragraph {
    /// Creates an empty paragraph.
    pub fn new(style: ParagraphStyle) -> Self {
        Self {
            data: Arc::new(ParagraphData {
                style,
                ..ParagraphData::default()
            }),
        }
    }

    /// The paragraph style.
    pub fn style(&self) -> &ParagraphStyle {
        &self.data.style
    }

    /// Mutable access to the paragraph style. Invalidates formatting.
    pub fn style_mut(&mut self) -> &mut ParagraphStyle {
        let data = self.data_mut();
        &mut data.style
    }

    /// Replaces the style every run reads through to.
    pub fn set_default_style(&mut self, style: Style) {
        self.data_mut().style.default_style = style;
    }

    /// Number of chars.
    pub fn char_count(&self) -> usize {
        self.data.content.char_count()
    }

    /// The text content.
    pub fn text(&self) -> &TextContent {
        &self.data.content
    }

    /// Runs. Formatted runs once [`Paragraph::format_run_list`] has run,
    /// otherwise the runs as added.
    pub fn runs(&self) -> &[Run] {
        if self.data.formatted {
            &self.data.runs
        } else {
            &self.data.added
        }
    }

    /// Number of runs; see [`Paragraph::runs`].
    pub fn run_count(&self) -> usize {
        self.runs().len()
    }

    /// Returns true if the runs are formatted for the current content.
    pub fn is_formatted(&self) -> bool {
        self.data.formatted
    }

    /// The boundary table of the last formatting pass.
    pub fn boundaries(&self) -> &BoundaryTable {
        &self.data.boundaries
    }

    /// The bidi levels of the last formatting pass.
    pub fn bidi(&self) -> &BidiResolution {
        &self.data.bidi
    }

    /// Appends text with an optional style.
    ///
    /// Empty or invalid input is logged and dropped; the paragraph is left
    /// unchanged and the error returned.
    pub fn add_text_run(
        &mut self,
        style: Option<&Style>,
        text: impl AsRef<[u8]>,
    ) -> Result<Range<usize>, TextError> {
        let data = Arc::make_mut(&mut self.data);
        let range = match data.content.append(text.as_ref()) {
            Ok(range) => range,
            Err(err) => {
                log::warn!("dropping text run: {err}");
                return Err(err);
            }
        };
        data.formatted = false;
        data.style_ranges.extend_to(range.end);
        let style = style.cloned().unwrap_or_default();
        data.style_ranges.apply(range.clone(), &style);
        data.added
            .push(Run::new(range.clone(), RunKind::Text, style));
        Ok(range)
    }

    /// Appends an inline object.
    ///
    /// With `placeholder` the object covers one U+FFFC char, otherwise it
    /// covers no chars and sits between its neighbors.
    pub fn add_shape_run(
        &mut self,
        style: Option<&Style>,
        delegate: Arc<dyn RunDelegate>,
        placeholder: bool,
    ) -> Range<usize> {
        delegate.layout();
        let data = self.data_mut();
        let range = if placeholder {
            data.content.push_str(OBJECT_REPLACEMENT)
        } else {
            let end = data.content.char_count();
            end..end
        };
        data.style_ranges.extend_to(range.end);
        let style = style.cloned().unwrap_or_default();
        data.style_ranges.apply(range.clone(), &style);
        data.added.push(Run::new(
            range.clone(),
            RunKind::InlineObject {
                delegate,
                placeholder,
            },
            style,
        ));
        range
    }

    /// Applies every attribute set on `style` to a char range.
    pub fn apply_style(&mut self, range: Range<usize>, style: &Style) {
        let data = self.data_mut();
        data.style_ranges.apply(range, style);
    }

    /// Splits, styles, shapes and measures the runs.
    ///
    /// Does nothing if the paragraph has not changed since the last call.
    pub fn format_run_list(&mut self, context: &LayoutContext) {
        if self.data.formatted {
            return;
        }
        let data = Arc::make_mut(&mut self.data);
        let style = &data.style;
        if style.indent.first_line.to_px(1.0) > 0.0 && style.indent.hanging.to_px(1.0) > 0.0 {
            log::warn!("paragraph sets both a first line and a hanging indent");
        }

        let text = data.content.as_str();
        let chars: Vec<char> = text.chars().collect();
        let count = chars.len();
        let options = SegmentOptions {
            word_break: style.default_style.word_break(),
            avoid_break_around_punctuation: style
                .line_break_strategy
                .avoid_break_around_punctuation,
        };
        let mut boundaries = context.segmenter().analyze(text, options);
        debug_assert_eq!(boundaries.len(), count, "boundary table length");
        if boundaries.len() != count {
            boundaries = BoundaryTable::new(count);
        }
        let mut bidi = context.bidi().resolve(text, style.direction);
        debug_assert_eq!(bidi.len(), count, "bidi level count");
        if bidi.len() != count {
            let base = bidi.base_level();
            bidi = BidiResolution::new(vec![base; count], base);
        }

        let mut splits = vec![false; count + 1];
        let mut k = 0;
        while k < count {
            let len = control_len(&chars[k..]);
            if len > 0 {
                splits[k] = true;
                splits[k + len] = true;
                boundaries.upgrade(k + len - 1..k + len, BoundaryType::MustBreak);
                k += len;
            } else {
                k += 1;
            }
        }
        for k in 1..count {
            if bidi.is_rtl(k) != bidi.is_rtl(k - 1) {
                boundaries.upgrade(k - 1..k, BoundaryType::LineBreakable);
                splits[k] = true;
            }
        }
        for point in data.style_ranges.baseline_offset_boundaries() {
            boundaries.upgrade(point - 1..point, BoundaryType::LineBreakable);
        }
        for point in data.style_ranges.change_points(AttributeSet::ALL) {
            splits[point] = true;
        }

        let mut runs = Vec::with_capacity(data.added.len());
        for run in &data.added {
            if !run.is_text() {
                runs.push(run.clone());
                continue;
            }
            let mut start = run.start();
            for k in run.start() + 1..=run.end() {
                if k == run.end() || splits[k] {
                    let kind = ControlKind::from_chars(&chars[start..k])
                        .map_or(RunKind::Text, RunKind::Control);
                    runs.push(Run::new(start..k, kind, run.source.clone()));
                    start = k;
                }
            }
        }
        if runs.is_empty() {
            runs.push(Run::new(0..0, RunKind::Text, Style::default()));
        }

        // Objects break on both sides.
        for run in &runs {
            if matches!(run.kind, RunKind::InlineObject { .. }) {
                let start = run.start().saturating_sub(1);
                boundaries.upgrade(start..run.end(), BoundaryType::LineBreakable);
            }
        }

        let default = &style.default_style;
        let run_count = runs.len();
        for index in 0..run_count {
            let run = &mut runs[index];
            run.style = if run.char_count() > 0 {
                data.style_ranges
                    .style_at(run.start())
                    .map_or_else(|| default.clone(), |s| s.merge_onto(default))
            } else {
                run.source.merge_onto(default)
            };
            run.rtl = if run.char_count() > 0 {
                bidi.is_rtl(run.start())
            } else {
                bidi.is_base_rtl()
            };
            run.boundary = if index + 1 == run_count {
                BoundaryType::LineBreakable
            } else if run.char_count() > 0 {
                boundaries.get(run.end() - 1)
            } else {
                BoundaryType::None
            };
            run.shape = None;
        }
        for index in 0..run_count {
            if matches!(runs[index].kind, RunKind::InlineObject { .. }) {
                runs[index].boundary = runs[index].boundary.max(BoundaryType::LineBreakable);
                if index > 0 {
                    runs[index - 1].boundary =
                        runs[index - 1].boundary.max(BoundaryType::LineBreakable);
                }
            }
        }

        let shaper = context.shaper();
        let mut index = 0;
        while index < run_count {
            if !runs[index].is_text() || runs[index].char_count() == 0 {
                index += 1;
                continue;
            }
            let mut end = index + 1;
            while end < run_count && runs[index].can_share_shaping(&runs[end]) {
                end += 1;
            }
            let span = runs[index].start()..runs[end - 1].end();
            let result = shaper.shape(
                &chars[span.clone()],
                runs[index].style.shape_style(),
                runs[index].rtl,
            );
            for run in &mut runs[index..end] {
                let range = run.start() - span.start..run.end() - span.start;
                run.shape = Some(ShapeView::new(result.clone(), range));
            }
            index = end;
        }
        for run in &mut runs {
            let primary = shaper.primary_typeface(run.style.font());
            run.layout(style, primary.as_ref());
        }

        debug_assert!(
            runs.windows(2).all(|pair| pair[0].end() == pair[1].start()),
            "runs must tile the paragraph"
        );
        log::debug!("formatted {count} chars into {run_count} runs");
        data.runs = runs;
        data.boundaries = boundaries;
        data.bidi = bidi;
        data.formatted = true;
    }

    /// Returns the word containing `offset` as `(start, end)`.
    ///
    /// Offsets past the end refer to the last char. Returns `(0, 0)` for an
    /// empty paragraph.
    ///
    /// Once formatted, the boundaries of the formatting context's segmenter
    /// are used. Before that the text is analyzed with
    /// [`RuleBasedSegmenter`]; use [`Self::get_word_boundary_with`] to pick
    /// the segmenter the paragraph will be formatted with.
    pub fn get_word_boundary(&self, offset: usize) -> (usize, usize) {
        self.get_word_boundary_with(offset, &RuleBasedSegmenter)
    }

    /// Like [`Self::get_word_boundary`], analyzing an unformatted paragraph
    /// with `segmenter`.
    pub fn get_word_boundary_with(
        &self,
        offset: usize,
        segmenter: &dyn SegmentationBackend,
    ) -> (usize, usize) {
        let count = self.char_count();
        if count == 0 {
            return (0, 0);
        }
        let offset = offset.min(count - 1);
        let computed;
        let table = if self.data.formatted {
            &self.data.boundaries
        } else {
            let options = SegmentOptions {
                word_break: self.data.style.default_style.word_break(),
                avoid_break_around_punctuation: self
                    .data
                    .style
                    .line_break_strategy
                    .avoid_break_around_punctuation,
            };
            computed = segmenter.analyze(self.data.content.as_str(), options);
            &computed
        };
        let start = table.find_prev(offset, BoundaryType::Word);
        let end = table.find_next(offset, BoundaryType::Word);
        if start > end {
            return (0, 0);
        }
        (start, end)
    }

    /// Converts a char offset to a layout position.
    ///
    /// Runs without chars are skipped. The end of the text maps to
    /// `(run_count, 0)`.
    pub fn char_pos_to_layout_position(&self, pos: usize) -> LayoutPosition {
        let runs = self.runs();
        let mut index = runs.partition_point(|run| run.end() <= pos);
        while index < runs.len() && runs[index].char_count() == 0 {
            index += 1;
        }
        match runs.get(index) {
            Some(run) => LayoutPosition::new(index, pos.saturating_sub(run.start())),
            None => LayoutPosition::new(runs.len(), 0),
        }
    }

    /// Converts a layout position to a char offset.
    pub fn layout_position_to_char_pos(&self, pos: LayoutPosition) -> usize {
        match self.runs().get(pos.run) {
            Some(run) => run.start() + pos.char.min(run.char_count()),
            None => self.char_count(),
        }
    }

    /// The position one char later, skipping runs without chars.
    pub fn next_position(&self, pos: LayoutPosition) -> LayoutPosition {
        let char = self.layout_position_to_char_pos(pos);
        self.char_pos_to_layout_position((char + 1).min(self.char_count()))
    }

    /// The position one char earlier, skipping runs without chars.
    pub fn prev_position(&self, pos: LayoutPosition) -> LayoutPosition {
        let char = self.layout_position_to_char_pos(pos);
        self.char_pos_to_layout_position(char.saturating_sub(1))
    }

    /// The first position after `pos` preceded by a boundary of at least
    /// `min`, or the end.
    pub fn find_next_boundary_position(
        &self,
        pos: LayoutPosition,
        min: BoundaryType,
    ) -> LayoutPosition {
        let char = self.layout_position_to_char_pos(pos);
        self.char_pos_to_layout_position(self.data.boundaries.find_next(char, min))
    }

    /// The last position at or before `pos` preceded by a boundary of at
    /// least `min`, or the start.
    pub fn find_prev_boundary_position(
        &self,
        pos: LayoutPosition,
        min: BoundaryType,
    ) -> LayoutPosition {
        let char = self.layout_position_to_char_pos(pos);
        self.char_pos_to_layout_position(self.data.boundaries.find_prev(char, min))
    }

    /// Width of the widest stretch between hard breaks, without trailing
    /// whitespace. Requires formatted runs.
    pub fn max_intrinsic_width(&self) -> f32 {
        self.widest_segment(BoundaryType::MustBreak)
    }

    /// Width of the widest segment between line break opportunities, without
    /// trailing whitespace. Requires formatted runs.
    pub fn min_intrinsic_width(&self) -> f32 {
        self.widest_segment(BoundaryType::LineBreakable)
    }

    fn widest_segment(&self, min: BoundaryType) -> f32 {
        let count = self.char_count();
        if count == 0 {
            return self.measure_range(0..0);
        }
        let mut widest: f32 = 0.0;
        let mut start = 0;
        while start < count {
            let end = self.data.boundaries.find_next(start, min).max(start + 1);
            let trimmed = self.trim_trailing_spaces(start..end);
            widest = widest.max(self.measure_range(start..trimmed));
            start = end;
        }
        widest
    }

    /// Returns the end of `range` with trailing whitespace removed.
    pub(crate) fn trim_trailing_spaces(&self, range: Range<usize>) -> usize {
        let text = &self.data.content;
        let mut end = range.end;
        while end > range.start && text.char_at(end - 1).is_some_and(is_space_char) {
            end -= 1;
        }
        end
    }

    /// Width of a char range. Runs without chars count when they sit inside
    /// the range, or at its end when that is the end of the text.
    pub(crate) fn measure_range(&self, range: Range<usize>) -> f32 {
        let count = self.char_count();
        self.runs()
            .iter()
            .map(|run| {
                if run.char_count() == 0 {
                    if includes_point(&range, run.start(), count) {
                        run.width()
                    } else {
                        0.0
                    }
                } else {
                    let start = run.start().max(range.start);
                    let end = run.end().min(range.end);
                    if start < end {
                        run.width_of(start - run.start(), end - start)
                    } else {
                        0.0
                    }
                }
            })
            .sum()
    }

    /// Index of the run containing `char`.
    pub(crate) fn run_at(&self, char: usize) -> Option<usize> {
        let position = self.char_pos_to_layout_position(char);
        (position.run < self.run_count()).then_some(position.run)
    }

    /// Returns true if `char` is resolved right to left.
    pub fn is_rtl(&self, char: usize) -> bool {
        self.data.bidi.is_rtl(char)
    }

    /// The text with every object without a placeholder shown as U+FFFC.
    pub fn content_string(&self) -> String {
        let mut out = String::with_capacity(self.data.content.as_str().len());
        let mut copied = 0;
        for run in &self.data.added {
            if matches!(run.kind, RunKind::InlineObject { placeholder: false, .. }) {
                out.push_str(self.data.content.substring(copied..run.start()));
                out.push_str(OBJECT_REPLACEMENT);
                copied = run.start();
            }
        }
        out.push_str(
            self.data
                .content
                .substring(copied..self.data.content.char_count()),
        );
        out
    }

    fn data_mut(&mut self) -> &mut ParagraphData {
        let data = Arc::make_mut(&mut self.data);
        data.formatted = false;
        data
    }
}

/// Length of the hard break sequence at the start of `chars`, or zero.
fn control_len(chars: &[char]) -> usize {
    if chars.len() >= 2 && ControlKind::from_chars(&chars[..2]).is_some() {
        2
    } else if !chars.is_empty() && ControlKind::from_chars(&chars[..1]).is_some() {
        1
    } else {
        0
    }
}

/// Returns true if a run without chars at `point` belongs to `range`.
pub(crate) fn includes_point(range: &Range<usize>, point: usize, count: usize) -> bool {
    range.contains(&point) || (point == range.end && range.end == count)
}
