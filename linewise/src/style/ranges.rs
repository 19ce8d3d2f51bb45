// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range based style application.

use alloc::vec::Vec;
use core::ops::Range;

use super::{AttributeSet, Style};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StyleSpan {
    pub(crate) range: Range<usize>,
    pub(crate) style: Style,
}

/// Ordered, non-overlapping spans of explicit styles covering `0..len`.
///
/// Adjacent spans always carry different styles.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct StyleRanges {
    spans: Vec<StyleSpan>,
    len: usize,
}

impl StyleRanges {
    /// Grows coverage to `len` with spans that set no attribute.
    pub(crate) fn extend_to(&mut self, len: usize) {
        if len <= self.len {
            return;
        }
        self.spans.push(StyleSpan {
            range: self.len..len,
            style: Style::default(),
        });
        self.len = len;
        self.merge_adjacent();
    }

    /// Applies every attribute set on `style` across `range`.
    pub(crate) fn apply(&mut self, range: Range<usize>, style: &Style) {
        let end = range.end.min(self.len);
        let start = range.start.min(end);
        if start == end || style.attributes().is_empty() {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for span in &mut self.spans[first..last] {
            style.apply_onto(&mut span.style);
        }
        self.merge_adjacent();
    }

    /// Returns the explicit style at `index`.
    pub(crate) fn style_at(&self, index: usize) -> Option<&Style> {
        let span = self.span_index(index)?;
        Some(&self.spans[span].style)
    }

    #[cfg(test)]
    pub(crate) fn spans(&self) -> &[StyleSpan] {
        &self.spans
    }

    /// Offsets where the style changes in one of the attributes in `mask`,
    /// excluding `0` and `len`.
    pub(crate) fn change_points(&self, mask: AttributeSet) -> impl Iterator<Item = usize> + '_ {
        self.spans.windows(2).filter_map(move |pair| {
            (!pair[0].style.same_in(&pair[1].style, mask)).then_some(pair[1].range.start)
        })
    }

    /// Offsets where the baseline offset or the vertical alignment changes.
    pub(crate) fn baseline_offset_boundaries(&self) -> impl Iterator<Item = usize> + '_ {
        self.change_points(AttributeSet::BASELINE)
    }

    fn span_index(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        match self
            .spans
            .binary_search_by(|span| span.range.start.cmp(&index))
        {
            Ok(i) => Some(i),
            Err(i) => Some(i.saturating_sub(1)),
        }
    }

    /// Splits the span containing `at` so that a span starts there, and
    /// returns its index. Returns the span count when `at` is the end.
    fn split_at(&mut self, at: usize) -> usize {
        if at >= self.len {
            return self.spans.len();
        }
        let Some(index) = self.span_index(at) else {
            return self.spans.len();
        };
        let span = &mut self.spans[index];
        if span.range.start == at {
            return index;
        }
        let mut tail = span.clone();
        span.range.end = at;
        tail.range.start = at;
        self.spans.insert(index + 1, tail);
        index + 1
    }

    fn merge_adjacent(&mut self) {
        let mut prev_index = 0;
        let mut merged_count = 0;
        for i in 1..self.spans.len() {
            if self.spans[prev_index].style == self.spans[i].style {
                let end = self.spans[i].range.end;
                self.spans[prev_index].range.end = end;
                merged_count += 1;
            } else {
                prev_index += 1;
                if prev_index != i {
                    let moved_span = self.spans[i].clone();
                    self.spans[prev_index] = moved_span;
                }
            }
        }
        self.spans.truncate(self.spans.len() - merged_count);
    }
}
