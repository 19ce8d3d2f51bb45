// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::{LayoutMode, LayoutOptions, TextLine};
use crate::style::ParagraphStyle;
use crate::util::clamp_units;

/// The area lines are laid out into, and the lines laid out so far.
///
/// A region may receive several paragraphs; each layout call appends below
/// the lines already present.
#[derive(Clone, Debug)]
pub struct LayoutRegion {
    width: f32,
    height: f32,
    width_mode: LayoutMode,
    height_mode: LayoutMode,
    lines: Vec<TextLine>,
    /// Bottom of the last line.
    layout_bottom: f32,
    /// Widest line including its indents.
    layout_width: f32,
    /// Space owed below the last paragraph.
    pending_space: f32,
    full: bool,
    exceeded_max_lines: bool,
}

impl LayoutRegion {
    /// Creates an empty region. Extents are clamped to ±1e6.
    pub fn new(width: f32, height: f32, width_mode: LayoutMode, height_mode: LayoutMode) -> Self {
        Self {
            width: clamp_units(width),
            height: clamp_units(height),
            width_mode,
            height_mode,
            lines: Vec::new(),
            layout_bottom: 0.0,
            layout_width: 0.0,
            pending_space: 0.0,
            full: false,
            exceeded_max_lines: false,
        }
    }

    /// Width constraint.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height constraint.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// How the width constrains layout.
    pub fn width_mode(&self) -> LayoutMode {
        self.width_mode
    }

    /// How the height constrains layout.
    pub fn height_mode(&self) -> LayoutMode {
        self.height_mode
    }

    /// Lines in layout order.
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Mutable access to the lines, for alignment overrides.
    pub fn lines_mut(&mut self) -> &mut [TextLine] {
        &mut self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no line has been laid out.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Size of the laid out content.
    ///
    /// A definite axis reports the region extent, the other modes report the
    /// measured extent.
    pub fn content_size(&self) -> (f32, f32) {
        let width = match self.width_mode {
            LayoutMode::Definite => self.width,
            LayoutMode::AtMost | LayoutMode::Indefinite => self.layout_width,
        };
        let height = match self.height_mode {
            LayoutMode::Definite => self.height,
            LayoutMode::AtMost | LayoutMode::Indefinite => self.layout_bottom,
        };
        (width, height)
    }

    /// Returns true if content was left over because the region ran out of
    /// height or lines.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Returns true if layout stopped at a paragraph's line limit with
    /// content remaining.
    pub fn exceeded_max_lines(&self) -> bool {
        self.exceeded_max_lines
    }

    /// Removes every line and resets the measured size.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.layout_bottom = 0.0;
        self.layout_width = 0.0;
        self.pending_space = 0.0;
        self.full = false;
        self.exceeded_max_lines = false;
    }

    /// Width lines may fill; unbounded for an indefinite width.
    pub(crate) fn break_width(&self) -> f32 {
        match self.width_mode {
            LayoutMode::Indefinite => crate::util::MAX_LAYOUT_UNITS,
            LayoutMode::Definite | LayoutMode::AtMost => self.width,
        }
    }

    /// Height lines must fit in; unbounded for an indefinite height.
    pub(crate) fn height_limit(&self) -> f32 {
        match self.height_mode {
            LayoutMode::Indefinite => crate::util::MAX_LAYOUT_UNITS,
            LayoutMode::Definite | LayoutMode::AtMost => self.height,
        }
    }

    /// Width free space is measured against, if any.
    pub(crate) fn align_width(&self) -> Option<f32> {
        match self.width_mode {
            LayoutMode::Indefinite => None,
            LayoutMode::Definite | LayoutMode::AtMost => Some(self.width),
        }
    }

    /// Top of the next line of a paragraph with `style`.
    pub(crate) fn next_line_top(
        &self,
        style: &ParagraphStyle,
        options: &LayoutOptions,
        first_of_paragraph: bool,
    ) -> f32 {
        if self.lines.is_empty() && options.skip_spacing_before_first_line {
            return 0.0;
        }
        let mut gap = style.spacing.line_space_before;
        if first_of_paragraph {
            gap += style.spacing.before + self.pending_space;
        }
        if let Some(last) = self.lines.last() {
            gap += last.paragraph().style().spacing.line_space_after;
        }
        self.layout_bottom + gap
    }

    pub(crate) fn push_line(&mut self, line: TextLine) {
        self.pending_space = 0.0;
        self.lines.push(line);
        self.update_size();
    }

    pub(crate) fn finish_paragraph(&mut self, style: &ParagraphStyle) {
        self.pending_space = style.spacing.after;
    }

    pub(crate) fn set_full(&mut self, exceeded_max_lines: bool) {
        self.full = true;
        self.exceeded_max_lines |= exceeded_max_lines;
    }

    pub(crate) fn last_line_mut(&mut self) -> Option<&mut TextLine> {
        self.lines.last_mut()
    }

    pub(crate) fn update_size(&mut self) {
        self.layout_width = self
            .lines
            .iter()
            .map(|line| line.width() + line.start_indent() + line.end_indent())
            .fold(0.0, f32::max);
        self.layout_bottom = self.lines.iter().map(TextLine::bottom).fold(0.0, f32::max);
    }
}
