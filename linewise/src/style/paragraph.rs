// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;

use crate::run::RunDelegate;

use super::Style;

/// Horizontal alignment of the lines in a paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Lines start at the start indent.
    #[default]
    Left,
    /// Lines are centered between the indents.
    Center,
    /// Lines end at the end indent.
    Right,
    /// Lines are stretched between word boundaries, except for the last
    /// line and lines ending in a forced break.
    Justify,
    /// Like [`Alignment::Justify`], but also stretches the last line.
    Distributed,
}

/// Placement of line content when the line box is taller than its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineAlignment {
    /// Extra space goes below the content.
    Top,
    /// Extra space is split above and below.
    #[default]
    Center,
    /// Extra space goes above the content.
    Bottom,
}

/// Base direction of a paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Derived from the first strong character.
    #[default]
    Auto,
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
    /// Top to bottom. Laid out as left to right.
    Ttb,
    /// Bottom to top. Laid out as left to right.
    Btt,
}

/// A horizontal length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Pixels.
    Px(f32),
    /// Multiples of the default text size.
    Chars(i32),
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl Length {
    /// Resolves to pixels for the given text size.
    pub fn to_px(self, text_size: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Chars(count) => count as f32 * text_size,
        }
    }
}

/// Paragraph indents.
///
/// The first line is indented by `start + first_line`, every other line by
/// `start + hanging`. Only one of `first_line` and `hanging` should be set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Indent {
    /// Indent at the start edge of every line.
    pub start: Length,
    /// Indent at the end edge of every line.
    pub end: Length,
    /// Additional indent of the first line.
    pub first_line: Length,
    /// Additional indent of every line but the first.
    pub hanging: Length,
}

/// Rule deriving the height of a line from its content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineHeight {
    /// A multiple of the content height, as a percentage.
    Auto(f32),
    /// The content height, but never less than the given pixels.
    AtLeast(f32),
    /// Exactly the given pixels, regardless of content.
    Exact(f32),
}

impl Default for LineHeight {
    fn default() -> Self {
        Self::Auto(100.0)
    }
}

impl LineHeight {
    /// Height of a line whose content is `content_height` tall.
    pub fn resolve(self, content_height: f32) -> f32 {
        match self {
            Self::Auto(percent) => content_height * percent / 100.0,
            Self::AtLeast(px) => content_height.max(px),
            Self::Exact(px) => px,
        }
    }
}

/// Vertical spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    /// Space above the paragraph.
    pub before: f32,
    /// Space below the paragraph.
    pub after: f32,
    /// Rule for the height of each line.
    pub line_height: LineHeight,
    /// Space above every line.
    pub line_space_before: f32,
    /// Space below every line.
    pub line_space_after: f32,
}

/// Marker drawn at the end of the last line when content is truncated.
#[derive(Clone, Debug, Default)]
pub enum Ellipsis {
    /// Truncate without a marker.
    #[default]
    None,
    /// Text shaped with the style of the last run on the line.
    Text(String),
    /// An inline object.
    Object(Arc<dyn RunDelegate>),
}

impl Ellipsis {
    /// Returns true if a marker is configured.
    pub fn is_some(&self) -> bool {
        match self {
            Self::None => false,
            Self::Text(text) => !text.is_empty(),
            Self::Object(_) => true,
        }
    }
}

/// Behavior when a single word is wider than the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowWrap {
    /// Overflow until the next break opportunity.
    #[default]
    Normal,
    /// Break at the line width.
    Anywhere,
    /// Break at the line width.
    BreakWord,
}

/// Policy for the rule based boundary analyzer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineBreakStrategy {
    /// Keep opening punctuation with the following text and closing
    /// punctuation with the preceding text.
    pub avoid_break_around_punctuation: bool,
}

impl Default for LineBreakStrategy {
    fn default() -> Self {
        Self {
            avoid_break_around_punctuation: true,
        }
    }
}

/// Paragraph level configuration.
#[derive(Clone, Debug)]
pub struct ParagraphStyle {
    /// Style every run reads through to.
    pub default_style: Style,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// Placement of line content inside the line box.
    pub line_alignment: LineAlignment,
    /// Indents.
    pub indent: Indent,
    /// Paragraph and line spacing.
    pub spacing: Spacing,
    /// Base direction.
    pub direction: Direction,
    /// Marker for truncated content.
    pub ellipsis: Ellipsis,
    /// Maximum number of lines to lay out.
    pub max_lines: u32,
    /// Derive run heights from the text size instead of the font metrics.
    pub line_height_override: bool,
    /// With `line_height_override`, only trim the ascent.
    pub half_leading: bool,
    /// Center runs on their glyph bounding boxes.
    pub text_bounds: bool,
    /// Breaking of words wider than a line.
    pub overflow_wrap: OverflowWrap,
    /// Rule based analyzer policy.
    pub line_break_strategy: LineBreakStrategy,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            default_style: Style::default(),
            alignment: Alignment::Left,
            line_alignment: LineAlignment::Center,
            indent: Indent::default(),
            spacing: Spacing::default(),
            direction: Direction::Auto,
            ellipsis: Ellipsis::None,
            max_lines: u32::MAX,
            line_height_override: false,
            half_leading: false,
            text_bounds: false,
            overflow_wrap: OverflowWrap::Normal,
            line_break_strategy: LineBreakStrategy::default(),
        }
    }
}

impl ParagraphStyle {
    /// Resolves the start indent of a line.
    pub(crate) fn start_indent(&self, first_line: bool) -> f32 {
        let size = self.default_style.text_size();
        let extra = if first_line {
            self.indent.first_line
        } else {
            self.indent.hanging
        };
        self.indent.start.to_px(size) + extra.to_px(size)
    }

    /// Resolves the end indent of a line.
    pub(crate) fn end_indent(&self) -> f32 {
        self.indent.end.to_px(self.default_style.text_size())
    }
}
