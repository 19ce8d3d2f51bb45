// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich styling support.
//!
//! A [`Style`] is a sparse set of attributes: each attribute carries a flag
//! recording whether it was set on this instance. Unset attributes read
//! through to a default style, usually the paragraph's
//! [`ParagraphStyle::default_style`].

mod font;
mod paragraph;
mod ranges;

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::OnceLock;

use peniko::Color;
use peniko::color::palette::css;

use crate::shape::{ScriptPosition, ShapeStyle};

pub use font::{FontDescriptor, FontSlant, FontStyle, FontWeight, FontWidth};
pub use paragraph::{
    Alignment, Direction, Ellipsis, Indent, Length, LineAlignment, LineBreakStrategy,
    LineHeight, OverflowWrap, ParagraphStyle, Spacing,
};
pub(crate) use ranges::StyleRanges;

/// Text size used when neither a run nor the paragraph sets one: 10pt at 96dpi.
pub const DEFAULT_TEXT_SIZE: f32 = 10.0 * 96.0 / 72.0;

/// A single style attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Attribute {
    /// Font family list and requested font style.
    Font = 0,
    /// Font size in pixels.
    TextSize,
    /// Multiplier applied to the text size when shaping.
    TextScale,
    /// Glyph color.
    Foreground,
    /// Fill behind the run.
    Background,
    /// Underline, overline and line-through.
    Decoration,
    /// Synthetic bold at paint time.
    Bold,
    /// Synthetic italic at paint time.
    Italic,
    /// Vertical placement inside the line.
    VerticalAlign,
    /// Extra advance after every visible character.
    LetterSpacing,
    /// Extra advance after every space.
    WordSpacing,
    /// Drop shadows.
    Shadows,
    /// Explicit baseline shift in pixels, positive is downwards.
    BaselineOffset,
    /// Line breaking inside words.
    WordBreak,
    /// BCP 47 language tag used for shaping and fallback.
    Locale,
}

impl Attribute {
    const COUNT: u8 = 15;

    /// Returns the set containing only this attribute.
    pub const fn flag(self) -> AttributeSet {
        AttributeSet(1 << self as u32)
    }
}

/// A set of [`Attribute`]s stored as a bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AttributeSet(u32);

impl AttributeSet {
    /// No attributes.
    pub const EMPTY: Self = Self(0);

    /// Every attribute.
    pub const ALL: Self = Self((1 << Attribute::COUNT as u32) - 1);

    /// Attributes that change glyph selection or advances.
    pub const MEASURE: Self = Self::from_attributes(&[
        Attribute::Font,
        Attribute::TextSize,
        Attribute::TextScale,
        Attribute::LetterSpacing,
        Attribute::VerticalAlign,
        Attribute::Locale,
    ]);

    /// Attributes that change line layout. Includes [`Self::MEASURE`].
    pub const LAYOUT: Self = Self(
        Self::MEASURE.0
            | Self::from_attributes(&[
                Attribute::BaselineOffset,
                Attribute::WordSpacing,
                Attribute::WordBreak,
            ])
            .0,
    );

    /// Attributes that only change painting.
    pub const DECORATION: Self = Self::from_attributes(&[
        Attribute::Foreground,
        Attribute::Background,
        Attribute::Decoration,
        Attribute::Shadows,
        Attribute::Bold,
        Attribute::Italic,
    ]);

    /// Attributes that move the baseline of a run.
    pub const BASELINE: Self =
        Self::from_attributes(&[Attribute::BaselineOffset, Attribute::VerticalAlign]);

    /// Builds a set from a list of attributes.
    pub const fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < attributes.len() {
            bits |= attributes[i].flag().0;
            i += 1;
        }
        Self(bits)
    }

    /// Returns true if `attribute` is in the set.
    pub const fn contains(self, attribute: Attribute) -> bool {
        self.0 & attribute.flag().0 != 0
    }

    /// Returns true if the sets share an attribute.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no attribute is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the union of both sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn insert(&mut self, attribute: Attribute) {
        self.0 |= attribute.flag().0;
    }

    fn remove(&mut self, attribute: Attribute) {
        self.0 &= !attribute.flag().0;
    }
}

/// Vertical placement of a run inside its line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlign {
    /// Top of the run at the top of the line content.
    Top,
    /// Raised on the baseline.
    Superscript,
    /// Centered in the line content.
    Middle,
    /// On the line baseline.
    #[default]
    Baseline,
    /// Lowered below the baseline.
    Subscript,
    /// Bottom of the run at the bottom of the line content.
    Bottom,
}

/// Stroke pattern for decoration lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Two parallel lines.
    Double,
    /// Round dots.
    Dotted,
    /// Dashes.
    Dashed,
    /// Wavy line.
    Wavy,
}

/// Text decoration lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// Draw a line below the baseline.
    pub underline: bool,
    /// Draw a line above the ascent.
    pub overline: bool,
    /// Draw a line through the middle of the text.
    pub line_through: bool,
    /// Stroke pattern.
    pub style: LineStyle,
    /// Multiplier for the font's stroke thickness.
    pub thickness_scale: f32,
    /// Line color; `None` uses the foreground color.
    pub color: Option<Color>,
}

impl Default for Decoration {
    fn default() -> Self {
        Self {
            underline: false,
            overline: false,
            line_through: false,
            style: LineStyle::Solid,
            thickness_scale: 1.0,
            color: None,
        }
    }
}

impl Decoration {
    /// An underline in the foreground color.
    pub fn underline() -> Self {
        Self {
            underline: true,
            ..Self::default()
        }
    }

    /// A line-through in the foreground color.
    pub fn line_through() -> Self {
        Self {
            line_through: true,
            ..Self::default()
        }
    }

    /// Returns true if any line is drawn.
    pub fn is_visible(&self) -> bool {
        self.underline || self.overline || self.line_through
    }
}

/// A drop shadow drawn below the glyphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    /// Shadow color.
    pub color: Color,
    /// Horizontal and vertical offset in pixels.
    pub offset: [f32; 2],
    /// Blur radius in pixels.
    pub blur_radius: f32,
}

/// How lines may break inside words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum WordBreak {
    /// Break at word boundaries only.
    #[default]
    Normal,
    /// Any grapheme boundary is a break opportunity when a word does not fit.
    BreakAll,
    /// Never break inside CJK runs.
    KeepAll,
}

/// A style attribute together with its value.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleProperty {
    /// Font family list and requested font style.
    Font(FontDescriptor),
    /// Font size in pixels.
    TextSize(f32),
    /// Multiplier applied to the text size when shaping.
    TextScale(f32),
    /// Glyph color.
    Foreground(Color),
    /// Fill behind the run.
    Background(Color),
    /// Underline, overline and line-through.
    Decoration(Decoration),
    /// Synthetic bold at paint time.
    Bold(bool),
    /// Synthetic italic at paint time.
    Italic(bool),
    /// Vertical placement inside the line.
    VerticalAlign(VerticalAlign),
    /// Extra advance after every visible character.
    LetterSpacing(f32),
    /// Extra advance after every space.
    WordSpacing(f32),
    /// Drop shadows.
    Shadows(Vec<TextShadow>),
    /// Explicit baseline shift in pixels.
    BaselineOffset(f32),
    /// Line breaking inside words.
    WordBreak(WordBreak),
    /// BCP 47 language tag.
    Locale(Option<Arc<str>>),
}

impl StyleProperty {
    /// The attribute this property sets.
    pub fn attribute(&self) -> Attribute {
        match self {
            Self::Font(_) => Attribute::Font,
            Self::TextSize(_) => Attribute::TextSize,
            Self::TextScale(_) => Attribute::TextScale,
            Self::Foreground(_) => Attribute::Foreground,
            Self::Background(_) => Attribute::Background,
            Self::Decoration(_) => Attribute::Decoration,
            Self::Bold(_) => Attribute::Bold,
            Self::Italic(_) => Attribute::Italic,
            Self::VerticalAlign(_) => Attribute::VerticalAlign,
            Self::LetterSpacing(_) => Attribute::LetterSpacing,
            Self::WordSpacing(_) => Attribute::WordSpacing,
            Self::Shadows(_) => Attribute::Shadows,
            Self::BaselineOffset(_) => Attribute::BaselineOffset,
            Self::WordBreak(_) => Attribute::WordBreak,
            Self::Locale(_) => Attribute::Locale,
        }
    }
}

/// Text formatting for a run or a paragraph default.
#[derive(Clone, Debug)]
pub struct Style {
    attributes: AttributeSet,
    font: FontDescriptor,
    text_size: f32,
    text_scale: f32,
    foreground: Color,
    background: Color,
    decoration: Decoration,
    bold: bool,
    italic: bool,
    vertical_align: VerticalAlign,
    letter_spacing: f32,
    word_spacing: f32,
    shadows: Vec<TextShadow>,
    baseline_offset: f32,
    word_break: WordBreak,
    locale: Option<Arc<str>>,
    shape_style: OnceLock<ShapeStyle>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            attributes: AttributeSet::EMPTY,
            font: FontDescriptor::default(),
            text_size: DEFAULT_TEXT_SIZE,
            text_scale: 1.0,
            foreground: css::BLACK,
            background: css::TRANSPARENT,
            decoration: Decoration::default(),
            bold: false,
            italic: false,
            vertical_align: VerticalAlign::Baseline,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            shadows: Vec::new(),
            baseline_offset: 0.0,
            word_break: WordBreak::Normal,
            locale: None,
            shape_style: OnceLock::new(),
        }
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
            && self.font == other.font
            && self.text_size == other.text_size
            && self.text_scale == other.text_scale
            && self.foreground == other.foreground
            && self.background == other.background
            && self.decoration == other.decoration
            && self.bold == other.bold
            && self.italic == other.italic
            && self.vertical_align == other.vertical_align
            && self.letter_spacing == other.letter_spacing
            && self.word_spacing == other.word_spacing
            && self.shadows == other.shadows
            && self.baseline_offset == other.baseline_offset
            && self.word_break == other.word_break
            && self.locale == other.locale
    }
}

impl Style {
    /// Creates a style with no attributes set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Style::set`].
    #[must_use]
    pub fn with(mut self, property: StyleProperty) -> Self {
        self.set(property);
        self
    }

    /// The set of attributes explicitly set on this style.
    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    /// Returns true if `attribute` was set on this instance.
    pub fn has(&self, attribute: Attribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// Returns the value of `attribute`, reading through to `default` when it
    /// is not set here.
    pub fn get(&self, attribute: Attribute, default: &Self) -> StyleProperty {
        let source = if self.has(attribute) { self } else { default };
        source.value(attribute)
    }

    fn value(&self, attribute: Attribute) -> StyleProperty {
        match attribute {
            Attribute::Font => StyleProperty::Font(self.font.clone()),
            Attribute::TextSize => StyleProperty::TextSize(self.text_size),
            Attribute::TextScale => StyleProperty::TextScale(self.text_scale),
            Attribute::Foreground => StyleProperty::Foreground(self.foreground),
            Attribute::Background => StyleProperty::Background(self.background),
            Attribute::Decoration => StyleProperty::Decoration(self.decoration),
            Attribute::Bold => StyleProperty::Bold(self.bold),
            Attribute::Italic => StyleProperty::Italic(self.italic),
            Attribute::VerticalAlign => StyleProperty::VerticalAlign(self.vertical_align),
            Attribute::LetterSpacing => StyleProperty::LetterSpacing(self.letter_spacing),
            Attribute::WordSpacing => StyleProperty::WordSpacing(self.word_spacing),
            Attribute::Shadows => StyleProperty::Shadows(self.shadows.clone()),
            Attribute::BaselineOffset => StyleProperty::BaselineOffset(self.baseline_offset),
            Attribute::WordBreak => StyleProperty::WordBreak(self.word_break),
            Attribute::Locale => StyleProperty::Locale(self.locale.clone()),
        }
    }

    /// Sets an attribute and marks it present.
    ///
    /// Setting a layout attribute drops the cached [`ShapeStyle`].
    pub fn set(&mut self, property: StyleProperty) {
        let attribute = property.attribute();
        match property {
            StyleProperty::Font(v) => self.font = v,
            StyleProperty::TextSize(v) => self.text_size = v,
            StyleProperty::TextScale(v) => self.text_scale = v,
            StyleProperty::Foreground(v) => self.foreground = v,
            StyleProperty::Background(v) => self.background = v,
            StyleProperty::Decoration(v) => self.decoration = v,
            StyleProperty::Bold(v) => self.bold = v,
            StyleProperty::Italic(v) => self.italic = v,
            StyleProperty::VerticalAlign(v) => self.vertical_align = v,
            StyleProperty::LetterSpacing(v) => self.letter_spacing = v,
            StyleProperty::WordSpacing(v) => self.word_spacing = v,
            StyleProperty::Shadows(v) => self.shadows = v,
            StyleProperty::BaselineOffset(v) => self.baseline_offset = v,
            StyleProperty::WordBreak(v) => self.word_break = v,
            StyleProperty::Locale(v) => self.locale = v,
        }
        self.attributes.insert(attribute);
        self.invalidate(attribute);
    }

    /// Clears an attribute so that it reads through to the default again.
    pub fn unset(&mut self, attribute: Attribute) {
        if self.has(attribute) {
            let reset = Self::default().value(attribute);
            self.set(reset);
            self.attributes.remove(attribute);
        }
    }

    fn invalidate(&mut self, attribute: Attribute) {
        if AttributeSet::LAYOUT.contains(attribute) {
            self.shape_style = OnceLock::new();
        }
    }

    /// Copies every attribute set on `self` into `target`.
    pub fn apply_onto(&self, target: &mut Self) {
        for attribute in ATTRIBUTES {
            if self.has(attribute) {
                target.set(self.value(attribute));
            }
        }
    }

    /// Returns `base` overridden by every attribute set on `self`.
    #[must_use]
    pub fn merge_onto(&self, base: &Self) -> Self {
        let mut merged = base.clone();
        self.apply_onto(&mut merged);
        merged
    }

    /// Returns true if both styles agree on every attribute in `mask`.
    pub fn same_in(&self, other: &Self, mask: AttributeSet) -> bool {
        ATTRIBUTES
            .iter()
            .filter(|a| mask.contains(**a))
            .all(|a| self.value(*a) == other.value(*a))
    }

    /// The shaping-relevant subset of this style, computed once.
    pub fn shape_style(&self) -> &ShapeStyle {
        self.shape_style.get_or_init(|| ShapeStyle {
            font: self.font.clone(),
            size: self.text_size * self.text_scale,
            letter_spacing: self.letter_spacing,
            script: match self.vertical_align {
                VerticalAlign::Superscript => ScriptPosition::Superscript,
                VerticalAlign::Subscript => ScriptPosition::Subscript,
                _ => ScriptPosition::Normal,
            },
            locale: self.locale.clone(),
        })
    }

    /// Font family list and requested style.
    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    /// Font size in pixels, before scaling.
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// Size multiplier.
    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    /// Size used for shaping and measurement.
    pub fn scaled_size(&self) -> f32 {
        self.text_size * self.text_scale
    }

    /// Glyph color.
    pub fn foreground(&self) -> Color {
        self.foreground
    }

    /// Fill behind the run.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Decoration lines.
    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    /// Synthetic bold.
    pub fn bold(&self) -> bool {
        self.bold
    }

    /// Synthetic italic.
    pub fn italic(&self) -> bool {
        self.italic
    }

    /// Vertical placement.
    pub fn vertical_align(&self) -> VerticalAlign {
        self.vertical_align
    }

    /// Extra advance after every visible character.
    pub fn letter_spacing(&self) -> f32 {
        self.letter_spacing
    }

    /// Extra advance after every space.
    pub fn word_spacing(&self) -> f32 {
        self.word_spacing
    }

    /// Drop shadows.
    pub fn shadows(&self) -> &[TextShadow] {
        &self.shadows
    }

    /// Explicit baseline shift in pixels.
    pub fn baseline_offset(&self) -> f32 {
        self.baseline_offset
    }

    /// Line breaking inside words.
    pub fn word_break(&self) -> WordBreak {
        self.word_break
    }

    /// Language tag.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

const ATTRIBUTES: [Attribute; Attribute::COUNT as usize] = [
    Attribute::Font,
    Attribute::TextSize,
    Attribute::TextScale,
    Attribute::Foreground,
    Attribute::Background,
    Attribute::Decoration,
    Attribute::Bold,
    Attribute::Italic,
    Attribute::VerticalAlign,
    Attribute::LetterSpacing,
    Attribute::WordSpacing,
    Attribute::Shadows,
    Attribute::BaselineOffset,
    Attribute::WordBreak,
    Attribute::Locale,
];
