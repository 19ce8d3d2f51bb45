// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping: turning styled chars into positioned glyphs.
//!
//! [`Shaper`] is the entry point. It consults the shared [`ShapeCache`], and on
//! a miss runs the font fallback resolver which shapes with the requested
//! families first and then with per codepoint fallback faces.

mod backend;
mod cache;
mod fallback;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::{Hash, Hasher};
use core::ops::Range;

use crate::font::{FontCollection, GlyphId, Typeface};
use crate::style::{FontDescriptor, FontStyle};
use crate::util::is_space_char;

pub use backend::{CharMapShaper, HarfrustShaper};
pub use cache::{FallbackCache, FallbackKey, ShapeCache};

/// Vertical placement that changes how a run is shaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScriptPosition {
    /// Regular text.
    #[default]
    Normal,
    /// Raised text.
    Superscript,
    /// Lowered text.
    Subscript,
}

/// The subset of a style that affects glyph selection and advances.
#[derive(Clone, Debug, Default)]
pub struct ShapeStyle {
    /// Family list and requested style.
    pub font: FontDescriptor,
    /// Scaled font size in pixels.
    pub size: f32,
    /// Extra advance after every visible char.
    pub letter_spacing: f32,
    /// Script position.
    pub script: ScriptPosition,
    /// Language tag passed to the shaping backend.
    pub locale: Option<Arc<str>>,
}

impl PartialEq for ShapeStyle {
    fn eq(&self, other: &Self) -> bool {
        self.font == other.font
            && self.size.to_bits() == other.size.to_bits()
            && self.letter_spacing.to_bits() == other.letter_spacing.to_bits()
            && self.script == other.script
            && self.locale == other.locale
    }
}

impl Eq for ShapeStyle {}

impl Hash for ShapeStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font.hash(state);
        self.size.to_bits().hash(state);
        self.letter_spacing.to_bits().hash(state);
        self.script.hash(state);
        self.locale.hash(state);
    }
}

/// Cache key of a shaped span.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeKey {
    /// The exact text.
    pub text: String,
    /// Shaping relevant style.
    pub style: ShapeStyle,
    /// Shaping direction.
    pub rtl: bool,
}

/// A glyph as produced by a [`ShapingBackend`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id, zero if the char is not covered.
    pub id: GlyphId,
    /// Index of the first char of the cluster in the shaped text.
    pub cluster: u32,
    /// Horizontal advance in pixels.
    pub x_advance: f32,
    /// Horizontal offset in pixels.
    pub x_offset: f32,
    /// Vertical offset in pixels, y pointing up.
    pub y_offset: f32,
}

/// Shapes a span of chars with one typeface.
pub trait ShapingBackend: Debug + Send + Sync {
    /// Shapes `text` with `typeface` at `size` pixels per em.
    ///
    /// Glyphs are returned in visual order and clusters index into `text`.
    fn shape(
        &self,
        text: &[char],
        typeface: &Typeface,
        size: f32,
        rtl: bool,
        locale: Option<&str>,
    ) -> Vec<ShapedGlyph>;
}

/// A typeface chosen for part of a shaped span, with the synthesis it needs.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// The face.
    pub typeface: Typeface,
    /// The face is much lighter than requested; embolden when painting.
    pub fake_bold: bool,
    /// A slanted style was requested from an upright face; skew when painting.
    pub fake_italic: bool,
}

impl ResolvedFont {
    pub(crate) fn new(typeface: Typeface, wanted: FontStyle) -> Self {
        let actual = typeface.font_style();
        let wanted_weight = wanted.weight.value();
        let fake_bold = wanted_weight >= 600.0 && wanted_weight - actual.weight.value() >= 200.0;
        let fake_italic = wanted.slant.is_slanted() && !actual.slant.is_slanted();
        Self {
            typeface,
            fake_bold,
            fake_italic,
        }
    }
}

impl PartialEq for ResolvedFont {
    fn eq(&self, other: &Self) -> bool {
        self.typeface.id() == other.typeface.id()
            && self.fake_bold == other.fake_bold
            && self.fake_italic == other.fake_italic
    }
}

/// A maximal range of glyphs shaped with one font.
#[derive(Clone, Debug)]
pub struct FontRun {
    /// Glyph range in the shape result.
    pub glyphs: Range<usize>,
    /// Char range in the shape result.
    pub chars: Range<usize>,
    /// The font.
    pub font: ResolvedFont,
}

/// A block of shaped chars, in logical order, before assembly.
#[derive(Clone, Debug)]
pub(crate) struct ShapedBlock {
    pub(crate) chars: Range<usize>,
    /// Glyphs in logical order; clusters are absolute char indices.
    pub(crate) glyphs: Vec<ShapedGlyph>,
    pub(crate) font: Option<ResolvedFont>,
}

/// Glyphs for a span of text, with the maps between chars and glyphs.
///
/// Glyphs are stored in logical order. Every char belongs to exactly one
/// cluster; chars that produced no glyph of their own belong to the cluster
/// of the preceding char.
#[derive(Clone, Debug, Default)]
pub struct ShapeResult {
    glyphs: Vec<GlyphId>,
    advances: Vec<f32>,
    offsets: Vec<[f32; 2]>,
    glyph_to_char: Vec<usize>,
    char_to_glyph: Vec<usize>,
    char_advances: Vec<f32>,
    spaces: Vec<bool>,
    font_runs: Vec<FontRun>,
    rtl: bool,
    size: f32,
}

impl ShapeResult {
    /// Assembles blocks covering `text` into one result.
    pub(crate) fn from_blocks(
        text: &[char],
        mut blocks: Vec<ShapedBlock>,
        rtl: bool,
        size: f32,
    ) -> Self {
        blocks.sort_by_key(|block| block.chars.start);
        let mut result = Self {
            rtl,
            size,
            ..Self::default()
        };
        for block in blocks {
            let glyph_start = result.glyphs.len();
            let mut glyphs = block.glyphs;
            glyphs.sort_by_key(|glyph| glyph.cluster);
            for glyph in &glyphs {
                result.glyphs.push(glyph.id);
                result.advances.push(glyph.x_advance);
                result.offsets.push([glyph.x_offset, glyph.y_offset]);
                result.glyph_to_char.push(glyph.cluster as usize);
            }
            let Some(font) = block.font else {
                continue;
            };
            let glyph_end = result.glyphs.len();
            match result.font_runs.last_mut() {
                Some(last) if last.font == font && last.chars.end == block.chars.start => {
                    last.chars.end = block.chars.end;
                    last.glyphs.end = glyph_end;
                }
                _ => result.font_runs.push(FontRun {
                    glyphs: glyph_start..glyph_end,
                    chars: block.chars,
                    font,
                }),
            }
        }

        let char_count = text.len();
        let mut char_to_glyph = vec![usize::MAX; char_count + 1];
        let mut char_advances = vec![0.0; char_count];
        for (glyph, &ch) in result.glyph_to_char.iter().enumerate() {
            if ch >= char_count {
                continue;
            }
            if char_to_glyph[ch] == usize::MAX {
                char_to_glyph[ch] = glyph;
            }
            char_advances[ch] += result.advances[glyph];
        }
        let mut previous = 0;
        for slot in &mut char_to_glyph[..char_count] {
            if *slot == usize::MAX {
                *slot = previous;
            } else {
                previous = *slot;
            }
        }
        char_to_glyph[char_count] = result.glyphs.len();
        for (advance, &ch) in char_advances.iter_mut().zip(text) {
            if ch < ' ' {
                *advance = 0.0;
            }
        }
        result.char_to_glyph = char_to_glyph;
        result.char_advances = char_advances;
        result.spaces = text.iter().map(|&ch| is_space_char(ch)).collect();
        result
    }

    /// Number of chars shaped.
    pub fn char_count(&self) -> usize {
        self.char_advances.len()
    }

    /// Number of glyphs.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyph ids in logical order.
    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    /// Glyph advances.
    pub fn advances(&self) -> &[f32] {
        &self.advances
    }

    /// Glyph offsets, y pointing up.
    pub fn offsets(&self) -> &[[f32; 2]] {
        &self.offsets
    }

    /// Index of the first glyph of the cluster containing `char`.
    pub fn char_to_glyph(&self, char: usize) -> usize {
        self.char_to_glyph
            .get(char)
            .copied()
            .unwrap_or(self.glyphs.len())
    }

    /// The first char of the cluster a glyph belongs to.
    pub fn glyph_to_char(&self, glyph: usize) -> usize {
        self.glyph_to_char
            .get(glyph)
            .copied()
            .unwrap_or(self.char_count())
    }

    /// Advance charged to `char`. A cluster's whole advance is charged to
    /// its first char.
    pub fn char_advance(&self, char: usize) -> f32 {
        self.char_advances.get(char).copied().unwrap_or(0.0)
    }

    /// Returns true if `char` is a space that takes word spacing.
    pub fn is_space(&self, char: usize) -> bool {
        self.spaces.get(char).copied().unwrap_or(false)
    }

    /// Fonts used, in logical order.
    pub fn font_runs(&self) -> &[FontRun] {
        &self.font_runs
    }

    /// The font used for `char`.
    pub fn font_for_char(&self, char: usize) -> Option<&ResolvedFont> {
        self.font_runs
            .iter()
            .find(|run| run.chars.contains(&char))
            .map(|run| &run.font)
    }

    /// Returns true if the span was shaped right to left.
    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    /// Font size in pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns true if some glyph is missing.
    pub fn has_missing_glyphs(&self) -> bool {
        self.glyphs.contains(&0)
    }

    /// First glyph belonging to a char at or after `char`.
    fn glyph_boundary(&self, char: usize) -> usize {
        self.glyph_to_char.partition_point(|&c| c < char)
    }
}

/// A char range of a shared [`ShapeResult`].
#[derive(Clone, Debug)]
pub struct ShapeView {
    result: Arc<ShapeResult>,
    start: usize,
    end: usize,
}

impl ShapeView {
    /// Views `range` of `result`.
    pub fn new(result: Arc<ShapeResult>, range: Range<usize>) -> Self {
        let end = range.end.min(result.char_count());
        let start = range.start.min(end);
        Self { result, start, end }
    }

    /// The underlying result.
    pub fn result(&self) -> &Arc<ShapeResult> {
        &self.result
    }

    /// Char range in the underlying result.
    pub fn char_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of chars in the view.
    pub fn char_count(&self) -> usize {
        self.end - self.start
    }

    /// Glyph range in the underlying result.
    pub fn glyph_range(&self) -> Range<usize> {
        self.result.glyph_boundary(self.start)..self.result.glyph_boundary(self.end)
    }

    /// Glyph ids of the view.
    pub fn glyphs(&self) -> &[GlyphId] {
        &self.result.glyphs[self.glyph_range()]
    }

    /// A narrower view; `range` is relative to this view.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = (self.start + range.end).min(self.end);
        let start = (self.start + range.start).min(end);
        Self {
            result: self.result.clone(),
            start,
            end,
        }
    }

    /// The font of the char at `index` relative to the view.
    pub fn font_for_char(&self, index: usize) -> Option<&ResolvedFont> {
        self.result.font_for_char(self.start + index)
    }

    /// Advance of the char at `index` relative to the view.
    pub fn char_advance(&self, index: usize) -> f32 {
        if self.start + index >= self.end {
            return 0.0;
        }
        self.result.char_advance(self.start + index)
    }

    /// Width of `count` chars from `start`, both relative to the view.
    ///
    /// Letter spacing is added after every char with a non-zero advance.
    pub fn measure_width(&self, start: usize, count: usize, letter_spacing: f32) -> f32 {
        let end = (start + count).min(self.char_count());
        (start.min(end)..end)
            .map(|index| self.char_advance(index))
            .filter(|advance| *advance != 0.0)
            .map(|advance| advance + letter_spacing)
            .sum()
    }

    /// Width of the whole view.
    pub fn width(&self, letter_spacing: f32) -> f32 {
        self.measure_width(0, self.char_count(), letter_spacing)
    }

    /// Fonts used by the view with their glyph ranges, in logical order.
    pub fn fonts(&self) -> impl Iterator<Item = (Range<usize>, &ResolvedFont)> + '_ {
        let glyphs = self.glyph_range();
        self.result.font_runs.iter().filter_map(move |run| {
            let start = run.glyphs.start.max(glyphs.start);
            let end = run.glyphs.end.min(glyphs.end);
            (start < end).then(|| (start..end, &run.font))
        })
    }
}

/// Shapes text with font fallback, through a shared cache.
#[derive(Clone, Debug)]
pub struct Shaper {
    fonts: FontCollection,
    backend: Arc<dyn ShapingBackend>,
    shape_cache: Arc<ShapeCache>,
    fallback_cache: Arc<FallbackCache>,
}

impl Shaper {
    /// Creates a shaper using `harfrust` and fresh caches.
    pub fn new(fonts: FontCollection) -> Self {
        Self {
            fonts,
            backend: Arc::new(HarfrustShaper::new()),
            shape_cache: Arc::new(ShapeCache::new()),
            fallback_cache: Arc::new(FallbackCache::new()),
        }
    }

    /// Replaces the shaping backend.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn ShapingBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Shares a shape cache with other shapers.
    #[must_use]
    pub fn with_shape_cache(mut self, cache: Arc<ShapeCache>) -> Self {
        self.shape_cache = cache;
        self
    }

    /// Shares a fallback cache with other shapers.
    #[must_use]
    pub fn with_fallback_cache(mut self, cache: Arc<FallbackCache>) -> Self {
        self.fallback_cache = cache;
        self
    }

    /// The font collection.
    pub fn fonts(&self) -> &FontCollection {
        &self.fonts
    }

    /// The shape cache.
    pub fn shape_cache(&self) -> &Arc<ShapeCache> {
        &self.shape_cache
    }

    /// The fallback cache.
    pub fn fallback_cache(&self) -> &Arc<FallbackCache> {
        &self.fallback_cache
    }

    /// Shapes `text`, returning the cached result when there is one.
    pub fn shape(&self, text: &[char], style: &ShapeStyle, rtl: bool) -> Arc<ShapeResult> {
        let key = ShapeKey {
            text: text.iter().collect(),
            style: style.clone(),
            rtl,
        };
        self.shape_cache.get_or_insert_with(key, || {
            Arc::new(fallback::FallbackResolver::new(self, text, style, rtl).resolve())
        })
    }

    /// The first typeface matching `font`.
    pub fn primary_typeface(&self, font: &FontDescriptor) -> Option<Typeface> {
        self.fonts.match_descriptor(font).into_iter().next()
    }

    pub(crate) fn backend(&self) -> &dyn ShapingBackend {
        &*self.backend
    }
}
