// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typefaces and font matching.
//!
//! The layout core only talks to fonts through [`TypefaceProvider`] and
//! [`FontManager`]. [`OpenTypeFace`] and [`FontStore`] implement both over
//! raw OpenType data.

mod opentype;
mod store;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::style::{FontDescriptor, FontStyle};

pub use opentype::OpenTypeFace;
pub use store::FontStore;

/// Glyph identifier. Zero is the missing glyph.
pub type GlyphId = u32;

/// A shared typeface.
pub type Typeface = Arc<dyn TypefaceProvider>;

/// Returns a process-unique typeface id.
pub fn next_typeface_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

fn next_collection_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Vertical metrics of a typeface at a size, in pixels.
///
/// Ascent and descent are both positive distances from the baseline.
/// Decoration offsets are measured downwards from the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
    /// Recommended gap between lines.
    pub leading: f32,
    /// Offset of the underline.
    pub underline_offset: f32,
    /// Thickness of the underline.
    pub underline_thickness: f32,
    /// Offset of the line-through, negative above the baseline.
    pub strikeout_offset: f32,
    /// Thickness of the line-through.
    pub strikeout_thickness: f32,
}

impl FontMetrics {
    /// Metrics derived from ascent and descent alone.
    pub fn from_extents(ascent: f32, descent: f32) -> Self {
        let thickness = (ascent + descent) / 16.0;
        Self {
            ascent,
            descent,
            leading: 0.0,
            underline_offset: descent / 2.0,
            underline_thickness: thickness,
            strikeout_offset: -ascent / 3.0,
            strikeout_thickness: thickness,
        }
    }

    /// Ascent plus descent.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Glyph outline bounds in pixels, y pointing up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphBounds {
    /// Left edge.
    pub x_min: f32,
    /// Bottom edge.
    pub y_min: f32,
    /// Right edge.
    pub x_max: f32,
    /// Top edge.
    pub y_max: f32,
}

/// Raw font file data for shaping engines.
#[derive(Clone, Debug)]
pub struct FontData {
    /// The font file.
    pub bytes: Arc<[u8]>,
    /// Index of the face in a collection.
    pub index: u32,
}

/// A typeface: glyph mapping and metrics.
pub trait TypefaceProvider: Debug + Send + Sync {
    /// Process-unique identifier, used as a cache key.
    fn id(&self) -> u64;

    /// Family name.
    fn family_name(&self) -> &str;

    /// Intrinsic weight, width and slant.
    fn font_style(&self) -> FontStyle;

    /// Vertical metrics at `size` pixels per em.
    fn metrics(&self, size: f32) -> FontMetrics;

    /// Maps a character to a glyph, or zero if it is not covered.
    fn glyph_id(&self, ch: char) -> GlyphId;

    /// Horizontal advance of `glyph` at `size` pixels per em.
    fn advance(&self, glyph: GlyphId, size: f32) -> f32;

    /// Outline bounds of `glyph` at `size` pixels per em.
    fn bounds(&self, glyph: GlyphId, size: f32) -> Option<GlyphBounds>;

    /// Font file data, if this typeface is backed by one.
    fn font_data(&self) -> Option<FontData> {
        None
    }

    /// Returns true if `ch` maps to a glyph.
    fn covers(&self, ch: char) -> bool {
        self.glyph_id(ch) != 0
    }
}

/// Resolves requested fonts to typefaces.
pub trait FontManager: Debug + Send + Sync {
    /// Returns the face of `family` closest to `style`.
    fn match_family(&self, family: &str, style: FontStyle) -> Option<Typeface>;

    /// Returns a face covering `ch`, preferring faces close to `style`.
    fn match_character(&self, ch: char, style: FontStyle, locale: Option<&str>)
        -> Option<Typeface>;

    /// Returns the face used when no requested family matches.
    fn default_typeface(&self, style: FontStyle) -> Option<Typeface>;
}

/// An ordered list of font managers.
///
/// Families are looked up in each manager in turn; the first match wins.
#[derive(Clone, Debug)]
pub struct FontCollection {
    id: u64,
    managers: Vec<Arc<dyn FontManager>>,
    fallback_enabled: bool,
}

impl Default for FontCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCollection {
    /// Creates an empty collection with fallback enabled.
    pub fn new() -> Self {
        Self {
            id: next_collection_id(),
            managers: Vec::new(),
            fallback_enabled: true,
        }
    }

    /// Creates a collection with one manager.
    pub fn with_manager(manager: Arc<dyn FontManager>) -> Self {
        let mut collection = Self::new();
        collection.push(manager);
        collection
    }

    /// Appends a manager with the lowest priority.
    pub fn push(&mut self, manager: Arc<dyn FontManager>) {
        self.managers.push(manager);
        self.id = next_collection_id();
    }

    /// Identity of the current set of managers.
    ///
    /// Clones share it; adding a manager assigns a new one. Fallback
    /// lookups are cached per id, so one [`FallbackCache`] can serve
    /// several collections.
    ///
    /// [`FallbackCache`]: crate::shape::FallbackCache
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Enables or disables per character fallback.
    pub fn set_fallback_enabled(&mut self, enabled: bool) {
        self.fallback_enabled = enabled;
    }

    /// Returns true if per character fallback is enabled.
    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    /// Resolves every family of `descriptor`, in order and without
    /// duplicates. Falls back to the default typeface when nothing matches.
    pub fn match_descriptor(&self, descriptor: &FontDescriptor) -> SmallVec<[Typeface; 4]> {
        let mut faces: SmallVec<[Typeface; 4]> = SmallVec::new();
        for family in &descriptor.families {
            let found = self
                .managers
                .iter()
                .find_map(|manager| manager.match_family(family, descriptor.style));
            if let Some(face) = found {
                if faces.iter().all(|f| f.id() != face.id()) {
                    faces.push(face);
                }
            }
        }
        if faces.is_empty() {
            if let Some(face) = self.default_typeface(descriptor.style) {
                faces.push(face);
            }
        }
        faces
    }

    /// Returns the first default typeface offered by a manager.
    pub fn default_typeface(&self, style: FontStyle) -> Option<Typeface> {
        self.managers
            .iter()
            .find_map(|manager| manager.default_typeface(style))
    }

    /// Finds a face covering `ch`.
    pub fn match_character(
        &self,
        ch: char,
        style: FontStyle,
        locale: Option<&str>,
    ) -> Option<Typeface> {
        if !self.fallback_enabled {
            return None;
        }
        self.managers
            .iter()
            .find_map(|manager| manager.match_character(ch, style, locale))
    }
}
