// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{Mutex, PoisonError};

use skrifa::instance::{LocationRef, Size};
use skrifa::MetadataProvider;

use super::{ShapedGlyph, ShapingBackend};
use crate::font::Typeface;
use crate::lru_cache::LruCache;

/// Maps every char to its nominal glyph. No reordering or substitution.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharMapShaper;

impl ShapingBackend for CharMapShaper {
    fn shape(
        &self,
        text: &[char],
        typeface: &Typeface,
        size: f32,
        rtl: bool,
        _locale: Option<&str>,
    ) -> Vec<ShapedGlyph> {
        let mut glyphs: Vec<ShapedGlyph> = text
            .iter()
            .enumerate()
            .map(|(index, &ch)| {
                let id = typeface.glyph_id(ch);
                ShapedGlyph {
                    id,
                    cluster: index as u32,
                    x_advance: typeface.advance(id, size),
                    x_offset: 0.0,
                    y_offset: 0.0,
                }
            })
            .collect();
        if rtl {
            glyphs.reverse();
        }
        glyphs
    }
}

const MAX_SHAPER_DATA: usize = 16;

/// OpenType shaping with `harfrust`.
///
/// Typefaces that do not expose font data are shaped by [`CharMapShaper`].
pub struct HarfrustShaper {
    shaper_data: Mutex<LruCache<u64, Arc<harfrust::ShaperData>>>,
}

impl core::fmt::Debug for HarfrustShaper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HarfrustShaper").finish_non_exhaustive()
    }
}

impl Default for HarfrustShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl HarfrustShaper {
    /// Creates a shaper with an empty table cache.
    pub fn new() -> Self {
        Self {
            shaper_data: Mutex::new(LruCache::new(MAX_SHAPER_DATA)),
        }
    }
}

impl ShapingBackend for HarfrustShaper {
    fn shape(
        &self,
        text: &[char],
        typeface: &Typeface,
        size: f32,
        rtl: bool,
        locale: Option<&str>,
    ) -> Vec<ShapedGlyph> {
        let Some(data) = typeface.font_data() else {
            return CharMapShaper.shape(text, typeface, size, rtl, locale);
        };
        let (Ok(font_ref), Ok(font)) = (
            harfrust::FontRef::from_index(&data.bytes, data.index),
            skrifa::FontRef::from_index(&data.bytes, data.index),
        ) else {
            log::warn!("unreadable font data for {}", typeface.family_name());
            return CharMapShaper.shape(text, typeface, size, rtl, locale);
        };
        let units_per_em = font
            .metrics(Size::unscaled(), LocationRef::default())
            .units_per_em;
        let scale = if units_per_em == 0 {
            0.0
        } else {
            size / f32::from(units_per_em)
        };

        let shaper_data = self
            .shaper_data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(typeface.id(), || {
                Arc::new(harfrust::ShaperData::new(&font_ref))
            })
            .clone();
        let shaper = shaper_data
            .shaper(&font_ref)
            .point_size(Some(size))
            .build();

        let mut buffer = harfrust::UnicodeBuffer::new();
        buffer.reserve(text.len());
        for (index, &ch) in text.iter().enumerate() {
            // One cluster per char so that clusters index into `text`.
            buffer.add(ch, index as u32);
        }
        buffer.set_direction(if rtl {
            harfrust::Direction::RightToLeft
        } else {
            harfrust::Direction::LeftToRight
        });
        if let Some(language) = locale.and_then(|tag| tag.parse::<harfrust::Language>().ok()) {
            buffer.set_language(language);
        }
        buffer.guess_segment_properties();

        let glyph_buffer = shaper.shape(buffer, &[]);
        glyph_buffer
            .glyph_infos()
            .iter()
            .zip(glyph_buffer.glyph_positions())
            .map(|(info, position)| ShapedGlyph {
                id: info.glyph_id,
                cluster: info.cluster,
                x_advance: position.x_advance as f32 * scale,
                x_offset: position.x_offset as f32 * scale,
                y_offset: position.y_offset as f32 * scale,
            })
            .collect()
    }
}
