// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;

use skrifa::instance::{LocationRef, Size};
use skrifa::raw::types::NameId;
use skrifa::{FontRef, MetadataProvider};

use super::{next_typeface_id, FontData, FontMetrics, GlyphBounds, GlyphId, TypefaceProvider};
use crate::error::FontDataError;
use crate::style::{FontSlant, FontStyle, FontWeight, FontWidth};

/// A typeface read from OpenType font data with `skrifa`.
#[derive(Clone, Debug)]
pub struct OpenTypeFace {
    id: u64,
    data: Arc<[u8]>,
    index: u32,
    family: String,
    style: FontStyle,
}

impl OpenTypeFace {
    /// Reads the face at `index` of a font file or collection.
    pub fn new(data: impl Into<Arc<[u8]>>, index: u32) -> Result<Self, FontDataError> {
        let data = data.into();
        let font = FontRef::from_index(&data, index)?;
        let family = font
            .localized_strings(NameId::TYPOGRAPHIC_FAMILY_NAME)
            .english_or_first()
            .or_else(|| {
                font.localized_strings(NameId::FAMILY_NAME)
                    .english_or_first()
            })
            .map(|name| name.chars().collect::<String>())
            .unwrap_or_default();
        let attributes = font.attributes();
        let slant = match attributes.style {
            skrifa::attribute::Style::Normal => FontSlant::Normal,
            skrifa::attribute::Style::Italic => FontSlant::Italic,
            skrifa::attribute::Style::Oblique(angle) => FontSlant::Oblique(angle),
        };
        let style = FontStyle::new(
            FontWeight::new(attributes.weight.value()),
            FontWidth::from_ratio(attributes.stretch.ratio()),
            slant,
        );
        Ok(Self {
            id: next_typeface_id(),
            data,
            index,
            family,
            style,
        })
    }

    fn font(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index).ok()
    }
}

impl TypefaceProvider for OpenTypeFace {
    fn id(&self) -> u64 {
        self.id
    }

    fn family_name(&self) -> &str {
        &self.family
    }

    fn font_style(&self) -> FontStyle {
        self.style
    }

    fn metrics(&self, size: f32) -> FontMetrics {
        let Some(font) = self.font() else {
            return FontMetrics::from_extents(size * 0.8, size * 0.2);
        };
        let metrics = font.metrics(Size::new(size), LocationRef::default());
        let mut result = FontMetrics::from_extents(metrics.ascent, -metrics.descent);
        result.leading = metrics.leading;
        if let Some(underline) = metrics.underline {
            result.underline_offset = -underline.offset;
            result.underline_thickness = underline.thickness;
        }
        if let Some(strikeout) = metrics.strikeout {
            result.strikeout_offset = -strikeout.offset;
            result.strikeout_thickness = strikeout.thickness;
        }
        result
    }

    fn glyph_id(&self, ch: char) -> GlyphId {
        self.font()
            .and_then(|font| font.charmap().map(ch))
            .map_or(0, |glyph| glyph.to_u32())
    }

    fn advance(&self, glyph: GlyphId, size: f32) -> f32 {
        self.font()
            .and_then(|font| {
                font.glyph_metrics(Size::new(size), LocationRef::default())
                    .advance_width(skrifa::GlyphId::new(glyph))
            })
            .unwrap_or(0.0)
    }

    fn bounds(&self, glyph: GlyphId, size: f32) -> Option<GlyphBounds> {
        let font = self.font()?;
        let bounds = font
            .glyph_metrics(Size::new(size), LocationRef::default())
            .bounds(skrifa::GlyphId::new(glyph))?;
        Some(GlyphBounds {
            x_min: bounds.x_min,
            y_min: bounds.y_min,
            x_max: bounds.x_max,
            y_max: bounds.y_max,
        })
    }

    fn font_data(&self) -> Option<FontData> {
        Some(FontData {
            bytes: self.data.clone(),
            index: self.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_data_is_rejected() {
        let result = OpenTypeFace::new(b"ttcf".to_vec(), 0);
        assert!(result.is_err());
        let result = OpenTypeFace::new(Vec::<u8>::new(), 0);
        assert!(result.is_err());
    }
}
