// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use super::{FontManager, OpenTypeFace, Typeface};
use crate::error::FontDataError;
use crate::style::FontStyle;

/// An in-memory set of typefaces.
///
/// Matching picks the face closest to the requested style: slant first,
/// then weight, then width.
#[derive(Clone, Debug, Default)]
pub struct FontStore {
    faces: Vec<Typeface>,
    default_family: Option<String>,
}

impl FontStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typeface.
    pub fn add(&mut self, face: Typeface) {
        self.faces.push(face);
    }

    /// Reads and registers the face at `index` of OpenType data.
    pub fn add_font_data(
        &mut self,
        data: impl Into<Arc<[u8]>>,
        index: u32,
    ) -> Result<Typeface, FontDataError> {
        let face: Typeface = Arc::new(OpenTypeFace::new(data, index)?);
        self.faces.push(face.clone());
        Ok(face)
    }

    /// Sets the family used when no requested family matches.
    pub fn set_default_family(&mut self, family: &str) {
        self.default_family = Some(family.into());
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn closest<'a>(
        candidates: impl Iterator<Item = &'a Typeface>,
        style: FontStyle,
    ) -> Option<Typeface> {
        candidates
            .min_by(|a, b| {
                style_distance(a.font_style(), style).total_cmp(&style_distance(b.font_style(), style))
            })
            .cloned()
    }
}

fn style_distance(have: FontStyle, want: FontStyle) -> f32 {
    let slant = if have.slant.is_slanted() == want.slant.is_slanted() {
        0.0
    } else {
        10_000.0
    };
    let weight = (have.weight.value() - want.weight.value()).abs();
    let width = (have.width.ratio() - want.width.ratio()).abs() * 1_000.0;
    slant + weight + width
}

impl FontManager for FontStore {
    fn match_family(&self, family: &str, style: FontStyle) -> Option<Typeface> {
        Self::closest(
            self.faces
                .iter()
                .filter(|face| face.family_name().eq_ignore_ascii_case(family)),
            style,
        )
    }

    fn match_character(
        &self,
        ch: char,
        style: FontStyle,
        _locale: Option<&str>,
    ) -> Option<Typeface> {
        Self::closest(self.faces.iter().filter(|face| face.covers(ch)), style)
    }

    fn default_typeface(&self, style: FontStyle) -> Option<Typeface> {
        if let Some(family) = &self.default_family {
            if let Some(face) = self.match_family(family, style) {
                return Some(face);
            }
        }
        Self::closest(self.faces.iter(), style)
    }
}
