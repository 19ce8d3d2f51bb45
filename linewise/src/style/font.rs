// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Visual weight class of a font, typically on a scale from 1.0 to 1000.0.
///
/// This uses an `f32` so that it can represent the full range of values
/// possible with variable fonts.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100.0);

    /// Weight value of 300.
    pub const LIGHT: Self = Self(300.0);

    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400.0);

    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500.0);

    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600.0);

    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);

    /// Weight value of 900.
    pub const BLACK: Self = Self(900.0);

    /// Creates a new weight value.
    pub fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Parses a CSS `font-weight` value: `normal`, `bold` or a number.
    ///
    /// ```
    /// use linewise::style::FontWeight;
    ///
    /// assert_eq!(FontWeight::parse("bold"), Some(FontWeight::BOLD));
    /// assert_eq!(FontWeight::parse(" 850 "), Some(FontWeight::new(850.0)));
    /// assert_eq!(FontWeight::parse("heavy"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Some(match s {
            "normal" => Self::NORMAL,
            "bold" => Self::BOLD,
            _ => Self(s.parse::<f32>().ok()?),
        })
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual width of a font as a ratio of the normal width.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWidth(f32);

impl FontWidth {
    /// Width that is 75% of normal.
    pub const CONDENSED: Self = Self(0.75);

    /// Width that is 100% of normal. This is the default value.
    pub const NORMAL: Self = Self(1.0);

    /// Width that is 125% of normal.
    pub const EXPANDED: Self = Self(1.25);

    /// Creates a width from a ratio where `1.0` is normal.
    pub fn from_ratio(ratio: f32) -> Self {
        Self(ratio)
    }

    /// Returns the width as a ratio where `1.0` is normal.
    pub fn ratio(self) -> f32 {
        self.0
    }
}

impl Default for FontWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Visual style or "slope" of a font.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum FontSlant {
    /// Upright.
    #[default]
    Normal,
    /// A true italic design.
    Italic,
    /// A slanted upright design with an optional angle in degrees.
    Oblique(Option<f32>),
}

impl FontSlant {
    /// Returns true for italic and oblique slants.
    pub fn is_slanted(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Weight, width and slant requested for, or provided by, a typeface.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FontStyle {
    /// Weight class.
    pub weight: FontWeight,
    /// Width class.
    pub width: FontWidth,
    /// Slope.
    pub slant: FontSlant,
}

impl FontStyle {
    /// Upright bold.
    pub const BOLD: Self = Self {
        weight: FontWeight::BOLD,
        width: FontWidth::NORMAL,
        slant: FontSlant::Normal,
    };

    /// Creates a font style.
    pub fn new(weight: FontWeight, width: FontWidth, slant: FontSlant) -> Self {
        Self {
            weight,
            width,
            slant,
        }
    }
}

impl Eq for FontStyle {}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.weight.0.to_bits().hash(state);
        self.width.0.to_bits().hash(state);
        match self.slant {
            FontSlant::Normal => 0_u8.hash(state),
            FontSlant::Italic => 1_u8.hash(state),
            FontSlant::Oblique(angle) => {
                2_u8.hash(state);
                angle.map(f32::to_bits).hash(state);
            }
        }
    }
}

/// Requested font: a prioritized family list and a style.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FontDescriptor {
    /// Family names, most preferred first. An empty list selects the
    /// default typeface of the font collection.
    pub families: Vec<Arc<str>>,
    /// Requested weight, width and slant.
    pub style: FontStyle,
}

impl FontDescriptor {
    /// Creates a descriptor for a single family.
    pub fn new(family: &str) -> Self {
        Self {
            families: vec![Arc::from(family)],
            style: FontStyle::default(),
        }
    }

    /// Parses a comma separated family list, trimming quotes.
    ///
    /// ```
    /// use linewise::style::FontDescriptor;
    ///
    /// let desc = FontDescriptor::from_list("Noto Sans, 'Noto Sans CJK SC', serif");
    /// assert_eq!(desc.families.len(), 3);
    /// assert_eq!(&*desc.families[1], "Noto Sans CJK SC");
    /// ```
    pub fn from_list(list: &str) -> Self {
        let families = list
            .split(',')
            .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|name| !name.is_empty())
            .map(Arc::from)
            .collect();
        Self {
            families,
            style: FontStyle::default(),
        }
    }

    /// Returns a copy with the given style.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}
