// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misc helpers.

/// Largest magnitude accepted for region extents and layout coordinates.
pub(crate) const MAX_LAYOUT_UNITS: f32 = 1.0e6;

pub(crate) fn nearly_eq(x: f32, y: f32) -> bool {
    (x - y).abs() < f32::EPSILON
}

pub(crate) fn nearly_zero(x: f32) -> bool {
    nearly_eq(x, 0.)
}

/// Compares with a tolerance scaled for values produced by summing many advances.
pub(crate) fn fuzzy_le(x: f32, y: f32) -> bool {
    x <= y + 1.0e-3
}

pub(crate) fn clamp_units(v: f32) -> f32 {
    if v.is_nan() {
        0.
    } else {
        v.clamp(-MAX_LAYOUT_UNITS, MAX_LAYOUT_UNITS)
    }
}

/// Returns true for the characters that hang at the end of a line.
pub(crate) fn is_space_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{3000}')
}
