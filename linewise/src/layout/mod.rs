// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking and placement of formatted paragraphs.

mod alignment;
mod line;
mod line_break;
mod region;

pub use line::{LinePiece, TextLine};
pub(crate) use line_break::layout_paragraph;
pub use region::LayoutRegion;

/// How a region extent constrains layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// No constraint. The content determines the extent.
    #[default]
    Indefinite,
    /// The extent is fixed and reported as the content size.
    Definite,
    /// The extent is a maximum. The content determines the reported size.
    AtMost,
}

/// Options for a single layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Keep a line that starts inside the region even if its bottom falls
    /// outside.
    pub last_line_can_overflow: bool,
    /// Place the first line of an empty region at the top, ignoring spacing
    /// before it.
    pub skip_spacing_before_first_line: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            last_line_can_overflow: true,
            skip_spacing_before_first_line: false,
        }
    }
}

/// Outcome of laying out a paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutStatus {
    /// Every char of the paragraph was placed.
    Complete,
    /// Layout stopped early because the region ran out of height or lines.
    RegionFull,
}
