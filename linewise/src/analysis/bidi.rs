// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional level resolution.

use alloc::vec::Vec;
use core::fmt::Debug;

use unicode_bidi::{BidiInfo, Level};

use crate::style::Direction;

/// Per character embedding levels with the visual order they imply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BidiResolution {
    levels: Vec<u8>,
    /// `visual[logical]` is the visual position of a logical index.
    visual: Vec<usize>,
    /// `logical[visual]` is the logical index at a visual position.
    logical: Vec<usize>,
    base_level: u8,
}

impl BidiResolution {
    /// Builds the order maps for the given levels.
    pub fn new(levels: Vec<u8>, base_level: u8) -> Self {
        let logical = reorder(&levels);
        let mut visual = vec![0; logical.len()];
        for (visual_index, &logical_index) in logical.iter().enumerate() {
            visual[logical_index] = visual_index;
        }
        Self {
            levels,
            visual,
            logical,
            base_level,
        }
    }

    /// Number of resolved chars.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Embedding levels; odd levels are right to left.
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    /// The paragraph embedding level.
    pub fn base_level(&self) -> u8 {
        self.base_level
    }

    /// Returns true for a right to left paragraph.
    pub fn is_base_rtl(&self) -> bool {
        self.base_level & 1 != 0
    }

    /// Returns true if the char at `index` is right to left.
    pub fn is_rtl(&self, index: usize) -> bool {
        self.levels
            .get(index)
            .map_or(self.is_base_rtl(), |level| level & 1 != 0)
    }

    /// Visual position of a logical index.
    pub fn visual_index(&self, logical: usize) -> usize {
        self.visual.get(logical).copied().unwrap_or(logical)
    }

    /// Logical index at a visual position.
    pub fn logical_index(&self, visual: usize) -> usize {
        self.logical.get(visual).copied().unwrap_or(visual)
    }

    /// Logical indices in visual order.
    pub fn visual_order(&self) -> &[usize] {
        &self.logical
    }
}

/// Applies rule L2: from the highest level down to the lowest odd level,
/// reverse every maximal sequence at that level or higher.
pub(crate) fn reorder(levels: &[u8]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    let Some(&max_level) = levels.iter().max() else {
        return order;
    };
    let lowest_odd = levels
        .iter()
        .copied()
        .filter(|level| level & 1 != 0)
        .min()
        .unwrap_or(max_level + 1);
    for level in (lowest_odd..=max_level).rev() {
        let mut i = 0;
        while i < order.len() {
            if levels[order[i]] >= level {
                let start = i;
                while i < order.len() && levels[order[i]] >= level {
                    i += 1;
                }
                order[start..i].reverse();
            } else {
                i += 1;
            }
        }
    }
    order
}

/// Resolves embedding levels for a paragraph.
pub trait BidiBackend: Debug + Send + Sync {
    /// Resolves `text` against the requested base direction.
    fn resolve(&self, text: &str, direction: Direction) -> BidiResolution;
}

/// The Unicode Bidirectional Algorithm as implemented by `unicode-bidi`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeBidi;

impl BidiBackend for UnicodeBidi {
    fn resolve(&self, text: &str, direction: Direction) -> BidiResolution {
        if text.is_empty() {
            return BidiResolution::new(Vec::new(), direction_level(direction).unwrap_or(0));
        }
        let requested = match direction {
            Direction::Auto => None,
            Direction::Rtl => Some(Level::rtl()),
            Direction::Ltr | Direction::Ttb | Direction::Btt => Some(Level::ltr()),
        };
        let info = BidiInfo::new(text, requested);
        let base_level = info
            .paragraphs
            .first()
            .map_or(0, |paragraph| paragraph.level.number());
        let levels = text
            .char_indices()
            .map(|(byte, _)| info.levels[byte].number())
            .collect();
        BidiResolution::new(levels, base_level)
    }
}

fn direction_level(direction: Direction) -> Option<u8> {
    match direction {
        Direction::Rtl => Some(1),
        Direction::Auto => None,
        _ => Some(0),
    }
}
