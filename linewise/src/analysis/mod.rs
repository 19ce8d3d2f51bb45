// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text analysis: segmentation boundaries and bidirectional levels.

mod bidi;
mod icu;
mod rules;

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::style::WordBreak;

pub use bidi::{BidiBackend, BidiResolution, UnicodeBidi};
pub(crate) use bidi::reorder;
pub use icu::IcuSegmenter;
pub use rules::RuleBasedSegmenter;

/// Strength of the boundary after a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BoundaryType {
    /// Inside a grapheme cluster.
    #[default]
    None = 0,
    /// Between grapheme clusters.
    Grapheme,
    /// Between words.
    Word,
    /// A line may break here.
    LineBreakable,
    /// A line must break here.
    MustBreak,
    /// End of a paragraph.
    Paragraph,
}

/// Inputs to segmentation besides the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Line breaking inside words.
    pub word_break: WordBreak,
    /// Keep punctuation attached to its neighbors.
    pub avoid_break_around_punctuation: bool,
}

impl Default for SegmentOptions {
    /// Matches [`LineBreakStrategy::default`](crate::style::LineBreakStrategy).
    fn default() -> Self {
        Self {
            word_break: WordBreak::default(),
            avoid_break_around_punctuation: true,
        }
    }
}

/// Produces a boundary classification for every character of a text.
pub trait SegmentationBackend: Debug + Send + Sync {
    /// Classifies the boundary after every char of `text`.
    fn analyze(&self, text: &str, options: SegmentOptions) -> BoundaryTable;
}

/// Per character boundary classification.
///
/// The entry at `i` describes the boundary immediately after char `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryTable {
    boundaries: Vec<BoundaryType>,
}

impl BoundaryTable {
    /// Creates a table of `len` chars, all inside one grapheme.
    pub fn new(len: usize) -> Self {
        Self {
            boundaries: vec![BoundaryType::None; len],
        }
    }

    /// Wraps an existing classification.
    pub fn from_vec(boundaries: Vec<BoundaryType>) -> Self {
        Self { boundaries }
    }

    /// Number of classified chars.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// The boundary after char `index`.
    pub fn get(&self, index: usize) -> BoundaryType {
        self.boundaries
            .get(index)
            .copied()
            .unwrap_or(BoundaryType::Paragraph)
    }

    /// The boundary before char `index`. The start of the text is breakable.
    pub fn before(&self, index: usize) -> BoundaryType {
        if index == 0 {
            BoundaryType::LineBreakable
        } else {
            self.get(index - 1)
        }
    }

    /// All classifications in order.
    pub fn as_slice(&self) -> &[BoundaryType] {
        &self.boundaries
    }

    pub(crate) fn set(&mut self, index: usize, boundary: BoundaryType) {
        if let Some(slot) = self.boundaries.get_mut(index) {
            *slot = boundary;
        }
    }

    /// Returns the first position after `start` whose preceding boundary is at
    /// least `min`, or the char count if there is none.
    pub fn find_next(&self, start: usize, min: BoundaryType) -> usize {
        (start..self.len())
            .find(|&k| self.boundaries[k] >= min)
            .map_or(self.len(), |k| k + 1)
    }

    /// Returns the last position at or before `start` whose preceding boundary
    /// is at least `min`, or `0` if there is none.
    pub fn find_prev(&self, start: usize, min: BoundaryType) -> usize {
        let start = start.min(self.len());
        (1..=start)
            .rev()
            .find(|&k| self.boundaries[k - 1] >= min)
            .unwrap_or(0)
    }

    /// Raises the classification of every char in `range` to at least
    /// `boundary`. Never lowers a classification.
    pub fn upgrade(&mut self, range: Range<usize>, boundary: BoundaryType) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        for slot in &mut self.boundaries[start..end] {
            if *slot < boundary {
                *slot = boundary;
            }
        }
    }
}
