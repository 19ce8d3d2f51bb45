// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segmentation backed by ICU4X.

use icu_segmenter::options::{LineBreakOptions, LineBreakWordOption, WordBreakInvariantOptions};
use icu_segmenter::{GraphemeClusterSegmenter, LineSegmenter, WordSegmenter};

use super::rules::mark_hard_breaks;
use super::{BoundaryTable, BoundaryType, SegmentOptions, SegmentationBackend};
use crate::style::WordBreak;
use crate::text::TextContent;

/// Unicode segmentation using the compiled ICU4X data.
///
/// Grapheme, word and line boundaries are applied in that order, each one
/// raising the classification left by the previous pass. Scripts that need
/// dictionary segmentation are broken at grapheme boundaries only.
#[derive(Clone, Copy, Debug, Default)]
pub struct IcuSegmenter;

impl IcuSegmenter {
    /// Creates the segmenter.
    pub fn new() -> Self {
        Self
    }
}

impl SegmentationBackend for IcuSegmenter {
    fn analyze(&self, text: &str, options: SegmentOptions) -> BoundaryTable {
        let mut content = TextContent::new();
        content.push_str(text);
        let count = content.char_count();
        let mut table = BoundaryTable::new(count);
        if count == 0 {
            return table;
        }

        let mut raise = |byte: usize, boundary: BoundaryType| {
            let index = content.char_offset(byte);
            if index > 0 && index <= count {
                table.upgrade(index - 1..index, boundary);
            }
        };

        for byte in GraphemeClusterSegmenter::new().segment_str(text) {
            raise(byte, BoundaryType::Grapheme);
        }
        for byte in WordSegmenter::new_for_non_complex_scripts(WordBreakInvariantOptions::default())
            .segment_str(text)
        {
            raise(byte, BoundaryType::Word);
        }

        let mut line_options = LineBreakOptions::default();
        line_options.word_option = Some(match options.word_break {
            WordBreak::Normal => LineBreakWordOption::Normal,
            WordBreak::BreakAll => LineBreakWordOption::BreakAll,
            WordBreak::KeepAll => LineBreakWordOption::KeepAll,
        });
        for byte in LineSegmenter::new_for_non_complex_scripts(line_options).segment_str(text) {
            raise(byte, BoundaryType::LineBreakable);
        }

        mark_hard_breaks(text, &mut table);
        table
    }
}
