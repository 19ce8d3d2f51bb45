// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::line::{LinePiece, TextLine};
use crate::analysis::{BoundaryType, reorder};
use crate::run::Run;
use crate::style::{Alignment, VerticalAlign};

/// Cuts the line into pieces and puts them in visual order.
///
/// Justified lines are cut at word boundaries so that free space can be
/// spread between words.
pub(super) fn build_pieces(line: &TextLine) -> Vec<LinePiece> {
    let paragraph = line.paragraph();
    let bidi = paragraph.bidi();
    let boundaries = paragraph.boundaries();
    let base = bidi.base_level();
    let split_words = matches!(line.alignment, Alignment::Justify | Alignment::Distributed);
    let range = line.char_range();

    let mut pieces = Vec::new();
    for (index, run) in line.runs() {
        if run.char_count() == 0 {
            pieces.push(LinePiece {
                run: Some(index),
                chars: run.start()..run.start(),
                level: base,
                width: run.width(),
                x: 0.0,
                baseline: 0.0,
            });
            continue;
        }
        let start = run.start().max(range.start);
        let end = run.end().min(range.end);
        let level = bidi.levels().get(start).copied().unwrap_or(base);
        let mut piece_start = start;
        while piece_start < end {
            let piece_end = if split_words && run.is_text() {
                boundaries.find_next(piece_start, BoundaryType::Word).min(end)
            } else {
                end
            };
            pieces.push(LinePiece {
                run: Some(index),
                chars: piece_start..piece_end,
                level,
                width: run.width_of(piece_start - run.start(), piece_end - piece_start),
                x: 0.0,
                baseline: 0.0,
            });
            piece_start = piece_end;
        }
    }
    if let Some(ellipsis) = &line.ellipsis {
        pieces.push(LinePiece {
            run: None,
            chars: range.end..range.end,
            level: base,
            width: ellipsis.width(),
            x: 0.0,
            baseline: 0.0,
        });
    }

    let levels: Vec<u8> = pieces.iter().map(|piece| piece.level).collect();
    let order = reorder(&levels);
    let mut slots: Vec<Option<LinePiece>> = pieces.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|logical| slots.get_mut(logical).and_then(Option::take))
        .collect()
}

/// Places the pieces horizontally and on their baselines.
pub(super) fn align(line: &mut TextLine) {
    let total: f32 = line.pieces.iter().map(|piece| piece.width).sum();
    let free = line.align_width.map_or(0.0, |width| width - total);
    let count = line.pieces.len();

    let mut x = line.start_indent;
    let mut gap = 0.0;
    match line.alignment {
        Alignment::Left => {}
        Alignment::Center => {
            if free > 0.0 {
                x += free / 2.0;
            }
        }
        Alignment::Right => {
            if free > 0.0 {
                x += free;
            }
        }
        Alignment::Justify | Alignment::Distributed => {
            let stretch = line.alignment == Alignment::Distributed || !(line.last || line.hard_break);
            if stretch && free > 0.0 && count > 1 {
                gap = free / (count - 1) as f32;
            }
        }
    }

    let baselines: Vec<f32> = line
        .pieces
        .iter()
        .map(|piece| line.piece_run(piece).map_or(line.baseline(), |run| piece_baseline(line, run)))
        .collect();
    for (piece, baseline) in line.pieces.iter_mut().zip(baselines) {
        piece.x = x;
        piece.baseline = baseline;
        x += piece.width + gap;
    }
}

fn piece_baseline(line: &TextLine, run: &Run) -> f32 {
    let metrics = run.metrics();
    let content_top = line.content_top();
    let content_bottom = content_top + line.ascent() + line.descent();
    match run.style().vertical_align() {
        VerticalAlign::Top => content_top + metrics.ascent,
        VerticalAlign::Bottom => content_bottom - metrics.descent,
        VerticalAlign::Middle => {
            content_top + (content_bottom - content_top - metrics.height()) / 2.0 + metrics.ascent
        }
        VerticalAlign::Baseline | VerticalAlign::Superscript | VerticalAlign::Subscript => {
            line.baseline() + run.baseline_offset() + run.bounds_offset
        }
    }
}
