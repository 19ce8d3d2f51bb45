// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking.

use super::{LayoutMode, LayoutOptions, LayoutRegion, LayoutStatus, TextLine};
use crate::analysis::BoundaryType;
use crate::context::LayoutContext;
use crate::paragraph::Paragraph;
use crate::style::{OverflowWrap, WordBreak};
use crate::util::{fuzzy_le, is_space_char};

/// Lays out a formatted paragraph into `region`, below its existing lines.
pub(crate) fn layout_paragraph(
    context: &LayoutContext,
    paragraph: &Paragraph,
    region: &mut LayoutRegion,
    options: &LayoutOptions,
) -> LayoutStatus {
    let no_width = region.width_mode() != LayoutMode::Indefinite && region.width() <= 0.0;
    let no_height = region.height_mode() != LayoutMode::Indefinite && region.height() <= 0.0;
    if no_width || no_height {
        log::debug!(
            "region {}x{} has no room for lines",
            region.width(),
            region.height()
        );
        region.set_full(false);
        return LayoutStatus::RegionFull;
    }

    let style = paragraph.style();
    let count = paragraph.char_count();
    let max_lines = usize::try_from(style.max_lines).unwrap_or(usize::MAX);
    let mut start = 0;
    let mut first = true;
    while first || start < count {
        let top = region.next_line_top(style, options, first);
        let indents = style.start_indent(start == 0) + style.end_indent();
        let max_width = (region.break_width() - indents).max(0.0);
        let last_allowed = region.line_count() + 1 >= max_lines;
        let end = if count == 0 {
            0
        } else {
            break_line(
                paragraph,
                start,
                max_width,
                last_allowed && style.ellipsis.is_some(),
            )
        };
        let line = TextLine::new(
            paragraph.clone(),
            start..end,
            top,
            max_width,
            region.align_width(),
        );
        first = false;
        let remaining = end < count;
        let height_limit = region.height_limit();
        log::trace!(
            "line {start}..{end}: top {top}, bottom {}, width {}",
            line.bottom(),
            line.width()
        );

        let (keep, stop) = if last_allowed {
            (true, true)
        } else if fuzzy_le(line.bottom(), height_limit) {
            (true, false)
        } else if top < height_limit && options.last_line_can_overflow {
            (true, true)
        } else {
            (false, true)
        };
        if keep {
            region.push_line(line);
        }
        if stop && (!keep || remaining) {
            region.set_full(last_allowed && remaining);
            if let Some(last) = region.last_line_mut() {
                last.apply_ellipsis(context.shaper());
            }
            region.update_size();
            return LayoutStatus::RegionFull;
        }
        if stop {
            break;
        }
        start = end;
    }
    region.finish_paragraph(style);
    LayoutStatus::Complete
}

/// Finds the end of the line starting at `start`.
///
/// With `clip`, the line ends wherever the width runs out instead of at a
/// break opportunity, leaving room for the ellipsis to be fitted later.
fn break_line(paragraph: &Paragraph, start: usize, max_width: f32, clip: bool) -> usize {
    let boundaries = paragraph.boundaries();
    let text = paragraph.text();
    let limit = boundaries
        .find_next(start, BoundaryType::MustBreak)
        .min(paragraph.char_count());

    let mut greedy = greedy_end(paragraph, start, limit, max_width);
    while greedy < limit && text.char_at(greedy).is_some_and(is_space_char) {
        greedy += 1;
    }
    if greedy >= limit {
        return limit;
    }
    let greedy = boundaries.find_prev(greedy, BoundaryType::Grapheme).max(start);

    let mut end = if clip {
        greedy
    } else {
        boundaries.find_prev(greedy, BoundaryType::LineBreakable).max(start)
    };
    if end < greedy && greedy > start {
        let breaks_anywhere = paragraph
            .run_at(greedy - 1)
            .and_then(|index| paragraph.runs().get(index))
            .is_some_and(|run| run.style().word_break() == WordBreak::BreakAll);
        if breaks_anywhere {
            end = greedy;
        }
    }
    if end > start {
        return end;
    }

    // Nothing fits before the first break opportunity.
    match paragraph.style().overflow_wrap {
        OverflowWrap::Normal => boundaries.find_next(start, BoundaryType::LineBreakable).min(limit),
        OverflowWrap::Anywhere | OverflowWrap::BreakWord => greedy
            .max(boundaries.find_next(start, BoundaryType::Grapheme))
            .min(limit),
    }
}

/// Position of the first char from `start` that does not fit in `max_width`,
/// never past `limit`.
fn greedy_end(paragraph: &Paragraph, start: usize, limit: usize, max_width: f32) -> usize {
    let runs = paragraph.runs();
    let first = runs.partition_point(|run| {
        run.end() < start || (run.end() == start && run.char_count() > 0)
    });
    let mut remaining = max_width;
    let mut end = start;
    for run in &runs[first..] {
        if run.start() > limit || (run.start() == limit && limit < paragraph.char_count()) {
            break;
        }
        if run.char_count() == 0 {
            let width = run.width();
            if !fuzzy_le(width, remaining) {
                break;
            }
            remaining -= width;
            continue;
        }
        let from = end.max(run.start()) - run.start();
        let (fitted, width) = run.measure_by_width(from, remaining);
        end = (run.start() + from + fitted).min(limit);
        remaining -= width;
        if from + fitted < run.char_count() || end >= limit {
            break;
        }
    }
    end
}
