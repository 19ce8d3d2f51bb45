// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font fallback.
//!
//! A span starts out as one unresolved block. Each pass shapes every
//! unresolved block with one candidate face, keeps the clusters that face
//! covers and leaves the rest unresolved for the next pass. The requested
//! families are tried first, then faces found per codepoint through the
//! fallback cache. Blocks only split where a grapheme boundary coincides
//! with a cluster boundary.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashSet;
use icu_segmenter::GraphemeClusterSegmenter;

use super::{FallbackKey, ResolvedFont, ShapeResult, ShapeStyle, ShapedBlock, ShapedGlyph, Shaper};
use crate::font::Typeface;
use crate::text::TextContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PassOutcome {
    Nothing,
    Something,
    Everything,
}

#[derive(Clone, Debug)]
struct Pending {
    range: Range<usize>,
    /// Every distinct char of the block has been searched for.
    hopeless: bool,
}

pub(crate) struct FallbackResolver<'a> {
    shaper: &'a Shaper,
    text: &'a [char],
    style: &'a ShapeStyle,
    rtl: bool,
    grapheme_starts: Vec<bool>,
    resolved: Vec<ShapedBlock>,
    pending: Vec<Pending>,
    tried_faces: Vec<u64>,
    tried_chars: HashSet<char>,
}

impl<'a> FallbackResolver<'a> {
    pub(crate) fn new(
        shaper: &'a Shaper,
        text: &'a [char],
        style: &'a ShapeStyle,
        rtl: bool,
    ) -> Self {
        let pending = if text.is_empty() {
            Vec::new()
        } else {
            vec![Pending {
                range: 0..text.len(),
                hopeless: false,
            }]
        };
        Self {
            shaper,
            text,
            style,
            rtl,
            grapheme_starts: grapheme_starts(text),
            resolved: Vec::new(),
            pending,
            tried_faces: Vec::new(),
            tried_chars: HashSet::new(),
        }
    }

    pub(crate) fn resolve(mut self) -> ShapeResult {
        let requested = self.shaper.fonts().match_descriptor(&self.style.font);
        let primary = requested.first().cloned();
        for face in &requested {
            if self.pending.is_empty() {
                break;
            }
            self.pass(face);
        }
        if self.shaper.fonts().fallback_enabled() {
            while !self.pending.is_empty() {
                let Some(face) = self.next_fallback_face() else {
                    break;
                };
                if self.pass(&face) == PassOutcome::Everything {
                    break;
                }
            }
        }
        self.finish(primary.as_ref())
    }

    /// Shapes every pending block with `face`.
    fn pass(&mut self, face: &Typeface) -> PassOutcome {
        self.tried_faces.push(face.id());
        let pending = core::mem::take(&mut self.pending);
        let mut progress = false;
        for block in pending {
            let (resolved, unresolved) = self.shape_block(block.range.clone(), face);
            progress |= !resolved.is_empty();
            self.resolved.extend(resolved);
            for range in unresolved {
                let hopeless = block.hopeless && range == block.range;
                self.pending.push(Pending { range, hopeless });
            }
        }
        let outcome = if self.pending.is_empty() {
            PassOutcome::Everything
        } else if progress {
            PassOutcome::Something
        } else {
            PassOutcome::Nothing
        };
        log::trace!("fallback pass with {}: {outcome:?}", face.family_name());
        outcome
    }

    /// Picks an untried codepoint from the first block that has one and looks
    /// up a face for it. Blocks without untried codepoints become hopeless
    /// and move to the front of the queue.
    fn next_fallback_face(&mut self) -> Option<Typeface> {
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].hopeless {
                index += 1;
                continue;
            }
            let range = self.pending[index].range.clone();
            let candidate = self.text[range]
                .iter()
                .copied()
                .find(|ch| !is_control(*ch) && !self.tried_chars.contains(ch));
            let Some(ch) = candidate else {
                self.pending[index].hopeless = true;
                let block = self.pending.remove(index);
                log::warn!(
                    "no fallback font found for chars {}..{}",
                    block.range.start,
                    block.range.end
                );
                self.pending.insert(0, block);
                index += 1;
                continue;
            };
            self.tried_chars.insert(ch);
            let fonts = self.shaper.fonts();
            let key = FallbackKey {
                collection: fonts.id(),
                ch,
                style: self.style.font.style,
                locale: self.style.locale.clone(),
            };
            let locale = self.style.locale.as_deref();
            let style = self.style.font.style;
            let face = self
                .shaper
                .fallback_cache()
                .get_or_insert_with(key, || fonts.match_character(ch, style, locale));
            if let Some(face) = face {
                if !self.tried_faces.contains(&face.id()) {
                    return Some(face);
                }
            }
        }
        None
    }

    /// Shapes `range` with `face` and splits it into covered blocks and
    /// uncovered ranges.
    fn shape_block(
        &self,
        range: Range<usize>,
        face: &Typeface,
    ) -> (Vec<ShapedBlock>, Vec<Range<usize>>) {
        let mut glyphs = self.shape_with(range.clone(), face);
        if glyphs.is_empty() {
            return (Vec::new(), vec![range]);
        }
        glyphs.sort_by_key(|glyph| glyph.cluster);

        // (chars, glyphs, covered) per cluster.
        let mut clusters: Vec<(Range<usize>, Range<usize>, bool)> = Vec::new();
        let mut start = 0;
        while start < glyphs.len() {
            let cluster = glyphs[start].cluster;
            let end = start + glyphs[start..].partition_point(|g| g.cluster == cluster);
            let char_start = if clusters.is_empty() {
                range.start
            } else {
                cluster as usize
            };
            let char_end = glyphs
                .get(end)
                .map_or(range.end, |next| next.cluster as usize);
            let covered = glyphs[start..end].iter().all(|g| g.id != 0)
                || self.text[char_start..char_end].iter().all(|ch| is_control(*ch));
            clusters.push((char_start..char_end, start..end, covered));
            start = end;
        }

        // Merge clusters into units that end on grapheme boundaries.
        let mut units: Vec<(Range<usize>, Range<usize>, bool)> = Vec::new();
        let mut open = false;
        for (chars, glyph_range, covered) in clusters {
            match units.last_mut() {
                Some(last) if open => {
                    last.0.end = chars.end;
                    last.1.end = glyph_range.end;
                    last.2 &= covered;
                }
                _ => units.push((chars.clone(), glyph_range, covered)),
            }
            open = !self.is_grapheme_start(chars.end) && chars.end < range.end;
        }

        let mut resolved = Vec::new();
        let mut unresolved: Vec<Range<usize>> = Vec::new();
        let font = ResolvedFont::new(face.clone(), self.style.font.style);
        for (chars, glyph_range, covered) in units {
            if covered {
                match resolved.last_mut() {
                    Some(ShapedBlock {
                        chars: last,
                        glyphs: last_glyphs,
                        ..
                    }) if last.end == chars.start => {
                        last.end = chars.end;
                        last_glyphs.extend_from_slice(&glyphs[glyph_range]);
                    }
                    _ => resolved.push(ShapedBlock {
                        chars,
                        glyphs: glyphs[glyph_range].to_vec(),
                        font: Some(font.clone()),
                    }),
                }
            } else {
                match unresolved.last_mut() {
                    Some(last) if last.end == chars.start => last.end = chars.end,
                    _ => unresolved.push(chars),
                }
            }
        }
        (resolved, unresolved)
    }

    /// Shapes `range` with `face`; clusters are made absolute.
    fn shape_with(&self, range: Range<usize>, face: &Typeface) -> Vec<ShapedGlyph> {
        let offset = range.start as u32;
        let mut glyphs = self.shaper.backend().shape(
            &self.text[range],
            face,
            self.style.size,
            self.rtl,
            self.style.locale.as_deref(),
        );
        for glyph in &mut glyphs {
            glyph.cluster += offset;
        }
        glyphs
    }

    fn is_grapheme_start(&self, index: usize) -> bool {
        self.grapheme_starts.get(index).copied().unwrap_or(true)
    }

    /// Accepts whatever is left with the primary face and assembles the result.
    fn finish(mut self, primary: Option<&Typeface>) -> ShapeResult {
        let pending = core::mem::take(&mut self.pending);
        for block in pending {
            let glyphs = match primary {
                Some(face) => self.shape_with(block.range.clone(), face),
                None => block
                    .range
                    .clone()
                    .map(|index| ShapedGlyph {
                        cluster: index as u32,
                        ..ShapedGlyph::default()
                    })
                    .collect(),
            };
            self.resolved.push(ShapedBlock {
                chars: block.range,
                glyphs,
                font: primary.map(|face| ResolvedFont::new(face.clone(), self.style.font.style)),
            });
        }
        self.resolved.sort_by_key(|block| block.chars.start);
        debug_assert!(
            self.resolved
                .windows(2)
                .all(|pair| pair[0].chars.end == pair[1].chars.start),
            "fallback blocks must tile the span"
        );
        debug_assert_eq!(
            self.resolved.last().map_or(0, |block| block.chars.end),
            self.text.len()
        );
        ShapeResult::from_blocks(self.text, self.resolved, self.rtl, self.style.size)
    }
}

fn is_control(ch: char) -> bool {
    ch.is_control() || matches!(ch, '\u{2028}' | '\u{2029}')
}

/// `starts[i]` is true if a grapheme cluster starts at char `i`.
fn grapheme_starts(text: &[char]) -> Vec<bool> {
    let mut starts = vec![false; text.len() + 1];
    let string: String = text.iter().collect();
    let mut content = TextContent::new();
    content.push_str(&string);
    for byte in GraphemeClusterSegmenter::new().segment_str(&string) {
        if let Some(slot) = starts.get_mut(content.char_offset(byte)) {
            *slot = true;
        }
    }
    if let Some(first) = starts.first_mut() {
        *first = true;
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combining_marks_are_not_grapheme_starts() {
        let starts = grapheme_starts(&['e', '\u{301}', 'x']);
        assert_eq!(starts, vec![true, false, true, true]);
        assert_eq!(grapheme_starts(&[]), vec![true]);
    }
}
