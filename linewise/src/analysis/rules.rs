// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule based segmentation.

use alloc::vec::Vec;

use icu_properties::CodePointMapData;
use icu_properties::props::{GeneralCategory, LineBreak};

use super::{BoundaryTable, BoundaryType, SegmentOptions, SegmentationBackend};
use crate::style::WordBreak;

/// Character classes driving the adjacency rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Other,
    WhiteSpace,
    Cjk,
    LeftPunctuation,
    NeutralPunctuation,
    RightPunctuation,
}

fn classify(ch: char) -> CharClass {
    if ch == '\0' || ch == '\t' {
        return CharClass::WhiteSpace;
    }
    let cp = ch as u32;
    let lb = CodePointMapData::<LineBreak>::new().get32(cp);
    let gc = CodePointMapData::<GeneralCategory>::new().get32(cp);
    match lb {
        LineBreak::Space
        | LineBreak::MandatoryBreak
        | LineBreak::CarriageReturn
        | LineBreak::LineFeed
        | LineBreak::NextLine
        | LineBreak::ZWSpace => return CharClass::WhiteSpace,
        LineBreak::Ideographic | LineBreak::ConditionalJapaneseStarter => {
            return CharClass::Cjk;
        }
        _ => {}
    }
    if matches!(
        gc,
        GeneralCategory::OpenPunctuation | GeneralCategory::InitialPunctuation
    ) || lb == LineBreak::OpenPunctuation
    {
        return CharClass::LeftPunctuation;
    }
    if matches!(
        gc,
        GeneralCategory::ClosePunctuation | GeneralCategory::FinalPunctuation
    ) || matches!(
        lb,
        LineBreak::ClosePunctuation
            | LineBreak::CloseParenthesis
            | LineBreak::Exclamation
            | LineBreak::InfixNumeric
            | LineBreak::Nonstarter
            | LineBreak::PostfixNumeric
            | LineBreak::Quotation
            | LineBreak::Inseparable
    ) {
        return CharClass::RightPunctuation;
    }
    if matches!(
        gc,
        GeneralCategory::DashPunctuation | GeneralCategory::MathSymbol
    ) || matches!(
        lb,
        LineBreak::Hyphen | LineBreak::BreakAfter | LineBreak::BreakBefore | LineBreak::BreakSymbols
    ) {
        return CharClass::NeutralPunctuation;
    }
    CharClass::Other
}

/// Self-contained segmentation from character classes and adjacency rules.
///
/// CJK characters break before and after. Runs of other characters form
/// words that break at whitespace. With [`WordBreak::KeepAll`] CJK text is
/// treated like other words. When punctuation is kept attached, an
/// opening mark never ends a line and a closing mark never starts one.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedSegmenter;

impl RuleBasedSegmenter {
    /// Creates the segmenter.
    pub fn new() -> Self {
        Self
    }
}

impl SegmentationBackend for RuleBasedSegmenter {
    fn analyze(&self, text: &str, options: SegmentOptions) -> BoundaryTable {
        let keep_all = options.word_break == WordBreak::KeepAll;
        let classes: Vec<CharClass> = text
            .chars()
            .map(|ch| match classify(ch) {
                CharClass::Cjk if keep_all => CharClass::Other,
                class => class,
            })
            .collect();
        let count = classes.len();
        let mut boundaries = vec![BoundaryType::None; count];
        for (k, &class) in classes.iter().enumerate() {
            match class {
                CharClass::Other => {
                    boundaries[k] = if k + 1 < count && classes[k + 1] == CharClass::Other {
                        BoundaryType::Grapheme
                    } else {
                        BoundaryType::Word
                    };
                }
                CharClass::Cjk => {
                    boundaries[k] = BoundaryType::LineBreakable;
                    if k > 0 && classes[k - 1] == CharClass::Other {
                        boundaries[k - 1] = BoundaryType::LineBreakable;
                    }
                }
                CharClass::WhiteSpace => {
                    boundaries[k] = BoundaryType::LineBreakable;
                    if k > 0
                        && boundaries[k - 1] == BoundaryType::LineBreakable
                        && classes[k - 1] != CharClass::WhiteSpace
                    {
                        boundaries[k - 1] = BoundaryType::Word;
                    }
                }
                _ => {}
            }
            if !options.avoid_break_around_punctuation {
                boundaries[k] = BoundaryType::LineBreakable;
                continue;
            }
            match class {
                CharClass::NeutralPunctuation => boundaries[k] = BoundaryType::LineBreakable,
                CharClass::LeftPunctuation => boundaries[k] = BoundaryType::Word,
                CharClass::RightPunctuation => {
                    if k > 0 && classes[k - 1] != CharClass::WhiteSpace {
                        boundaries[k - 1] = BoundaryType::Word;
                    }
                    boundaries[k] = BoundaryType::LineBreakable;
                }
                _ => {}
            }
        }
        let mut table = BoundaryTable::from_vec(boundaries);
        mark_hard_breaks(text, &mut table);
        table
    }
}

/// Marks the chars ending a hard line break as must-break.
///
/// A `\r` directly followed by `\n` is part of one break.
pub(crate) fn mark_hard_breaks(text: &str, table: &mut BoundaryTable) {
    let mut chars = text.chars().enumerate().peekable();
    while let Some((k, ch)) = chars.next() {
        let hard = match ch {
            '\n' | '\u{b}' | '\u{c}' | '\u{85}' | '\u{2028}' | '\u{2029}' => true,
            '\r' => chars.peek().map(|(_, next)| *next) != Some('\n'),
            _ => false,
        };
        if hard {
            table.upgrade(k..k + 1, BoundaryType::MustBreak);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_follow_unicode_properties() {
        assert_eq!(classify('一'), CharClass::Cjk);
        assert_eq!(classify('あ'), CharClass::Cjk);
        assert_eq!(classify(' '), CharClass::WhiteSpace);
        assert_eq!(classify('\n'), CharClass::WhiteSpace);
        assert_eq!(classify('('), CharClass::LeftPunctuation);
        assert_eq!(classify('“'), CharClass::LeftPunctuation);
        assert_eq!(classify('）'), CharClass::RightPunctuation);
        assert_eq!(classify('。'), CharClass::RightPunctuation);
        assert_eq!(classify(','), CharClass::RightPunctuation);
        assert_eq!(classify('-'), CharClass::NeutralPunctuation);
        assert_eq!(classify('+'), CharClass::NeutralPunctuation);
        assert_eq!(classify('a'), CharClass::Other);
        assert_eq!(classify('7'), CharClass::Other);
    }
}
