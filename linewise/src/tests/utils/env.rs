// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;
use std::sync::Arc;

use super::{CountingShaper, MockTypeface};
use crate::font::{FontCollection, FontStore, Typeface};
use crate::layout::{LayoutMode, LayoutOptions, LayoutRegion, LayoutStatus};
use crate::{LayoutContext, Paragraph, ParagraphStyle, Style, StyleProperty};

// Creates a TestEnv named after the calling test function.
#[macro_export]
macro_rules! testenv {
    () => {
        $crate::testenv!($crate::tests::utils::TestEnv::new())
    };
    ($env:expr) => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = &name[..name.len() - 3];
        let name = &name[name.rfind(':').map(|x| x + 1).unwrap_or(0)..];
        $env.with_name(name)
    }};
}

/// A layout context over mock typefaces with a counting shaper.
pub(crate) struct TestEnv {
    pub(crate) context: LayoutContext,
    pub(crate) shaper: Arc<CountingShaper>,
    test_name: String,
}

impl TestEnv {
    /// One mock face covering everything.
    pub(crate) fn new() -> Self {
        Self::with_faces(vec![MockTypeface::new("Mock").shared()])
    }

    pub(crate) fn with_faces(faces: Vec<Typeface>) -> Self {
        let mut store = FontStore::new();
        for face in faces {
            store.add(face);
        }
        Self::with_fonts(FontCollection::with_manager(Arc::new(store)))
    }

    pub(crate) fn with_fonts(fonts: FontCollection) -> Self {
        let shaper = Arc::new(CountingShaper::default());
        let context = LayoutContext::new(fonts).with_shaping_backend(shaper.clone());
        Self {
            context,
            shaper,
            test_name: String::from("test"),
        }
    }

    /// Names the environment in assertion messages.
    pub(crate) fn with_name(mut self, name: &str) -> Self {
        self.test_name = name.to_owned();
        self
    }

    /// A paragraph style with the given text size and nothing else.
    pub(crate) fn style(size: f32) -> ParagraphStyle {
        ParagraphStyle {
            default_style: Style::new().with(StyleProperty::TextSize(size)),
            ..ParagraphStyle::default()
        }
    }

    /// A paragraph holding `text` in one run.
    pub(crate) fn paragraph(&self, text: &str, style: ParagraphStyle) -> Paragraph {
        let mut paragraph = Paragraph::new(style);
        if !text.is_empty() {
            paragraph.add_text_run(None, text).unwrap();
        }
        paragraph
    }

    pub(crate) fn layout(
        &self,
        paragraph: &mut Paragraph,
        width: f32,
        height: f32,
        width_mode: LayoutMode,
        height_mode: LayoutMode,
    ) -> (LayoutRegion, LayoutStatus) {
        let mut region = LayoutRegion::new(width, height, width_mode, height_mode);
        let status = self
            .context
            .layout(paragraph, &mut region, &LayoutOptions::default());
        (region, status)
    }

    /// Lays out into an `AtMost` region and returns the char range of each line.
    pub(crate) fn line_ranges(
        &self,
        paragraph: &mut Paragraph,
        width: f32,
        height: f32,
    ) -> Vec<Range<usize>> {
        let (region, _) = self.layout(paragraph, width, height, LayoutMode::AtMost, LayoutMode::AtMost);
        region.lines().iter().map(|line| line.char_range()).collect()
    }

    /// Lays out into an `AtMost` region for chained `expect_*` checks.
    pub(crate) fn check(&self, paragraph: &mut Paragraph, width: f32, height: f32) -> LayoutCheck<'_> {
        let (region, status) =
            self.layout(paragraph, width, height, LayoutMode::AtMost, LayoutMode::AtMost);
        LayoutCheck {
            name: &self.test_name,
            region,
            status,
        }
    }
}

/// A finished layout with assertions that name the test on failure.
pub(crate) struct LayoutCheck<'a> {
    name: &'a str,
    region: LayoutRegion,
    status: LayoutStatus,
}

impl LayoutCheck<'_> {
    pub(crate) fn expect_lines(self, expected: &[Range<usize>]) -> Self {
        let actual: Vec<_> = self.region.lines().iter().map(|line| line.char_range()).collect();
        assert_eq!(actual, expected, "{}: line ranges", self.name);
        self
    }

    pub(crate) fn expect_status(self, expected: LayoutStatus) -> Self {
        assert_eq!(self.status, expected, "{}: layout status", self.name);
        self
    }

    pub(crate) fn expect_line_widths(self, expected: &[f32]) -> Self {
        let actual: Vec<_> = self.region.lines().iter().map(|line| line.width()).collect();
        assert_eq!(actual.len(), expected.len(), "{}: line count", self.name);
        for (index, (a, b)) in actual.iter().zip(expected).enumerate() {
            assert!((a - b).abs() < 1e-4, "{}: width of line {index} is {a}, expected {b}", self.name);
        }
        self
    }

    /// Checks that no line starts with one of `chars`.
    pub(crate) fn expect_no_line_starting_with(self, text: &str, chars: &[char]) -> Self {
        let text: Vec<char> = text.chars().collect();
        for line in self.region.lines() {
            let start = line.char_range().start;
            if let Some(ch) = text.get(start) {
                assert!(!chars.contains(ch), "{}: line at {start} starts with {ch:?}", self.name);
            }
        }
        self
    }
}
