// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context for layout.

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::analysis::{BidiBackend, RuleBasedSegmenter, SegmentationBackend, UnicodeBidi};
use crate::font::FontCollection;
use crate::layout::{self, LayoutOptions, LayoutRegion, LayoutStatus};
use crate::paragraph::Paragraph;
use crate::shape::{FallbackCache, ShapeCache, Shaper, ShapingBackend};

/// Everything a layout pass needs besides the paragraph and the region.
///
/// The shape and fallback caches are shared through `Arc`, so several
/// contexts, possibly on different threads, can reuse each other's work.
#[derive(Debug)]
pub struct LayoutContext {
    shaper: Shaper,
    segmenter: Box<dyn SegmentationBackend>,
    bidi: Box<dyn BidiBackend>,
}

impl LayoutContext {
    /// Creates a context over `fonts` with `harfrust` shaping, rule based
    /// segmentation and fresh caches.
    pub fn new(fonts: FontCollection) -> Self {
        Self {
            shaper: Shaper::new(fonts),
            segmenter: Box::new(RuleBasedSegmenter::new()),
            bidi: Box::new(UnicodeBidi),
        }
    }

    /// Replaces the shaping backend.
    #[must_use]
    pub fn with_shaping_backend(mut self, backend: Arc<dyn ShapingBackend>) -> Self {
        self.shaper = self.shaper.with_backend(backend);
        self
    }

    /// Uses a shared shape cache.
    #[must_use]
    pub fn with_shape_cache(mut self, cache: Arc<ShapeCache>) -> Self {
        self.shaper = self.shaper.with_shape_cache(cache);
        self
    }

    /// Uses a shared fallback cache.
    #[must_use]
    pub fn with_fallback_cache(mut self, cache: Arc<FallbackCache>) -> Self {
        self.shaper = self.shaper.with_fallback_cache(cache);
        self
    }

    /// Replaces the segmentation backend.
    #[must_use]
    pub fn with_segmenter(mut self, segmenter: impl SegmentationBackend + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Replaces the bidi backend.
    #[must_use]
    pub fn with_bidi(mut self, bidi: impl BidiBackend + 'static) -> Self {
        self.bidi = Box::new(bidi);
        self
    }

    /// The shaper.
    pub fn shaper(&self) -> &Shaper {
        &self.shaper
    }

    /// The segmentation backend.
    pub fn segmenter(&self) -> &dyn SegmentationBackend {
        &*self.segmenter
    }

    /// The bidi backend.
    pub fn bidi(&self) -> &dyn BidiBackend {
        &*self.bidi
    }

    /// Formats `paragraph` if needed and lays it out into `region`, after any
    /// lines the region already holds.
    pub fn layout(
        &self,
        paragraph: &mut Paragraph,
        region: &mut LayoutRegion,
        options: &LayoutOptions,
    ) -> LayoutStatus {
        paragraph.format_run_list(self);
        layout::layout_paragraph(self, paragraph, region, options)
    }
}
