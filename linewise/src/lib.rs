// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text paragraph layout.
//!
//! Text and inline objects are added to a [`Paragraph`] as runs with sparse
//! [`Style`]s. A [`LayoutContext`] formats the paragraph (segmentation, bidi,
//! shaping with font fallback) and breaks it into [`TextLine`]s inside a
//! [`LayoutRegion`]. The lines can then be queried for hit testing or handed to
//! a [`CanvasSink`] for drawing.
//!
//! ```no_run
//! use linewise::{
//!     FontCollection, FontStore, LayoutContext, LayoutMode, LayoutOptions, LayoutRegion,
//!     Paragraph, ParagraphStyle,
//! };
//! use std::sync::Arc;
//!
//! let mut store = FontStore::new();
//! store.add_font_data(std::fs::read("Roboto-Regular.ttf").unwrap(), 0).unwrap();
//! let context = LayoutContext::new(FontCollection::with_manager(Arc::new(store)));
//!
//! let mut paragraph = Paragraph::new(ParagraphStyle::default());
//! paragraph.add_text_run(None, "Hello world!").unwrap();
//!
//! let mut region = LayoutRegion::new(200.0, 100.0, LayoutMode::Definite, LayoutMode::AtMost);
//! context.layout(&mut paragraph, &mut region, &LayoutOptions::default());
//! for line in region.lines() {
//!     println!("{:?} at {}", line.char_range(), line.baseline());
//! }
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod lru_cache;
mod util;

pub mod analysis;
pub mod context;
pub mod cursor;
pub mod error;
pub mod font;
pub mod layout;
pub mod paint;
pub mod paragraph;
pub mod run;
pub mod shape;
pub mod style;
pub mod text;

pub use peniko::{Color, kurbo};

pub use analysis::{BoundaryTable, BoundaryType};
pub use context::LayoutContext;
pub use cursor::LayoutPosition;
pub use error::{FontDataError, TextError};
pub use font::{FontCollection, FontManager, FontStore, OpenTypeFace, Typeface, TypefaceProvider};
pub use layout::{LayoutMode, LayoutOptions, LayoutRegion, LayoutStatus, LinePiece, TextLine};
pub use paint::{CanvasSink, draw_region};
pub use paragraph::Paragraph;
pub use run::{Run, RunDelegate, RunKind};
pub use style::{Alignment, ParagraphStyle, Style, StyleProperty};

#[cfg(test)]
mod tests;
