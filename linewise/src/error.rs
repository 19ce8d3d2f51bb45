// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

/// Rejected text input.
///
/// Paragraph operations that return this error leave the paragraph unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextError {
    /// The input contained no bytes.
    #[error("text run is empty")]
    Empty,
    /// The input was not valid UTF-8.
    #[error("text run is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the longest valid prefix.
        valid_up_to: usize,
    },
}

/// Font bytes could not be read as an OpenType font.
#[derive(Debug, Error)]
#[error("failed to read font data: {0}")]
pub struct FontDataError(#[from] pub skrifa::raw::ReadError);
