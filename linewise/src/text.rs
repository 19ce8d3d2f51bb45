// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Append-only paragraph text with a maintained character index.

use core::ops::Range;

use crate::error::TextError;

/// UTF-8 paragraph text with a char to byte offset map.
///
/// The map always has `char_count() + 1` entries; the last one is the
/// byte length of the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextContent {
    text: String,
    char_to_byte: Vec<usize>,
}

impl Default for TextContent {
    fn default() -> Self {
        Self::new()
    }
}

impl TextContent {
    /// Creates empty content.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            char_to_byte: vec![0],
        }
    }

    /// Appends UTF-8 bytes and returns the char range they occupy.
    pub fn append(&mut self, bytes: &[u8]) -> Result<Range<usize>, TextError> {
        if bytes.is_empty() {
            return Err(TextError::Empty);
        }
        let s = core::str::from_utf8(bytes).map_err(|e| TextError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        Ok(self.push_str(s))
    }

    pub(crate) fn push_str(&mut self, s: &str) -> Range<usize> {
        let start = self.char_count();
        let base = self.text.len();
        self.char_to_byte.pop();
        self.char_to_byte
            .extend(s.char_indices().map(|(offset, _)| base + offset));
        self.text.push_str(s);
        self.char_to_byte.push(self.text.len());
        start..self.char_count()
    }

    /// Number of Unicode scalar values.
    pub fn char_count(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    /// Returns true if no text has been appended.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The whole text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the character at `index`.
    pub fn char_at(&self, index: usize) -> Option<char> {
        let start = *self.char_to_byte.get(index)?;
        self.text[start..].chars().next()
    }

    /// Byte offset of the char at `index`, or the text length at the end.
    pub fn byte_offset(&self, index: usize) -> usize {
        self.char_to_byte[index.min(self.char_count())]
    }

    /// Index of the char containing `byte`.
    pub fn char_offset(&self, byte: usize) -> usize {
        match self.char_to_byte.binary_search(&byte) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }

    /// Returns the text of a char range.
    pub fn substring(&self, range: Range<usize>) -> &str {
        let end = range.end.min(self.char_count());
        let start = range.start.min(end);
        &self.text[self.char_to_byte[start]..self.char_to_byte[end]]
    }

    /// Decodes a char range.
    pub fn chars(&self, range: Range<usize>) -> Vec<char> {
        self.substring(range).chars().collect()
    }
}
