// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run relative addressing of paragraph content.

/// A position in a paragraph expressed as a run index and a char offset into
/// that run.
///
/// Positions order by run first, then by char. `char == run.char_count()`
/// addresses the end of a run, which is the same text position as the start
/// of the next run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayoutPosition {
    /// Index of the run.
    pub run: usize,
    /// Char offset inside the run.
    pub char: usize,
}

impl LayoutPosition {
    /// Creates a position.
    pub fn new(run: usize, char: usize) -> Self {
        Self { run, char }
    }

    /// Moves to the start of the run `count` runs later.
    #[must_use]
    pub fn next_run(self, count: usize) -> Self {
        Self {
            run: self.run.saturating_add(count),
            char: 0,
        }
    }

    /// Moves to the start of the run `count` runs earlier. Stays put if there
    /// are not that many runs before this one.
    #[must_use]
    pub fn prev_run(self, count: usize) -> Self {
        match self.run.checked_sub(count) {
            Some(run) => Self { run, char: 0 },
            None => self,
        }
    }

    /// Advances by `count` chars inside the run.
    #[must_use]
    pub fn next_char(self, count: usize) -> Self {
        Self {
            run: self.run,
            char: self.char + count,
        }
    }

    /// Returns true if the position is past the last of `run_count` runs.
    pub fn is_end(&self, run_count: usize) -> bool {
        self.run >= run_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_run_then_char() {
        assert!(LayoutPosition::new(0, 5) < LayoutPosition::new(1, 0));
        assert!(LayoutPosition::new(1, 1) > LayoutPosition::new(1, 0));
        assert_eq!(LayoutPosition::new(2, 3).next_run(1), LayoutPosition::new(3, 0));
        assert_eq!(LayoutPosition::new(2, 3).prev_run(1), LayoutPosition::new(1, 0));
        assert_eq!(LayoutPosition::new(0, 3).prev_run(1), LayoutPosition::new(0, 3));
        assert_eq!(LayoutPosition::new(0, 3).next_char(2), LayoutPosition::new(0, 5));
        assert!(LayoutPosition::new(4, 0).is_end(4));
        assert!(!LayoutPosition::new(3, 9).is_end(4));
    }
}
