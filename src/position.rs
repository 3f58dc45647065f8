//! Byte positions and lengths over a UTF-8 buffer.
//!
//! Generators do all of their bookkeeping in bytes. Line/column coordinates
//! only exist for human-readable output and are computed on demand through
//! [`LineIndex`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A byte offset into a UTF-8 buffer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(usize);

/// A byte length. `Position + Length = Position`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Length(usize);

impl Position {
    pub const START: Position = Position(0);

    pub const fn new(offset: usize) -> Self {
        Self(offset)
    }

    pub const fn offset(self) -> usize {
        self.0
    }
}

impl Length {
    pub const ZERO: Length = Length(0);

    pub const fn new(bytes: usize) -> Self {
        Self(bytes)
    }

    pub fn of(text: &str) -> Self {
        Self(text.len())
    }

    pub const fn bytes(self) -> usize {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add<Length> for Position {
    type Output = Position;

    fn add(self, rhs: Length) -> Position {
        Position(self.0 + rhs.0)
    }
}

impl AddAssign<Length> for Position {
    fn add_assign(&mut self, rhs: Length) {
        self.0 += rhs.0;
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        self.0 += rhs.0;
    }
}

/// Distance between two positions. Panics if `rhs` lies after `self`.
impl Sub for Position {
    type Output = Length;

    fn sub(self, rhs: Position) -> Length {
        Length(
            self.0
                .checked_sub(rhs.0)
                .unwrap_or_else(|| panic!("position {} precedes {}", self.0, rhs.0)),
        )
    }
}

impl std::iter::Sum for Length {
    fn sum<I: Iterator<Item = Length>>(iter: I) -> Self {
        iter.fold(Length::ZERO, Add::add)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based line and column (column counted in bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of one text snapshot to line/column pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Offsets past the end of the text clamp to the final position.
    pub fn line_col(&self, position: Position) -> LineCol {
        let offset = position.offset().min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineCol {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}
