// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::{Endpoint, Error};

/// A byte range that has been validated against a UTF-8 text.
///
/// Holds these invariants for the text it was created from:
///
/// - `start <= end`
/// - `end <= text.len()`
/// - both ends lie on UTF-8 character boundaries
///
/// The attribute setters on [`AttributedString`](crate::AttributedString) clamp their ranges
/// instead of failing, so a `TextRange` is only needed where a range must be exact, such as
/// substring extraction with [`AttributedString::slice`](crate::AttributedString::slice).
///
/// A `TextRange` does not remember which text it was validated against; reusing it with other
/// text is a logic error.
///
/// ```
/// use attributed_text::TextRange;
///
/// let range = TextRange::new("éclair", 2..7).unwrap();
/// assert_eq!(range.as_range(), 2..7);
/// assert!(TextRange::new("éclair", 1..7).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Validate `range` against `text`.
    pub fn new(text: &str, range: Range<usize>) -> Result<Self, Error> {
        let len = text.len();
        if range.start > range.end {
            return Err(Error::invalid_range(range, len));
        }
        if range.end > len {
            return Err(Error::invalid_bounds(range, len));
        }
        if !text.is_char_boundary(range.start) {
            return Err(Error::not_on_char_boundary(range, len, Endpoint::Start));
        }
        if !text.is_char_boundary(range.end) {
            return Err(Error::not_on_char_boundary(range, len, Endpoint::End));
        }
        Ok(Self {
            start: range.start,
            end: range.end,
        })
    }

    /// The start byte offset.
    #[must_use]
    #[inline]
    pub const fn start(self) -> usize {
        self.start
    }

    /// The end byte offset (exclusive).
    #[must_use]
    #[inline]
    pub const fn end(self) -> usize {
        self.end
    }

    /// Returns `true` if the range covers no bytes.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns this range as a `Range<usize>`.
    #[must_use]
    #[inline]
    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<TextRange> for Range<usize> {
    #[inline]
    fn from(value: TextRange) -> Self {
        value.as_range()
    }
}
