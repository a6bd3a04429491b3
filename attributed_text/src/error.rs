// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Range;

/// Error returned when a caller-provided byte range can't be used against a text.
///
/// Carries a non-exhaustive [`ErrorKind`], the rejected range, and the text length at the time
/// of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    range: Range<usize>,
    len: usize,
    endpoint: Option<Endpoint>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports source text length context; an `is_empty` method would be misleading and unused."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The range that was rejected.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The length in bytes of the text the range was checked against.
    pub fn len(&self) -> usize {
        self.len
    }

    /// For [`ErrorKind::NotOnCharBoundary`], which end of the range was misaligned.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.endpoint
    }

    pub(crate) fn invalid_range(range: Range<usize>, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRange,
            range,
            len,
            endpoint: None,
        }
    }

    pub(crate) fn invalid_bounds(range: Range<usize>, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidBounds,
            range,
            len,
            endpoint: None,
        }
    }

    pub(crate) fn not_on_char_boundary(range: Range<usize>, len: usize, which: Endpoint) -> Self {
        Self {
            kind: ErrorKind::NotOnCharBoundary,
            range,
            len,
            endpoint: Some(which),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Range { start, end } = self.range;
        match self.kind {
            ErrorKind::InvalidRange => write!(f, "invalid range {start}..{end}: start > end"),
            ErrorKind::InvalidBounds => {
                write!(f, "range {start}..{end} out of bounds for len {}", self.len)
            }
            ErrorKind::NotOnCharBoundary => {
                let (which, index) = match self.endpoint {
                    Some(Endpoint::End) => ("end", end),
                    _ => ("start", start),
                };
                write!(
                    f,
                    "range {start}..{end}: {which} index {index} not on UTF-8 boundary"
                )
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The provided range had `start > end`.
    InvalidRange,

    /// Provided range indices were out of bounds relative to the text length.
    InvalidBounds,

    /// Either `start` or `end` was not aligned to a UTF-8 character boundary.
    NotOnCharBoundary,
}

/// Identifies which endpoint of a range failed boundary validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` endpoint of the range.
    Start,

    /// The `end` endpoint of the range.
    End,
}
