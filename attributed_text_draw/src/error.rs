// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

/// A failure to create a native rendering resource.
///
/// These are reported by [`NativeCanvas`](crate::NativeCanvas) implementations and by
/// [`Image::new`](crate::Image::new). The [`RenderContext`](crate::RenderContext) logs them and
/// skips the drawing primitive that needed the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    detail: &'static str,
}

impl Error {
    /// Create an error of the given kind with a short static description.
    pub fn new(kind: ErrorKind, detail: &'static str) -> Self {
        Self { kind, detail }
    }

    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A short human-readable description supplied by whoever raised the error.
    pub fn detail(&self) -> &'static str {
        self.detail
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ErrorKind::FontUnavailable => "font unavailable",
            ErrorKind::ImageCreation => "failed to create native image",
            ErrorKind::GradientCreation => "failed to create native gradient",
            ErrorKind::InvalidImageData => "invalid image data",
        };
        if self.detail.is_empty() {
            f.write_str(what)
        } else {
            write!(f, "{what}: {}", self.detail)
        }
    }
}

impl std::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No native font handle could be created for a font descriptor.
    FontUnavailable,
    /// A native image could not be created from pixel data.
    ImageCreation,
    /// A native gradient could not be created.
    GradientCreation,
    /// Pixel data doesn't match the declared dimensions and format.
    InvalidImageData,
}
