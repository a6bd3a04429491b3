// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed Text is a string with typographic attributes applied to ranges of it.
//!
//! An [`AttributedString`] owns its text and an ordered list of [`Attribute`]s. Each attribute
//! carries a [`Font`], a fill color, an outline color and width, an underline flag and a
//! [`Ligatures`] mode for one contiguous byte range. The attributes always form a partition of
//! the attributed text:
//!
//! - every byte offset belongs to exactly one attribute;
//! - `attributes[i].range.end == attributes[i + 1].range.start`;
//! - the first attribute starts at `0`.
//!
//! Alongside the ranged attributes, an [`AttributedString`] carries a [`ParagraphStyle`]
//! (justification, word wrapping, reading direction and spacing) that applies to the whole text.
//!
//! ```
//! use attributed_text::AttributedString;
//! use peniko::color::palette::css;
//!
//! let mut text = AttributedString::from("Hello world");
//! text.set_color(6..11, css::RED);
//!
//! let ranges: Vec<_> = text.attributes().iter().map(|a| a.range.clone()).collect();
//! assert_eq!(ranges, [0..6, 6..11]);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Get floating point functions from the standard library.
//! - `libm`: Use floating point implementations from [libm].
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//!
//! [libm]: https://crates.io/crates/libm
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
#![no_std]

extern crate alloc;

mod attribute;
mod attributed_string;
mod error;
mod font;
mod paragraph;
mod text_range;

pub use peniko::Color;

pub use crate::attribute::{Attribute, Ligatures};
pub use crate::attributed_string::AttributedString;
pub use crate::error::{Endpoint, Error, ErrorKind};
pub use crate::font::{Font, FontStyle, FontWeight};
pub use crate::paragraph::{
    HorizontalAlign, Justification, ParagraphStyle, ReadingDirection, VerticalAlign, WordWrap,
};
pub use crate::text_range::TextRange;
