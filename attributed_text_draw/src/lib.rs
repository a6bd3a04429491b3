// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed Text Draw renders [`AttributedString`]s through an abstract drawing surface.
//!
//! The pieces fit together like this:
//!
//! - [`DrawingSurface`] is what text drawing code talks to: transforms, clip regions, saved
//!   states, transparency layers, fills, images, fonts and glyphs.
//! - [`RenderContext`] implements [`DrawingSurface`] on top of a [`NativeCanvas`], the
//!   immediate-mode graphics context of a platform. It keeps the state the canvas doesn't
//!   have and owns the native font, image and gradient handles it creates.
//! - [`RecordingCanvas`] is a [`NativeCanvas`] that records what it is asked to do, for tests
//!   and headless use.
//! - [`TextLayout`] breaks an [`AttributedString`] into lines of positioned glyphs using a
//!   [`TextShaper`], and draws them glyph by glyph. [`draw`] uses it whenever a surface can't
//!   lay the text out itself.
//!
//! ```
//! use attributed_text::AttributedString;
//! use attributed_text_draw::kurbo::Rect;
//! use attributed_text_draw::{FixedAdvanceShaper, RecordingCanvas, RenderContext, draw};
//!
//! let text = AttributedString::from("Hello world");
//! let mut context = RenderContext::new(RecordingCanvas::new(200, 50));
//! draw(
//!     &mut context,
//!     &mut FixedAdvanceShaper::default(),
//!     &text,
//!     Rect::new(0.0, 0.0, 200.0, 50.0),
//! );
//!
//! let canvas = context.finish();
//! assert_eq!(canvas.draw_commands().count(), 11);
//! assert_eq!(canvas.live_handles().total(), 0);
//! ```
//!
//! Resource failures reported by a canvas are logged with the [`log`] crate and the affected
//! primitive draws nothing; drawing itself never fails.
//!
//! [`AttributedString`]: attributed_text::AttributedString

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

pub use peniko;
pub use peniko::color;
pub use peniko::kurbo;
pub use peniko::Color;

mod cache;
mod canvas;
mod context;
mod draw;
mod error;
mod fill;
mod geometry;
mod image;
mod layout;
mod math;
mod recording;
mod shaper;
mod surface;

#[cfg(test)]
mod tests;

pub use canvas::NativeCanvas;
pub use context::{RenderConfig, RenderContext};
pub use draw::draw;
pub use error::{Error, ErrorKind};
pub use fill::{Fill, FillKind, GradientFill, GradientStop};
pub use geometry::{IntRect, RectList};
pub use image::{ColorSpace, Image, ImageFormat, ImageId};
pub use layout::{GlyphRun, LayoutLine, PositionedGlyph, TextLayout};
pub use recording::{
    CanvasCommand, LiveHandles, RecordedFont, RecordedGradient, RecordedImage, RecordingCanvas,
    RecordingCanvasConfig,
};
pub use shaper::{FixedAdvanceShaper, FontMetrics, ShapedGlyph, TextShaper};
pub use surface::DrawingSurface;
