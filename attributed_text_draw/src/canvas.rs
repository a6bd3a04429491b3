// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::{AttributedString, Font};

use crate::kurbo::{Affine, BezPath, Line, Point, Rect};
use crate::peniko::{Compose, ImageQuality};
use crate::{Color, ColorSpace, Error, GradientFill, Image};

/// The platform drawing primitive a [`RenderContext`](crate::RenderContext) drives.
///
/// This mirrors the immediate-mode graphics contexts of native 2D APIs: a graphics state with a
/// current transform (CTM), clip, fill color, alpha, compositing mode and interpolation quality,
/// saved and restored as a stack, plus drawing calls that use that state.
///
/// Native resources are represented by the associated handle types. A handle is released when
/// it is dropped; the context keeps them alive for as long as a saved state or a cache refers to
/// them.
///
/// Geometry passed to the canvas is in the current user space, i.e. it is mapped through the
/// CTM. Unless stated otherwise, calls record or draw exactly what they are given; the context
/// has already discarded empty geometry.
pub trait NativeCanvas {
    /// A native font handle.
    type Font;
    /// A native image handle.
    type Image;
    /// A native gradient handle.
    type Gradient;

    /// Push the graphics state.
    fn save(&mut self);

    /// Pop the graphics state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Apply `transform` before the current transform.
    fn concat_transform(&mut self, transform: Affine);

    /// The current transform from user space to device space.
    fn transform(&self) -> Affine;

    /// Intersect the clip with a rectangle.
    fn clip_to_rect(&mut self, rect: Rect);

    /// Intersect the clip with the union of `rects`. An empty slice clips everything away.
    fn clip_to_rects(&mut self, rects: &[Rect]);

    /// Intersect the clip with the interior of `path`.
    fn clip_to_path(&mut self, path: &BezPath);

    /// Intersect the clip with a single-channel mask stretched over `rect`.
    fn clip_to_mask(&mut self, rect: Rect, mask: &Self::Image);

    /// The bounding box of the clip in user space; zero-area when everything is clipped away.
    fn clip_bounding_box(&self) -> Rect;

    /// Set the color used by fills, strokes and glyphs.
    fn set_fill_color(&mut self, color: Color);

    /// Set the global alpha applied to everything drawn.
    fn set_alpha(&mut self, alpha: f32);

    /// Set how drawn pixels combine with the existing ones.
    fn set_compose(&mut self, compose: Compose);

    /// Set the resampling quality for transformed images.
    fn set_interpolation_quality(&mut self, quality: ImageQuality);

    /// Fill a rectangle with the fill color.
    fn fill_rect(&mut self, rect: Rect);

    /// Fill several rectangles with the fill color.
    fn fill_rects(&mut self, rects: &[Rect]);

    /// Fill a path with the fill color (non-zero winding).
    fn fill_path(&mut self, path: &BezPath);

    /// Stroke a line with the fill color and square caps.
    fn stroke_line(&mut self, line: Line, width: f64);

    /// Start a transparency layer, composited with the current alpha when it ends.
    fn begin_transparency_layer(&mut self);

    /// End the innermost transparency layer.
    fn end_transparency_layer(&mut self);

    /// Draw `image` stretched over `rect`.
    fn draw_image(&mut self, rect: Rect, image: &Self::Image);

    /// Cover the clip with copies of `image`, one of which is stretched over `tile`.
    fn draw_tiled_image(&mut self, tile: Rect, image: &Self::Image);

    /// Cover the clip with a gradient, extending its end colors past `start` and `end`.
    fn draw_gradient(&mut self, gradient: &Self::Gradient, start: Point, end: Point, radial: bool);

    /// Draw one glyph.
    ///
    /// `text_transform` maps the glyph's em space into user space, and `position` is the
    /// glyph origin in text space, so the glyph origin lands at `text_transform * position`.
    fn show_glyph(
        &mut self,
        font: &Self::Font,
        text_transform: Affine,
        glyph_id: u32,
        position: Point,
    );

    /// The outline of a glyph in em units, with y pointing down.
    fn glyph_outline(&mut self, font: &Self::Font, glyph_id: u32) -> Option<BezPath>;

    /// Create a native font for a font descriptor.
    fn create_font(&mut self, font: &Font) -> Result<Self::Font, Error>;

    /// Create a native copy of `image` in the color space `space`.
    fn create_image(&mut self, image: &Image, space: ColorSpace) -> Result<Self::Image, Error>;

    /// Create a native gradient with the stops of `gradient`.
    fn create_gradient(&mut self, gradient: &GradientFill) -> Result<Self::Gradient, Error>;

    /// Lay out and draw `text` inside `area` with the platform's own text engine.
    ///
    /// Returns `false` if the canvas has no text engine.
    fn draw_text_layout(&mut self, text: &AttributedString, area: Rect) -> bool {
        let _ = (text, area);
        false
    }
}
