// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::{AttributedString, Font};

use crate::kurbo::{Affine, BezPath, Line, Point, Rect};
use crate::peniko::ImageQuality;
use crate::{Fill, Image, IntRect, RectList};

/// The operations a rendering backend offers to text layout and drawing code.
///
/// A surface has a current transform, clip region, fill and font, all of which are saved by
/// [`save_state`](Self::save_state) and brought back by the matching
/// [`restore_state`](Self::restore_state). Every `save_state` must be paired with exactly one
/// `restore_state`, and transparency layers must be nested inside the same pairing.
///
/// Coordinates are in user space: the device space mapped through the current transform.
pub trait DrawingSurface {
    /// Whether the surface records vector output rather than pixels.
    fn is_vector_device(&self) -> bool {
        false
    }

    /// Move the origin of the user space by `origin`.
    fn set_origin(&mut self, origin: Point);

    /// Apply `transform` before the current transform.
    fn add_transform(&mut self, transform: Affine);

    /// The number of device pixels per user space unit.
    fn physical_pixel_scale(&self) -> f32;

    /// Intersect the clip region with `rect`. Returns `false` if the clip region is now empty.
    fn clip_to_rectangle(&mut self, rect: IntRect) -> bool;

    /// Intersect the clip region with a region. Returns `false` if the clip region is now empty.
    ///
    /// An empty list clips everything away.
    fn clip_to_rectangle_list(&mut self, rects: &RectList) -> bool;

    /// Remove `rect` from the clip region.
    fn exclude_clip_rectangle(&mut self, rect: IntRect);

    /// Intersect the clip region with the interior of `path` placed by `transform`.
    fn clip_to_path(&mut self, path: &BezPath, transform: Affine);

    /// Intersect the clip region with the alpha channel of `image` placed by `transform`.
    fn clip_to_image_alpha(&mut self, image: &Image, transform: Affine);

    /// Whether any part of `rect` is inside the clip region.
    fn clip_region_intersects(&self, rect: IntRect) -> bool;

    /// The bounding box of the clip region, in user space.
    fn clip_bounds(&self) -> IntRect;

    /// Whether the clip region is empty, which makes every draw a no-op.
    fn is_clip_empty(&self) -> bool;

    /// Push the current transform, clip region, fill and font.
    fn save_state(&mut self);

    /// Pop the state pushed by the matching [`save_state`](Self::save_state).
    fn restore_state(&mut self);

    /// Start accumulating drawing into a layer that is composited at `opacity` when it ends.
    fn begin_transparency_layer(&mut self, opacity: f32);

    /// Composite the innermost transparency layer onto the state below it.
    fn end_transparency_layer(&mut self);

    /// Replace the current fill.
    fn set_fill(&mut self, fill: Fill);

    /// Change the opacity of the current fill.
    fn set_opacity(&mut self, opacity: f32);

    /// Set the resampling quality used when drawing transformed images.
    fn set_interpolation_quality(&mut self, quality: ImageQuality);

    /// Fill the whole clip region.
    fn fill_all(&mut self);

    /// Fill an integer rectangle.
    ///
    /// With `replace_existing_contents`, the pixels are overwritten instead of blended, which is
    /// meant for clearing backgrounds.
    fn fill_int_rect(&mut self, rect: IntRect, replace_existing_contents: bool);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect);

    /// Fill several rectangles.
    fn fill_rect_list(&mut self, rects: &[Rect]);

    /// Fill the interior of `path` placed by `transform`.
    fn fill_path(&mut self, path: &BezPath, transform: Affine);

    /// Draw `image` placed by `transform`.
    fn draw_image(&mut self, image: &Image, transform: Affine);

    /// Draw a one unit wide line.
    fn draw_line(&mut self, line: Line);

    /// Set the font used by [`draw_glyph`](Self::draw_glyph).
    fn set_font(&mut self, font: &Font);

    /// The current font.
    fn font(&self) -> &Font;

    /// Draw one glyph of the current font with its origin placed by `transform`.
    fn draw_glyph(&mut self, glyph_id: u32, transform: Affine);

    /// Let the surface lay out and draw `text` inside `area` itself.
    ///
    /// Returns `false` if the surface can't, in which case the caller lays the text out and
    /// draws it glyph by glyph.
    fn draw_text_layout(&mut self, text: &AttributedString, area: Rect) -> bool {
        let _ = (text, area);
        false
    }
}
