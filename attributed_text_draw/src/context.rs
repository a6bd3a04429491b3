// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`DrawingSurface`] backed by a [`NativeCanvas`].

#![allow(
    clippy::cast_possible_truncation,
    reason = "the surface API uses f32 scales and i32 pixel coordinates"
)]

use core::cell::Cell;
use core::fmt;
use std::rc::Rc;

use attributed_text::{AttributedString, Font};
use smallvec::SmallVec;

use crate::cache::{FontKey, FontLookupKey, ResourceCache};
use crate::kurbo::{self, Affine, BezPath, Cap, Line, Point, Rect, Shape, Stroke, StrokeOpts};
use crate::math::{is_singular, is_translation_only};
use crate::peniko::{Compose, ImageQuality};
use crate::{
    ColorSpace, DrawingSurface, Fill, FillKind, Image, ImageId, IntRect, NativeCanvas, RectList,
};

/// Tolerance used when flattening stroked lines.
const STROKE_TOLERANCE: f64 = 0.1;

/// Configuration for a [`RenderContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// The maximum number of native images kept alive between draws.
    ///
    /// With `0`, native images are created for every draw and released right after.
    pub image_cache_capacity: usize,
    /// The maximum number of native fonts kept alive between `set_font` calls.
    pub font_cache_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_cache_capacity: 64,
            font_cache_capacity: 16,
        }
    }
}

/// The part of the context state that `save_state` snapshots.
struct SavedState<C: NativeCanvas> {
    fill: Fill,
    font: Font,
    font_handle: Option<Rc<C::Font>>,
    text_transform: Affine,
    inverse_text_transform: Affine,
    gradient: Option<Rc<C::Gradient>>,
}

impl<C: NativeCanvas> Clone for SavedState<C> {
    fn clone(&self) -> Self {
        Self {
            fill: self.fill.clone(),
            font: self.font.clone(),
            font_handle: self.font_handle.clone(),
            text_transform: self.text_transform,
            inverse_text_transform: self.inverse_text_transform,
            gradient: self.gradient.clone(),
        }
    }
}

impl<C: NativeCanvas> Default for SavedState<C> {
    fn default() -> Self {
        Self {
            fill: Fill::default(),
            font: Font::default(),
            font_handle: None,
            text_transform: Affine::IDENTITY,
            inverse_text_transform: Affine::IDENTITY,
            gradient: None,
        }
    }
}

/// A drawing session on a native canvas.
///
/// The context keeps the state the canvas can't: the current [`Fill`] and [`Font`] with their
/// native handles, a stack of saved copies of them, a cached clip rectangle and caches of
/// native fonts and images. Dropping the context (or calling [`finish`](Self::finish))
/// releases every native handle it holds.
pub struct RenderContext<C: NativeCanvas> {
    canvas: C,
    state: SavedState<C>,
    state_stack: Vec<SavedState<C>>,
    last_clip: Cell<Option<IntRect>>,
    fonts: ResourceCache<FontKey, C::Font>,
    images: ResourceCache<(ImageId, ColorSpace), C::Image>,
}

impl<C: NativeCanvas> RenderContext<C> {
    /// Start a session on `canvas` with the default configuration.
    pub fn new(canvas: C) -> Self {
        Self::with_config(canvas, RenderConfig::default())
    }

    /// Start a session on `canvas`.
    pub fn with_config(mut canvas: C, config: RenderConfig) -> Self {
        let state = SavedState::default();
        if let Some(color) = state.fill.solid_color() {
            canvas.set_fill_color(color);
        }
        Self {
            canvas,
            state,
            state_stack: Vec::new(),
            last_clip: Cell::new(None),
            fonts: ResourceCache::new(config.font_cache_capacity),
            images: ResourceCache::new(config.image_cache_capacity),
        }
    }

    /// The canvas being drawn on.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The current fill.
    pub fn fill(&self) -> &Fill {
        &self.state.fill
    }

    /// The current transform from user space to device space.
    pub fn transform(&self) -> Affine {
        self.canvas.transform()
    }

    /// The number of states saved and not yet restored.
    pub fn state_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// The number of native images currently cached.
    pub fn cached_image_count(&self) -> usize {
        self.images.len()
    }

    /// End the session, releasing every native handle, and give the canvas back.
    pub fn finish(self) -> C {
        if !self.state_stack.is_empty() {
            log::warn!(
                "finishing a render context with {} unrestored states",
                self.state_stack.len()
            );
        }
        log::debug!(
            "render context finished: images {} hits / {} misses, fonts {} hits / {} misses",
            self.images.hits(),
            self.images.misses(),
            self.fonts.hits(),
            self.fonts.misses()
        );
        self.canvas
    }

    fn clip_to_rects_unchecked(&mut self, rects: &RectList) {
        let rects: SmallVec<[Rect; 4]> = rects.rects().iter().map(IntRect::to_rect).collect();
        self.canvas.clip_to_rects(&rects);
        self.last_clip.set(None);
    }

    fn clip_to_nothing(&mut self) {
        self.canvas.clip_to_rect(Rect::ZERO);
        self.last_clip.set(Some(IntRect::default()));
    }

    fn native_image(&mut self, image: &Image, color_space: ColorSpace) -> Option<Rc<C::Image>> {
        let canvas = &mut self.canvas;
        let result = self
            .images
            .get_or_try_insert_with(&(image.id(), color_space), || {
                log::debug!(
                    "creating native image {} ({}x{}, {color_space:?})",
                    image.id().as_u64(),
                    image.width(),
                    image.height()
                );
                if color_space == ColorSpace::Grey {
                    canvas.create_image(&image.to_single_channel(), color_space)
                } else {
                    canvas.create_image(image, color_space)
                }
            });
        match result {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("skipping image {}: {err}", image.id().as_u64());
                None
            }
        }
    }

    /// Paint the current non-solid fill over the whole native clip.
    fn paint_clip_with_fill(&mut self) {
        match &self.state.fill.kind {
            FillKind::Solid(_) => {
                let bounds = self.canvas.clip_bounding_box();
                self.canvas.fill_rect(bounds);
            }
            FillKind::Gradient(gradient) => {
                let Some(handle) = &self.state.gradient else {
                    return;
                };
                self.canvas.set_alpha(self.state.fill.opacity);
                self.canvas
                    .draw_gradient(handle, gradient.start, gradient.end, gradient.radial);
            }
            FillKind::Image { image, transform } => {
                let (image, transform) = (image.clone(), *transform);
                if is_singular(transform) {
                    return;
                }
                let Some(handle) = self.native_image(&image, image.color_space()) else {
                    return;
                };
                self.canvas.set_alpha(self.state.fill.opacity);
                self.canvas.concat_transform(transform);
                self.canvas.draw_tiled_image(image.bounds(), &handle);
            }
        }
    }

    /// Fill `path` (in user space) with the current fill.
    fn fill_native_path(&mut self, path: &BezPath) {
        if matches!(self.state.fill.kind, FillKind::Solid(_)) {
            self.canvas.fill_path(path);
        } else {
            self.canvas.save();
            self.canvas.clip_to_path(path);
            self.paint_clip_with_fill();
            self.canvas.restore();
        }
    }
}

impl<C: NativeCanvas> fmt::Debug for RenderContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("fill", &self.state.fill)
            .field("font", &self.state.font)
            .field("state_depth", &self.state_stack.len())
            .field("last_clip", &self.last_clip.get())
            .field("cached_fonts", &self.fonts.len())
            .field("cached_images", &self.images.len())
            .finish_non_exhaustive()
    }
}

impl<C: NativeCanvas> DrawingSurface for RenderContext<C> {
    fn set_origin(&mut self, origin: Point) {
        self.canvas
            .concat_transform(Affine::translate(origin.to_vec2()));
        let integral = origin.x.fract() == 0.0 && origin.y.fract() == 0.0;
        match self.last_clip.get() {
            Some(clip) if integral => self
                .last_clip
                .set(Some(clip.translated(-origin.x as i32, -origin.y as i32))),
            _ => self.last_clip.set(None),
        }
    }

    fn add_transform(&mut self, transform: Affine) {
        self.canvas.concat_transform(transform);
        self.last_clip.set(None);
    }

    fn physical_pixel_scale(&self) -> f32 {
        let [_, _, c, d, _, _] = self.canvas.transform().as_coeffs();
        c.hypot(d) as f32
    }

    fn clip_to_rectangle(&mut self, rect: IntRect) -> bool {
        self.canvas.clip_to_rect(rect.to_rect());
        if let Some(clip) = self.last_clip.get() {
            self.last_clip.set(Some(clip.intersection(rect)));
        }
        !self.is_clip_empty()
    }

    fn clip_to_rectangle_list(&mut self, rects: &RectList) -> bool {
        match rects.rects() {
            [] => {
                self.clip_to_nothing();
                false
            }
            [rect] => self.clip_to_rectangle(*rect),
            _ => {
                self.clip_to_rects_unchecked(rects);
                !self.is_clip_empty()
            }
        }
    }

    fn exclude_clip_rectangle(&mut self, rect: IntRect) {
        let mut remaining = RectList::from(self.clip_bounds().expanded(1));
        remaining.subtract(rect);
        self.clip_to_rects_unchecked(&remaining);
    }

    fn clip_to_path(&mut self, path: &BezPath, transform: Affine) {
        let mut path = path.clone();
        path.apply_affine(transform);
        self.canvas.clip_to_path(&path);
        self.last_clip.set(None);
    }

    fn clip_to_image_alpha(&mut self, image: &Image, transform: Affine) {
        if is_singular(transform) {
            self.clip_to_nothing();
            return;
        }
        self.canvas.concat_transform(transform);
        match self.native_image(image, ColorSpace::Grey) {
            Some(mask) => self.canvas.clip_to_mask(image.bounds(), &mask),
            // The mask never reaches past the image.
            None => self.canvas.clip_to_rect(image.bounds()),
        }
        self.canvas.concat_transform(transform.inverse());
        self.last_clip.set(None);
    }

    fn clip_region_intersects(&self, rect: IntRect) -> bool {
        self.clip_bounds().intersects(rect)
    }

    fn clip_bounds(&self) -> IntRect {
        if let Some(clip) = self.last_clip.get() {
            return clip;
        }
        let clip = IntRect::enclosing(self.canvas.clip_bounding_box());
        self.last_clip.set(Some(clip));
        clip
    }

    fn is_clip_empty(&self) -> bool {
        self.clip_bounds().is_empty()
    }

    fn save_state(&mut self) {
        self.canvas.save();
        self.state_stack.push(self.state.clone());
        log::trace!("save_state: depth {}", self.state_stack.len());
    }

    fn restore_state(&mut self) {
        debug_assert!(
            !self.state_stack.is_empty(),
            "restore_state called without a matching save_state"
        );
        let Some(state) = self.state_stack.pop() else {
            log::warn!("ignoring restore_state without a matching save_state");
            return;
        };
        self.state = state;
        self.canvas.restore();
        self.last_clip.set(None);
        log::trace!("restore_state: depth {}", self.state_stack.len());
    }

    fn begin_transparency_layer(&mut self, opacity: f32) {
        self.save_state();
        self.canvas.set_alpha(opacity.clamp(0.0, 1.0));
        self.canvas.begin_transparency_layer();
    }

    fn end_transparency_layer(&mut self) {
        self.canvas.end_transparency_layer();
        self.restore_state();
    }

    fn set_fill(&mut self, fill: Fill) {
        self.state.gradient = None;
        match &fill.kind {
            FillKind::Solid(_) => {
                if let Some(color) = fill.solid_color() {
                    self.canvas.set_fill_color(color);
                }
                self.canvas.set_alpha(1.0);
            }
            FillKind::Gradient(gradient) => match self.canvas.create_gradient(gradient) {
                Ok(handle) => self.state.gradient = Some(Rc::new(handle)),
                Err(err) => log::warn!("gradient fill will draw nothing: {err}"),
            },
            FillKind::Image { .. } => {}
        }
        self.state.fill = fill;
    }

    fn set_opacity(&mut self, opacity: f32) {
        let fill = self.state.fill.clone().with_opacity(opacity);
        self.set_fill(fill);
    }

    fn set_interpolation_quality(&mut self, quality: ImageQuality) {
        self.canvas.set_interpolation_quality(quality);
    }

    fn fill_all(&mut self) {
        let clip = self.clip_bounds();
        self.fill_int_rect(clip, false);
    }

    fn fill_int_rect(&mut self, rect: IntRect, replace_existing_contents: bool) {
        if rect.is_empty() || self.is_clip_empty() {
            return;
        }
        if replace_existing_contents {
            self.canvas.save();
            self.canvas.set_compose(Compose::Copy);
            self.fill_rect(rect.to_rect());
            self.canvas.restore();
        } else {
            self.fill_rect(rect.to_rect());
        }
    }

    fn fill_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        if rect.is_zero_area() {
            return;
        }
        if matches!(self.state.fill.kind, FillKind::Solid(_)) {
            self.canvas.fill_rect(rect);
        } else {
            self.canvas.save();
            self.canvas.clip_to_rect(rect);
            self.paint_clip_with_fill();
            self.canvas.restore();
        }
    }

    fn fill_rect_list(&mut self, rects: &[Rect]) {
        let rects: SmallVec<[Rect; 4]> = rects
            .iter()
            .map(|rect| rect.abs())
            .filter(|rect| !rect.is_zero_area())
            .collect();
        if rects.is_empty() {
            return;
        }
        if matches!(self.state.fill.kind, FillKind::Solid(_)) {
            self.canvas.fill_rects(&rects);
        } else {
            self.canvas.save();
            self.canvas.clip_to_rects(&rects);
            self.paint_clip_with_fill();
            self.canvas.restore();
        }
    }

    fn fill_path(&mut self, path: &BezPath, transform: Affine) {
        let mut path = path.clone();
        path.apply_affine(transform);
        if path.elements().is_empty() || path.bounding_box().is_zero_area() {
            return;
        }
        self.fill_native_path(&path);
    }

    fn draw_image(&mut self, image: &Image, transform: Affine) {
        if is_singular(transform) || image.bounds().is_zero_area() {
            return;
        }
        let color_space = image.color_space();
        let Some(handle) = self.native_image(image, color_space) else {
            return;
        };
        self.canvas.save();
        self.canvas.concat_transform(transform);
        if color_space == ColorSpace::Grey {
            // Single-channel images are coverage masks for the current fill.
            self.canvas.clip_to_mask(image.bounds(), &handle);
            if matches!(self.state.fill.kind, FillKind::Solid(_)) {
                self.canvas.fill_rect(image.bounds());
            } else {
                self.canvas.concat_transform(transform.inverse());
                self.paint_clip_with_fill();
            }
        } else {
            self.canvas.set_alpha(self.state.fill.opacity);
            self.canvas.draw_image(image.bounds(), &handle);
        }
        self.canvas.restore();
    }

    fn draw_line(&mut self, line: Line) {
        if matches!(self.state.fill.kind, FillKind::Solid(_)) {
            self.canvas.stroke_line(line, 1.0);
            return;
        }
        let outline = kurbo::stroke(
            line.path_elements(STROKE_TOLERANCE),
            &Stroke::new(1.0).with_caps(Cap::Square),
            &StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        self.fill_native_path(&outline);
    }

    fn set_font(&mut self, font: &Font) {
        if self.state.font_handle.is_some() && self.state.font == *font {
            return;
        }
        let canvas = &mut self.canvas;
        let key = FontLookupKey::from(font);
        let handle = self.fonts.get_or_try_insert_with(&key, || {
            log::debug!(
                "creating native font {:?} at {}",
                font.family(),
                font.size()
            );
            canvas.create_font(font)
        });
        self.state.font_handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("glyphs in {:?} will not be drawn: {err}", font.family());
                None
            }
        };
        let size = f64::from(font.size());
        let text_transform =
            Affine::scale_non_uniform(size * f64::from(font.horizontal_scale()), size);
        self.state.text_transform = text_transform;
        self.state.inverse_text_transform = if is_singular(text_transform) {
            Affine::IDENTITY
        } else {
            text_transform.inverse()
        };
        self.state.font = font.clone();
    }

    fn font(&self) -> &Font {
        &self.state.font
    }

    fn draw_glyph(&mut self, glyph_id: u32, transform: Affine) {
        let Some(handle) = self.state.font_handle.clone() else {
            return;
        };
        if is_singular(self.state.text_transform) || is_singular(transform) {
            return;
        }
        if matches!(self.state.fill.kind, FillKind::Solid(_)) {
            if is_translation_only(transform) {
                let translation = transform.translation().to_point();
                let position = self.state.inverse_text_transform * translation;
                self.canvas
                    .show_glyph(&handle, self.state.text_transform, glyph_id, position);
            } else {
                self.canvas.save();
                self.canvas.concat_transform(transform);
                self.canvas
                    .show_glyph(&handle, self.state.text_transform, glyph_id, Point::ORIGIN);
                self.canvas.restore();
            }
        } else if let Some(outline) = self.canvas.glyph_outline(&handle, glyph_id) {
            self.fill_path(&outline, transform * self.state.text_transform);
        }
    }

    fn draw_text_layout(&mut self, text: &AttributedString, area: Rect) -> bool {
        self.canvas.draw_text_layout(text, area)
    }
}
