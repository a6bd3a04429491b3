// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`NativeCanvas`] that records calls instead of rasterizing.
//!
//! The recording canvas tracks the graphics state a real canvas would (current transform,
//! device-space clip bounds, fill color, alpha, compositing mode), records every call as a
//! [`CanvasCommand`], and counts the native handles it has handed out that are still alive.
//! It is the canvas used by this crate's tests and is handy for headless inspection of what
//! a drawing session does.

use core::cell::Cell;
use std::rc::Rc;

use attributed_text::{AttributedString, Font};

use crate::kurbo::{Affine, BezPath, Line, Point, Rect, Shape};
use crate::peniko::{Compose, ImageQuality};
use crate::{Color, ColorSpace, Error, ErrorKind, GradientFill, Image, ImageId, NativeCanvas};

/// A single call recorded by a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCommand {
    /// [`NativeCanvas::save`].
    Save,
    /// [`NativeCanvas::restore`].
    Restore,
    /// [`NativeCanvas::concat_transform`].
    ConcatTransform(Affine),
    /// [`NativeCanvas::clip_to_rect`].
    ClipRect(Rect),
    /// [`NativeCanvas::clip_to_rects`].
    ClipRects(Vec<Rect>),
    /// [`NativeCanvas::clip_to_path`].
    ClipPath(BezPath),
    /// [`NativeCanvas::clip_to_mask`].
    ClipMask {
        /// Where the mask is stretched.
        rect: Rect,
        /// The image the mask was made from.
        image: ImageId,
    },
    /// [`NativeCanvas::set_fill_color`].
    SetFillColor(Color),
    /// [`NativeCanvas::set_alpha`].
    SetAlpha(f32),
    /// [`NativeCanvas::set_compose`].
    SetCompose(Compose),
    /// [`NativeCanvas::set_interpolation_quality`].
    SetInterpolationQuality(ImageQuality),
    /// [`NativeCanvas::fill_rect`].
    FillRect(Rect),
    /// [`NativeCanvas::fill_rects`].
    FillRects(Vec<Rect>),
    /// [`NativeCanvas::fill_path`].
    FillPath(BezPath),
    /// [`NativeCanvas::stroke_line`].
    StrokeLine {
        /// The line.
        line: Line,
        /// Stroke width.
        width: f64,
    },
    /// [`NativeCanvas::begin_transparency_layer`].
    BeginTransparencyLayer,
    /// [`NativeCanvas::end_transparency_layer`].
    EndTransparencyLayer,
    /// [`NativeCanvas::draw_image`] and [`NativeCanvas::draw_tiled_image`].
    DrawImage {
        /// Where the image (or one tile of it) is stretched.
        rect: Rect,
        /// The drawn image.
        image: ImageId,
        /// Whether the image was tiled over the clip.
        tiled: bool,
    },
    /// [`NativeCanvas::draw_gradient`].
    DrawGradient {
        /// Handle id of the gradient.
        gradient: u32,
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
        /// Whether the gradient is radial.
        radial: bool,
    },
    /// [`NativeCanvas::show_glyph`].
    ShowGlyph {
        /// Handle id of the font.
        font: u32,
        /// The glyph.
        glyph_id: u32,
        /// Em space to user space.
        text_transform: Affine,
        /// Glyph origin in text space.
        position: Point,
        /// The current transform when the glyph was shown.
        transform: Affine,
    },
    /// A successful [`NativeCanvas::create_font`].
    CreateFont {
        /// Handle id of the new font.
        id: u32,
        /// The font it was created for.
        font: Font,
    },
    /// A successful [`NativeCanvas::create_image`].
    CreateImage {
        /// The source image.
        image: ImageId,
        /// The color space of the native copy.
        color_space: ColorSpace,
    },
    /// A successful [`NativeCanvas::create_gradient`].
    CreateGradient {
        /// Handle id of the new gradient.
        id: u32,
    },
    /// A [`NativeCanvas::draw_text_layout`] the canvas handled itself.
    TextLayout {
        /// The laid out text.
        text: String,
        /// The layout area.
        area: Rect,
    },
}

impl CanvasCommand {
    /// Whether this command puts pixels on the canvas.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::FillRect(_)
                | Self::FillRects(_)
                | Self::FillPath(_)
                | Self::StrokeLine { .. }
                | Self::DrawImage { .. }
                | Self::DrawGradient { .. }
                | Self::ShowGlyph { .. }
                | Self::TextLayout { .. }
        )
    }

    /// For a [`ShowGlyph`](Self::ShowGlyph), the glyph origin in device space.
    pub fn glyph_origin(&self) -> Option<Point> {
        match self {
            Self::ShowGlyph {
                text_transform,
                position,
                transform,
                ..
            } => Some(*transform * (*text_transform * *position)),
            _ => None,
        }
    }
}

/// Options for a [`RecordingCanvas`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordingCanvasConfig {
    /// Fail every [`create_font`](NativeCanvas::create_font).
    pub fail_fonts: bool,
    /// Fail every [`create_image`](NativeCanvas::create_image).
    pub fail_images: bool,
    /// Fail every [`create_gradient`](NativeCanvas::create_gradient).
    pub fail_gradients: bool,
    /// Claim a native text engine, so [`draw_text_layout`](NativeCanvas::draw_text_layout)
    /// records the text and returns `true`.
    pub native_text_layout: bool,
}

/// The number of native handles of each kind still alive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveHandles {
    /// Font handles.
    pub fonts: usize,
    /// Image handles.
    pub images: usize,
    /// Gradient handles.
    pub gradients: usize,
}

impl LiveHandles {
    /// The number of handles of all kinds.
    pub fn total(&self) -> usize {
        self.fonts + self.images + self.gradients
    }
}

#[derive(Clone, Copy, Debug)]
enum HandleKind {
    Font,
    Image,
    Gradient,
}

#[derive(Debug, Default)]
struct LiveCounters {
    fonts: Cell<usize>,
    images: Cell<usize>,
    gradients: Cell<usize>,
}

impl LiveCounters {
    fn counter(&self, kind: HandleKind) -> &Cell<usize> {
        match kind {
            HandleKind::Font => &self.fonts,
            HandleKind::Image => &self.images,
            HandleKind::Gradient => &self.gradients,
        }
    }
}

/// Keeps a live-handle counter incremented while it exists.
#[derive(Debug)]
struct LiveToken {
    counters: Rc<LiveCounters>,
    kind: HandleKind,
}

impl LiveToken {
    fn new(counters: &Rc<LiveCounters>, kind: HandleKind) -> Self {
        let counter = counters.counter(kind);
        counter.set(counter.get() + 1);
        Self {
            counters: Rc::clone(counters),
            kind,
        }
    }
}

impl Drop for LiveToken {
    fn drop(&mut self) {
        let counter = self.counters.counter(self.kind);
        counter.set(counter.get().saturating_sub(1));
    }
}

/// A font handle handed out by a [`RecordingCanvas`].
#[derive(Debug)]
pub struct RecordedFont {
    id: u32,
    font: Font,
    _token: LiveToken,
}

impl RecordedFont {
    /// The handle id, as recorded in [`CanvasCommand::ShowGlyph`].
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The font the handle was created for.
    pub fn font(&self) -> &Font {
        &self.font
    }
}

/// An image handle handed out by a [`RecordingCanvas`].
#[derive(Debug)]
pub struct RecordedImage {
    image: ImageId,
    color_space: ColorSpace,
    _token: LiveToken,
}

impl RecordedImage {
    /// The source image.
    pub fn image(&self) -> ImageId {
        self.image
    }

    /// The color space of the native copy.
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }
}

/// A gradient handle handed out by a [`RecordingCanvas`].
#[derive(Debug)]
pub struct RecordedGradient {
    id: u32,
    stops: usize,
    _token: LiveToken,
}

impl RecordedGradient {
    /// The handle id, as recorded in [`CanvasCommand::DrawGradient`].
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The number of color stops.
    pub fn stop_count(&self) -> usize {
        self.stops
    }
}

#[derive(Clone, Debug)]
struct GraphicsState {
    transform: Affine,
    /// Clip bounds in device space.
    clip: Rect,
    fill_color: Color,
    alpha: f32,
    compose: Compose,
    quality: ImageQuality,
}

/// A [`NativeCanvas`] over a fixed device size that records every call.
#[derive(Debug)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    config: RecordingCanvasConfig,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    layers: usize,
    commands: Vec<CanvasCommand>,
    counters: Rc<LiveCounters>,
    next_handle: u32,
}

impl RecordingCanvas {
    /// A canvas of `width` by `height` device pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, RecordingCanvasConfig::default())
    }

    /// A canvas of `width` by `height` device pixels with the given options.
    pub fn with_config(width: u32, height: u32, config: RecordingCanvasConfig) -> Self {
        Self {
            width,
            height,
            config,
            state: GraphicsState {
                transform: Affine::IDENTITY,
                clip: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
                fill_color: Color::BLACK,
                alpha: 1.0,
                compose: Compose::SrcOver,
                quality: ImageQuality::Medium,
            },
            saved: Vec::new(),
            layers: 0,
            commands: Vec::new(),
            counters: Rc::default(),
            next_handle: 1,
        }
    }

    /// The device size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Every call recorded so far, oldest first.
    pub fn commands(&self) -> &[CanvasCommand] {
        &self.commands
    }

    /// Take the recorded calls, leaving the record empty.
    pub fn take_commands(&mut self) -> Vec<CanvasCommand> {
        core::mem::take(&mut self.commands)
    }

    /// The recorded calls that put pixels on the canvas.
    pub fn draw_commands(&self) -> impl Iterator<Item = &CanvasCommand> + '_ {
        self.commands.iter().filter(|command| command.is_draw())
    }

    /// The native handles handed out and not yet dropped.
    pub fn live_handles(&self) -> LiveHandles {
        LiveHandles {
            fonts: self.counters.fonts.get(),
            images: self.counters.images.get(),
            gradients: self.counters.gradients.get(),
        }
    }

    /// The number of graphics states saved and not yet restored.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// The number of open transparency layers.
    pub fn layer_depth(&self) -> usize {
        self.layers
    }

    /// The clip bounds in device space.
    pub fn device_clip(&self) -> Rect {
        self.state.clip
    }

    /// The current fill color.
    pub fn fill_color(&self) -> Color {
        self.state.fill_color
    }

    /// The current alpha.
    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    /// The current compositing mode.
    pub fn compose(&self) -> Compose {
        self.state.compose
    }

    /// The current image interpolation quality.
    pub fn interpolation_quality(&self) -> ImageQuality {
        self.state.quality
    }

    fn intersect_clip(&mut self, user_bounds: Option<Rect>) {
        let device = match user_bounds {
            Some(bounds) => self.state.transform.transform_rect_bbox(bounds),
            None => Rect::ZERO,
        };
        self.state.clip = self.state.clip.intersect(device);
        if self.state.clip.is_zero_area() {
            self.state.clip = Rect::ZERO;
        }
    }

    fn next_handle_id(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl NativeCanvas for RecordingCanvas {
    type Font = RecordedFont;
    type Image = RecordedImage;
    type Gradient = RecordedGradient;

    fn save(&mut self) {
        self.saved.push(self.state.clone());
        self.commands.push(CanvasCommand::Save);
    }

    fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => log::warn!("recording canvas restored without a matching save"),
        }
        self.commands.push(CanvasCommand::Restore);
    }

    fn concat_transform(&mut self, transform: Affine) {
        self.state.transform *= transform;
        self.commands
            .push(CanvasCommand::ConcatTransform(transform));
    }

    fn transform(&self) -> Affine {
        self.state.transform
    }

    fn clip_to_rect(&mut self, rect: Rect) {
        self.intersect_clip(Some(rect.abs()));
        self.commands.push(CanvasCommand::ClipRect(rect));
    }

    fn clip_to_rects(&mut self, rects: &[Rect]) {
        let bounds = rects
            .iter()
            .map(|rect| rect.abs())
            .reduce(|bounds, rect| bounds.union(rect));
        self.intersect_clip(bounds);
        self.commands.push(CanvasCommand::ClipRects(rects.to_vec()));
    }

    fn clip_to_path(&mut self, path: &BezPath) {
        let bounds = (!path.elements().is_empty()).then(|| path.bounding_box());
        self.intersect_clip(bounds);
        self.commands.push(CanvasCommand::ClipPath(path.clone()));
    }

    fn clip_to_mask(&mut self, rect: Rect, mask: &Self::Image) {
        self.intersect_clip(Some(rect.abs()));
        self.commands.push(CanvasCommand::ClipMask {
            rect,
            image: mask.image,
        });
    }

    fn clip_bounding_box(&self) -> Rect {
        let transform = self.state.transform;
        if self.state.clip.is_zero_area() || transform.determinant() == 0.0 {
            return Rect::ZERO;
        }
        transform.inverse().transform_rect_bbox(self.state.clip)
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
        self.commands.push(CanvasCommand::SetFillColor(color));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
        self.commands.push(CanvasCommand::SetAlpha(alpha));
    }

    fn set_compose(&mut self, compose: Compose) {
        self.state.compose = compose;
        self.commands.push(CanvasCommand::SetCompose(compose));
    }

    fn set_interpolation_quality(&mut self, quality: ImageQuality) {
        self.state.quality = quality;
        self.commands
            .push(CanvasCommand::SetInterpolationQuality(quality));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(CanvasCommand::FillRect(rect));
    }

    fn fill_rects(&mut self, rects: &[Rect]) {
        self.commands.push(CanvasCommand::FillRects(rects.to_vec()));
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.commands.push(CanvasCommand::FillPath(path.clone()));
    }

    fn stroke_line(&mut self, line: Line, width: f64) {
        self.commands
            .push(CanvasCommand::StrokeLine { line, width });
    }

    fn begin_transparency_layer(&mut self) {
        self.layers += 1;
        self.commands.push(CanvasCommand::BeginTransparencyLayer);
    }

    fn end_transparency_layer(&mut self) {
        match self.layers.checked_sub(1) {
            Some(layers) => self.layers = layers,
            None => log::warn!("recording canvas ended a layer that was never begun"),
        }
        self.commands.push(CanvasCommand::EndTransparencyLayer);
    }

    fn draw_image(&mut self, rect: Rect, image: &Self::Image) {
        self.commands.push(CanvasCommand::DrawImage {
            rect,
            image: image.image,
            tiled: false,
        });
    }

    fn draw_tiled_image(&mut self, tile: Rect, image: &Self::Image) {
        self.commands.push(CanvasCommand::DrawImage {
            rect: tile,
            image: image.image,
            tiled: true,
        });
    }

    fn draw_gradient(&mut self, gradient: &Self::Gradient, start: Point, end: Point, radial: bool) {
        self.commands.push(CanvasCommand::DrawGradient {
            gradient: gradient.id,
            start,
            end,
            radial,
        });
    }

    fn show_glyph(
        &mut self,
        font: &Self::Font,
        text_transform: Affine,
        glyph_id: u32,
        position: Point,
    ) {
        self.commands.push(CanvasCommand::ShowGlyph {
            font: font.id,
            glyph_id,
            text_transform,
            position,
            transform: self.state.transform,
        });
    }

    fn glyph_outline(&mut self, _font: &Self::Font, glyph_id: u32) -> Option<BezPath> {
        if char::from_u32(glyph_id).is_some_and(char::is_whitespace) {
            return None;
        }
        Some(Rect::new(0.05, -0.7, 0.45, 0.0).to_path(0.1))
    }

    fn create_font(&mut self, font: &Font) -> Result<Self::Font, Error> {
        if self.config.fail_fonts {
            return Err(Error::new(
                ErrorKind::FontUnavailable,
                "font creation disabled on this canvas",
            ));
        }
        let id = self.next_handle_id();
        self.commands.push(CanvasCommand::CreateFont {
            id,
            font: font.clone(),
        });
        Ok(RecordedFont {
            id,
            font: font.clone(),
            _token: LiveToken::new(&self.counters, HandleKind::Font),
        })
    }

    fn create_image(
        &mut self,
        image: &Image,
        color_space: ColorSpace,
    ) -> Result<Self::Image, Error> {
        if self.config.fail_images {
            return Err(Error::new(
                ErrorKind::ImageCreation,
                "image creation disabled on this canvas",
            ));
        }
        self.commands.push(CanvasCommand::CreateImage {
            image: image.id(),
            color_space,
        });
        Ok(RecordedImage {
            image: image.id(),
            color_space,
            _token: LiveToken::new(&self.counters, HandleKind::Image),
        })
    }

    fn create_gradient(&mut self, gradient: &GradientFill) -> Result<Self::Gradient, Error> {
        if self.config.fail_gradients || gradient.stops.is_empty() {
            return Err(Error::new(
                ErrorKind::GradientCreation,
                "gradient creation disabled on this canvas or gradient has no stops",
            ));
        }
        let id = self.next_handle_id();
        self.commands.push(CanvasCommand::CreateGradient { id });
        Ok(RecordedGradient {
            id,
            stops: gradient.stops.len(),
            _token: LiveToken::new(&self.counters, HandleKind::Gradient),
        })
    }

    fn draw_text_layout(&mut self, text: &AttributedString, area: Rect) -> bool {
        if !self.config.native_text_layout {
            return false;
        }
        self.commands.push(CanvasCommand::TextLayout {
            text: text.text().to_owned(),
            area,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasCommand, RecordingCanvas};
    use crate::kurbo::{Affine, Rect};
    use crate::NativeCanvas;

    #[test]
    fn clip_is_tracked_in_device_space() {
        let mut canvas = RecordingCanvas::new(100, 100);
        canvas.concat_transform(Affine::translate((10.0, 20.0)));
        canvas.clip_to_rect(Rect::new(0.0, 0.0, 50.0, 50.0));

        assert_eq!(canvas.device_clip(), Rect::new(10.0, 20.0, 60.0, 70.0));
        assert_eq!(canvas.clip_bounding_box(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn restore_brings_back_clip_and_transform() {
        let mut canvas = RecordingCanvas::new(100, 100);
        canvas.save();
        canvas.concat_transform(Affine::scale(2.0));
        canvas.clip_to_rects(&[]);
        assert_eq!(canvas.clip_bounding_box(), Rect::ZERO);
        canvas.restore();

        assert_eq!(canvas.transform(), Affine::IDENTITY);
        assert_eq!(canvas.device_clip(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn font_handles_are_counted_until_dropped() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let default_font = attributed_text::Font::default();
        let font = canvas.create_font(&default_font).unwrap();
        assert_eq!(canvas.live_handles().fonts, 1);
        drop(font);
        assert_eq!(canvas.live_handles().total(), 0);
        let [CanvasCommand::CreateFont { id, .. }] = canvas.commands() else {
            panic!("expected one font creation");
        };
        assert_eq!(*id, 1);
    }
}
