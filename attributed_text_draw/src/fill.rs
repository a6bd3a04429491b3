// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::kurbo::{Affine, Point};
use crate::{Color, Image};

/// One color stop of a [`GradientFill`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, from `0.0` to `1.0`.
    pub offset: f32,
    /// Color at this position.
    pub color: Color,
}

/// A linear or radial color gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientFill {
    /// Start point; the center of a radial gradient.
    pub start: Point,
    /// End point; a point on the outer circle of a radial gradient.
    pub end: Point,
    /// Whether the gradient is radial rather than linear.
    pub radial: bool,
    /// Color stops, sorted by offset.
    pub stops: Vec<GradientStop>,
}

impl GradientFill {
    /// A linear gradient from `start` to `end` with no stops.
    pub fn linear(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            radial: false,
            stops: Vec::new(),
        }
    }

    /// A radial gradient around `center` reaching `edge` with no stops.
    pub fn radial(center: impl Into<Point>, edge: impl Into<Point>) -> Self {
        Self {
            radial: true,
            ..Self::linear(center, edge)
        }
    }

    /// Add a color stop, keeping the stops sorted.
    #[must_use]
    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let index = self.stops.partition_point(|stop| stop.offset <= offset);
        self.stops.insert(index, GradientStop { offset, color });
        self
    }
}

/// What a fill paints with.
#[derive(Clone, Debug, PartialEq)]
pub enum FillKind {
    /// A single color.
    Solid(Color),
    /// A gradient.
    Gradient(GradientFill),
    /// A tiled image placed by `transform`.
    Image {
        /// The image tile.
        image: Image,
        /// Placement of the tile at the origin.
        transform: Affine,
    },
}

/// The paint used by fill and glyph operations, with an overall opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    /// What to paint with.
    pub kind: FillKind,
    /// Multiplier applied to the paint's alpha, from `0.0` to `1.0`.
    pub opacity: f32,
}

impl Fill {
    /// A solid color fill.
    pub fn solid(color: Color) -> Self {
        Self {
            kind: FillKind::Solid(color),
            opacity: 1.0,
        }
    }

    /// A gradient fill.
    pub fn gradient(gradient: GradientFill) -> Self {
        Self {
            kind: FillKind::Gradient(gradient),
            opacity: 1.0,
        }
    }

    /// A tiled image fill.
    pub fn image(image: Image, transform: Affine) -> Self {
        Self {
            kind: FillKind::Image { image, transform },
            opacity: 1.0,
        }
    }

    /// Returns a copy with a different opacity, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// The color to paint with, if this is a solid fill, with the opacity applied.
    pub fn solid_color(&self) -> Option<Color> {
        match &self.kind {
            FillKind::Solid(color) => Some(color.multiply_alpha(self.opacity)),
            _ => None,
        }
    }

    /// Whether this fill paints nothing.
    pub fn is_invisible(&self) -> bool {
        self.opacity <= 0.0
            || matches!(self.kind, FillKind::Solid(color) if color.components[3] <= 0.0)
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::solid(Color::BLACK)
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Self::solid(color)
    }
}

#[cfg(test)]
mod tests {
    use super::{Fill, GradientFill};
    use crate::peniko::color::palette::css;

    #[test]
    fn stops_stay_sorted() {
        let gradient = GradientFill::linear((0.0, 0.0), (10.0, 0.0))
            .with_stop(1.0, css::BLUE)
            .with_stop(0.0, css::RED)
            .with_stop(0.5, css::GREEN);
        let offsets: Vec<_> = gradient.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, [0.0, 0.5, 1.0]);
    }

    #[test]
    fn opacity_applies_to_solid_color() {
        let fill = Fill::solid(css::RED).with_opacity(0.5);
        assert_eq!(fill.solid_color(), Some(css::RED.multiply_alpha(0.5)));
        assert!(Fill::solid(css::RED).with_opacity(0.0).is_invisible());
        assert!(Fill::solid(css::TRANSPARENT).is_invisible());
        assert!(!Fill::default().is_invisible());
    }
}
