// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;

/// A font descriptor: the family, size and style used to render a range of text.
///
/// This is a plain value; it doesn't hold any font data. Rendering backends resolve it to a
/// native font handle, and shapers measure text with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    family: Arc<str>,
    size: f32,
    weight: FontWeight,
    style: FontStyle,
    horizontal_scale: f32,
}

impl Font {
    /// The family used by [`Font::default`].
    pub const DEFAULT_FAMILY: &'static str = "sans-serif";

    /// The size used by [`Font::default`].
    pub const DEFAULT_SIZE: f32 = 14.0;

    /// Create a font descriptor with normal weight and style.
    ///
    /// `size` is the font height in pixels per em. Negative and non-finite sizes are treated
    /// as `0`.
    pub fn new(family: impl Into<Arc<str>>, size: f32) -> Self {
        Self {
            family: family.into(),
            size: sanitize(size, 0.0),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            horizontal_scale: 1.0,
        }
    }

    /// The family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The font size in pixels per em.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// The weight.
    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// The style.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// The horizontal stretch factor applied to glyphs, `1.0` being unstretched.
    pub fn horizontal_scale(&self) -> f32 {
        self.horizontal_scale
    }

    /// Returns a copy of this font with a different size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = sanitize(size, 0.0);
        self
    }

    /// Returns a copy of this font with a different weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Returns a copy of this font with a different style.
    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns a copy of this font with a different horizontal scale.
    ///
    /// Non-positive and non-finite scales reset the scale to `1.0`.
    #[must_use]
    pub fn with_horizontal_scale(mut self, scale: f32) -> Self {
        self.horizontal_scale = if scale > 0.0 {
            sanitize(scale, 1.0)
        } else {
            1.0
        };
        self
    }

    /// Shorthand for `with_weight(FontWeight::BOLD)`.
    #[must_use]
    pub fn bold(self) -> Self {
        self.with_weight(FontWeight::BOLD)
    }

    /// Shorthand for `with_style(FontStyle::Italic)`.
    #[must_use]
    pub fn italic(self) -> Self {
        self.with_style(FontStyle::Italic)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAMILY, Self::DEFAULT_SIZE)
    }
}

fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

/// Visual weight class of a font, typically on a scale from 1.0 to 1000.0.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100.0);

    /// Weight value of 300.
    pub const LIGHT: Self = Self(300.0);

    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400.0);

    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500.0);

    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600.0);

    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);

    /// Weight value of 900.
    pub const BLACK: Self = Self(900.0);

    /// Creates a new weight value.
    pub fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Visual style or "slope" of a font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// Generally a slanted style, originally based on semi-cursive forms.
    Italic,
    /// A slanted version of the upright style.
    Oblique,
}

#[cfg(test)]
mod tests {
    use super::{Font, FontStyle, FontWeight};

    #[test]
    fn default_font() {
        let font = Font::default();
        assert_eq!(font.family(), "sans-serif");
        assert_eq!(font.size(), 14.0);
        assert_eq!(font.weight(), FontWeight::NORMAL);
        assert_eq!(font.style(), FontStyle::Normal);
        assert_eq!(font.horizontal_scale(), 1.0);
    }

    #[test]
    fn equality_covers_every_field() {
        let base = Font::new("Serif", 12.0);
        assert_eq!(base, Font::new("Serif", 12.0));
        assert_ne!(base, base.clone().bold());
        assert_ne!(base, base.clone().italic());
        assert_ne!(base, base.clone().with_size(13.0));
        assert_ne!(base, base.clone().with_horizontal_scale(0.5));
        assert_ne!(base, Font::new("Sans", 12.0));
    }

    #[test]
    fn invalid_values_are_sanitized() {
        assert_eq!(Font::new("A", -3.0).size(), 0.0);
        assert_eq!(Font::new("A", f32::NAN).size(), 0.0);
        let flattened = Font::new("A", 10.0).with_horizontal_scale(0.0);
        assert_eq!(flattened.horizontal_scale(), 1.0);
    }
}
