// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use peniko::Color;

use crate::Font;

/// How aggressively a shaper should substitute ligatures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ligatures {
    /// Only ligatures required for correct rendering of the script.
    Essential,
    /// The common ligatures a font enables by default, such as `fi`.
    #[default]
    Standard,
    /// Standard plus discretionary ligatures.
    All,
}

/// The style applied to one contiguous range of an [`AttributedString`].
///
/// [`AttributedString`]: crate::AttributedString
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// The byte range of the text this attribute applies to.
    pub range: Range<usize>,
    /// The font for this range.
    pub font: Font,
    /// The fill color of the glyphs.
    pub color: Color,
    /// The color of the glyph outlines.
    pub outline_color: Color,
    /// The width of the glyph outlines; `0` draws no outline.
    pub outline_width: f32,
    /// Whether the range is underlined.
    pub underlined: bool,
    /// The ligature substitution mode.
    pub ligatures: Ligatures,
}

impl Attribute {
    /// The fill and outline color of a default attribute: opaque black.
    pub const DEFAULT_COLOR: Color = Color::BLACK;

    /// Create an attribute with the given range, font and color and defaults for everything else.
    pub fn new(range: Range<usize>, font: Font, color: Color) -> Self {
        Self {
            range,
            font,
            color,
            ..Self::default()
        }
    }

    /// Returns `true` if every field except the range is equal.
    pub fn has_same_style(&self, other: &Self) -> bool {
        self.font == other.font
            && self.color == other.color
            && self.outline_color == other.outline_color
            && self.outline_width == other.outline_width
            && self.underlined == other.underlined
            && self.ligatures == other.ligatures
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            range: 0..0,
            font: Font::default(),
            color: Self::DEFAULT_COLOR,
            outline_color: Self::DEFAULT_COLOR,
            outline_width: 0.0,
            underlined: false,
            ligatures: Ligatures::Standard,
        }
    }
}
