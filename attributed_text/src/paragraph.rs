// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph-level layout controls.

/// Horizontal placement of each line within the layout area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Lines start at the left edge.
    #[default]
    Left,
    /// Lines end at the right edge.
    Right,
    /// Lines are centered.
    Centred,
    /// Lines are stretched to the full width by widening their spaces, except for the last line
    /// of each paragraph, which is left-aligned.
    Justified,
}

/// Vertical placement of the whole text block within the layout area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// The block starts at the top edge.
    #[default]
    Top,
    /// The block is centered.
    Centred,
    /// The block ends at the bottom edge.
    Bottom,
}

/// Horizontal and vertical alignment used when laying out text inside an area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Justification {
    /// Placement of each line.
    pub horizontal: HorizontalAlign,
    /// Placement of the block of lines.
    pub vertical: VerticalAlign,
}

impl Justification {
    /// Left and top.
    pub const LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Top);
    /// Right and top.
    pub const RIGHT: Self = Self::new(HorizontalAlign::Right, VerticalAlign::Top);
    /// Centred horizontally, top vertically.
    pub const HORIZONTALLY_CENTRED: Self = Self::new(HorizontalAlign::Centred, VerticalAlign::Top);
    /// Justified horizontally, top vertically.
    pub const HORIZONTALLY_JUSTIFIED: Self =
        Self::new(HorizontalAlign::Justified, VerticalAlign::Top);
    /// Centred on both axes.
    pub const CENTRED: Self = Self::new(HorizontalAlign::Centred, VerticalAlign::Centred);
    /// Left and vertically centred.
    pub const CENTRED_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Centred);
    /// Right and vertically centred.
    pub const CENTRED_RIGHT: Self = Self::new(HorizontalAlign::Right, VerticalAlign::Centred);
    /// Horizontally centred, bottom.
    pub const CENTRED_BOTTOM: Self = Self::new(HorizontalAlign::Centred, VerticalAlign::Bottom);
    /// Left and bottom.
    pub const BOTTOM_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Bottom);
    /// Right and bottom.
    pub const BOTTOM_RIGHT: Self = Self::new(HorizontalAlign::Right, VerticalAlign::Bottom);

    /// Combine a horizontal and a vertical alignment.
    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Word-wrapping behaviour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WordWrap {
    /// No wrapping: lines extend indefinitely.
    None,
    /// Lines are wrapped on word boundaries.
    #[default]
    ByWord,
    /// Lines are wrapped on character boundaries.
    ByChar,
}

/// The reading direction of the text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReadingDirection {
    /// Taken from the first strong directional character in the text.
    #[default]
    Natural,
    /// Left to right.
    LeftToRight,
    /// Right to left.
    RightToLeft,
}

/// Settings that apply to every paragraph of an [`AttributedString`].
///
/// [`AttributedString`]: crate::AttributedString
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Alignment within the layout area.
    pub justification: Justification,
    /// Line wrapping mode.
    pub word_wrap: WordWrap,
    /// Reading direction.
    pub reading_direction: ReadingDirection,
    /// Extra distance added between consecutive lines.
    pub line_spacing: f32,
    /// Multiplier for the natural line height; `0` or less means `1`.
    pub line_height_multiple: f32,
    /// Extra distance added after each paragraph except the last.
    pub paragraph_spacing: f32,
    /// Extra distance added before each paragraph except the first.
    pub paragraph_spacing_before: f32,
}
