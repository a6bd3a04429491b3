// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Bound, Range, RangeBounds};

use peniko::Color;

use crate::{
    Attribute, Error, Font, Justification, Ligatures, ParagraphStyle, ReadingDirection, TextRange,
    WordWrap,
};

/// A string with fonts, colors and other attributes applied to contiguous ranges of it.
///
/// The attributes are kept sorted and contiguous: the first starts at `0`, and each one ends
/// exactly where the next begins. Every mutation method re-establishes this before returning,
/// and adjacent attributes with the same style are coalesced.
///
/// Offsets are UTF-8 byte offsets into [`text`](Self::text).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributedString {
    text: String,
    attributes: Vec<Attribute>,
    paragraph: ParagraphStyle,
}

impl AttributedString {
    /// Create an empty attributed string.
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the text, in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text without touching the attributes.
    ///
    /// The attribute ranges are left exactly as they were, even if they no longer match the
    /// length of the new text. Callers that change the length are expected to re-attribute the
    /// text themselves; [`covers_text`](Self::covers_text) reports whether they still match.
    /// Until then, the range setters only operate on the part of the text that is both present
    /// and attributed.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns `true` if the attributes span exactly the bytes of the text.
    pub fn covers_text(&self) -> bool {
        self.is_contiguous() && self.attributed_len() == self.text.len()
    }

    /// Append `text` using the font and color of the last attribute.
    ///
    /// With no attributes yet, the default font and opaque black are used.
    pub fn append(&mut self, text: &str) {
        self.append_range(text, None, None);
    }

    /// Append `text` with `font` and the color of the last attribute.
    pub fn append_with_font(&mut self, text: &str, font: Font) {
        self.append_range(text, Some(font), None);
    }

    /// Append `text` with `color` and the font of the last attribute.
    pub fn append_with_color(&mut self, text: &str, color: Color) {
        self.append_range(text, None, Some(color));
    }

    /// Append `text` with the given font and color.
    pub fn append_styled(&mut self, text: &str, font: Font, color: Color) {
        self.append_range(text, Some(font), Some(color));
    }

    /// Append the text and attributes of `other`.
    ///
    /// The paragraph style of `other` is not copied.
    pub fn append_attributed(&mut self, other: &Self) {
        let base = self.attributed_len();
        self.text.push_str(&other.text);
        for attribute in &other.attributes {
            let mut attribute = attribute.clone();
            attribute.range = attribute.range.start + base..attribute.range.end + base;
            self.attributes.push(attribute);
        }
        self.merge_adjacent();
        self.debug_check_contiguous();
    }

    /// Remove all text and attributes.
    ///
    /// The paragraph style is left unchanged.
    pub fn clear(&mut self) {
        self.text.clear();
        self.attributes.clear();
    }

    /// Returns the number of attributes.
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// All attributes, in text order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_attributes()`.
    pub fn attribute(&self, index: usize) -> &Attribute {
        match self.attributes.get(index) {
            Some(attribute) => attribute,
            None => panic!(
                "attribute index {index} out of range for {} attributes",
                self.attributes.len()
            ),
        }
    }

    /// Returns the attribute covering the byte at `offset`, if any.
    pub fn attribute_at(&self, offset: usize) -> Option<&Attribute> {
        let index = self.attributes.partition_point(|a| a.range.end <= offset);
        self.attributes
            .get(index)
            .filter(|attribute| attribute.range.start <= offset)
    }

    /// Validate `range` against the current text.
    pub fn text_range(&self, range: Range<usize>) -> Result<TextRange, Error> {
        TextRange::new(&self.text, range)
    }

    /// Returns the text covered by `range`.
    ///
    /// `range` must have been validated against the current text.
    pub fn slice(&self, range: TextRange) -> &str {
        &self.text[range.as_range()]
    }

    /// Set the fill color over `range`. Use `..` for the whole text.
    pub fn set_color(&mut self, range: impl RangeBounds<usize>, color: Color) {
        self.set_attribute(range, |attribute| attribute.color = color);
    }

    /// Set the outline color over `range`. Use `..` for the whole text.
    pub fn set_outline_color(&mut self, range: impl RangeBounds<usize>, color: Color) {
        self.set_attribute(range, |attribute| attribute.outline_color = color);
    }

    /// Set the outline width over `range`. Use `..` for the whole text.
    ///
    /// Negative and non-finite widths are treated as `0`.
    pub fn set_outline_width(&mut self, range: impl RangeBounds<usize>, width: f32) {
        let width = if width.is_finite() {
            width.max(0.0)
        } else {
            0.0
        };
        self.set_attribute(range, |attribute| attribute.outline_width = width);
    }

    /// Set the font over `range`. Use `..` for the whole text.
    pub fn set_font(&mut self, range: impl RangeBounds<usize>, font: Font) {
        self.set_attribute(range, |attribute| attribute.font = font.clone());
    }

    /// Set whether `range` is underlined. Use `..` for the whole text.
    pub fn set_underlined(&mut self, range: impl RangeBounds<usize>, underlined: bool) {
        self.set_attribute(range, |attribute| attribute.underlined = underlined);
    }

    /// Set the ligature mode over `range`. Use `..` for the whole text.
    pub fn set_ligatures(&mut self, range: impl RangeBounds<usize>, ligatures: Ligatures) {
        self.set_attribute(range, |attribute| attribute.ligatures = ligatures);
    }

    /// The paragraph-level settings.
    pub fn paragraph_style(&self) -> &ParagraphStyle {
        &self.paragraph
    }

    /// Replace all paragraph-level settings at once.
    pub fn set_paragraph_style(&mut self, style: ParagraphStyle) {
        self.paragraph = style;
    }

    /// The alignment used when laying out the text.
    pub fn justification(&self) -> Justification {
        self.paragraph.justification
    }

    /// Set the alignment used when laying out the text.
    pub fn set_justification(&mut self, justification: Justification) {
        self.paragraph.justification = justification;
    }

    /// The word-wrapping behaviour.
    pub fn word_wrap(&self) -> WordWrap {
        self.paragraph.word_wrap
    }

    /// Set the word-wrapping behaviour.
    pub fn set_word_wrap(&mut self, word_wrap: WordWrap) {
        self.paragraph.word_wrap = word_wrap;
    }

    /// The reading direction.
    pub fn reading_direction(&self) -> ReadingDirection {
        self.paragraph.reading_direction
    }

    /// Set the reading direction.
    pub fn set_reading_direction(&mut self, direction: ReadingDirection) {
        self.paragraph.reading_direction = direction;
    }

    /// The extra distance between lines.
    pub fn line_spacing(&self) -> f32 {
        self.paragraph.line_spacing
    }

    /// Set the extra distance between lines.
    pub fn set_line_spacing(&mut self, spacing: f32) {
        self.paragraph.line_spacing = spacing;
    }

    /// The line height multiple.
    pub fn line_height_multiple(&self) -> f32 {
        self.paragraph.line_height_multiple
    }

    /// Set the line height multiple.
    pub fn set_line_height_multiple(&mut self, multiple: f32) {
        self.paragraph.line_height_multiple = multiple;
    }

    /// The extra distance after each paragraph.
    pub fn paragraph_spacing(&self) -> f32 {
        self.paragraph.paragraph_spacing
    }

    /// Set the extra distance after each paragraph.
    pub fn set_paragraph_spacing(&mut self, spacing: f32) {
        self.paragraph.paragraph_spacing = spacing;
    }

    /// The extra distance before each paragraph.
    pub fn paragraph_spacing_before(&self) -> f32 {
        self.paragraph.paragraph_spacing_before
    }

    /// Set the extra distance before each paragraph.
    pub fn set_paragraph_spacing_before(&mut self, spacing: f32) {
        self.paragraph.paragraph_spacing_before = spacing;
    }

    /// The end of the last attribute.
    fn attributed_len(&self) -> usize {
        self.attributes.last().map_or(0, |a| a.range.end)
    }

    fn append_range(&mut self, text: &str, font: Option<Font>, color: Option<Color>) {
        if text.is_empty() {
            return;
        }
        let (font, color) = match self.attributes.last() {
            Some(last) => (
                font.unwrap_or_else(|| last.font.clone()),
                color.unwrap_or(last.color),
            ),
            None => (
                font.unwrap_or_default(),
                color.unwrap_or(Attribute::DEFAULT_COLOR),
            ),
        };
        let start = self.attributed_len();
        self.text.push_str(text);
        self.attributes
            .push(Attribute::new(start..start + text.len(), font, color));
        self.merge_adjacent();
        self.debug_check_contiguous();
    }

    fn set_attribute(
        &mut self,
        range: impl RangeBounds<usize>,
        mut apply: impl FnMut(&mut Attribute),
    ) {
        let Some(range) = self.clamp_range(range) else {
            return;
        };
        self.split_at(range.start);
        self.split_at(range.end);
        let first = self
            .attributes
            .partition_point(|a| a.range.end <= range.start);
        for attribute in &mut self.attributes[first..] {
            if attribute.range.start >= range.end {
                break;
            }
            apply(attribute);
        }
        self.merge_adjacent();
        self.debug_check_contiguous();
    }

    /// Resolve `range` to a non-empty range within both the text and the attributes.
    fn clamp_range(&self, range: impl RangeBounds<usize>) -> Option<Range<usize>> {
        let limit = self.text.len().min(self.attributed_len());
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => limit,
        };
        let (start, end) = (start.min(limit), end.min(limit));
        if start >= end {
            return None;
        }
        debug_assert!(
            self.text.is_char_boundary(start) && self.text.is_char_boundary(end),
            "attribute range {start}..{end} must lie on UTF-8 character boundaries"
        );
        Some(start..end)
    }

    /// Split the attribute containing `offset` in two if `offset` falls strictly inside it.
    fn split_at(&mut self, offset: usize) {
        let index = self.attributes.partition_point(|a| a.range.end <= offset);
        let Some(attribute) = self.attributes.get_mut(index) else {
            return;
        };
        if attribute.range.start < offset && offset < attribute.range.end {
            let mut tail = attribute.clone();
            tail.range.start = offset;
            attribute.range.end = offset;
            self.attributes.insert(index + 1, tail);
        }
    }

    fn merge_adjacent(&mut self) {
        // `dedup_by` passes the later element first.
        self.attributes.dedup_by(|next, prev| {
            if prev.range.end == next.range.start && prev.has_same_style(next) {
                prev.range.end = next.range.end;
                true
            } else {
                false
            }
        });
    }

    fn is_contiguous(&self) -> bool {
        self.attributes
            .first()
            .is_none_or(|first| first.range.start == 0)
            && self
                .attributes
                .windows(2)
                .all(|pair| pair[0].range.end == pair[1].range.start)
    }

    fn debug_check_contiguous(&self) {
        debug_assert!(
            self.is_contiguous(),
            "attributes must be sorted, gapless and start at 0"
        );
    }
}

impl From<String> for AttributedString {
    fn from(text: String) -> Self {
        let attributes = if text.is_empty() {
            Vec::new()
        } else {
            vec![Attribute {
                range: 0..text.len(),
                ..Attribute::default()
            }]
        };
        Self {
            text,
            attributes,
            paragraph: ParagraphStyle::default(),
        }
    }
}

impl From<&str> for AttributedString {
    fn from(text: &str) -> Self {
        Self::from(String::from(text))
    }
}

#[cfg(test)]
#[expect(
    clippy::single_range_in_vec_init,
    reason = "Single attributes are compared as one-element range lists."
)]
mod tests {
    use alloc::vec::Vec;
    use core::ops::Range;

    use peniko::color::palette::css;

    use crate::{
        Attribute, AttributedString, Font, Justification, Ligatures, ReadingDirection, WordWrap,
    };

    fn ranges(text: &AttributedString) -> Vec<Range<usize>> {
        text.attributes().iter().map(|a| a.range.clone()).collect()
    }

    fn assert_partition(text: &AttributedString) {
        let attributes = text.attributes();
        if text.is_empty() {
            assert!(attributes.is_empty(), "empty text has no attributes");
            return;
        }
        assert_eq!(attributes[0].range.start, 0, "first attribute starts at 0");
        for pair in attributes.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start, "gapless");
            assert!(!pair[0].range.is_empty(), "attributes are non-empty");
        }
        assert_eq!(
            attributes[attributes.len() - 1].range.end,
            text.len(),
            "last attribute ends at the end of the text"
        );
    }

    #[test]
    fn new_string_has_one_default_attribute() {
        let text = AttributedString::from("Hello");
        assert_eq!(ranges(&text), [0..5]);
        assert_eq!(
            text.attribute(0),
            &Attribute::new(0..5, Font::default(), css::BLACK)
        );
        assert!(AttributedString::from("").attributes().is_empty());
    }

    #[test]
    fn set_color_splits_into_three() {
        let mut text = AttributedString::from("0123456789");
        text.set_color(3..7, css::RED);

        assert_eq!(ranges(&text), [0..3, 3..7, 7..10]);
        assert_eq!(text.attribute(0).color, css::BLACK);
        assert_eq!(text.attribute(1).color, css::RED);
        assert_eq!(text.attribute(2).color, css::BLACK);
        assert!(text.attribute(0).has_same_style(text.attribute(2)));
    }

    #[test]
    fn splitting_keeps_other_fields() {
        let mut text = AttributedString::from("0123456789");
        let font = Font::new("Mono", 20.0);
        text.set_font(.., font.clone());
        text.set_underlined(2..8, true);
        text.set_color(4..6, css::BLUE);

        assert_eq!(ranges(&text), [0..2, 2..4, 4..6, 6..8, 8..10]);
        assert!(text.attributes().iter().all(|a| a.font == font));
        assert!(text.attribute(2).underlined);
        assert_eq!(text.attribute(2).color, css::BLUE);
        assert!(text.attribute(3).underlined);
        assert!(!text.attribute(4).underlined);
    }

    #[test]
    fn whole_string_setter_coalesces() {
        let mut text = AttributedString::from("0123456789");
        text.set_color(3..7, css::RED);
        text.set_color(.., css::GREEN);

        assert_eq!(ranges(&text), [0..10]);
        assert_eq!(text.attribute(0).color, css::GREEN);
    }

    #[test]
    fn set_font_is_idempotent() {
        let mut text = AttributedString::from("Hello world");
        text.set_color(2..4, css::RED);
        let font = Font::new("Serif", 18.0).italic();

        text.set_font(.., font.clone());
        let once = text.clone();
        text.set_font(.., font);
        assert_eq!(text, once);
    }

    #[test]
    fn ranges_are_clamped() {
        let mut text = AttributedString::from("0123456789");
        text.set_color(6..100, css::RED);
        assert_eq!(ranges(&text), [0..6, 6..10]);

        text.set_underlined(..=2, true);
        assert_eq!(ranges(&text), [0..3, 3..6, 6..10]);
    }

    #[test]
    #[expect(
        clippy::reversed_empty_ranges,
        reason = "We want an invalid range for testing."
    )]
    fn empty_and_reversed_ranges_are_ignored() {
        let mut text = AttributedString::from("0123456789");
        let before = text.clone();
        text.set_color(7..3, css::RED);
        text.set_color(4..4, css::RED);
        text.set_color(10..20, css::RED);
        assert_eq!(text, before);
    }

    #[test]
    fn outline_width_is_never_negative() {
        let mut text = AttributedString::from("abc");
        text.set_outline_width(.., -2.0);
        assert_eq!(text.attribute(0).outline_width, 0.0);
        text.set_outline_width(1..2, 1.5);
        assert_eq!(text.attribute(1).outline_width, 1.5);
        text.set_outline_width(.., f32::INFINITY);
        assert_eq!(ranges(&text), [0..3]);
    }

    #[test]
    fn append_inherits_last_font_and_color() {
        let mut text = AttributedString::new();
        let font = Font::new("Display", 30.0);
        text.append_styled("AB", font.clone(), css::ORANGE);
        text.append("CD");

        assert_eq!(text.text(), "ABCD");
        assert_eq!(ranges(&text), [0..4]);
        assert_eq!(text.attribute(0).font, font);
        assert_eq!(text.attribute(0).color, css::ORANGE);

        text.append_with_font("EF", Font::default());
        assert_eq!(ranges(&text), [0..4, 4..6]);
        assert_eq!(text.attribute(1).color, css::ORANGE);

        text.append_with_color("GH", css::BLUE);
        assert_eq!(ranges(&text), [0..4, 4..6, 6..8]);
        assert_eq!(text.attribute(2).font, Font::default());
    }

    #[test]
    fn append_does_not_inherit_decorations() {
        let mut text = AttributedString::from("ab");
        text.set_underlined(.., true);
        text.set_ligatures(.., Ligatures::All);
        text.append("cd");

        assert_eq!(ranges(&text), [0..2, 2..4]);
        assert!(!text.attribute(1).underlined);
        assert_eq!(text.attribute(1).ligatures, Ligatures::Standard);
    }

    #[test]
    fn append_empty_is_noop() {
        let mut text = AttributedString::from("ab");
        text.append_with_color("", css::RED);
        assert_eq!(ranges(&text), [0..2]);
    }

    #[test]
    fn append_attributed_rebases_ranges() {
        let mut a = AttributedString::from("AB");
        let mut b = AttributedString::from("XY");
        b.set_font(.., Font::new("Other", 9.0));
        b.set_justification(Justification::CENTRED);

        a.append_attributed(&b);

        assert_eq!(a.text(), "ABXY");
        assert_eq!(ranges(&a), [0..2, 2..4]);
        assert!(a.attribute(1).has_same_style(b.attribute(0)));
        assert_eq!(a.justification(), Justification::LEFT);
    }

    #[test]
    fn append_attributed_coalesces_equal_styles() {
        let mut a = AttributedString::from("AB");
        a.append_attributed(&AttributedString::from("XY"));
        assert_eq!(ranges(&a), [0..4]);
    }

    #[test]
    fn clear_keeps_paragraph_style() {
        let mut text = AttributedString::from("Hello");
        text.set_word_wrap(WordWrap::ByChar);
        text.set_reading_direction(ReadingDirection::RightToLeft);
        text.set_line_spacing(3.0);
        text.clear();

        assert!(text.is_empty());
        assert_eq!(text.num_attributes(), 0);
        assert_eq!(text.word_wrap(), WordWrap::ByChar);
        assert_eq!(text.reading_direction(), ReadingDirection::RightToLeft);
        assert_eq!(text.line_spacing(), 3.0);
    }

    #[test]
    fn set_text_leaves_attributes_alone() {
        let mut text = AttributedString::from("Hello");
        text.set_color(1..3, css::RED);
        let attributes = text.attributes().to_vec();

        text.set_text("Hello, world");
        assert_eq!(text.attributes(), attributes.as_slice());
        assert!(!text.covers_text());

        // Only the attributed prefix can be changed until the caller re-attributes.
        text.set_underlined(4..12, true);
        assert_eq!(ranges(&text), [0..1, 1..3, 3..4, 4..5]);

        text.set_text("Hi");
        text.set_color(.., css::GREEN);
        assert_eq!(ranges(&text), [0..2, 2..3, 3..4, 4..5]);
        assert_eq!(text.attribute(0).color, css::GREEN);
        assert_eq!(text.attribute(1).color, css::RED);
    }

    #[test]
    fn multibyte_boundaries() {
        let mut text = AttributedString::from("héllo wörld");
        let o = text.text().find('w').unwrap();
        text.set_underlined(o.., true);
        assert_eq!(ranges(&text), [0..o, o..text.len()]);

        let range = text.text_range(o..text.len()).unwrap();
        assert_eq!(text.slice(range), "wörld");
        assert!(text.text_range(2..3).is_err());
    }

    #[test]
    fn attribute_at_finds_covering_attribute() {
        let mut text = AttributedString::from("0123456789");
        text.set_color(3..7, css::RED);
        assert_eq!(text.attribute_at(0).unwrap().range, 0..3);
        assert_eq!(text.attribute_at(3).unwrap().range, 3..7);
        assert_eq!(text.attribute_at(6).unwrap().range, 3..7);
        assert_eq!(text.attribute_at(9).unwrap().range, 7..10);
        assert!(text.attribute_at(10).is_none());
    }

    #[test]
    #[should_panic(expected = "attribute index 1 out of range")]
    fn attribute_index_out_of_range_panics() {
        let text = AttributedString::from("abc");
        let _ = text.attribute(1);
    }

    #[test]
    fn partition_holds_under_mixed_mutation() {
        // Small deterministic LCG so the sequence is reproducible.
        let mut seed = 0x2545_f491_u32;
        let mut next = |bound: usize| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (seed >> 16) as usize % bound.max(1)
        };
        let colors = [css::RED, css::GREEN, css::BLUE, css::BLACK];

        let mut text = AttributedString::new();
        for step in 0..400 {
            let len = text.len();
            let a = next(len + 4);
            let b = next(len + 4);
            match next(9) {
                0 => text.append("word "),
                1 => text.append_with_color("xy", colors[next(colors.len())]),
                2 => text.set_color(a..b, colors[next(colors.len())]),
                3 => text.set_font(a..b, Font::new("F", 8.0 + next(3) as f32)),
                4 => text.set_outline_color(a..b, colors[next(colors.len())]),
                5 => text.set_outline_width(a..b, next(3) as f32),
                6 => text.set_underlined(a..b, next(2) == 0),
                7 => text.set_ligatures(a..b, Ligatures::Essential),
                _ if step % 97 == 0 => text.clear(),
                _ => text.append_attributed(&AttributedString::from("zz")),
            }
            assert_partition(&text);
            for pair in text.attributes().windows(2) {
                assert!(
                    !pair[0].has_same_style(&pair[1]),
                    "adjacent equal styles are coalesced"
                );
            }
        }
    }
}
