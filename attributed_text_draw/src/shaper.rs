// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::{Font, Ligatures};
use unicode_segmentation::UnicodeSegmentation;

use crate::kurbo::{BezPath, Rect, Shape};

/// Vertical metrics of a font at its size, in user units.
///
/// All values are positive distances from the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line.
    pub descent: f32,
    /// Distance from the baseline down to the top of the underline.
    pub underline_offset: f32,
    /// Underline thickness.
    pub underline_thickness: f32,
}

/// One glyph produced by [`TextShaper::shape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id in the font.
    pub id: u32,
    /// Horizontal advance in user units.
    pub advance: f32,
    /// Byte offset, in the shaped text, of the cluster the glyph belongs to.
    ///
    /// Glyphs of a cluster are adjacent and clusters appear in text order.
    pub cluster: usize,
}

/// Turns text into glyphs and provides the font data layout and drawing need.
pub trait TextShaper {
    /// The vertical metrics of `font`.
    fn metrics(&mut self, font: &Font) -> FontMetrics;

    /// Shape `text` in `font`, appending the glyphs to `glyphs`.
    fn shape(
        &mut self,
        text: &str,
        font: &Font,
        ligatures: Ligatures,
        glyphs: &mut Vec<ShapedGlyph>,
    );

    /// The outline of a glyph in em units, with y pointing down; `None` for empty glyphs.
    fn glyph_outline(&mut self, font: &Font, glyph_id: u32) -> Option<BezPath>;
}

/// A [`TextShaper`] with synthetic metrics, for tests and headless layout.
///
/// Every grapheme gets one glyph whose id is its first code point and whose advance is
/// `advance * size * horizontal_scale`. Ligatures replace `fi`, `fl` (standard) and `ff`
/// (all) with the matching presentation form code points. Outlines are boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceShaper {
    /// Advance of every glyph, in em.
    pub advance: f32,
    /// Ascent, in em.
    pub ascent: f32,
    /// Descent, in em.
    pub descent: f32,
}

impl Default for FixedAdvanceShaper {
    fn default() -> Self {
        Self {
            advance: 0.5,
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

const LIGATURE_FF: u32 = 0xFB00;
const LIGATURE_FI: u32 = 0xFB01;
const LIGATURE_FL: u32 = 0xFB02;

fn ligature(first: &str, second: &str, ligatures: Ligatures) -> Option<u32> {
    match (ligatures, first, second) {
        (Ligatures::Essential, ..) => None,
        (_, "f", "i") => Some(LIGATURE_FI),
        (_, "f", "l") => Some(LIGATURE_FL),
        (Ligatures::All, "f", "f") => Some(LIGATURE_FF),
        _ => None,
    }
}

impl TextShaper for FixedAdvanceShaper {
    fn metrics(&mut self, font: &Font) -> FontMetrics {
        let size = font.size();
        FontMetrics {
            ascent: self.ascent * size,
            descent: self.descent * size,
            underline_offset: 0.1 * size,
            underline_thickness: size / 14.0,
        }
    }

    fn shape(
        &mut self,
        text: &str,
        font: &Font,
        ligatures: Ligatures,
        glyphs: &mut Vec<ShapedGlyph>,
    ) {
        let advance = self.advance * font.size() * font.horizontal_scale();
        let mut graphemes = text.grapheme_indices(true).peekable();
        while let Some((offset, grapheme)) = graphemes.next() {
            let next = graphemes.peek().map_or("", |(_, next)| *next);
            if let Some(id) = ligature(grapheme, next, ligatures) {
                graphemes.next();
                glyphs.push(ShapedGlyph {
                    id,
                    advance,
                    cluster: offset,
                });
                continue;
            }
            let id = grapheme.chars().next().map_or(0, u32::from);
            glyphs.push(ShapedGlyph {
                id,
                advance,
                cluster: offset,
            });
        }
    }

    fn glyph_outline(&mut self, _font: &Font, glyph_id: u32) -> Option<BezPath> {
        if char::from_u32(glyph_id).is_none_or(char::is_whitespace) {
            return None;
        }
        let width = f64::from(self.advance);
        let top = -f64::from(self.ascent) * 0.9;
        Some(Rect::new(0.1 * width, top, 0.9 * width, 0.0).to_path(0.1))
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedAdvanceShaper, ShapedGlyph, TextShaper};
    use attributed_text::{Font, Ligatures};

    fn shape(text: &str, ligatures: Ligatures) -> Vec<ShapedGlyph> {
        let mut glyphs = Vec::new();
        let font = Font::new("Test", 10.0);
        FixedAdvanceShaper::default().shape(text, &font, ligatures, &mut glyphs);
        glyphs
    }

    #[test]
    fn one_glyph_per_grapheme() {
        let glyphs = shape("ae\u{301}b", Ligatures::Standard);
        let clusters: Vec<_> = glyphs.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, [0, 1, 4]);
        assert!(glyphs.iter().all(|g| g.advance == 5.0));
        assert_eq!(glyphs[0].id, u32::from('a'));
    }

    fn ids(ligatures: Ligatures) -> Vec<u32> {
        shape("fifflx", ligatures).iter().map(|g| g.id).collect()
    }

    #[test]
    fn ligature_modes() {
        let (f, l, x) = (u32::from('f'), u32::from('l'), u32::from('x'));
        assert_eq!(ids(Ligatures::Essential).len(), 6);
        assert_eq!(ids(Ligatures::Standard), [0xFB01, f, 0xFB02, x]);
        assert_eq!(ids(Ligatures::All), [0xFB01, 0xFB00, l, x]);
    }

    #[test]
    fn metrics_scale_with_size() {
        let metrics = FixedAdvanceShaper::default().metrics(&Font::new("Test", 20.0));
        assert_eq!(metrics.ascent, 16.0);
        assert_eq!(metrics.descent, 4.0);
    }

    #[test]
    fn whitespace_has_no_outline() {
        let mut shaper = FixedAdvanceShaper::default();
        let font = Font::default();
        assert!(shaper.glyph_outline(&font, u32::from(' ')).is_none());
        assert!(shaper.glyph_outline(&font, u32::from('x')).is_some());
    }
}
