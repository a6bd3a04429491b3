// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph-by-glyph layout of an [`AttributedString`], for surfaces without a text engine.

#![allow(
    clippy::cast_possible_truncation,
    reason = "layout works in f32 while geometry is f64"
)]

use core::ops::Range;

use attributed_text::{
    Attribute, AttributedString, HorizontalAlign, ReadingDirection, VerticalAlign, WordWrap,
};
use smallvec::SmallVec;
use unicode_bidi::{get_base_direction, Direction};
use unicode_segmentation::UnicodeSegmentation;

use crate::kurbo::{self, Affine, Rect, Stroke, StrokeOpts, Vec2};
use crate::shaper::{FontMetrics, ShapedGlyph, TextShaper};
use crate::{DrawingSurface, Fill, IntRect};

/// Tolerance used when stroking glyph outlines.
const OUTLINE_TOLERANCE: f64 = 0.05;

/// A glyph placed on a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the run's font.
    pub id: u32,
    /// Left edge of the glyph, relative to the layout's left edge.
    pub x: f32,
    /// Horizontal advance.
    pub advance: f32,
}

/// Consecutive glyphs of one line sharing one attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    /// The style of the run; its range is the text the run covers.
    pub attribute: Attribute,
    /// The glyphs, in text order.
    pub glyphs: Vec<PositionedGlyph>,
}

impl GlyphRun {
    /// The horizontal span covered by the run's glyphs, if it has any.
    pub fn extent(&self) -> Option<(f32, f32)> {
        self.glyphs.iter().fold(None, |extent, glyph| {
            let (start, end) = extent.unwrap_or((glyph.x, glyph.x + glyph.advance));
            Some((start.min(glyph.x), end.max(glyph.x + glyph.advance)))
        })
    }
}

/// One laid out line.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutLine {
    /// The text on this line, including trailing whitespace.
    pub range: Range<usize>,
    /// Left edge of the line box, relative to the layout's left edge.
    pub x: f32,
    /// Width of the line box, without trailing whitespace.
    pub width: f32,
    /// Baseline position, relative to the top of the layout.
    pub baseline: f32,
    /// Largest ascent on the line.
    pub ascent: f32,
    /// Largest descent on the line.
    pub descent: f32,
    /// Styled runs of glyphs, in text order. Trailing whitespace has no glyphs.
    pub runs: SmallVec<[GlyphRun; 2]>,
}

impl LayoutLine {
    /// The line box, relative to the top left of the layout.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.baseline - self.ascent),
            f64::from(self.x + self.width),
            f64::from(self.baseline + self.descent),
        )
    }
}

/// An [`AttributedString`] broken into positioned lines of glyphs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    lines: Vec<LayoutLine>,
    max_width: f32,
    height: f32,
    vertical: VerticalAlign,
    right_to_left: bool,
}

/// A part of a paragraph styled by one attribute.
struct Piece<'a> {
    range: Range<usize>,
    attribute: &'a Attribute,
    metrics: FontMetrics,
}

/// The glyphs of one shaping cluster; lines only break between clusters.
struct Cluster {
    text: Range<usize>,
    glyphs: Range<usize>,
    advance: f32,
    whitespace: bool,
    piece: usize,
}

impl TextLayout {
    /// Lay out `text` in lines at most `max_width` wide.
    ///
    /// An infinite `max_width` never wraps and aligns every line to the left edge.
    pub fn new(
        text: &AttributedString,
        max_width: f32,
        shaper: &mut (impl TextShaper + ?Sized),
    ) -> Self {
        let style = text.paragraph_style();
        let right_to_left = match style.reading_direction {
            ReadingDirection::LeftToRight => false,
            ReadingDirection::RightToLeft => true,
            ReadingDirection::Natural => get_base_direction(text.text()) == Direction::Rtl,
        };
        let bounded = max_width.is_finite();
        let max_width = if bounded { max_width.max(0.0) } else { 0.0 };
        let wrap_width = if style.word_wrap == WordWrap::None || !bounded {
            f32::INFINITY
        } else {
            max_width
        };
        let line_height_multiple = if style.line_height_multiple > 0.0 {
            style.line_height_multiple
        } else {
            1.0
        };

        let fallback = Attribute::default();
        let paragraphs = paragraph_ranges(text.text());
        let mut glyphs = Vec::new();
        let mut lines = Vec::new();
        let mut y = 0.0_f32;

        for (index, paragraph) in paragraphs.iter().enumerate() {
            if index > 0 {
                y += style.paragraph_spacing_before;
            }
            let pieces = styled_pieces(text, paragraph.clone(), &fallback, shaper);
            let clusters = shape_clusters(text.text(), &pieces, shaper, &mut glyphs);
            let breaks = break_offsets(
                &text.text()[paragraph.clone()],
                paragraph.start,
                style.word_wrap,
            );
            let line_ranges = break_lines(&clusters, &breaks, wrap_width);
            let line_count = line_ranges.len();

            for (line_index, cluster_range) in line_ranges.into_iter().enumerate() {
                if !lines.is_empty() {
                    y += style.line_spacing;
                }
                let line_clusters = &clusters[cluster_range];
                let (ascent, descent) = if line_clusters.is_empty() {
                    let attribute = attribute_near(text, paragraph.start, &fallback);
                    let metrics = shaper.metrics(&attribute.font);
                    (metrics.ascent, metrics.descent)
                } else {
                    line_clusters.iter().fold((0.0_f32, 0.0_f32), |(a, d), cluster| {
                        let metrics = pieces[cluster.piece].metrics;
                        (a.max(metrics.ascent), d.max(metrics.descent))
                    })
                };
                let natural = ascent + descent;
                let line_height = natural * line_height_multiple;
                let baseline = y + (line_height - natural) + ascent;
                y += line_height;

                let visible = line_clusters
                    .iter()
                    .rposition(|cluster| !cluster.whitespace)
                    .map_or(0, |last| last + 1);
                let visible_clusters = &line_clusters[..visible];
                let natural_width: f32 = visible_clusters.iter().map(|c| c.advance).sum();
                let slack = if bounded {
                    max_width - natural_width
                } else {
                    0.0
                };

                let justify = style.justification.horizontal == HorizontalAlign::Justified
                    && line_index + 1 < line_count
                    && slack > 0.0;
                let gaps = if justify {
                    visible_clusters.iter().filter(|c| c.whitespace).count()
                } else {
                    0
                };
                let gap_extra = if gaps > 0 { slack / gaps as f32 } else { 0.0 };
                let width = if gaps > 0 { max_width } else { natural_width };
                let x = match style.justification.horizontal {
                    HorizontalAlign::Left | HorizontalAlign::Justified => 0.0,
                    HorizontalAlign::Right => slack,
                    HorizontalAlign::Centred => slack / 2.0,
                };

                let mut runs: SmallVec<[GlyphRun; 2]> = SmallVec::new();
                let mut current_piece = None;
                let mut pen = 0.0_f32;
                for cluster in visible_clusters {
                    let piece = &pieces[cluster.piece];
                    if current_piece != Some(cluster.piece) {
                        current_piece = Some(cluster.piece);
                        runs.push(GlyphRun {
                            attribute: Attribute {
                                range: cluster.text.start..cluster.text.start,
                                ..piece.attribute.clone()
                            },
                            glyphs: Vec::new(),
                        });
                    }
                    let mut glyph_x = if right_to_left {
                        x + width - pen - cluster.advance
                    } else {
                        x + pen
                    };
                    if let Some(run) = runs.last_mut() {
                        run.attribute.range.end = cluster.text.end;
                        for glyph in &glyphs[cluster.glyphs.clone()] {
                            run.glyphs.push(PositionedGlyph {
                                id: glyph.id,
                                x: glyph_x,
                                advance: glyph.advance,
                            });
                            glyph_x += glyph.advance;
                        }
                    }
                    pen += cluster.advance;
                    if cluster.whitespace {
                        pen += gap_extra;
                    }
                }

                let range = match (line_clusters.first(), line_clusters.last()) {
                    (Some(first), Some(last)) => first.text.start..last.text.end,
                    _ => paragraph.start..paragraph.start,
                };
                lines.push(LayoutLine {
                    range,
                    x,
                    width,
                    baseline,
                    ascent,
                    descent,
                    runs,
                });
            }

            if index + 1 < paragraphs.len() {
                y += style.paragraph_spacing;
            }
        }

        Self {
            lines,
            max_width,
            height: y,
            vertical: style.justification.vertical,
            right_to_left,
        }
    }

    /// The laid out lines, top to bottom.
    pub fn lines(&self) -> &[LayoutLine] {
        &self.lines
    }

    /// The total height of all lines and spacing.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The width of the widest line.
    pub fn width(&self) -> f32 {
        self.lines.iter().map(|line| line.width).fold(0.0, f32::max)
    }

    /// The width lines were wrapped and aligned to; `0` when unbounded.
    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Whether lines are placed from right to left.
    pub fn is_right_to_left(&self) -> bool {
        self.right_to_left
    }

    /// How far below the top of an area `area_height` tall the first line starts.
    pub fn vertical_offset(&self, area_height: f32) -> f32 {
        match self.vertical {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Centred => (area_height - self.height) / 2.0,
            VerticalAlign::Bottom => area_height - self.height,
        }
    }

    /// Draw the layout into `area` on `surface`.
    ///
    /// Lines entirely outside the surface's clip region are skipped. The surface state is
    /// saved and restored around the drawing.
    pub fn draw(
        &self,
        surface: &mut (impl DrawingSurface + ?Sized),
        shaper: &mut (impl TextShaper + ?Sized),
        area: Rect,
    ) {
        let area = area.abs();
        let origin = Vec2::new(
            area.x0,
            area.y0 + f64::from(self.vertical_offset(area.height() as f32)),
        );
        surface.save_state();
        for line in &self.lines {
            if line.runs.is_empty() {
                continue;
            }
            let outline = line
                .runs
                .iter()
                .map(|run| f64::from(run.attribute.outline_width))
                .fold(0.0, f64::max);
            let bounds = line.bounds().inflate(outline + 1.0, outline + 1.0) + origin;
            if !surface.clip_region_intersects(IntRect::enclosing(bounds)) {
                log::trace!("skipping clipped line {:?}", line.range);
                continue;
            }
            let baseline = origin.y + f64::from(line.baseline);
            for run in &line.runs {
                draw_run(surface, shaper, run, origin.x, baseline);
            }
        }
        surface.restore_state();
    }
}

fn draw_run(
    surface: &mut (impl DrawingSurface + ?Sized),
    shaper: &mut (impl TextShaper + ?Sized),
    run: &GlyphRun,
    left: f64,
    baseline: f64,
) {
    let attribute = &run.attribute;
    let font = &attribute.font;
    let glyph_origin = |glyph: &PositionedGlyph| {
        Affine::translate((left + f64::from(glyph.x), baseline))
    };

    surface.set_font(font);
    surface.set_fill(Fill::solid(attribute.color));
    for glyph in &run.glyphs {
        surface.draw_glyph(glyph.id, glyph_origin(glyph));
    }

    let outlined = attribute.outline_width > 0.0;
    if outlined {
        let size = f64::from(font.size());
        let text_transform =
            Affine::scale_non_uniform(size * f64::from(font.horizontal_scale()), size);
        let stroke = Stroke::new(f64::from(attribute.outline_width));
        surface.set_fill(Fill::solid(attribute.outline_color));
        for glyph in &run.glyphs {
            let Some(mut outline) = shaper.glyph_outline(font, glyph.id) else {
                continue;
            };
            outline.apply_affine(text_transform);
            let stroked = kurbo::stroke(
                outline.iter(),
                &stroke,
                &StrokeOpts::default(),
                OUTLINE_TOLERANCE,
            );
            surface.fill_path(&stroked, glyph_origin(glyph));
        }
    }

    if attribute.underlined {
        let Some((start, end)) = run.extent() else {
            return;
        };
        let metrics = shaper.metrics(font);
        let top = baseline + f64::from(metrics.underline_offset);
        if outlined {
            surface.set_fill(Fill::solid(attribute.color));
        }
        surface.fill_rect(Rect::new(
            left + f64::from(start),
            top,
            left + f64::from(end),
            top + f64::from(metrics.underline_thickness),
        ));
    }
}

/// The content range of every paragraph: text between `\n`s, without a trailing `\r`.
///
/// A final newline ends the last paragraph rather than starting an empty one.
fn paragraph_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        let end = start + line.len();
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        ranges.push(start..start + content.len());
        start = end;
    }
    if ranges.is_empty() {
        ranges.push(0..0);
    }
    ranges
}

/// Snap `offset` down to the nearest UTF-8 boundary in `text`.
fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// The attribute covering `offset`, or the one just before it, or `fallback`.
fn attribute_near<'a>(
    text: &'a AttributedString,
    offset: usize,
    fallback: &'a Attribute,
) -> &'a Attribute {
    if let Some(attribute) = text.attribute_at(offset) {
        return attribute;
    }
    let previous = offset
        .checked_sub(1)
        .and_then(|prev| text.attribute_at(prev));
    previous
        .or_else(|| text.attributes().last())
        .unwrap_or(fallback)
}

/// Split `paragraph` at attribute boundaries. Text past the attributes uses `fallback`.
fn styled_pieces<'a>(
    text: &'a AttributedString,
    paragraph: Range<usize>,
    fallback: &'a Attribute,
    shaper: &mut (impl TextShaper + ?Sized),
) -> Vec<Piece<'a>> {
    let source = text.text();
    let attributes = text.attributes();
    let first = attributes.partition_point(|attribute| attribute.range.end <= paragraph.start);
    let mut pieces = Vec::new();
    let mut covered = paragraph.start;
    let mut push = |range: Range<usize>, attribute: &'a Attribute| {
        let metrics = shaper.metrics(&attribute.font);
        pieces.push(Piece {
            range,
            attribute,
            metrics,
        });
    };
    for attribute in &attributes[first..] {
        if attribute.range.start >= paragraph.end {
            break;
        }
        let end = floor_char_boundary(source, attribute.range.end.min(paragraph.end));
        if end > covered {
            push(covered..end, attribute);
            covered = end;
        }
    }
    if covered < paragraph.end {
        push(covered..paragraph.end, fallback);
    }
    pieces
}

/// Shape every piece and group the glyphs into clusters.
fn shape_clusters(
    source: &str,
    pieces: &[Piece<'_>],
    shaper: &mut (impl TextShaper + ?Sized),
    glyphs: &mut Vec<ShapedGlyph>,
) -> Vec<Cluster> {
    glyphs.clear();
    let mut clusters = Vec::new();
    for (index, piece) in pieces.iter().enumerate() {
        let piece_text = &source[piece.range.clone()];
        let first = glyphs.len();
        let attribute = piece.attribute;
        shaper.shape(piece_text, &attribute.font, attribute.ligatures, glyphs);

        let mut start = first;
        while start < glyphs.len() {
            let offset = glyphs[start].cluster.min(piece_text.len());
            let end = glyphs[start..]
                .iter()
                .position(|glyph| glyph.cluster != glyphs[start].cluster)
                .map_or(glyphs.len(), |count| start + count);
            let text_end = glyphs
                .get(end)
                .map_or(piece_text.len(), |glyph| glyph.cluster)
                .clamp(offset, piece_text.len());
            let text = piece.range.start + offset..piece.range.start + text_end;
            clusters.push(Cluster {
                whitespace: source
                    .get(text.clone())
                    .is_some_and(|s| s.chars().all(char::is_whitespace)),
                text,
                glyphs: start..end,
                advance: glyphs[start..end].iter().map(|glyph| glyph.advance).sum(),
                piece: index,
            });
            start = end;
        }
    }
    clusters
}

/// The offsets at which a line may start, sorted.
fn break_offsets(paragraph: &str, base: usize, word_wrap: WordWrap) -> Vec<usize> {
    match word_wrap {
        WordWrap::None => Vec::new(),
        WordWrap::ByChar => paragraph
            .grapheme_indices(true)
            .skip(1)
            .map(|(offset, _)| base + offset)
            .collect(),
        WordWrap::ByWord => {
            let mut offsets = Vec::new();
            let mut after_whitespace = false;
            for (offset, segment) in paragraph.split_word_bound_indices() {
                let whitespace = segment.chars().all(char::is_whitespace);
                if after_whitespace && !whitespace {
                    offsets.push(base + offset);
                }
                after_whitespace = whitespace;
            }
            offsets
        }
    }
}

/// Greedily split `clusters` into lines no wider than `max_width`.
///
/// Whitespace may hang past the edge. A line breaks at the last allowed offset before the
/// overflow, or right before the overflowing cluster if there is none. Every line gets at
/// least one cluster.
fn break_lines(clusters: &[Cluster], breaks: &[usize], max_width: f32) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    if clusters.is_empty() {
        lines.push(0..0);
        return lines;
    }
    let mut start = 0;
    while start < clusters.len() {
        let mut x = 0.0;
        let mut last_break = None;
        let mut end = clusters.len();
        for (index, cluster) in clusters.iter().enumerate().skip(start) {
            if index > start {
                if breaks.binary_search(&cluster.text.start).is_ok() {
                    last_break = Some(index);
                }
                if !cluster.whitespace && x + cluster.advance > max_width {
                    end = last_break.unwrap_or(index);
                    break;
                }
            }
            x += cluster.advance;
        }
        lines.push(start..end);
        start = end;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{break_offsets, paragraph_ranges};
    use attributed_text::WordWrap;

    #[test]
    #[expect(
        clippy::single_range_in_vec_init,
        reason = "Paragraphs are compared as range lists."
    )]
    fn paragraphs_split_on_newlines() {
        assert_eq!(paragraph_ranges(""), [0..0]);
        assert_eq!(paragraph_ranges("ab\ncd"), [0..2, 3..5]);
        assert_eq!(paragraph_ranges("ab\r\ncd\n"), [0..2, 4..6]);
        assert_eq!(paragraph_ranges("\n\nx"), [0..0, 1..1, 2..3]);
    }

    #[test]
    fn word_breaks_follow_whitespace() {
        assert_eq!(break_offsets("aa bb  cc", 10, WordWrap::ByWord), [13, 17]);
        assert_eq!(break_offsets("ab", 0, WordWrap::ByChar), [1]);
        assert!(break_offsets("a b", 0, WordWrap::None).is_empty());
    }
}
