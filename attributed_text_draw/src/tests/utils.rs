// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::{AttributedString, Font};

use crate::kurbo::Point;
use crate::{
    CanvasCommand, FixedAdvanceShaper, RecordingCanvas, RecordingCanvasConfig, RenderContext,
    TextLayout,
};

/// Size of [`test_font`]: glyphs advance 5, ascend 8 and descend 2 with [`FixedAdvanceShaper`].
pub(crate) const TEST_FONT_SIZE: f32 = 10.0;

pub(crate) fn test_font() -> Font {
    Font::new("Test", TEST_FONT_SIZE)
}

/// `text` in [`test_font`].
pub(crate) fn test_text(text: &str) -> AttributedString {
    let mut attributed = AttributedString::new();
    attributed.append_with_font(text, test_font());
    attributed
}

pub(crate) fn test_context() -> RenderContext<RecordingCanvas> {
    RenderContext::new(RecordingCanvas::new(100, 100))
}

pub(crate) fn test_context_with(config: RecordingCanvasConfig) -> RenderContext<RecordingCanvas> {
    RenderContext::new(RecordingCanvas::with_config(100, 100, config))
}

pub(crate) fn layout(text: &AttributedString, max_width: f32) -> TextLayout {
    TextLayout::new(text, max_width, &mut FixedAdvanceShaper::default())
}

/// The text of every line of `layout`.
pub(crate) fn line_texts<'a>(text: &'a AttributedString, layout: &TextLayout) -> Vec<&'a str> {
    layout
        .lines()
        .iter()
        .map(|line| &text.text()[line.range.clone()])
        .collect()
}

/// Glyph ids and device-space origins of every glyph shown on `canvas`.
pub(crate) fn shown_glyphs(canvas: &RecordingCanvas) -> Vec<(u32, Point)> {
    canvas
        .commands()
        .iter()
        .filter_map(|command| {
            let CanvasCommand::ShowGlyph { glyph_id, .. } = command else {
                return None;
            };
            Some((*glyph_id, command.glyph_origin()?))
        })
        .collect()
}

#[track_caller]
pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[track_caller]
pub(crate) fn assert_point_close(actual: Point, expected: Point) {
    assert!(
        (actual - expected).hypot() < 1e-4,
        "expected {expected:?}, got {actual:?}"
    );
}
