// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::AttributedString;

use crate::kurbo::Rect;
use crate::{DrawingSurface, TextLayout, TextShaper};

/// Draw `text` inside `area` on `surface`.
///
/// Surfaces with their own text engine lay the text out themselves. Otherwise the text is laid
/// out with `shaper` to the width of `area`, aligned inside it according to the text's
/// justification, and drawn glyph by glyph.
pub fn draw(
    surface: &mut (impl DrawingSurface + ?Sized),
    shaper: &mut (impl TextShaper + ?Sized),
    text: &AttributedString,
    area: Rect,
) {
    if text.is_empty() {
        return;
    }
    if surface.draw_text_layout(text, area) {
        return;
    }
    #[expect(clippy::cast_possible_truncation, reason = "layout widths are f32")]
    let width = area.abs().width() as f32;
    TextLayout::new(text, width, shaper).draw(surface, shaper, area);
}
