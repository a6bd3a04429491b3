// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::palette::css;
use peniko::{Compose, ImageQuality};

use crate::kurbo::{Affine, Line, Point, Rect, Shape};
use crate::{
    CanvasCommand, ColorSpace, DrawingSurface, Fill, GradientFill, Image, ImageFormat, IntRect,
    RecordingCanvas, RecordingCanvasConfig, RectList, RenderConfig, RenderContext,
};

use super::utils::{assert_close, assert_point_close, test_context, test_context_with, test_font};

fn red_blue_gradient() -> GradientFill {
    GradientFill::linear((0.0, 0.0), (10.0, 0.0))
        .with_stop(0.0, css::RED)
        .with_stop(1.0, css::BLUE)
}

fn argb_image() -> Image {
    Image::new(2, 2, ImageFormat::Argb, vec![255_u8; 16]).unwrap()
}

#[test]
fn restore_brings_back_fill_font_transform_and_clip() {
    let mut cx = test_context();
    cx.set_font(&test_font());
    let clip = cx.clip_bounds();
    assert_eq!(clip, IntRect::new(0, 0, 100, 100));

    cx.save_state();
    cx.set_fill(Fill::solid(css::RED));
    cx.set_font(&test_font().bold());
    cx.add_transform(Affine::translate((5.0, 5.0)));
    assert!(cx.clip_to_rectangle(IntRect::new(0, 0, 10, 10)));
    assert_eq!(cx.clip_bounds(), IntRect::new(0, 0, 10, 10));
    assert_eq!(cx.state_depth(), 1);
    cx.restore_state();

    assert_eq!(cx.fill(), &Fill::default());
    assert_eq!(cx.font(), &test_font());
    assert_eq!(cx.transform(), Affine::IDENTITY);
    assert_eq!(cx.clip_bounds(), clip);
    assert_eq!(cx.state_depth(), 0);
    assert_eq!(cx.canvas().save_depth(), 0);
    assert_eq!(cx.canvas().fill_color(), css::BLACK);
}

#[test]
fn set_origin_moves_the_cached_clip() {
    let mut cx = test_context();
    assert_eq!(cx.clip_bounds(), IntRect::new(0, 0, 100, 100));
    cx.set_origin(Point::new(10.0, 20.0));
    assert_eq!(cx.clip_bounds(), IntRect::new(-10, -20, 100, 100));
    assert_eq!(
        IntRect::enclosing(crate::NativeCanvas::clip_bounding_box(cx.canvas())),
        cx.clip_bounds()
    );
}

#[test]
fn physical_pixel_scale_follows_the_transform() {
    let mut cx = test_context();
    assert_eq!(cx.physical_pixel_scale(), 1.0);
    cx.add_transform(Affine::scale(2.0));
    assert_eq!(cx.physical_pixel_scale(), 2.0);
    assert!(!cx.is_vector_device());
}

#[test]
fn empty_rectangle_list_clips_everything() {
    let mut cx = test_context();
    assert!(!cx.clip_to_rectangle_list(&RectList::new()));
    assert!(cx.is_clip_empty());
    assert!(!cx.clip_region_intersects(IntRect::new(0, 0, 100, 100)));

    cx.fill_all();
    cx.fill_int_rect(IntRect::new(0, 0, 10, 10), false);
    assert_eq!(cx.canvas().draw_commands().count(), 0);
}

#[test]
fn clip_to_rectangle_reports_emptiness() {
    let mut cx = test_context();
    assert!(cx.clip_to_rectangle(IntRect::new(10, 10, 20, 20)));
    assert_eq!(cx.clip_bounds(), IntRect::new(10, 10, 20, 20));
    assert!(!cx.clip_to_rectangle(IntRect::new(50, 50, 5, 5)));
    assert!(cx.is_clip_empty());
}

#[test]
fn rectangle_list_clip_uses_every_rectangle() {
    let mut cx = test_context();
    let list: RectList = [IntRect::new(0, 0, 10, 10), IntRect::new(20, 0, 10, 10)]
        .into_iter()
        .collect();
    assert!(cx.clip_to_rectangle_list(&list));
    assert_eq!(cx.clip_bounds(), IntRect::new(0, 0, 30, 10));
    assert_eq!(
        cx.canvas().commands().last(),
        Some(&CanvasCommand::ClipRects(vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 30.0, 10.0),
        ]))
    );
}

#[test]
fn exclude_clip_rectangle_clips_to_the_rest() {
    let mut cx = test_context();
    cx.clip_to_rectangle(IntRect::new(0, 0, 50, 50));
    cx.exclude_clip_rectangle(IntRect::new(0, 0, 50, 25));

    let Some(CanvasCommand::ClipRects(rects)) = cx.canvas().commands().last() else {
        panic!("expected a rectangle list clip");
    };
    assert_eq!(rects.len(), 4);
    let hole = Rect::new(0.0, 0.0, 50.0, 25.0);
    assert!(rects.iter().all(|rect| rect.intersect(hole).is_zero_area()));
    let below = Point::new(25.0, 40.0);
    assert!(
        rects.iter().any(|rect| rect.contains(below)),
        "the part below the hole is still visible"
    );
}

#[test]
fn excluding_the_whole_clip_empties_it() {
    let mut cx = test_context();
    cx.exclude_clip_rectangle(IntRect::new(-10, -10, 200, 200));
    assert!(cx.is_clip_empty());
}

#[test]
fn singular_image_clip_clips_everything() {
    let mut cx = test_context();
    cx.clip_to_image_alpha(&argb_image(), Affine::scale(0.0));
    assert!(cx.is_clip_empty());
}

#[test]
fn image_alpha_clip_uses_a_grey_mask() {
    let mut cx = test_context();
    let image = argb_image();
    cx.clip_to_image_alpha(&image, Affine::translate((10.0, 10.0)));

    assert!(cx.canvas().commands().contains(&CanvasCommand::CreateImage {
        image: image.id(),
        color_space: ColorSpace::Grey,
    }));
    assert_eq!(cx.clip_bounds(), IntRect::new(10, 10, 2, 2));
    assert_eq!(cx.transform(), Affine::IDENTITY);
}

#[test]
fn transparency_layers_leave_no_trace() {
    let mut cx = test_context();
    cx.set_fill(Fill::solid(css::RED));

    cx.begin_transparency_layer(0.5);
    cx.begin_transparency_layer(2.0);
    assert_eq!(cx.state_depth(), 2);
    assert_eq!(cx.canvas().layer_depth(), 2);
    assert_eq!(cx.canvas().alpha(), 1.0);
    cx.end_transparency_layer();
    assert_eq!(cx.canvas().alpha(), 0.5);
    cx.end_transparency_layer();

    assert_eq!(cx.state_depth(), 0);
    assert_eq!(cx.canvas().layer_depth(), 0);
    assert_eq!(cx.canvas().save_depth(), 0);
    assert_eq!(cx.canvas().alpha(), 1.0);
    assert_eq!(cx.fill(), &Fill::solid(css::RED));
    assert_eq!(cx.canvas().draw_commands().count(), 0);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "restore_state called without a matching save_state")]
fn unbalanced_restore_is_a_precondition_violation() {
    test_context().restore_state();
}

#[test]
fn gradient_handle_is_released_with_its_state() {
    let mut cx = test_context();
    cx.save_state();
    cx.set_fill(Fill::gradient(red_blue_gradient()));
    assert_eq!(cx.canvas().live_handles().gradients, 1);
    cx.restore_state();
    assert_eq!(cx.canvas().live_handles().gradients, 0);
}

#[test]
fn uncached_font_handle_is_released_with_its_state() {
    let config = RenderConfig {
        font_cache_capacity: 0,
        ..RenderConfig::default()
    };
    let mut cx = RenderContext::with_config(RecordingCanvas::new(10, 10), config);
    cx.save_state();
    cx.set_font(&test_font());
    assert_eq!(cx.canvas().live_handles().fonts, 1);
    cx.restore_state();
    assert_eq!(cx.canvas().live_handles().fonts, 0);
}

#[test]
fn finish_releases_every_handle() {
    let mut cx = test_context();
    cx.set_font(&test_font());
    cx.draw_image(&argb_image(), Affine::IDENTITY);
    cx.save_state();
    cx.set_fill(Fill::gradient(red_blue_gradient()));
    assert_eq!(cx.canvas().live_handles().total(), 3);

    let canvas = cx.finish();
    assert_eq!(canvas.live_handles().total(), 0);
}

#[test]
fn set_font_is_idempotent() {
    let mut cx = test_context();
    cx.set_font(&test_font());
    cx.set_font(&test_font());
    cx.set_font(&test_font().bold());
    cx.set_font(&test_font());
    let creates = cx
        .canvas()
        .commands()
        .iter()
        .filter(|c| matches!(c, CanvasCommand::CreateFont { .. }))
        .count();
    assert_eq!(creates, 2);
}

#[test]
fn replacing_fill_uses_copy_compositing() {
    let mut cx = test_context();
    cx.fill_int_rect(IntRect::new(0, 0, 10, 10), true);
    assert!(cx.canvas().commands().ends_with(&[
        CanvasCommand::Save,
        CanvasCommand::SetCompose(Compose::Copy),
        CanvasCommand::FillRect(Rect::new(0.0, 0.0, 10.0, 10.0)),
        CanvasCommand::Restore,
    ]));
    assert_eq!(cx.canvas().compose(), Compose::SrcOver);
}

#[test]
fn zero_area_fills_are_no_ops() {
    let mut cx = test_context();
    cx.fill_rect(Rect::new(5.0, 5.0, 5.0, 20.0));
    cx.fill_rect_list(&[Rect::new(0.0, 0.0, 10.0, 0.0)]);
    cx.fill_int_rect(IntRect::new(0, 0, 0, 10), false);
    let square = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1);
    cx.fill_path(&square, Affine::scale(0.0));
    assert_eq!(cx.canvas().draw_commands().count(), 0);
}

#[test]
fn solid_fill_applies_opacity_to_the_color() {
    let mut cx = test_context();
    cx.set_fill(Fill::solid(css::RED));
    cx.set_opacity(0.25);
    assert_eq!(cx.canvas().fill_color(), css::RED.multiply_alpha(0.25));
    assert_eq!(cx.fill().opacity, 0.25);

    cx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(
        cx.canvas().commands().last(),
        Some(&CanvasCommand::FillRect(Rect::new(0.0, 0.0, 10.0, 10.0)))
    );
}

#[test]
fn gradient_fill_clips_then_paints() {
    let mut cx = test_context();
    cx.set_fill(Fill::gradient(red_blue_gradient()));
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    cx.fill_rect(rect);
    assert!(cx.canvas().commands().ends_with(&[
        CanvasCommand::Save,
        CanvasCommand::ClipRect(rect),
        CanvasCommand::SetAlpha(1.0),
        CanvasCommand::DrawGradient {
            gradient: 1,
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            radial: false,
        },
        CanvasCommand::Restore,
    ]));
}

#[test]
fn image_fill_tiles_the_image() {
    let mut cx = test_context();
    let image = argb_image();
    let fill = Fill::image(image.clone(), Affine::scale(2.0)).with_opacity(0.5);
    cx.set_fill(fill);
    cx.fill_rect_list(&[
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(20.0, 0.0, 30.0, 10.0),
    ]);

    let commands = cx.canvas().commands();
    assert!(commands.contains(&CanvasCommand::DrawImage {
        rect: image.bounds(),
        image: image.id(),
        tiled: true,
    }));
    assert!(commands.contains(&CanvasCommand::SetAlpha(0.5)));
    assert_eq!(cx.canvas().save_depth(), 0);
}

#[test]
fn images_are_created_once_per_color_space() {
    let mut cx = test_context();
    let image = argb_image();
    cx.set_interpolation_quality(ImageQuality::High);
    cx.draw_image(&image, Affine::IDENTITY);
    cx.draw_image(&image, Affine::translate((5.0, 5.0)));
    cx.draw_image(&image.clone(), Affine::rotate(0.3));

    let commands = cx.canvas().commands();
    let creates = commands
        .iter()
        .filter(|c| matches!(c, CanvasCommand::CreateImage { .. }))
        .count();
    let draws = commands
        .iter()
        .filter_map(|command| match command {
            CanvasCommand::DrawImage { tiled, .. } => Some(*tiled),
            _ => None,
        })
        .filter(|tiled| !tiled)
        .count();
    assert_eq!((creates, draws), (1, 3));
    assert_eq!(cx.cached_image_count(), 1);
    assert_eq!(cx.canvas().interpolation_quality(), ImageQuality::High);
}

#[test]
fn single_channel_images_mask_the_fill() {
    let mut cx = test_context();
    let mask = Image::new(2, 2, ImageFormat::SingleChannel, vec![128_u8; 4]).unwrap();
    cx.set_fill(Fill::solid(css::GREEN));
    cx.draw_image(&mask, Affine::IDENTITY);
    assert!(cx.canvas().commands().ends_with(&[
        CanvasCommand::Save,
        CanvasCommand::ConcatTransform(Affine::IDENTITY),
        CanvasCommand::ClipMask {
            rect: mask.bounds(),
            image: mask.id(),
        },
        CanvasCommand::FillRect(mask.bounds()),
        CanvasCommand::Restore,
    ]));
}

#[test]
fn image_cache_evicts_beyond_capacity() {
    let config = RenderConfig {
        image_cache_capacity: 1,
        ..RenderConfig::default()
    };
    let mut cx = RenderContext::with_config(RecordingCanvas::new(10, 10), config);
    cx.draw_image(&argb_image(), Affine::IDENTITY);
    cx.draw_image(&argb_image(), Affine::IDENTITY);
    assert_eq!(cx.cached_image_count(), 1);
    assert_eq!(cx.canvas().live_handles().images, 1);
}

#[test]
fn resource_failures_draw_nothing() {
    let mut cx = test_context_with(RecordingCanvasConfig {
        fail_fonts: true,
        fail_images: true,
        fail_gradients: true,
        ..RecordingCanvasConfig::default()
    });
    cx.set_font(&test_font());
    cx.draw_glyph(u32::from('a'), Affine::translate((1.0, 1.0)));
    cx.draw_image(&argb_image(), Affine::IDENTITY);
    cx.set_fill(Fill::gradient(red_blue_gradient()));
    cx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    cx.draw_line(Line::new((0.0, 0.0), (10.0, 10.0)));

    assert_eq!(cx.canvas().draw_commands().count(), 0);
    assert_eq!(cx.canvas().save_depth(), 0);
    assert_eq!(cx.canvas().live_handles().total(), 0);
    assert_eq!(cx.font(), &test_font());
}

#[test]
fn translated_glyphs_are_shown_at_a_position() {
    let mut cx = test_context();
    cx.set_font(&test_font());
    cx.draw_glyph(u32::from('A'), Affine::translate((10.0, 20.0)));

    let Some(command @ CanvasCommand::ShowGlyph { glyph_id, .. }) = cx.canvas().commands().last()
    else {
        panic!("expected a glyph");
    };
    assert_eq!(*glyph_id, u32::from('A'));
    assert_point_close(command.glyph_origin().unwrap(), Point::new(10.0, 20.0));
}

#[test]
fn transformed_glyphs_are_shown_under_the_transform() {
    let mut cx = test_context();
    cx.set_font(&test_font());
    let transform = Affine::rotate(0.5).then_translate((30.0, 40.0).into());
    cx.draw_glyph(u32::from('A'), transform);

    let commands = cx.canvas().commands();
    let [.., save, concat, glyph, restore] = commands else {
        panic!("expected the glyph to be wrapped in a save and restore");
    };
    assert_eq!(save, &CanvasCommand::Save);
    assert_eq!(concat, &CanvasCommand::ConcatTransform(transform));
    assert_eq!(restore, &CanvasCommand::Restore);
    let origin = glyph.glyph_origin().unwrap();
    assert_close(origin.x, 30.0);
    assert_close(origin.y, 40.0);
}

#[test]
fn glyphs_with_non_solid_fills_are_filled_outlines() {
    let mut cx = test_context();
    cx.set_font(&test_font());
    cx.set_fill(Fill::gradient(red_blue_gradient()));
    cx.draw_glyph(u32::from('A'), Affine::translate((10.0, 20.0)));

    let commands = cx.canvas().commands();
    let shows_glyph = commands
        .iter()
        .any(|c| matches!(c, CanvasCommand::ShowGlyph { .. }));
    assert!(!shows_glyph);
    let Some(CanvasCommand::ClipPath(path)) = commands
        .iter()
        .find(|command| matches!(command, CanvasCommand::ClipPath(_)))
    else {
        panic!("expected the outline to be used as a clip");
    };
    // The recording canvas outline is a box from (0.05, -0.7) to (0.45, 0) em.
    let bounds = path.bounding_box();
    assert_close(bounds.x0, 10.5);
    assert_close(bounds.y0, 13.0);
    assert_close(bounds.x1, 14.5);
    assert_close(bounds.y1, 20.0);
}

#[test]
fn lines_are_stroked_or_filled() {
    let mut cx = test_context();
    let line = Line::new((0.0, 5.0), (10.0, 5.0));
    cx.draw_line(line);
    assert_eq!(
        cx.canvas().commands().last(),
        Some(&CanvasCommand::StrokeLine { line, width: 1.0 })
    );

    cx.set_fill(Fill::gradient(red_blue_gradient()));
    cx.draw_line(line);
    let clip = cx.canvas().commands().iter().rev().find_map(|command| match command {
        CanvasCommand::ClipPath(path) => Some(path.bounding_box()),
        _ => None,
    });
    let clip = clip.unwrap();
    assert_close(clip.x0, -0.5);
    assert_close(clip.x1, 10.5);
    assert_close(clip.y0, 4.5);
    assert_close(clip.y1, 5.5);
}

#[test]
fn native_text_layout_is_delegated() {
    let mut cx = test_context_with(RecordingCanvasConfig {
        native_text_layout: true,
        ..RecordingCanvasConfig::default()
    });
    let text = attributed_text::AttributedString::from("hi");
    assert!(cx.draw_text_layout(&text, Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert!(!test_context().draw_text_layout(&text, Rect::ZERO));
}
