//! Two-layer reveal compositing.
//!
//! A frame is built in this order:
//!
//! 1. the mosaic is drawn onto the target, scaled into the destination rect;
//! 2. an offscreen layer the size of the image, `(0, 0, W, H)`, is opened;
//! 3. the source image is drawn into the layer with the same mapping;
//! 4. each stroke masks the layer on its own (see [`RevealMode`]);
//! 5. the layer is blended back onto the target with `SourceOver`.
//!
//! The layer covers `(0, 0, W, H)` in view coordinates while the images are
//! drawn into the destination rect, so any part of the rect outside that
//! square is never covered by detail. Strokes live in the same view
//! coordinates, which keeps the mask aligned with the detail image.

use tiny_skia::{BlendMode, FilterQuality, Paint, Pixmap, PixmapPaint, PixmapRef, Transform};
use tracing::trace;

use crate::layout::Rect;
use crate::stroke::{RevealMode, StrokePath, StrokeStyle};

/// Everything one frame reads. Nothing in it is modified by rendering.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    /// The detailed image, `W x H`.
    pub source: PixmapRef<'a>,
    /// The mosaic image, same size as `source`.
    pub mosaic: PixmapRef<'a>,
    /// Every stroke recorded so far.
    pub path: &'a StrokePath,
    /// Where the image is placed, in view pixels.
    pub rect: Rect,
    /// Stroke width, smoothing and mask mode.
    pub style: &'a StrokeStyle,
}

/// Map the `width x height` image onto `rect`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn placement(rect: Rect, width: u32, height: u32) -> Transform {
    let sx = rect.width() as f32 / width as f32;
    let sy = rect.height() as f32 / height as f32;
    Transform::from_row(sx, 0.0, 0.0, sy, rect.left as f32, rect.top as f32)
}

/// Composite one frame of `scene` onto `target`.
///
/// Does nothing while the destination rect has no area (before the first
/// layout, or with an image too small to place).
pub fn render(target: &mut Pixmap, scene: &Scene<'_>) {
    if scene.rect.is_empty() {
        trace!(rect = ?scene.rect, "skipping frame: empty destination");
        return;
    }

    let (width, height) = (scene.source.width(), scene.source.height());
    let transform = placement(scene.rect, width, height);
    let nearest = PixmapPaint {
        quality: FilterQuality::Nearest,
        ..PixmapPaint::default()
    };

    target.draw_pixmap(0, 0, scene.mosaic, &nearest, transform, None);

    let paths = scene.path.to_paths(scene.style.corner_radius);
    if paths.is_empty() && scene.style.mode == RevealMode::Reveal {
        // an empty mask leaves the layer fully transparent
        trace!("frame: mosaic only");
        return;
    }

    let Some(mut layer) = Pixmap::new(width, height) else {
        return;
    };
    layer.draw_pixmap(0, 0, scene.source, &nearest, transform, None);

    let stroke = scene.style.to_stroke();
    match scene.style.mode {
        RevealMode::Reveal => {
            let Some(mut mask) = Pixmap::new(width, height) else {
                return;
            };
            let mut paint = Paint::default();
            paint.set_color_rgba8(0, 0, 0, 255);
            paint.anti_alias = true;
            for path in &paths {
                mask.stroke_path(path, &paint, &stroke, Transform::identity(), None);
            }
            let keep_inside = PixmapPaint {
                blend_mode: BlendMode::DestinationIn,
                ..PixmapPaint::default()
            };
            layer.draw_pixmap(0, 0, mask.as_ref(), &keep_inside, Transform::identity(), None);
        }
        RevealMode::Erase => {
            let mut paint = Paint::default();
            paint.blend_mode = BlendMode::Clear;
            paint.anti_alias = true;
            for path in &paths {
                layer.stroke_path(path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    target.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    trace!(
        strokes = paths.len(),
        commands = scene.path.len(),
        mode = ?scene.style.mode,
        "frame composited"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::generate_mosaic;
    use crate::raster::{pixmap_from_rgba, rgba_from_pixmap};
    use image::{Rgba, RgbaImage};

    /// 16x16 source whose pixels all differ from their cell's sampled color
    /// (except at cell origins) when the cell size is 16.
    #[allow(clippy::cast_possible_truncation)]
    fn fixture() -> (Pixmap, Pixmap, RgbaImage, RgbaImage) {
        let source = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([(x * 16) as u8, (y * 16) as u8, 200, 255])
        });
        let mosaic = generate_mosaic(&source, 16).unwrap();
        (
            pixmap_from_rgba(&source).unwrap(),
            pixmap_from_rgba(&mosaic).unwrap(),
            source,
            mosaic,
        )
    }

    fn frame(path: &StrokePath, style: &StrokeStyle, rect: Rect) -> RgbaImage {
        let (source, mosaic, _, _) = fixture();
        let mut target = Pixmap::new(16, 16).unwrap();
        let scene = Scene {
            source: source.as_ref(),
            mosaic: mosaic.as_ref(),
            path,
            rect,
            style,
        };
        render(&mut target, &scene);
        rgba_from_pixmap(&target)
    }

    const FULL: Rect = Rect::new(0, 0, 16, 16);

    #[test]
    fn placement_maps_image_onto_rect() {
        let t = placement(Rect::new(10, 20, 110, 70), 200, 100);
        assert!((t.sx - 0.5).abs() < f32::EPSILON);
        assert!((t.sy - 0.5).abs() < f32::EPSILON);
        assert!((t.tx - 10.0).abs() < f32::EPSILON);
        assert!((t.ty - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn no_strokes_shows_only_mosaic() {
        let (_, _, _, mosaic) = fixture();
        let out = frame(&StrokePath::new(), &StrokeStyle::default(), FULL);
        assert_eq!(out, mosaic);
    }

    #[test]
    fn covering_stroke_shows_only_source() {
        let (_, _, source, _) = fixture();
        let mut path = StrokePath::new();
        path.begin_stroke(-20.0, 8.0);
        path.extend_stroke(36.0, 8.0);
        let style = StrokeStyle {
            width: 64.0,
            ..StrokeStyle::default()
        };

        let out = frame(&path, &style, FULL);
        assert_eq!(out, source);
    }

    #[test]
    fn reveal_is_confined_to_stroke_footprint() {
        let (_, _, source, mosaic) = fixture();
        let mut path = StrokePath::new();
        path.begin_stroke(-4.0, 4.5);
        path.extend_stroke(20.0, 4.5);
        let style = StrokeStyle {
            width: 4.0,
            corner_radius: 0.0,
            ..StrokeStyle::default()
        };

        let out = frame(&path, &style, FULL);
        for x in 1..16 {
            // rows 3..=5 sit fully inside the band y in [2.5, 6.5)
            for y in 3..=5 {
                assert_eq!(out.get_pixel(x, y), source.get_pixel(x, y), "({x},{y})");
            }
            for y in 8..16 {
                assert_eq!(out.get_pixel(x, y), mosaic.get_pixel(x, y), "({x},{y})");
            }
        }
    }

    #[test]
    fn erase_mode_punches_mosaic_into_detail() {
        let (_, _, source, mosaic) = fixture();
        let mut path = StrokePath::new();
        path.begin_stroke(-4.0, 4.5);
        path.extend_stroke(20.0, 4.5);
        let style = StrokeStyle {
            width: 4.0,
            corner_radius: 0.0,
            mode: RevealMode::Erase,
        };

        let out = frame(&path, &style, FULL);
        assert_eq!(out.get_pixel(9, 4), mosaic.get_pixel(9, 4));
        assert_eq!(out.get_pixel(9, 12), source.get_pixel(9, 12));

        let untouched = frame(&StrokePath::new(), &style, FULL);
        assert_eq!(untouched, source);
    }

    #[test]
    fn stray_strokes_leave_earlier_reveal_intact() {
        let (_, _, source, _) = fixture();
        let style = StrokeStyle {
            width: 4.0,
            corner_radius: 0.0,
            ..StrokeStyle::default()
        };
        let mut path = StrokePath::new();
        path.begin_stroke(-4.0, 4.5);
        path.extend_stroke(20.0, 4.5);
        let before = frame(&path, &style, FULL);

        path.begin_stroke(1.0e9, 1.0e9);
        path.extend_stroke(1.0e9 + 10.0, 1.0e9);
        path.begin_stroke(2.0, 12.0);
        path.extend_stroke(f32::NAN, 3.0);
        path.begin_stroke(1.0e20, 1.0e20);
        path.extend_stroke(1.0e20, -1.0e20);

        let after = frame(&path, &style, FULL);
        for x in 1..16 {
            assert_eq!(after.get_pixel(x, 4), source.get_pixel(x, 4), "({x},4)");
        }
        for y in 0..8 {
            for x in 0..16 {
                assert_eq!(after.get_pixel(x, y), before.get_pixel(x, y), "({x},{y})");
            }
        }
    }

    #[test]
    fn stray_strokes_do_not_cancel_erase() {
        let (_, _, _, mosaic) = fixture();
        let style = StrokeStyle {
            width: 4.0,
            corner_radius: 0.0,
            mode: RevealMode::Erase,
        };
        let mut path = StrokePath::new();
        path.begin_stroke(-4.0, 4.5);
        path.extend_stroke(20.0, 4.5);
        path.begin_stroke(1.0e9, 1.0e9);
        path.extend_stroke(1.0e9 + 10.0, 1.0e9);

        let out = frame(&path, &style, FULL);
        assert_eq!(out.get_pixel(9, 4), mosaic.get_pixel(9, 4));
    }

    #[test]
    fn empty_rect_draws_nothing() {
        let mut path = StrokePath::new();
        path.begin_stroke(0.0, 0.0);
        path.extend_stroke(16.0, 16.0);

        let out = frame(&path, &StrokeStyle::default(), Rect::default());
        assert!(out.pixels().all(|px| px[3] == 0));
    }

    #[test]
    fn layer_is_bounded_by_image_size() {
        // rect extends past the 16x16 layer: the detail never reaches x >= 16
        let (source, mosaic, _, _) = fixture();
        let mut target = Pixmap::new(32, 16).unwrap();
        let mut path = StrokePath::new();
        path.begin_stroke(-10.0, 8.0);
        path.extend_stroke(40.0, 8.0);
        let style = StrokeStyle {
            width: 64.0,
            ..StrokeStyle::default()
        };
        let scene = Scene {
            source: source.as_ref(),
            mosaic: mosaic.as_ref(),
            path: &path,
            rect: Rect::new(16, 0, 32, 16),
            style: &style,
        };
        render(&mut target, &scene);
        let out = rgba_from_pixmap(&target);

        let (_, _, source_img, mosaic_img) = fixture();
        assert_eq!(out.get_pixel(24, 8), mosaic_img.get_pixel(8, 8));
        assert_ne!(out.get_pixel(24, 8), source_img.get_pixel(8, 8));
        assert!(out.get_pixel(8, 8)[3] == 0);
    }

    #[test]
    fn render_does_not_touch_scene() {
        let (source, mosaic, _, _) = fixture();
        let (source_before, mosaic_before) = (source.clone(), mosaic.clone());
        let mut path = StrokePath::new();
        path.begin_stroke(1.0, 1.0);
        path.extend_stroke(9.0, 9.0);
        let path_before = path.clone();
        let style = StrokeStyle::default();

        let mut target = Pixmap::new(16, 16).unwrap();
        let scene = Scene {
            source: source.as_ref(),
            mosaic: mosaic.as_ref(),
            path: &path,
            rect: FULL,
            style: &style,
        };
        render(&mut target, &scene);

        assert_eq!(source.data(), source_before.data());
        assert_eq!(mosaic.data(), mosaic_before.data());
        assert_eq!(path, path_before);
    }
}
