//! Aspect-fit layout of the image inside the widget's content box.

use tracing::debug;

/// An integer rectangle in view-local pixels, `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its four edges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent (`right - left`), saturating at the `i32` range.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent (`bottom - top`), saturating at the `i32` range.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// True when the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Fit an `image_w x image_h` image into a `content_w x content_h` box.
///
/// The image is scaled by the largest ratio that fits inside the box shrunk
/// by `padding` on every side, then centered in the (unpadded) box. Scaled
/// sizes truncate toward zero, so the aspect ratio holds to within one
/// pixel.
///
/// Returns `None` when the image has no area; callers keep their previous
/// rectangle in that case. Padding larger than the box yields an empty,
/// centered rectangle.
#[must_use]
pub fn aspect_fit(
    content_w: i32,
    content_h: i32,
    image_w: i32,
    image_h: i32,
    padding: i32,
) -> Option<Rect> {
    if image_w <= 0 || image_h <= 0 {
        return None;
    }

    let (content_w, content_h) = (i64::from(content_w), i64::from(content_h));
    let (image_w, image_h) = (i64::from(image_w), i64::from(image_h));
    let view_w = (content_w - 2 * i64::from(padding)).max(0);
    let view_h = (content_h - 2 * i64::from(padding)).max(0);

    // ratio = min(view_w / image_w, view_h / image_h), compared without division
    let (real_w, real_h) = if view_w * image_h <= view_h * image_w {
        (view_w, image_h * view_w / image_w)
    } else {
        (image_w * view_h / image_h, view_h)
    };

    let left = (content_w - real_w) / 2;
    let top = (content_h - real_h) / 2;

    let rect = Rect::new(
        i32::try_from(left).ok()?,
        i32::try_from(top).ok()?,
        i32::try_from(left + real_w).ok()?,
        i32::try_from(top + real_h).ok()?,
    );
    debug!(?rect, content_w, content_h, image_w, image_h, "aspect fit");
    Some(rect)
}
