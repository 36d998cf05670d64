//! Conversion between straight-alpha `image` buffers and premultiplied pixmaps.
//!
//! Images cross the crate boundary as [`RgbaImage`] (straight alpha, what
//! decoders produce). Compositing happens on [`Pixmap`], which stores
//! premultiplied RGBA. Opaque pixels convert losslessly in both directions.

use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, IntSize, Pixmap};

/// Premultiply an RGBA image into a pixmap of the same size.
///
/// Returns `None` for an image with a zero dimension, or one too large for
/// a pixmap.
#[must_use]
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;

    let mut data = Vec::with_capacity(image.as_raw().len());
    for px in image.pixels() {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    Pixmap::from_vec(data, size)
}

/// Demultiply a pixmap back into a straight-alpha RGBA image.
#[must_use]
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
