//! Mosaic (pixelation) synthesis.
//!
//! The image is cut into a grid of `cell_size` squares. Every cell is
//! flat-filled with the source pixel at its top-left corner:
//!
//! `mosaic(x, y) = source(x - x % G, y - y % G)`
//!
//! This is a point sample, not a box filter. Cells on the right and bottom
//! edges are clipped to the image bounds.

use image::RgbaImage;
use tracing::debug;

/// Number of grid cells `(columns, rows)` needed to cover a `width x height`
/// image with square cells of `cell_size`.
///
/// Returns `(0, 0)` when `cell_size` is zero.
#[must_use]
pub fn cell_count(width: u32, height: u32, cell_size: u32) -> (u32, u32) {
    if cell_size == 0 {
        return (0, 0);
    }
    (width.div_ceil(cell_size), height.div_ceil(cell_size))
}

/// Generate the mosaic form of `source`.
///
/// The output has the same dimensions as the source. Returns `None` (no
/// mosaic) if the source has a zero dimension or `cell_size` is zero.
///
/// With the `parallel` feature, each row of cells is filled on the rayon
/// pool; rows write disjoint bands of the output.
#[must_use]
pub fn generate_mosaic(source: &RgbaImage, cell_size: u32) -> Option<RgbaImage> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 || cell_size == 0 {
        return None;
    }

    let mut mosaic = RgbaImage::new(width, height);
    let row_len = width as usize * 4;
    let band_len = row_len * cell_size.min(height) as usize;

    let fill_band = |(ver_index, band): (usize, &mut [u8])| {
        #[allow(clippy::cast_possible_truncation)]
        let top = ver_index as u32 * cell_size;
        for left in (0..width).step_by(cell_size as usize) {
            let right = left.saturating_add(cell_size).min(width);
            let color = source.get_pixel(left, top).0;
            let span = left as usize * 4..right as usize * 4;
            for row in band.chunks_exact_mut(row_len) {
                for px in row[span.clone()].chunks_exact_mut(4) {
                    px.copy_from_slice(&color);
                }
            }
        }
    };

    let pixels: &mut [u8] = &mut mosaic;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pixels.par_chunks_mut(band_len).enumerate().for_each(fill_band);
    }

    #[cfg(not(feature = "parallel"))]
    {
        pixels.chunks_mut(band_len).enumerate().for_each(fill_band);
    }

    let (cols, rows) = cell_count(width, height, cell_size);
    debug!(width, height, cell_size, cols, rows, "generated mosaic");

    Some(mosaic)
}
