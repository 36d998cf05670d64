//! Loading source images and saving rendered frames.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// Decode an image file into straight-alpha RGBA.
///
/// # Errors
///
/// Returns [`Error::Image`] if the file cannot be opened or decoded.
pub fn load_source(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Formats a frame can be written as; the same set is accepted as input.
const FRAME_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// True if the extension of `path` names a format this crate reads and
/// writes (JPEG, PNG, WebP or BMP). Case is ignored.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| FRAME_FORMATS.contains(&format))
}

/// Save a rendered frame, choosing the encoder from the file extension.
///
/// JPEG has no alpha channel, so frames saved as JPEG are flattened to RGB.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_frame(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).into_rgb8();
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&rgb)?;
        }
        _ if FRAME_FORMATS.contains(&format) => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Frames carry alpha, so the default is always PNG.
/// Example: `"photo.jpg"` becomes `"photo_revealed.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_revealed.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn default_output_path_appends_revealed_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_revealed.png"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "image_revealed.png"
        );
    }

    #[test]
    fn supported_extensions_match_frame_encoders() {
        for name in ["in.JPG", "in.jpeg", "in.Png", "in.webp", "in.bmp"] {
            assert!(is_supported_image(Path::new(name)), "{name}");
        }
        for name in ["in.gif", "in.tiff", "in.txt", "in", ".png.bak"] {
            assert!(!is_supported_image(Path::new(name)), "{name}");
            assert!(save_frame(&RgbaImage::new(1, 1), Path::new(name)).is_err());
        }
        // whatever the input format, the default output is writable
        assert!(is_supported_image(&default_output_path(Path::new("scan.bmp"))));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn png_frame_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("reveal-mosaic-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");

        let img = RgbaImage::from_fn(3, 2, |x, y| {
            Rgba([(x * 40) as u8, (y * 90) as u8, 7, if x == 0 { 0 } else { 255 }])
        });
        save_frame(&img, &path).unwrap();
        assert_eq!(load_source(&path).unwrap(), img);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_frame_rejects_unknown_extension() {
        let img = RgbaImage::new(1, 1);
        let err = save_frame(&img, Path::new("frame.nope")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
