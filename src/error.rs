//! Error types for the reveal-mosaic crate.
//!
//! The widget core never fails: a missing image, a pre-layout render or an
//! out-of-bounds stroke all degrade to a no-op. These errors only come from
//! the edges of the crate (option validation, file I/O, stroke scripts).

/// Errors raised by option validation, file I/O and stroke parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A [`MosaicOptions`](crate::MosaicOptions) field holds an unusable value.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Name of the offending option.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A scripted stroke could not be parsed into points.
    #[error("invalid stroke: {0}")]
    InvalidStroke(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
