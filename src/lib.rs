//! Scratch-to-reveal mosaic widget core.
//!
//! An image is shown fully pixelated. Dragging a pointer across it reveals
//! the original pixels under the trail, in the trail's shape and width.
//! This crate holds everything below the host UI toolkit: mosaic
//! synthesis, aspect-fit layout, stroke accumulation and the two-layer
//! compositing that produces each frame.
//!
//! # Quick Start
//!
//! ```no_run
//! use reveal_mosaic::{MosaicOptions, PointerEvent, RevealMosaic};
//!
//! let source = image::open("photo.jpg").unwrap().to_rgba8();
//! let mut widget = RevealMosaic::new(&source, MosaicOptions::default()).unwrap();
//!
//! widget.on_layout(0, 0, 1080, 1920);
//! widget.on_pointer(PointerEvent::Down { x: 100.0, y: 700.0 });
//! widget.on_pointer(PointerEvent::Move { x: 900.0, y: 760.0 });
//!
//! let frame = widget.render_frame(1080, 1920).unwrap();
//! frame.save("frame.png").unwrap();
//! ```
//!
//! # Reveal modes
//!
//! [`RevealMode::Reveal`] (the default) shows the detail image only where
//! strokes have passed. [`RevealMode::Erase`] does the opposite: strokes
//! clear the detail layer and expose the mosaic beneath.

#![deny(missing_docs)]

pub mod compositor;
pub mod error;
mod io;
pub mod layout;
pub mod mosaic;
pub mod raster;
pub mod stroke;
mod widget;

pub use error::{Error, Result};
pub use io::{default_output_path, is_supported_image, load_source, save_frame};
pub use layout::{aspect_fit, Rect};
pub use mosaic::generate_mosaic;
pub use stroke::{parse_points, PathCommand, RevealMode, StrokePath, StrokeStyle};
pub use widget::{
    MosaicOptions, PointerEvent, RevealMosaic, DEFAULT_CELL_SIZE, DEFAULT_PADDING,
};
