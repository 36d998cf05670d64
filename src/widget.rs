//! The reveal-mosaic widget state and its host-facing event surface.

use image::RgbaImage;
use tiny_skia::Pixmap;
use tracing::{debug, trace, warn};

use crate::compositor::{self, Scene};
use crate::error::{Error, Result};
use crate::layout::{aspect_fit, Rect};
use crate::mosaic;
use crate::raster::{pixmap_from_rgba, rgba_from_pixmap};
use crate::stroke::{StrokePath, StrokeStyle};

/// Default mosaic cell size in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 60;

/// Default padding around the image, in pixels.
pub const DEFAULT_PADDING: i32 = 18;

/// Options fixed when the widget is built.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicOptions {
    /// Side of one mosaic cell, in source pixels.
    pub cell_size: u32,
    /// Space kept free on every side of the content box.
    pub padding: i32,
    /// Reveal stroke parameters.
    pub stroke: StrokeStyle,
}

impl Default for MosaicOptions {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            padding: DEFAULT_PADDING,
            stroke: StrokeStyle::default(),
        }
    }
}

impl MosaicOptions {
    /// Check every option for a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] naming the first rejected field.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(invalid("cell_size", "must be greater than zero"));
        }
        if self.padding < 0 {
            return Err(invalid("padding", "must not be negative"));
        }
        if !self.stroke.width.is_finite() || self.stroke.width <= 0.0 {
            return Err(invalid("stroke_width", "must be a positive number"));
        }
        if !self.stroke.corner_radius.is_finite() || self.stroke.corner_radius < 0.0 {
            return Err(invalid("corner_radius", "must be zero or a positive number"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> Error {
    Error::InvalidOption {
        name,
        reason: reason.to_string(),
    }
}

/// A pointer event delivered by the host, in view-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer was pressed.
    Down {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// The pressed pointer moved.
    Move {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// The pointer was released.
    Up {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// The gesture was cancelled by the host.
    Cancel,
}

/// Scratch-to-reveal mosaic widget.
///
/// Holds the source image, its mosaic, the destination rectangle and the
/// accumulated stroke path. The host drives it with [`on_layout`],
/// [`on_pointer`] and [`render`]; all of them run on the host's UI thread.
///
/// A source image with a zero dimension is accepted: the widget then has no
/// image, and layout and rendering do nothing.
///
/// [`on_layout`]: Self::on_layout
/// [`on_pointer`]: Self::on_pointer
/// [`render`]: Self::render
pub struct RevealMosaic {
    source: Option<Pixmap>,
    mosaic: Option<Pixmap>,
    image_width: u32,
    image_height: u32,
    options: MosaicOptions,
    image_rect: Rect,
    path: StrokePath,
    redraw_requested: bool,
}

impl RevealMosaic {
    /// Build the widget around a decoded source image.
    ///
    /// Generates the mosaic once; it is never regenerated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if `options` fail
    /// [`MosaicOptions::validate`].
    pub fn new(source: &RgbaImage, options: MosaicOptions) -> Result<Self> {
        options.validate()?;

        let (image_width, image_height) = source.dimensions();
        let images = mosaic::generate_mosaic(source, options.cell_size).and_then(|mosaic| {
            Some((pixmap_from_rgba(source)?, pixmap_from_rgba(&mosaic)?))
        });
        if images.is_none() {
            warn!(image_width, image_height, "no usable source image; widget will stay blank");
        }
        let (source, mosaic) = images.unzip();

        debug!(
            image_width,
            image_height,
            cell_size = options.cell_size,
            "reveal mosaic created"
        );

        Ok(Self {
            source,
            mosaic,
            image_width,
            image_height,
            options,
            image_rect: Rect::default(),
            path: StrokePath::new(),
            redraw_requested: false,
        })
    }

    /// True if a usable source image (and therefore a mosaic) is present.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.source.is_some() && self.mosaic.is_some()
    }

    /// Source image dimensions `(width, height)`.
    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// The options the widget was built with.
    #[must_use]
    pub fn options(&self) -> &MosaicOptions {
        &self.options
    }

    /// Where the image is currently placed, in view pixels.
    #[must_use]
    pub fn image_rect(&self) -> Rect {
        self.image_rect
    }

    /// All strokes recorded so far.
    #[must_use]
    pub fn path(&self) -> &StrokePath {
        &self.path
    }

    /// The generated mosaic, if there is an image.
    #[must_use]
    pub fn mosaic_image(&self) -> Option<RgbaImage> {
        self.mosaic.as_ref().map(rgba_from_pixmap)
    }

    /// Host layout callback with the view's content box edges.
    ///
    /// Recomputes the destination rectangle. Without an image the previous
    /// rectangle is kept.
    pub fn on_layout(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        if !self.has_image() {
            return;
        }
        let content_w = right.saturating_sub(left);
        let content_h = bottom.saturating_sub(top);
        let (Ok(image_w), Ok(image_h)) = (
            i32::try_from(self.image_width),
            i32::try_from(self.image_height),
        ) else {
            return;
        };

        if let Some(rect) = aspect_fit(
            content_w,
            content_h,
            image_w,
            image_h,
            self.options.padding,
        ) {
            self.image_rect = rect;
            self.redraw_requested = true;
        }
    }

    /// Host pointer callback.
    ///
    /// `Down` begins a stroke, `Move` extends it; `Up` and `Cancel` leave
    /// the path alone. Every event is consumed and requests a redraw.
    pub fn on_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { x, y } => self.path.begin_stroke(x, y),
            PointerEvent::Move { x, y } => self.path.extend_stroke(x, y),
            PointerEvent::Up { .. } | PointerEvent::Cancel => {}
        }
        trace!(?event, commands = self.path.len(), "pointer");
        self.redraw_requested = true;
        true
    }

    /// Return whether a redraw was requested since the last call, and clear
    /// the request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Composite the current frame onto `target`.
    ///
    /// Draws nothing without an image or before the first layout.
    pub fn render(&self, target: &mut Pixmap) {
        let (Some(source), Some(mosaic)) = (&self.source, &self.mosaic) else {
            return;
        };
        let scene = Scene {
            source: source.as_ref(),
            mosaic: mosaic.as_ref(),
            path: &self.path,
            rect: self.image_rect,
            style: &self.options.stroke,
        };
        compositor::render(target, &scene);
    }

    /// Render onto a fresh transparent `width x height` surface.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn render_frame(&self, width: u32, height: u32) -> Option<RgbaImage> {
        let mut target = Pixmap::new(width, height)?;
        self.render(&mut target);
        Some(rgba_from_pixmap(&target))
    }
}
