use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, error, info};

use reveal_mosaic::{
    default_output_path, is_supported_image, load_source, parse_points, save_frame,
    MosaicOptions, PointerEvent, RevealMode, RevealMosaic, StrokeStyle,
};

#[derive(Parser)]
#[command(
    name = "reveal-mosaic",
    about = "Render a pixelated image with scripted reveal strokes",
    version,
    after_help = "Simple usage: reveal-mosaic <image> -s \"10,10 200,40 300,220\"\n\n\
                  Each --stroke is one drag gesture: a press at the first point,\n\
                  then moves through the rest. Coordinates are view pixels."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image file
    input: String,

    /// Output file (default: {name}_revealed.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Content box width (default: image width plus padding)
    #[arg(long)]
    width: Option<u32>,

    /// Content box height (default: image height plus padding)
    #[arg(long)]
    height: Option<u32>,

    /// Padding kept free around the image
    #[arg(short, long, default_value_t = reveal_mosaic::DEFAULT_PADDING)]
    padding: i32,

    /// Mosaic cell size in source pixels
    #[arg(short, long, default_value_t = reveal_mosaic::DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Reveal stroke width in view pixels
    #[arg(long, default_value_t = reveal_mosaic::stroke::DEFAULT_STROKE_WIDTH)]
    stroke_width: f32,

    /// Corner smoothing radius (0 for sharp corners)
    #[arg(long, default_value_t = reveal_mosaic::stroke::DEFAULT_CORNER_RADIUS)]
    corner_radius: f32,

    /// Strokes expose the mosaic over the detail image instead of revealing detail
    #[arg(long)]
    erase: bool,

    /// One stroke as "x,y x,y ..." (repeatable)
    #[arg(short, long = "stroke")]
    strokes: Vec<String>,

    /// Write the raw mosaic instead of a composited frame
    #[arg(long)]
    mosaic_only: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let options = MosaicOptions {
        cell_size: cli.cell_size,
        padding: cli.padding,
        stroke: StrokeStyle {
            width: cli.stroke_width,
            corner_radius: cli.corner_radius,
            mode: if cli.erase {
                RevealMode::Erase
            } else {
                RevealMode::Reveal
            },
        },
    };

    let input_path = Path::new(&cli.input);
    if !input_path.is_file() {
        error!("input file does not exist: {}", cli.input);
        process::exit(1);
    }
    if !is_supported_image(input_path) {
        error!("unsupported input format: {}", cli.input);
        process::exit(1);
    }

    let output_path = cli
        .output
        .as_ref()
        .map_or_else(|| default_output_path(input_path), PathBuf::from);
    if !is_supported_image(&output_path) {
        error!(
            "unsupported output format: {} (use jpg, png, webp or bmp)",
            output_path.display()
        );
        process::exit(1);
    }

    let gestures = match cli
        .strokes
        .iter()
        .map(String::as_str)
        .map(parse_points)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(g) => g,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let source = match load_source(input_path) {
        Ok(img) => img,
        Err(e) => {
            error!("failed to load {}: {e}", cli.input);
            process::exit(1);
        }
    };

    let mut widget = match RevealMosaic::new(&source, options) {
        Ok(w) => w,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    if !widget.has_image() {
        error!("{} has no pixels", cli.input);
        process::exit(1);
    }

    let frame = if cli.mosaic_only {
        widget.mosaic_image()
    } else {
        let (width, height) = content_size(&cli, widget.image_size());
        widget.on_layout(0, 0, to_i32(width), to_i32(height));
        debug!(rect = ?widget.image_rect(), "layout");

        for points in &gestures {
            replay(&mut widget, points);
        }
        widget.render_frame(width, height)
    };

    let Some(frame) = frame else {
        error!("nothing to render");
        process::exit(1);
    };

    if let Err(e) = save_frame(&frame, &output_path) {
        error!("failed to save {}: {e}", output_path.display());
        process::exit(1);
    }

    info!(strokes = gestures.len(), "wrote {}", output_path.display());
}

/// Feed one gesture to the widget: press at the first point, move through the rest.
fn replay(widget: &mut RevealMosaic, points: &[(f32, f32)]) {
    let Some((&(x, y), rest)) = points.split_first() else {
        return;
    };
    widget.on_pointer(PointerEvent::Down { x, y });
    for &(x, y) in rest {
        widget.on_pointer(PointerEvent::Move { x, y });
    }
    if let Some(&(x, y)) = points.last() {
        widget.on_pointer(PointerEvent::Up { x, y });
    }
}

fn content_size(cli: &Cli, (image_w, image_h): (u32, u32)) -> (u32, u32) {
    let pad = u32::try_from(cli.padding).unwrap_or(0).saturating_mul(2);
    (
        cli.width.unwrap_or_else(|| image_w.saturating_add(pad)),
        cli.height.unwrap_or_else(|| image_h.saturating_add(pad)),
    )
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        tracing::Level::ERROR
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
