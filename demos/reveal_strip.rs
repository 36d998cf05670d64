//! Reveal a horizontal strip across the middle of an image.
//!
//! Usage:
//! ```sh
//! cargo run --example reveal_strip -- input.jpg output.png
//! ```

use std::env;
use std::process;

use reveal_mosaic::{save_frame, MosaicOptions, PointerEvent, RevealMosaic};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }

    let source = reveal_mosaic::load_source(args[1].as_ref()).expect("failed to load image");
    let (w, h) = source.dimensions();
    let mut widget =
        RevealMosaic::new(&source, MosaicOptions::default()).expect("invalid options");

    let (view_w, view_h) = (w.saturating_add(36), h.saturating_add(36));
    let (Ok(right), Ok(bottom)) = (i32::try_from(view_w), i32::try_from(view_h)) else {
        eprintln!("Error: image too large to lay out");
        process::exit(1);
    };
    widget.on_layout(0, 0, right, bottom);

    #[allow(clippy::cast_precision_loss)]
    let (end, mid) = (view_w as f32, view_h as f32 / 2.0);
    widget.on_pointer(PointerEvent::Down { x: 0.0, y: mid });
    widget.on_pointer(PointerEvent::Move { x: end, y: mid });

    let frame = widget.render_frame(view_w, view_h).expect("empty view");
    if let Err(e) = save_frame(&frame, args[2].as_ref()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Done: {}", args[2]);
}
