//! Pointer-drag accumulation and stroke styling.
//!
//! [`StrokePath`] is an append-only list of move/line commands in view-local
//! pixels. A pointer-down begins a new sub-path; every pointer-move extends
//! the current one. Nothing is ever removed, so strokes from earlier
//! gestures stay part of the mask.

use tiny_skia::{LineCap, LineJoin, PathBuilder, Point, Stroke};

use crate::error::{Error, Result};

/// Default stroke width in pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 60.0;

/// Default corner smoothing radius in pixels.
pub const DEFAULT_CORNER_RADIUS: f32 = 10.0;

/// One recorded path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new sub-path at this point.
    MoveTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Draw a segment from the current point to this point.
    LineTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
}

/// How the stroke mask is applied to the detail layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RevealMode {
    /// Keep the detail layer only under the strokes (`DestinationIn` with
    /// the stroke coverage). Untouched areas show the mosaic.
    #[default]
    Reveal,
    /// Punch the strokes out of the detail layer (`Clear` blend). Untouched
    /// areas show the detail image and the strokes show the mosaic.
    Erase,
}

/// Immutable stroke rendering parameters.
///
/// Caps and joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Stroke width in view pixels.
    pub width: f32,
    /// Radius used to round the corners between consecutive segments.
    /// Zero keeps sharp corners.
    pub corner_radius: f32,
    /// Mask blend variant.
    pub mode: RevealMode,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_STROKE_WIDTH,
            corner_radius: DEFAULT_CORNER_RADIUS,
            mode: RevealMode::Reveal,
        }
    }
}

impl StrokeStyle {
    /// The rasterizer stroke for this style.
    #[must_use]
    pub fn to_stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        }
    }
}

/// The persistent, append-only path of every stroke recorded so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokePath {
    commands: Vec<PathCommand>,
}

impl StrokePath {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new sub-path at `(x, y)`. Earlier strokes are kept.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    /// Extend the current sub-path with a segment to `(x, y)`.
    ///
    /// Without a preceding [`begin_stroke`](Self::begin_stroke) the segment
    /// starts at the origin.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::LineTo { x, y });
    }

    /// All recorded commands in order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of strokes begun so far.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo { .. }))
            .count()
    }

    /// Split the commands into polylines, one per sub-path.
    ///
    /// Non-finite points are skipped and finite ones are clamped to
    /// [`COORD_LIMIT`], so a stray sample can only affect its own stroke.
    fn polylines(&self) -> Vec<Vec<Point>> {
        let mut lines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut moved = false;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    current.extend(drawable(x, y));
                    moved = true;
                }
                PathCommand::LineTo { x, y } => {
                    let Some(p) = drawable(x, y) else {
                        continue;
                    };
                    if current.is_empty() && !moved {
                        current.push(Point::zero());
                    }
                    current.push(p);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        lines
    }

    /// Build one vector path per stroke, rounding interior corners by
    /// `corner_radius`.
    ///
    /// Sub-paths made of a lone move produce no geometry and are left out,
    /// so the result is empty when nothing has a segment. Strokes are kept
    /// apart so that a stroke the rasterizer rejects never hides the others.
    #[must_use]
    pub fn to_paths(&self, corner_radius: f32) -> Vec<tiny_skia::Path> {
        self.polylines()
            .into_iter()
            .filter_map(|line| polyline_path(line, corner_radius))
            .collect()
    }
}

/// Largest coordinate magnitude handed to the rasterizer.
const COORD_LIMIT: f32 = 1.0e6;

fn drawable(x: f32, y: f32) -> Option<Point> {
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(Point::from_xy(
        x.clamp(-COORD_LIMIT, COORD_LIMIT),
        y.clamp(-COORD_LIMIT, COORD_LIMIT),
    ))
}

fn polyline_path(mut line: Vec<Point>, corner_radius: f32) -> Option<tiny_skia::Path> {
    if line.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    // drop repeated points so corner directions are well defined
    line.dedup();
    if line.len() == 1 {
        let p = line[0];
        pb.move_to(p.x, p.y);
        pb.line_to(p.x, p.y);
    } else {
        append_smoothed(&mut pb, &line, corner_radius);
    }
    pb.finish()
}

/// Append one polyline, replacing each interior vertex with a quadratic
/// curve. The curve starts `radius` before the vertex on the incoming
/// segment and ends `radius` after it on the outgoing one, each clamped to
/// half the segment.
fn append_smoothed(pb: &mut PathBuilder, line: &[Point], radius: f32) {
    let first = line[0];
    pb.move_to(first.x, first.y);

    if radius > 0.0 {
        for window in line.windows(3) {
            let (prev, corner, next) = (window[0], window[1], window[2]);
            let start = toward(corner, prev, radius);
            let end = toward(corner, next, radius);
            pb.line_to(start.x, start.y);
            pb.quad_to(corner.x, corner.y, end.x, end.y);
        }
    } else {
        for p in &line[1..line.len() - 1] {
            pb.line_to(p.x, p.y);
        }
    }

    let last = line[line.len() - 1];
    pb.line_to(last.x, last.y);
}

/// The point `radius` away from `from` in the direction of `to`, at most
/// halfway there.
fn toward(from: Point, to: Point, radius: f32) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return from;
    }
    let step = (radius / len).min(0.5);
    Point::from_xy(from.x + dx * step, from.y + dy * step)
}

/// Parse a scripted stroke of the form `"x,y x,y ..."`.
///
/// # Errors
///
/// Returns [`Error::InvalidStroke`] if the script is empty, a point is not
/// a comma-separated pair, or a coordinate is not a finite number.
pub fn parse_points(script: &str) -> Result<Vec<(f32, f32)>> {
    let points = script
        .split_whitespace()
        .map(|token| -> Result<(f32, f32)> {
            let (x, y) = token
                .split_once(',')
                .ok_or_else(|| Error::InvalidStroke(format!("expected `x,y`, got `{token}`")))?;
            Ok((parse_coord(x, token)?, parse_coord(y, token)?))
        })
        .collect::<Result<Vec<_>>>()?;

    if points.is_empty() {
        return Err(Error::InvalidStroke("stroke has no points".to_string()));
    }
    Ok(points)
}

fn parse_coord(value: &str, token: &str) -> Result<f32> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidStroke(format!(
            "bad coordinate `{value}` in `{token}`"
        ))),
    }
}
