//! Coordinate transforms and bounds accumulation.
//!
//! Schematic space is Y-up; SVG space is Y-down. All drawing goes through
//! `transform` (local placement: mirror, rotate, offset) followed by
//! `screen_project` (shift by the accumulated bounds and flip Y).
//!
//! `screen_transform` carries a second rotation table with the opposite sign
//! convention. It is only used when projecting dangling-endpoint markers and
//! is kept separate on purpose: the two conventions disagree for 90/270 and
//! must not be unified.

use serde::{Deserialize, Serialize};

/// A point in schematic coordinates (Y-up, arbitrary units).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A line segment between two schematic points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Accumulated extent in schematic coordinates.
///
/// Starts at the infinite sentinel and only ever widens. `min <= max` holds
/// as soon as one point has been folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.include(Point::new(other.min_x, other.min_y));
        self.include(Point::new(other.max_x, other.max_y));
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

/// Placement context passed down while resolving and rendering a component's
/// symbol sub-tree. Immutable; a nested component builds a fresh context.
///
/// The declared rotation is ignored for embedded symbols: their geometry is
/// authored pre-placed, so the effective rotation is forced to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    pub offset: Point,
    pub rotation: i32,
    pub mirror: bool,
    pub embedded: bool,
}

impl TransformContext {
    pub const IDENTITY: TransformContext = TransformContext {
        offset: Point { x: 0.0, y: 0.0 },
        rotation: 0,
        mirror: false,
        embedded: false,
    };

    /// Rotation actually applied to geometry (0 when embedded).
    pub fn effective_rotation(&self) -> i32 {
        if self.embedded {
            0
        } else {
            self.rotation
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        transform(p, self.offset, self.effective_rotation(), self.mirror)
    }

    pub fn apply_segment(&self, seg: Segment) -> Segment {
        Segment::new(self.apply(seg.start), self.apply(seg.end))
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Place a local point: mirror (negate X), then rotate, then translate.
///
/// Rotation table: 0 -> (x, y), 90 -> (-y, x), 180 -> (-x, -y), 270 -> (y, -x).
/// Any other value behaves as 0.
pub fn transform(p: Point, offset: Point, rotation: i32, mirror: bool) -> Point {
    let x = if mirror { -p.x } else { p.x };
    let y = p.y;
    let (rx, ry) = match rotation.rem_euclid(360) {
        90 => (-y, x),
        180 => (-x, -y),
        270 => (y, -x),
        _ => (x, y),
    };
    Point::new(rx + offset.x, ry + offset.y)
}

/// Project a schematic point into SVG space: shift against the bounds origin
/// and flip Y so the drawing reads top-down.
pub fn screen_project(bounds: &Bounds, p: Point, margin: f64) -> Point {
    Point::new(p.x - bounds.min_x + margin, bounds.max_y - p.y + margin)
}

/// Combined place-and-project with the projection-time rotation table:
/// 90 -> (y, -x), 270 -> (-y, x), mirror applied after rotation.
///
/// Only dangling-endpoint markers go through this path. The sign convention
/// differs from `transform` and is preserved as-is.
pub fn screen_transform(
    bounds: &Bounds,
    p: Point,
    offset: Point,
    rotation: i32,
    mirror: bool,
    margin: f64,
) -> Point {
    let (rx, ry) = match rotation.rem_euclid(360) {
        90 => (p.y, -p.x),
        180 => (-p.x, -p.y),
        270 => (-p.y, p.x),
        _ => (p.x, p.y),
    };
    let rx = if mirror { -rx } else { rx };
    Point::new(
        (rx + offset.x) - bounds.min_x + margin,
        bounds.max_y - (ry + offset.y) + margin,
    )
}

/// Convert a polar angle on a circle to Cartesian coordinates.
pub fn polar_to_cartesian(center: Point, radius: f64, angle_degrees: f64) -> Point {
    let rad = angle_degrees.to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}
