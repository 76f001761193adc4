//! Stateless geometry used by the router, renderer, and hit-testing.

use crate::consts::{GRID_SIZE, SELECTION_BOX_OFFSET, SELECTION_RESIZE_BOX_SIZE};
use crate::model::{BorderRadius, CornerRadii, Point, Rect};

/// Strict interior test: a point on the border does not collide.
pub fn rect_collision(px: f64, py: f64, rect: &Rect) -> bool {
    px > rect.x && px < rect.right() && py > rect.y && py < rect.bottom()
}

fn snap(v: f64) -> f64 {
    (v / GRID_SIZE).round() * GRID_SIZE
}

/// Round a position to the nearest grid multiple.
pub fn snap_to_grid(x: f64, y: f64) -> Point {
    Point::new(snap(x), snap(y))
}

/// Round a size to the nearest grid multiple.
pub fn snap_size(w: f64, h: f64) -> (f64, f64) {
    (snap(w), snap(h))
}

/// Whether `point` lies on the polyline, allowing `buffer` pixels of slack in
/// the triangle inequality for each segment.
pub fn segment_point_collision(point: Point, polyline: &[Point], buffer: f64) -> bool {
    polyline.windows(2).any(|seg| {
        let (a, b) = (seg[0], seg[1]);
        let len = a.distance(b);
        let via = a.distance(point) + point.distance(b);
        via >= len - buffer && via <= len + buffer
    })
}

/// The 8 resize handles around `rect`, clockwise from top-left:
/// TL, T, TR, R, BR, B, BL, L.
pub fn selection_handles(rect: &Rect) -> [Rect; 8] {
    let outer = rect.inflate(SELECTION_BOX_OFFSET);
    let (l, c, r) = (outer.x, outer.x + outer.w / 2.0, outer.right());
    let (t, m, b) = (outer.y, outer.y + outer.h / 2.0, outer.bottom());
    let half = SELECTION_RESIZE_BOX_SIZE / 2.0;
    let square = |x: f64, y: f64| {
        Rect::new(
            x - half,
            y - half,
            SELECTION_RESIZE_BOX_SIZE,
            SELECTION_RESIZE_BOX_SIZE,
        )
    };
    [
        square(l, t),
        square(c, t),
        square(r, t),
        square(r, m),
        square(r, b),
        square(c, b),
        square(l, b),
        square(l, m),
    ]
}

/// Expand a stored border radius into per-corner radii.
pub fn normalize_border_radius(value: BorderRadius) -> CornerRadii {
    match value {
        BorderRadius::Uniform(r) => CornerRadii {
            tl: r,
            tr: r,
            br: r,
            bl: r,
        },
        BorderRadius::Corners(c) => CornerRadii {
            tl: c.tl.unwrap_or(0.0),
            tr: c.tr.unwrap_or(0.0),
            br: c.br.unwrap_or(0.0),
            bl: c.bl.unwrap_or(0.0),
        },
    }
}

/// Direction of the segment `(x1, y1) → (x2, y2)` in degrees, in `[0, 360)`.
pub fn line_angle_degrees(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let deg = (y2 - y1).atan2(x2 - x1).to_degrees();
    if deg < 0.0 { deg + 360.0 } else { deg }
}

/// The point on `from → to` that sits `by` pixels short of `to`, never past
/// the segment's midpoint.
pub fn reduce_line_size(from: Point, to: Point, by: f64) -> Point {
    let len = from.distance(to);
    if len == 0.0 {
        return to;
    }
    let cut = by.min(len / 2.0);
    let t = (len - cut) / len;
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}
