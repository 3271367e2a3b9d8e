// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar geometry primitives shared by the topology and clipping code.
//!
//! Winding convention: a clockwise ring (y axis pointing up) is an outer
//! ring and has positive area; a counter-clockwise ring is a hole and has
//! negative area.

use nalgebra::Point2;

use crate::arc::{ArcRef, ArcStore, Point};

/// Twice the signed area of triangle `(a, b, c)`; positive when
/// counter-clockwise, zero when collinear.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Returns `true` if `p` lies on the closed segment `a`-`b`.
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    orient2d(a, b, p) == 0.0 && within_segment_box(p, a, b)
}

/// Inclusive bounding-box test of `p` against segment `a`-`b`.
#[inline]
pub fn within_segment_box(p: Point, a: Point, b: Point) -> bool {
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

/// Concatenates the vertices of a path, dropping the repeated vertex where
/// consecutive arcs join.
pub fn path_points(path: &[ArcRef], arcs: &ArcStore) -> Vec<Point> {
    let mut points = Vec::new();
    for (i, &arc_ref) in path.iter().enumerate() {
        let skip = usize::from(i > 0);
        points.extend(arcs.points(arc_ref).skip(skip));
    }
    points
}

/// Signed area of a closed vertex ring (clockwise positive).
pub fn ring_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for w in points.windows(2) {
        sum += w[0][0] * w[1][1] - w[1][0] * w[0][1];
    }
    let (first, last) = (points[0], points[points.len() - 1]);
    if first != last {
        sum += last[0] * first[1] - first[0] * last[1];
    }
    -sum / 2.0
}

/// Signed area of a ring given as arc references.
pub fn path_area(path: &[ArcRef], arcs: &ArcStore) -> f64 {
    ring_area(&path_points(path, arcs))
}

/// Planar length of a vertex chain.
pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
        .sum()
}

/// Area centroid of a ring; the vertex mean for a zero-area ring.
pub fn ring_centroid(points: &[Point]) -> Option<Point2<f64>> {
    if points.is_empty() {
        return None;
    }
    let n = points.len();
    let (mut cx, mut cy, mut twice_area) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cross = a[0] * b[1] - b[0] * a[1];
        twice_area += cross;
        cx += (a[0] + b[0]) * cross;
        cy += (a[1] + b[1]) * cross;
    }
    if twice_area == 0.0 {
        return vertex_mean(points);
    }
    Some(Point2::new(cx / (3.0 * twice_area), cy / (3.0 * twice_area)))
}

/// Mean of a set of coordinates.
pub fn vertex_mean(points: &[Point]) -> Option<Point2<f64>> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    Some(Point2::new(sx / n, sy / n))
}

/// Length-weighted midpoint of the segments of a chain.
pub fn polyline_centroid(points: &[Point]) -> Option<Point2<f64>> {
    let (mut sx, mut sy, mut total) = (0.0, 0.0, 0.0);
    for w in points.windows(2) {
        let len = (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]);
        sx += (w[0][0] + w[1][0]) / 2.0 * len;
        sy += (w[0][1] + w[1][1]) / 2.0 * len;
        total += len;
    }
    if total == 0.0 {
        return vertex_mean(points);
    }
    Some(Point2::new(sx / total, sy / total))
}
