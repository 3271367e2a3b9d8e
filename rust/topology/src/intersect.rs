// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment intersection detection.
//!
//! Segments are swept in order of their minimum x coordinate; each segment
//! is only tested against the segments whose x range overlaps its own. Every
//! intersection point is computed once and then inserted into both
//! segments, so both arcs end up with bitwise identical vertices there.

use arc_lite_core::geom::{orient2d, within_segment_box};
use arc_lite_core::Point;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Intersection points of segments `a1`-`b1` and `a2`-`b2`.
///
/// Proper crossings yield one point. Collinear overlaps yield the endpoints
/// of the shared interval. Touches at an endpoint yield that endpoint.
pub fn segment_intersections(a1: Point, b1: Point, a2: Point, b2: Point) -> SmallVec<[Point; 2]> {
    let mut hits = SmallVec::new();
    let o1 = orient2d(a1, b1, a2);
    let o2 = orient2d(a1, b1, b2);
    let o3 = orient2d(a2, b2, a1);
    let o4 = orient2d(a2, b2, b1);

    if o1 == 0.0 && o2 == 0.0 {
        for p in [a1, b1, a2, b2] {
            if within_segment_box(p, a1, b1) && within_segment_box(p, a2, b2) && !hits.contains(&p)
            {
                hits.push(p);
            }
        }
        return hits;
    }

    if o1 == 0.0 && within_segment_box(a2, a1, b1) {
        hits.push(a2);
    }
    if o2 == 0.0 && within_segment_box(b2, a1, b1) {
        hits.push(b2);
    }
    if o3 == 0.0 && within_segment_box(a1, a2, b2) && !hits.contains(&a1) {
        hits.push(a1);
    }
    if o4 == 0.0 && within_segment_box(b1, a2, b2) && !hits.contains(&b1) {
        hits.push(b1);
    }
    if !hits.is_empty() {
        return hits;
    }

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        hits.push(crossing_point(a1, b1, a2, b2));
    }
    hits
}

/// Crossing point of two properly crossing segments, clamped into the
/// overlap of their bounding boxes.
fn crossing_point(a1: Point, b1: Point, a2: Point, b2: Point) -> Point {
    let d1 = [b1[0] - a1[0], b1[1] - a1[1]];
    let d2 = [b2[0] - a2[0], b2[1] - a2[1]];
    let denom = d1[0] * d2[1] - d1[1] * d2[0];
    let t = ((a2[0] - a1[0]) * d2[1] - (a2[1] - a1[1]) * d2[0]) / denom;
    let x = a1[0] + t * d1[0];
    let y = a1[1] + t * d1[1];
    let clamp = |v: f64, p: f64, q: f64, r: f64, s: f64| {
        let lo = p.min(q).max(r.min(s));
        let hi = p.max(q).min(r.max(s));
        v.max(lo).min(hi)
    };
    [
        clamp(x, a1[0], b1[0], a2[0], b2[0]),
        clamp(y, a1[1], b1[1], a2[1], b2[1]),
    ]
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    path: usize,
    index: usize,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

/// Inserts every intersection point among the segments of `paths` into the
/// paths themselves. Returns the number of vertices added.
///
/// Paths with fewer than two vertices are ignored.
pub(crate) fn insert_intersections(paths: &mut [Vec<Point>]) -> usize {
    let mut segments = Vec::new();
    for (p, path) in paths.iter().enumerate() {
        for (index, w) in path.windows(2).enumerate() {
            segments.push(Segment {
                path: p,
                index,
                xmin: w[0][0].min(w[1][0]),
                xmax: w[0][0].max(w[1][0]),
                ymin: w[0][1].min(w[1][1]),
                ymax: w[0][1].max(w[1][1]),
            });
        }
    }
    segments.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));

    let mut cuts: FxHashMap<(usize, usize), Vec<Point>> = FxHashMap::default();
    for (i, s) in segments.iter().enumerate() {
        let (a1, b1) = (paths[s.path][s.index], paths[s.path][s.index + 1]);
        for t in &segments[i + 1..] {
            if t.xmin > s.xmax {
                break;
            }
            if t.ymin > s.ymax || t.ymax < s.ymin {
                continue;
            }
            let (a2, b2) = (paths[t.path][t.index], paths[t.path][t.index + 1]);
            for p in segment_intersections(a1, b1, a2, b2) {
                if p != a1 && p != b1 {
                    cuts.entry((s.path, s.index)).or_default().push(p);
                }
                if p != a2 && p != b2 {
                    cuts.entry((t.path, t.index)).or_default().push(p);
                }
            }
        }
    }

    let mut by_path: FxHashMap<usize, Vec<(usize, Vec<Point>)>> = FxHashMap::default();
    for ((path, index), points) in cuts {
        by_path.entry(path).or_default().push((index, points));
    }

    let mut added = 0;
    for (path, mut segment_cuts) in by_path {
        segment_cuts.sort_by_key(|(index, _)| *index);
        let old = std::mem::take(&mut paths[path]);
        let mut rebuilt = Vec::with_capacity(old.len() + segment_cuts.len());
        let mut pending = segment_cuts.into_iter().peekable();
        for (k, &v) in old.iter().enumerate() {
            rebuilt.push(v);
            if let Some((_, mut points)) = pending.next_if(|(index, _)| *index == k) {
                let dist = |p: &Point| (p[0] - v[0]).powi(2) + (p[1] - v[1]).powi(2);
                points.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
                points.dedup();
                added += points.len();
                rebuilt.extend(points);
            }
        }
        paths[path] = rebuilt;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proper_crossing() {
        let hits = segment_intersections([0.0, 0.0], [2.0, 2.0], [0.0, 2.0], [2.0, 0.0]);
        assert_eq!(hits.as_slice(), &[[1.0, 1.0]]);
    }

    #[test]
    fn disjoint_segments() {
        assert!(segment_intersections([0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]).is_empty());
        // Collinear but not overlapping.
        assert!(segment_intersections([0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]).is_empty());
        // The extension of one segment passes through the other's endpoint.
        assert!(segment_intersections([0.0, 0.0], [1.0, 0.0], [2.0, -1.0], [2.0, 1.0]).is_empty());
    }

    #[test]
    fn t_junction_reports_touching_endpoint() {
        let hits = segment_intersections([0.0, 0.0], [4.0, 0.0], [2.0, 0.0], [2.0, 3.0]);
        assert_eq!(hits.as_slice(), &[[2.0, 0.0]]);
    }

    #[test]
    fn collinear_overlap_reports_interval_ends() {
        let mut hits = segment_intersections([0.0, 0.0], [4.0, 0.0], [2.0, 0.0], [6.0, 0.0]);
        hits.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(hits.as_slice(), &[[2.0, 0.0], [4.0, 0.0]]);
    }

    #[test]
    fn crossing_is_inserted_into_both_paths() {
        let mut paths = vec![
            vec![[0.0, 0.0], [4.0, 4.0]],
            vec![[0.0, 4.0], [4.0, 0.0]],
        ];
        assert_eq!(insert_intersections(&mut paths), 2);
        assert_eq!(paths[0], vec![[0.0, 0.0], [2.0, 2.0], [4.0, 4.0]]);
        assert_eq!(paths[1], vec![[0.0, 4.0], [2.0, 2.0], [4.0, 0.0]]);
    }

    #[test]
    fn multiple_cuts_are_ordered_along_segment() {
        let mut paths = vec![
            vec![[0.0, 0.0], [10.0, 0.0]],
            vec![[7.0, -1.0], [7.0, 1.0]],
            vec![[3.0, -1.0], [3.0, 1.0]],
        ];
        insert_intersections(&mut paths);
        assert_eq!(paths[0], vec![[0.0, 0.0], [3.0, 0.0], [7.0, 0.0], [10.0, 0.0]]);
    }

    #[test]
    fn shared_vertices_add_nothing() {
        let mut paths = vec![
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            vec![[1.0, 0.0], [2.0, 0.0]],
        ];
        assert_eq!(insert_intersections(&mut paths), 0);
    }
}
