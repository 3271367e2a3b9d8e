// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point location against the area covered by polygon shapes.
//!
//! Rings are resolved to coordinates once and indexed by bounding box. A
//! shape covers a point when the winding number of its rings around the
//! point is positive: clockwise rings count +1 and counter-clockwise holes
//! count -1, so overlapping rings of one shape add up instead of cancelling.
//! The region is the union of all indexed shapes.
//!
//! Besides points, the index answers which sides of an arc are covered
//! ([`RegionIndex::arc_sides`]). Arcs must not cross any indexed ring
//! except at their endpoints, which holds once arcs are divided.

use arc_lite_core::geom::{path_points, point_on_segment, ring_area};
use arc_lite_core::{ArcRef, ArcStore, Bounds, PathShape, Point};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Position of a point relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Outside,
    /// On a ring edge and not inside any other shape.
    Boundary,
}

/// Whether a region covers the area on each side of an arc, looking along
/// the arc's stored direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sides {
    pub left: bool,
    pub right: bool,
}

impl Sides {
    /// Same coverage on both sides.
    pub fn both(covered: bool) -> Self {
        Self {
            left: covered,
            right: covered,
        }
    }

    /// Reference to arc `id` that has the covered side on its right, when
    /// exactly one side is covered.
    pub fn boundary(self, id: usize) -> Option<ArcRef> {
        match (self.left, self.right) {
            (false, true) => Some(ArcRef::forward(id)),
            (true, false) => Some(ArcRef::reversed(id)),
            _ => None,
        }
    }

    /// Coverage seen from `arc_ref`, which may run against the stored order.
    pub fn along(self, arc_ref: ArcRef) -> Self {
        if arc_ref.is_reversed() {
            Self {
                left: self.right,
                right: self.left,
            }
        } else {
            self
        }
    }
}

/// Midpoint of the first non-degenerate segment of arc `id`.
pub fn arc_midpoint(arcs: &ArcStore, id: usize) -> Point {
    let fwd = ArcRef::forward(id);
    let a = arcs.first_point(fwd);
    let b = arcs.leading_point(fwd);
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

#[derive(Debug, Clone)]
struct IndexedRing {
    bounds: Bounds,
    points: Vec<Point>,
    /// +1 for clockwise rings, -1 for holes, 0 for degenerate ones.
    sign: i32,
}

impl IndexedRing {
    fn new(ring: &[ArcRef], arcs: &ArcStore) -> Self {
        let points = path_points(ring, arcs);
        let mut bounds = Bounds::empty();
        for &p in &points {
            bounds.extend(p);
        }
        let area = ring_area(&points);
        let sign = if area > 0.0 {
            1
        } else if area < 0.0 {
            -1
        } else {
            0
        };
        Self {
            bounds,
            points,
            sign,
        }
    }

    /// Winding number around `p`, or `None` when `p` lies on the ring.
    fn winding(&self, p: Point) -> Option<i32> {
        let mut winding = 0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            if point_on_segment(p, a, b) {
                return None;
            }
            let downward = a[1] > p[1];
            if downward != (b[1] > p[1]) {
                let x = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
                if p[0] < x {
                    winding += if downward { 1 } else { -1 };
                }
            }
        }
        Some(winding)
    }

    /// Winding numbers of this ring just left and right of an arc it uses
    /// as `arc_ref`. Crossing a ring from its left to its right always
    /// raises the winding number by one.
    fn sides_along(&self, arc_ref: ArcRef) -> (i32, i32) {
        match (self.sign > 0, arc_ref.is_reversed()) {
            (true, false) => (0, 1),
            (true, true) => (1, 0),
            (false, false) => (-1, 0),
            (false, true) => (0, -1),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedShape {
    bounds: Bounds,
    rings: Vec<IndexedRing>,
    /// Ring index and direction of every use of each arc id.
    uses: FxHashMap<usize, SmallVec<[(usize, ArcRef); 2]>>,
}

impl IndexedShape {
    fn new(shape: &PathShape, arcs: &ArcStore) -> Self {
        let mut bounds = Bounds::empty();
        let mut uses: FxHashMap<usize, SmallVec<[(usize, ArcRef); 2]>> = FxHashMap::default();
        let rings = shape
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                for &arc_ref in ring {
                    uses.entry(arc_ref.id()).or_default().push((i, arc_ref));
                }
                let ring = IndexedRing::new(ring, arcs);
                bounds.merge(&ring.bounds);
                ring
            })
            .collect();
        Self {
            bounds,
            rings,
            uses,
        }
    }

    fn near(&self, p: Point) -> impl Iterator<Item = &IndexedRing> + '_ {
        self.rings.iter().filter(move |r| r.bounds.contains_point(p))
    }

    fn locate(&self, p: Point) -> Location {
        if !self.bounds.contains_point(p) {
            return Location::Outside;
        }
        // Rings through `p` are counted at their lowest winding on either
        // side, so `p` is only inside when every side of it is covered.
        let mut winding = 0;
        let mut touching = false;
        for ring in self.near(p) {
            match ring.winding(p) {
                Some(w) => winding += w,
                None => {
                    touching = true;
                    winding += ring.sign.min(0);
                }
            }
        }
        if winding > 0 {
            Location::Inside
        } else if touching {
            Location::Boundary
        } else {
            Location::Outside
        }
    }

    /// Winding numbers left and right of arc `id` at its midpoint `mid`.
    fn arc_windings(&self, id: usize, mid: Point) -> (i32, i32) {
        let (mut left, mut right) = (0, 0);
        if !self.bounds.contains_point(mid) {
            return (left, right);
        }
        let uses = self.uses.get(&id).map(SmallVec::as_slice).unwrap_or(&[]);
        for (i, ring) in self.rings.iter().enumerate() {
            if !ring.bounds.contains_point(mid) || uses.iter().any(|&(r, _)| r == i) {
                continue;
            }
            let w = ring.winding(mid).unwrap_or(0);
            left += w;
            right += w;
        }
        for &(i, arc_ref) in uses {
            let ring = &self.rings[i];
            if ring.sign != 0 {
                let (l, r) = ring.sides_along(arc_ref);
                left += l;
                right += r;
            }
        }
        (left, right)
    }
}

/// Bounding-box indexed set of polygon shapes answering point-location queries.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    bounds: Bounds,
    shapes: Vec<IndexedShape>,
}

impl RegionIndex {
    /// Indexes the union of all non-null `shapes`.
    pub fn new(shapes: &[Option<PathShape>], arcs: &ArcStore) -> Self {
        let shapes: Vec<IndexedShape> = shapes
            .iter()
            .flatten()
            .map(|s| IndexedShape::new(s, arcs))
            .collect();
        let mut bounds = Bounds::empty();
        for s in &shapes {
            bounds.merge(&s.bounds);
        }
        Self { bounds, shapes }
    }

    /// Indexes a single shape.
    pub fn from_shape(shape: &PathShape, arcs: &ArcStore) -> Self {
        let indexed = IndexedShape::new(shape, arcs);
        Self {
            bounds: indexed.bounds,
            shapes: vec![indexed],
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn locate(&self, p: Point) -> Location {
        if !self.bounds.contains_point(p) {
            return Location::Outside;
        }
        let mut result = Location::Outside;
        for shape in &self.shapes {
            match shape.locate(p) {
                Location::Inside => return Location::Inside,
                Location::Boundary => result = Location::Boundary,
                Location::Outside => {}
            }
        }
        result
    }

    /// `true` only for points strictly inside the region.
    pub fn contains(&self, p: Point) -> bool {
        self.locate(p) == Location::Inside
    }

    /// Coverage on each side of arc `id`, whether or not the indexed rings
    /// use it.
    pub fn arc_sides(&self, id: usize, arcs: &ArcStore) -> Sides {
        let mid = arc_midpoint(arcs, id);
        let mut sides = Sides::default();
        if !self.bounds.contains_point(mid) {
            return sides;
        }
        for shape in &self.shapes {
            let (left, right) = shape.arc_windings(id, mid);
            sides.left |= left > 0;
            sides.right |= right > 0;
            if sides.left && sides.right {
                break;
            }
        }
        sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Square [0,4]x[0,4] with a hole [1,3]x[1,3], plus a separate square
    // [10,11]x[0,1].
    fn region() -> RegionIndex {
        let arcs = ArcStore::from_paths(vec![
            vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0], [1.0, 1.0]],
            vec![[10.0, 0.0], [10.0, 1.0], [11.0, 1.0], [11.0, 0.0], [10.0, 0.0]],
        ])
        .unwrap();
        let shapes = vec![
            Some(vec![vec![ArcRef::forward(0)], vec![ArcRef::forward(1)]]),
            None,
            Some(vec![vec![ArcRef::forward(2)]]),
        ];
        RegionIndex::new(&shapes, &arcs)
    }

    #[test]
    fn holes_are_outside() {
        let region = region();
        assert_eq!(region.locate([0.5, 0.5]), Location::Inside);
        assert_eq!(region.locate([2.0, 2.0]), Location::Outside);
        assert_eq!(region.locate([10.5, 0.5]), Location::Inside);
        assert_eq!(region.locate([7.0, 0.5]), Location::Outside);
    }

    #[test]
    fn edges_and_vertices_are_boundary() {
        let region = region();
        assert_eq!(region.locate([0.0, 2.0]), Location::Boundary);
        assert_eq!(region.locate([4.0, 4.0]), Location::Boundary);
        assert_eq!(region.locate([2.0, 1.0]), Location::Boundary);
        assert!(!region.contains([2.0, 1.0]));
    }

    #[test]
    fn ray_through_vertex_counts_once() {
        let region = region();
        // Horizontal ray from (-1, 4) runs along the top edge; from (-1, 1)
        // it passes the hole's bottom vertices.
        assert_eq!(region.locate([-1.0, 4.0]), Location::Outside);
        assert_eq!(region.locate([0.5, 1.0]), Location::Inside);
    }

    // One shape made of two overlapping rings, [0,3]x[0,3] and [2,5]x[0,3].
    fn overlapping_rings() -> (ArcStore, RegionIndex) {
        let arcs = ArcStore::from_paths(vec![
            vec![[0.0, 0.0], [0.0, 3.0], [3.0, 3.0], [3.0, 0.0], [0.0, 0.0]],
            vec![[2.0, 0.0], [2.0, 3.0], [5.0, 3.0], [5.0, 0.0], [2.0, 0.0]],
        ])
        .unwrap();
        let shape = vec![vec![ArcRef::forward(0)], vec![ArcRef::forward(1)]];
        let region = RegionIndex::from_shape(&shape, &arcs);
        (arcs, region)
    }

    #[test]
    fn overlapping_rings_of_one_shape_add_up() {
        let (_, region) = overlapping_rings();
        assert_eq!(region.locate([2.5, 1.5]), Location::Inside);
        assert_eq!(region.locate([1.0, 1.5]), Location::Inside);
        // Edge of one ring inside the other one.
        assert_eq!(region.locate([2.0, 1.5]), Location::Inside);
        assert_eq!(region.locate([5.0, 1.5]), Location::Boundary);
        assert_eq!(region.locate([6.0, 1.5]), Location::Outside);
    }

    #[test]
    fn arc_sides_follow_ring_direction() {
        let arcs = ArcStore::from_paths(vec![
            vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0], [1.0, 1.0]],
            vec![[-1.0, 2.0], [5.0, 2.0]],
        ])
        .unwrap();
        let shapes = vec![Some(vec![vec![ArcRef::forward(0)], vec![ArcRef::forward(1)]])];
        let region = RegionIndex::new(&shapes, &arcs);

        let outer = region.arc_sides(0, &arcs);
        assert_eq!(outer, Sides { left: false, right: true });
        assert_eq!(outer.boundary(0), Some(ArcRef::forward(0)));
        let hole = region.arc_sides(1, &arcs);
        assert_eq!(hole, Sides { left: false, right: true });
        assert_eq!(hole.along(ArcRef::reversed(1)), Sides { left: true, right: false });
        // An arc the shape does not use is located by its midpoint, which
        // falls in the hole.
        assert_eq!(region.arc_sides(2, &arcs), Sides::both(false));
    }

    #[test]
    fn inner_ring_edges_are_covered_on_both_sides() {
        let (arcs, region) = overlapping_rings();
        for id in 0..2 {
            // The first segment of each ring lies on x = 0 or x = 2; only the
            // latter is inside the other ring.
            let expected = if id == 0 {
                Sides { left: false, right: true }
            } else {
                Sides::both(true)
            };
            assert_eq!(region.arc_sides(id, &arcs), expected);
        }
        assert_eq!(Sides::both(true).boundary(1), None);
    }
}
