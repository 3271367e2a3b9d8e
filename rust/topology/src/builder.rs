// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology construction: cutting arcs at intersections and nodes.
//!
//! The builder works in four passes over a copy of the arc store:
//!
//! 1. Insert a vertex at every point where two segments cross, touch or
//!    start to overlap.
//! 2. Mark nodes: arc endpoints, plus every vertex whose neighbours differ
//!    between two of its occurrences (the point where coincident paths
//!    diverge).
//! 3. Split every arc at its nodes.
//! 4. Replace pieces that repeat an earlier piece (in either direction) by a
//!    reference to the first one.
//!
//! Every old arc id maps to a sequence of new references, which is applied
//! to each layer's shapes. The dataset is only touched once all passes
//! succeeded.

use arc_lite_core::{coord_key, ArcRef, ArcStore, CoordKey, Dataset, Layer, PathPart, Point};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::error::Result;
use crate::intersect::insert_intersections;
use crate::nodes::NodeGraph;

/// The result of cutting an arc store: the new arcs plus the replacement of
/// every old arc id by a sequence of new references.
#[derive(Debug, Clone)]
pub struct ArcDivision {
    arcs: ArcStore,
    replacements: Vec<SmallVec<[ArcRef; 2]>>,
    /// Number of vertices inserted at intersection points.
    pub cut_points: usize,
}

impl ArcDivision {
    pub fn arcs(&self) -> &ArcStore {
        &self.arcs
    }

    pub fn into_arcs(self) -> ArcStore {
        self.arcs
    }

    /// New references replacing `arc_ref`, in the direction of travel of `arc_ref`.
    pub fn replace(&self, arc_ref: ArcRef) -> impl Iterator<Item = ArcRef> + '_ {
        let pieces = &self.replacements[arc_ref.id()];
        let reversed = arc_ref.is_reversed();
        let n = pieces.len();
        (0..n).map(move |k| {
            if reversed {
                !pieces[n - 1 - k]
            } else {
                pieces[k]
            }
        })
    }

    /// Rewrites a path in terms of the new arcs.
    pub fn replace_path(&self, path: &[ArcRef]) -> PathPart {
        path.iter().flat_map(|&r| self.replace(r)).collect()
    }

    /// Rewrites every path of `layer` in terms of the new arcs.
    pub fn apply(&self, layer: &mut Layer) {
        if let Some(shapes) = layer.path_shapes_mut() {
            for part in shapes.iter_mut().flatten().flatten() {
                *part = self.replace_path(part);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum VertexState {
    /// Sorted keys of the neighbours seen at every occurrence so far.
    Interior(CoordKey, CoordKey),
    Node,
}

fn mark_vertex(
    states: &mut FxHashMap<CoordKey, VertexState>,
    p: Point,
    neighbours: Option<(Point, Point)>,
) {
    let key = coord_key(p);
    let Some((prev, next)) = neighbours else {
        states.insert(key, VertexState::Node);
        return;
    };
    let (a, b) = (coord_key(prev), coord_key(next));
    let pair = if a <= b { (a, b) } else { (b, a) };
    match states.get(&key) {
        None => {
            states.insert(key, VertexState::Interior(pair.0, pair.1));
        }
        Some(VertexState::Interior(x, y)) if (*x, *y) != pair => {
            states.insert(key, VertexState::Node);
        }
        Some(_) => {}
    }
}

/// Cuts the arcs flagged in `scope` at every intersection and node. Arcs
/// outside the scope are copied unchanged and map to a single reference.
///
/// Fails without side effects if any arc is malformed.
pub fn divide_arc_set(arcs: &ArcStore, scope: &[bool]) -> Result<ArcDivision> {
    arcs.validate()?;
    debug_assert_eq!(scope.len(), arcs.len());

    let mut paths: Vec<Vec<Point>> = (0..arcs.len())
        .map(|id| {
            if !scope[id] {
                return Vec::new();
            }
            let mut pts = arcs.arc_vertices(ArcRef::forward(id));
            pts.dedup();
            if pts.len() == 1 {
                pts.push(pts[0]);
            }
            pts
        })
        .collect();
    let cut_points = insert_intersections(&mut paths);

    let mut states: FxHashMap<CoordKey, VertexState> = FxHashMap::default();
    for path in paths.iter().filter(|p| !p.is_empty()) {
        let last = path.len() - 1;
        for (k, &p) in path.iter().enumerate() {
            let neighbours = (k > 0 && k < last).then(|| (path[k - 1], path[k + 1]));
            mark_vertex(&mut states, p, neighbours);
        }
    }
    let is_node = |p: Point| matches!(states.get(&coord_key(p)), Some(VertexState::Node));

    let mut out = ArcStore::with_capacity(arcs.len(), arcs.total_vertices() + cut_points);
    let mut seen: FxHashMap<Vec<CoordKey>, (usize, bool)> = FxHashMap::default();
    let mut replacements = Vec::with_capacity(arcs.len());
    for (id, path) in paths.iter().enumerate() {
        if !scope[id] {
            let new_id = out.push_arc(arcs.points(ArcRef::forward(id)));
            replacements.push(SmallVec::from_elem(ArcRef::forward(new_id), 1));
            continue;
        }
        let mut refs = SmallVec::new();
        let mut start = 0;
        for k in 1..path.len() {
            if k < path.len() - 1 && !is_node(path[k]) {
                continue;
            }
            let piece = &path[start..=k];
            start = k;
            let keys: Vec<CoordKey> = piece.iter().map(|&p| coord_key(p)).collect();
            let rev: Vec<CoordKey> = keys.iter().rev().copied().collect();
            let forward = keys <= rev;
            let canonical = if forward { keys } else { rev };
            let arc_ref = match seen.get(&canonical) {
                Some(&(existing, stored_forward)) => {
                    if stored_forward == forward {
                        ArcRef::forward(existing)
                    } else {
                        ArcRef::reversed(existing)
                    }
                }
                None => {
                    let new_id = out.push_arc(piece.iter().copied());
                    seen.insert(canonical, (new_id, forward));
                    ArcRef::forward(new_id)
                }
            };
            refs.push(arc_ref);
        }
        replacements.push(refs);
    }

    debug!(
        arcs_in = arcs.len(),
        arcs_out = out.len(),
        cut_points,
        "divided arcs"
    );
    Ok(ArcDivision {
        arcs: out,
        replacements,
        cut_points,
    })
}

/// Builds planar topology over every arc of `dataset`.
///
/// On success the arc store is replaced by the cut arcs, every layer's
/// references are rewritten, and the node graph of the new store is
/// returned. On failure the dataset is unchanged.
pub fn build_topology(dataset: &mut Dataset) -> Result<NodeGraph> {
    for layer in &dataset.layers {
        layer.validate(&dataset.arcs)?;
    }
    let scope = vec![true; dataset.arcs.len()];
    let division = divide_arc_set(&dataset.arcs, &scope)?;
    for layer in &mut dataset.layers {
        division.apply(layer);
    }
    dataset.arcs = division.into_arcs();
    let graph = NodeGraph::new(&dataset.arcs);
    debug!(nodes = graph.node_count(), arcs = graph.arc_count(), "built topology");
    Ok(graph)
}

/// Cuts only the arcs referenced by the path layers of `dataset` and by
/// `extra` (typically a clip layer whose arcs were merged into the store
/// but which is not part of the dataset's layer list).
///
/// Unreferenced arcs are kept as they are. On failure nothing is modified.
pub fn divide_arcs(dataset: &mut Dataset, mut extra: Option<&mut Layer>) -> Result<NodeGraph> {
    let mut scope = vec![false; dataset.arcs.len()];
    let layers = dataset.layers.iter().chain(extra.as_deref());
    for layer in layers {
        layer.validate(&dataset.arcs)?;
        for r in layer.arc_refs() {
            scope[r.id()] = true;
        }
    }
    let division = divide_arc_set(&dataset.arcs, &scope)?;
    for layer in &mut dataset.layers {
        division.apply(layer);
    }
    if let Some(layer) = extra.as_deref_mut() {
        division.apply(layer);
    }
    dataset.arcs = division.into_arcs();
    Ok(NodeGraph::new(&dataset.arcs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_lite_core::geom::path_points;

    fn polygon_dataset(paths: Vec<Vec<Point>>, shapes: Vec<Vec<Vec<i32>>>) -> Dataset {
        let arcs = ArcStore::from_paths(paths).unwrap();
        let shapes = shapes
            .into_iter()
            .map(|rings| {
                Some(
                    rings
                        .into_iter()
                        .map(|r| r.into_iter().map(ArcRef::from_raw).collect())
                        .collect(),
                )
            })
            .collect();
        Dataset::new(arcs, vec![Layer::polygons(shapes)])
    }

    fn ring_points(dataset: &Dataset, shape: usize, ring: usize) -> Vec<Point> {
        let shapes = dataset.layers[0].path_shapes().unwrap();
        path_points(&shapes[shape].as_ref().unwrap()[ring], &dataset.arcs)
    }

    #[test]
    fn overlapping_squares_share_cut_arcs() {
        // Square A covers [0,2]x[0,2], square B covers [1,3]x[1,3].
        let mut dataset = polygon_dataset(
            vec![
                vec![[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]],
                vec![[1.0, 1.0], [1.0, 3.0], [3.0, 3.0], [3.0, 1.0], [1.0, 1.0]],
            ],
            vec![vec![vec![0]], vec![vec![1]]],
        );
        let before_a = ring_points(&dataset, 0, 0);
        let graph = build_topology(&mut dataset).unwrap();

        let mut after_a = ring_points(&dataset, 0, 0);
        after_a.retain(|p| before_a.contains(p));
        assert_eq!(after_a, before_a);
        assert!(graph.find_node([2.0, 1.0]).is_some());
        assert!(graph.find_node([1.0, 2.0]).is_some());
        for id in 0..dataset.arcs.len() {
            let fwd = ArcRef::forward(id);
            for end in [dataset.arcs.first_point(fwd), dataset.arcs.last_point(fwd)] {
                assert!(graph.find_node(end).is_some());
            }
        }
        dataset.validate().unwrap();
    }

    #[test]
    fn duplicate_boundaries_collapse_to_one_arc() {
        // The same square imported twice, once in each direction.
        let mut dataset = polygon_dataset(
            vec![
                vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
                vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
            ],
            vec![vec![vec![0]], vec![vec![!1]]],
        );
        build_topology(&mut dataset).unwrap();
        assert_eq!(dataset.arcs.len(), 1);
        let shapes = dataset.layers[0].path_shapes().unwrap();
        assert_eq!(shapes[0].as_ref().unwrap()[0], vec![ArcRef::forward(0)]);
        assert_eq!(shapes[1].as_ref().unwrap()[0], vec![ArcRef::forward(0)]);
    }

    #[test]
    fn adjacent_squares_split_at_divergence() {
        // Two squares drawn independently; their shared edge x = 1 must
        // become a single arc used in opposite directions.
        let mut dataset = polygon_dataset(
            vec![
                vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
                vec![[1.0, 0.0], [1.0, 1.0], [2.0, 1.0], [2.0, 0.0], [1.0, 0.0]],
            ],
            vec![vec![vec![0]], vec![vec![1]]],
        );
        build_topology(&mut dataset).unwrap();
        let shapes = dataset.layers[0].path_shapes().unwrap();
        let a = &shapes[0].as_ref().unwrap()[0];
        let b = &shapes[1].as_ref().unwrap()[0];
        let shared: Vec<_> = a.iter().filter(|r| b.contains(&!**r)).collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(dataset.arcs.vertex_count(shared[0].id()), 2);
        assert_eq!(ring_points(&dataset, 0, 0).len(), 5);
    }

    #[test]
    fn non_finite_coordinates_leave_dataset_untouched() {
        let mut dataset = polygon_dataset(
            vec![vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0], [0.0, 0.0]]],
            vec![vec![vec![0]]],
        );
        let before = dataset.clone();
        assert!(build_topology(&mut dataset).is_err());
        assert_eq!(dataset.arcs.len(), before.arcs.len());
        assert_eq!(dataset.layers, before.layers);
    }

    #[test]
    fn divide_keeps_unreferenced_arcs() {
        let mut dataset = polygon_dataset(
            vec![
                vec![[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]],
                vec![[-1.0, 1.0], [3.0, 1.0]],
            ],
            vec![vec![vec![0]]],
        );
        let mut clip = Layer::polylines(vec![Some(vec![vec![ArcRef::forward(1)]])]);
        divide_arcs(&mut dataset, None).unwrap();
        // Arc 1 is not referenced, so the square is not cut by it.
        assert_eq!(dataset.arcs.len(), 2);
        assert_eq!(dataset.arcs.vertex_count(1), 2);

        divide_arcs(&mut dataset, Some(&mut clip)).unwrap();
        let parts = clip.path_shapes().unwrap()[0].as_ref().unwrap();
        assert_eq!(parts[0].len(), 3);
        dataset.validate().unwrap();
        clip.validate(&dataset.arcs).unwrap();
    }

    #[test]
    fn reversed_reference_maps_to_reversed_pieces() {
        let arcs = ArcStore::from_paths(vec![
            vec![[0.0, 0.0], [4.0, 0.0]],
            vec![[2.0, -1.0], [2.0, 1.0]],
        ])
        .unwrap();
        let division = divide_arc_set(&arcs, &[true, true]).unwrap();
        let fwd: Vec<_> = division.replace(ArcRef::forward(0)).collect();
        let rev: Vec<_> = division.replace(ArcRef::reversed(0)).collect();
        assert_eq!(fwd.len(), 2);
        assert_eq!(rev, vec![!fwd[1], !fwd[0]]);
        let pts = path_points(&rev, division.arcs());
        assert_eq!(pts, vec![[4.0, 0.0], [2.0, 0.0], [0.0, 0.0]]);
    }
}
