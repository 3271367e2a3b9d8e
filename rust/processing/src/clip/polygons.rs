// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon clipping by arc selection and ring tracing.
//!
//! After division, every arc of the target shape and of the clip layer is
//! either shared by both or lies entirely inside or outside the other one.
//! For each such arc the covered sides of the target and of the clip region
//! are combined; an arc bounds the result when exactly one of its sides is
//! covered. The kept arcs are then traced into rings, always turning to the
//! most clockwise continuation at a node.

use std::f64::consts::TAU;

use arc_lite_core::geom::path_area;
use arc_lite_core::{ArcRef, ArcStore, PathPart, PathShape};
use arc_lite_topology::{arc_midpoint, Location, NodeGraph, RegionIndex, Sides};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use super::ClipContext;

/// Coverage of the clipped shape beside one arc.
fn combine(target: Sides, clip: Sides, erase: bool) -> Sides {
    Sides {
        left: target.left && clip.left != erase,
        right: target.right && clip.right != erase,
    }
}

/// Arcs of `shape` and of the clip outline that bound the clipped shape,
/// each with the clipped shape on its right.
///
/// The rings of `shape` are read as their union, so overlapping rings merge
/// and arcs the shape uses both ways vanish.
fn select_arcs(shape: &PathShape, ctx: &ClipContext<'_>) -> Vec<ArcRef> {
    let region = RegionIndex::from_shape(shape, ctx.arcs);
    let erase = ctx.erase();
    let mut seen = FxHashSet::default();
    let mut kept = Vec::new();
    let mut keep = |id: usize, target: Sides| {
        if let Some(r) = combine(target, ctx.clip_sides(id), erase).boundary(id) {
            kept.push(r);
        }
    };

    for &r in shape.iter().flatten() {
        if seen.insert(r.id()) {
            keep(r.id(), region.arc_sides(r.id(), ctx.arcs));
        }
    }
    for &(clip_ref, bounds) in &ctx.outline {
        let id = clip_ref.id();
        if !region.bounds().intersects(&bounds) || !seen.insert(id) {
            continue;
        }
        let covered = region.locate(arc_midpoint(ctx.arcs, id)) == Location::Inside;
        keep(id, Sides::both(covered));
    }
    kept
}

fn direction(from: [f64; 2], to: [f64; 2]) -> f64 {
    (to[1] - from[1]).atan2(to[0] - from[0])
}

/// Continuation of `current` among the unused kept arcs leaving its end
/// node. The chosen arc makes the smallest counter-clockwise turn away from
/// the direction back along `current`, which keeps the traced ring on the
/// right-hand side.
fn next_arc(
    current: ArcRef,
    start: ArcRef,
    leaving: &[ArcRef],
    used: &FxHashSet<ArcRef>,
    arcs: &ArcStore,
) -> Option<ArcRef> {
    let node = arcs.last_point(current);
    let back = direction(node, arcs.trailing_point(current));
    leaving
        .iter()
        .copied()
        .filter(|&c| c != !current && (c == start || !used.contains(&c)))
        .map(|c| {
            let mut turn = (direction(node, arcs.leading_point(c)) - back).rem_euclid(TAU);
            if turn == 0.0 {
                turn = TAU;
            }
            (turn, c)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c)
}

/// Links `kept` arcs into closed rings. Paths that cannot be closed are
/// dropped.
pub(crate) fn trace_rings(kept: &[ArcRef], arcs: &ArcStore, graph: &NodeGraph) -> Vec<PathPart> {
    let mut leaving: FxHashMap<usize, Vec<ArcRef>> = FxHashMap::default();
    for &r in kept {
        leaving.entry(graph.start_node(r)).or_default().push(r);
    }

    let mut used: FxHashSet<ArcRef> = FxHashSet::default();
    let mut rings = Vec::new();
    for &start in kept {
        if !used.insert(start) {
            continue;
        }
        let mut ring = vec![start];
        let mut current = start;
        let mut closed = false;
        for _ in 0..kept.len() {
            let candidates = leaving
                .get(&graph.end_node(current))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let Some(next) = next_arc(current, start, candidates, &used, arcs) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            used.insert(next);
            ring.push(next);
            current = next;
        }
        if closed {
            rings.push(ring);
        } else {
            warn!(start = %start, arcs = ring.len(), "discarding ring that does not close");
        }
    }
    rings
}

fn clip_polygon(shape: &PathShape, ctx: &ClipContext<'_>, graph: &NodeGraph) -> Option<PathShape> {
    let kept = select_arcs(shape, ctx);
    let rings: PathShape = trace_rings(&kept, ctx.arcs, graph)
        .into_iter()
        .filter(|ring| path_area(ring, ctx.arcs) != 0.0)
        .collect();
    (!rings.is_empty()).then_some(rings)
}

pub(crate) fn clip_polygons(
    shapes: &[Option<PathShape>],
    ctx: &ClipContext<'_>,
) -> Vec<Option<PathShape>> {
    let Some(graph) = ctx.graph else {
        return shapes.to_vec();
    };
    shapes
        .iter()
        .map(|shape| clip_polygon(shape.as_ref()?, ctx, graph))
        .collect()
}
