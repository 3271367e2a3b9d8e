// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arc compaction after destructive edits.
//!
//! Unreferenced arcs are dropped, and chains of arcs that meet at nodes with
//! exactly two used arc ends are merged into single arcs. Ends of open
//! polyline parts are never merged across, so every part keeps its
//! endpoints. Arc ids are reassigned in order of the lowest old id in each
//! chain, which makes a second pass a no-op.

use arc_lite_core::{coord_key, ArcRef, ArcStore, CoordKey, Dataset, GeometryType, Layer, PathPart};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

/// Counts reported by [`dissolve_arcs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DissolveStats {
    pub arcs_before: usize,
    pub arcs_after: usize,
    /// Arcs dropped because nothing referenced them.
    pub unreferenced: usize,
    /// Arcs absorbed into a longer arc.
    pub merged: usize,
}

const START: usize = 0;
const END: usize = 1;

fn start_side(r: ArcRef) -> usize {
    if r.is_reversed() {
        END
    } else {
        START
    }
}

fn end_side(r: ArcRef) -> usize {
    START + END - start_side(r)
}

/// The reference that leaves arc `id` through `side`.
fn leaving(id: usize, side: usize) -> ArcRef {
    if side == START {
        ArcRef::forward(id)
    } else {
        ArcRef::reversed(id)
    }
}

struct Junctions {
    ends: [Vec<CoordKey>; 2],
    at_node: FxHashMap<CoordKey, SmallVec<[(usize, usize); 4]>>,
    blocked: FxHashSet<CoordKey>,
}

impl Junctions {
    fn new(arcs: &ArcStore, counts: &[u32], layers: &[Layer]) -> Self {
        let mut ends = [Vec::with_capacity(arcs.len()), Vec::with_capacity(arcs.len())];
        let mut at_node: FxHashMap<CoordKey, SmallVec<[(usize, usize); 4]>> =
            FxHashMap::default();
        for id in 0..arcs.len() {
            let fwd = ArcRef::forward(id);
            let keys = [coord_key(arcs.first_point(fwd)), coord_key(arcs.last_point(fwd))];
            for side in [START, END] {
                ends[side].push(keys[side]);
                if counts[id] > 0 {
                    at_node.entry(keys[side]).or_default().push((id, side));
                }
            }
        }

        let mut blocked = FxHashSet::default();
        for layer in layers {
            if layer.geometry_type() != Some(GeometryType::Polyline) {
                continue;
            }
            for part in layer.path_shapes().into_iter().flatten().flatten().flatten() {
                if let (Some(&first), Some(&last)) = (part.first(), part.last()) {
                    blocked.insert(ends[start_side(first)][first.id()]);
                    blocked.insert(ends[end_side(last)][last.id()]);
                }
            }
        }
        Self {
            ends,
            at_node,
            blocked,
        }
    }

    /// The other used arc end at the node on `side` of arc `id`, if that
    /// node joins exactly two ends of different arcs.
    fn partner(&self, id: usize, side: usize) -> Option<(usize, usize)> {
        let key = self.ends[side][id];
        if self.blocked.contains(&key) {
            return None;
        }
        match self.at_node.get(&key)?.as_slice() {
            [x, y] if x.0 != y.0 => Some(if x.0 == id { *y } else { *x }),
            _ => None,
        }
    }
}

/// Finds the chain through arc `id`, in travel order.
fn trace_chain(junctions: &Junctions, id: usize, limit: usize) -> Vec<ArcRef> {
    let mut head = ArcRef::forward(id);
    for _ in 0..limit {
        let Some((pid, pside)) = junctions.partner(head.id(), start_side(head)) else {
            break;
        };
        if pid == id {
            break;
        }
        // The previous arc must end where `head` starts.
        head = !leaving(pid, pside);
    }

    let mut chain = vec![head];
    let mut current = head;
    for _ in 0..limit {
        let Some((nid, nside)) = junctions.partner(current.id(), end_side(current)) else {
            break;
        };
        if nid == head.id() {
            break;
        }
        current = leaving(nid, nside);
        chain.push(current);
    }
    chain
}

/// Drops unreferenced arcs and merges non-branching chains, rewriting the
/// references of every layer of `dataset`.
pub fn dissolve_arcs(dataset: &mut Dataset) -> DissolveStats {
    let (arcs, stats) = dissolve_layers(&dataset.arcs, &mut dataset.layers);
    dataset.arcs = arcs;
    stats
}

/// Dissolves `arcs` as used by `layers`, returning the new arc store.
///
/// `layers` must contain every layer referencing `arcs`.
pub fn dissolve_layers(arcs: &ArcStore, layers: &mut [Layer]) -> (ArcStore, DissolveStats) {
    let counts = arc_lite_core::arc_ref_counts(arcs.len(), layers.iter());
    let junctions = Junctions::new(arcs, &counts, layers);

    let mut remap: Vec<Option<ArcRef>> = vec![None; arcs.len()];
    let mut out = ArcStore::with_capacity(arcs.len(), arcs.total_vertices());
    let mut stats = DissolveStats {
        arcs_before: arcs.len(),
        ..DissolveStats::default()
    };
    for id in 0..arcs.len() {
        if counts[id] == 0 {
            stats.unreferenced += 1;
            continue;
        }
        if remap[id].is_some() {
            continue;
        }
        let chain = trace_chain(&junctions, id, arcs.len());
        let points = chain
            .iter()
            .enumerate()
            .flat_map(|(k, &r)| arcs.points(r).skip(usize::from(k > 0)));
        let new_id = out.push_arc(points);
        for &r in &chain {
            // Old forward direction maps to the new arc reversed when the
            // chain runs against it.
            remap[r.id()] = Some(r.with_id(new_id));
        }
        stats.merged += chain.len() - 1;
    }
    stats.arcs_after = out.len();

    for layer in layers.iter_mut() {
        let rings = layer.is_polygon();
        let Some(shapes) = layer.path_shapes_mut() else {
            continue;
        };
        for part in shapes.iter_mut().flatten().flatten() {
            *part = remap_part(part, &remap, rings);
        }
    }

    debug!(
        arcs_before = stats.arcs_before,
        arcs_after = stats.arcs_after,
        unreferenced = stats.unreferenced,
        merged = stats.merged,
        "dissolved arcs"
    );
    (out, stats)
}

fn remap_part(part: &[ArcRef], remap: &[Option<ArcRef>], ring: bool) -> PathPart {
    let mut out: PathPart = Vec::with_capacity(part.len());
    for &r in part {
        let Some(mapped) = remap[r.id()] else {
            debug_assert!(false, "referenced arc {r} was not remapped");
            continue;
        };
        let new_ref = if r.is_reversed() { !mapped } else { mapped };
        if out.last() != Some(&new_ref) {
            out.push(new_ref);
        }
    }
    if ring {
        while out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
    }
    out
}
