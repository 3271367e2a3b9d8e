// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node graph over the endpoints of a cut arc store.
//!
//! A node is a coordinate where at least one arc starts or ends. Endpoints
//! are matched exactly, so the graph is only meaningful after the arcs have
//! been cut at every intersection. The graph is rebuilt for every operation
//! and never outlives the arc store it was built from.

use arc_lite_core::{coord_key, ArcRef, ArcStore, CoordKey, Point};
use rustc_hash::FxHashMap;

/// Adjacency of arc endpoints, stored as flat compressed rows.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    coords: Vec<Point>,
    lookup: FxHashMap<CoordKey, u32>,
    /// `[start node, end node]` per arc id.
    arc_nodes: Vec<[u32; 2]>,
    /// Row offsets into `outgoing`, one row per node.
    offsets: Vec<u32>,
    /// References that leave each node, grouped by node.
    outgoing: Vec<ArcRef>,
}

impl NodeGraph {
    /// Builds the graph for every arc in `arcs`.
    pub fn new(arcs: &ArcStore) -> Self {
        let mut coords = Vec::new();
        let mut lookup: FxHashMap<CoordKey, u32> = FxHashMap::default();
        let mut node_of = |p: Point| -> u32 {
            *lookup.entry(coord_key(p)).or_insert_with(|| {
                coords.push(p);
                (coords.len() - 1) as u32
            })
        };

        let mut arc_nodes = Vec::with_capacity(arcs.len());
        for id in 0..arcs.len() {
            let fwd = ArcRef::forward(id);
            let start = node_of(arcs.first_point(fwd));
            let end = node_of(arcs.last_point(fwd));
            arc_nodes.push([start, end]);
        }

        let mut degree = vec![0u32; coords.len()];
        for &[start, end] in &arc_nodes {
            degree[start as usize] += 1;
            degree[end as usize] += 1;
        }
        let mut offsets = Vec::with_capacity(coords.len() + 1);
        offsets.push(0u32);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }
        let mut fill = offsets[..coords.len()].to_vec();
        let mut outgoing = vec![ArcRef::forward(0); offsets[coords.len()] as usize];
        for (id, &[start, end]) in arc_nodes.iter().enumerate() {
            outgoing[fill[start as usize] as usize] = ArcRef::forward(id);
            fill[start as usize] += 1;
            outgoing[fill[end as usize] as usize] = ArcRef::reversed(id);
            fill[end as usize] += 1;
        }

        Self {
            coords,
            lookup,
            arc_nodes,
            offsets,
            outgoing,
        }
    }

    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_nodes.len()
    }

    /// Node where `arc_ref` starts, in its direction of travel.
    #[inline]
    pub fn start_node(&self, arc_ref: ArcRef) -> usize {
        let [start, end] = self.arc_nodes[arc_ref.id()];
        if arc_ref.is_reversed() {
            end as usize
        } else {
            start as usize
        }
    }

    /// Node where `arc_ref` ends, in its direction of travel.
    #[inline]
    pub fn end_node(&self, arc_ref: ArcRef) -> usize {
        self.start_node(!arc_ref)
    }

    pub fn node_point(&self, node: usize) -> Point {
        self.coords[node]
    }

    /// Node located exactly at `p`, if any.
    pub fn find_node(&self, p: Point) -> Option<usize> {
        self.lookup.get(&coord_key(p)).map(|&n| n as usize)
    }

    /// References leaving `node`; a closed arc appears twice, once per direction.
    pub fn outgoing(&self, node: usize) -> &[ArcRef] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.outgoing[start..end]
    }
}
