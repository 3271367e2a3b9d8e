// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip and erase.
//!
//! [`clip_layers`] runs in two phases. The first one resolves the clip
//! source and checks every target without modifying anything. The second
//! one merges detached clip arcs into the dataset, cuts the arcs used by
//! path layers at their intersections, clips each target by geometry kind
//! and finally dissolves the arcs the cuts left behind.

mod points;
mod polygons;
mod polylines;

use arc_lite_core::{ArcRef, ArcStore, Bounds, Dataset, Layer, PathShape, Shapes};
use arc_lite_topology::{
    arc_midpoint, dissolve_arcs, divide_arcs, Location, NodeGraph, RegionIndex, Sides,
};
use rustc_hash::FxHashMap;
use tracing::{debug, info_span, warn};

use crate::error::{Error, Result};
use crate::options::{ClipMode, ClipOptions};
use crate::output::LayerOutput;
use crate::source::{resolve_clip_source, ClipRegion, ClipSource};

/// Everything the per-kind clippers need to know about the clip region.
///
/// The clip layer is read as one region, the union of its shapes, so arcs
/// of one clip shape that fall inside another one are not part of the
/// outline.
pub(crate) struct ClipContext<'a> {
    pub arcs: &'a ArcStore,
    pub graph: Option<&'a NodeGraph>,
    pub region: RegionIndex,
    /// Coverage beside every arc the clip layer uses.
    arc_sides: FxHashMap<usize, Sides>,
    /// Outline arcs of the clip region, each with the region on its right.
    pub outline: Vec<(ArcRef, Bounds)>,
    pub mode: ClipMode,
}

impl<'a> ClipContext<'a> {
    pub(crate) fn new(
        clip_shapes: &[Option<PathShape>],
        arcs: &'a ArcStore,
        graph: Option<&'a NodeGraph>,
        mode: ClipMode,
    ) -> Self {
        let region = RegionIndex::new(clip_shapes, arcs);
        let mut arc_sides = FxHashMap::default();
        let mut outline = Vec::new();
        for &r in clip_shapes.iter().flatten().flatten().flatten() {
            let id = r.id();
            if arc_sides.contains_key(&id) {
                continue;
            }
            let sides = region.arc_sides(id, arcs);
            arc_sides.insert(id, sides);
            if let Some(boundary) = sides.boundary(id) {
                outline.push((boundary, arcs.arc_bounds(id)));
            }
        }
        Self {
            arcs,
            graph,
            region,
            arc_sides,
            outline,
            mode,
        }
    }

    pub(crate) fn erase(&self) -> bool {
        self.mode.is_erase()
    }

    /// Clip coverage beside arc `id`. Arcs the clip layer does not use lie
    /// wholly on one side of its outline; touching it counts as inside.
    pub(crate) fn clip_sides(&self, id: usize) -> Sides {
        match self.arc_sides.get(&id) {
            Some(&sides) => sides,
            None => {
                let mid = arc_midpoint(self.arcs, id);
                Sides::both(self.region.locate(mid) != Location::Outside)
            }
        }
    }
}

/// Clipped shapes of `layer`, or `None` when the layer has no geometry.
fn clip_shapes(layer: &Layer, ctx: &ClipContext<'_>) -> Option<Shapes> {
    let clipped = match layer.geometry.as_ref()? {
        Shapes::Point(s) => Shapes::Point(points::clip_points(s, ctx)),
        Shapes::Polyline(s) => Shapes::Polyline(polylines::clip_polylines(s, ctx)),
        Shapes::Polygon(s) => Shapes::Polygon(polygons::clip_polygons(s, ctx)),
    };
    Some(clipped)
}

fn count_new_nulls(before: &Shapes, after: &Shapes) -> usize {
    (0..before.len())
        .filter(|&i| !before.is_null(i) && after.is_null(i))
        .count()
}

/// Clips (or erases) the target layers of `dataset` with a polygon source.
///
/// All usage errors are reported before the dataset is modified. Without
/// `no_replace` the targets are changed in place; with it the dataset's
/// layers keep their shapes and clipped copies are returned.
///
/// A detached source's arcs are merged into the dataset only when some
/// target has paths. With point-only targets the arc store is unchanged.
pub fn clip_layers(
    dataset: &mut Dataset,
    targets: &[usize],
    source: Option<ClipSource<'_>>,
    mode: ClipMode,
    options: &ClipOptions,
) -> Result<LayerOutput> {
    let command = mode.command();
    let span = info_span!("clip_layers", %command, targets = targets.len());
    let _guard = span.enter();

    for &index in targets {
        let count = dataset.layers.len();
        let layer = dataset.layers.get(index).ok_or(Error::LayerIndexOutOfRange {
            command,
            index,
            count,
        })?;
        if layer.geometry.is_none() {
            return Err(Error::UnsupportedGeometry {
                command,
                layer: layer.display_name().to_string(),
            });
        }
    }
    dataset.validate()?;
    let region = resolve_clip_source(command, source, options.bbox, dataset)?;
    if let ClipRegion::Attached(clip_index) = &region {
        if targets.contains(clip_index) {
            return Err(Error::SelfClip {
                command,
                layer: dataset.layers[*clip_index].display_name().to_string(),
            });
        }
    }
    let uses_paths = targets.iter().any(|&i| dataset.layers[i].has_paths());

    // Validation is complete; everything below mutates.
    let mut detached_arcs = None;
    let (clip_layer, graph) = match region {
        ClipRegion::Attached(index) if uses_paths => {
            let graph = divide_arcs(dataset, None)?;
            (dataset.layers[index].clone(), Some(graph))
        }
        ClipRegion::Attached(index) => (dataset.layers[index].clone(), None),
        ClipRegion::Detached(source) if uses_paths => {
            let mut merged = Dataset::merge(vec![std::mem::take(dataset), source]);
            let mut clip_layer = merged.layers.pop().unwrap_or_default();
            *dataset = merged;
            let graph = divide_arcs(dataset, Some(&mut clip_layer))?;
            (clip_layer, Some(graph))
        }
        ClipRegion::Detached(mut source) => {
            let clip_layer = source.layers.pop().unwrap_or_default();
            detached_arcs = Some(source.arcs);
            (clip_layer, None)
        }
    };
    if let Some(graph) = &graph {
        debug!(
            nodes = graph.node_count(),
            arcs = graph.arc_count(),
            "divided arcs for clipping"
        );
    }

    let clip_paths = clip_layer.path_shapes().unwrap_or(&[]);
    let arcs = detached_arcs.as_ref().unwrap_or(&dataset.arcs);
    let ctx = ClipContext::new(clip_paths, arcs, graph.as_ref(), mode);
    let clipped: Vec<Option<Shapes>> = targets
        .iter()
        .map(|&i| clip_shapes(&dataset.layers[i], &ctx))
        .collect();

    let mut copies = Vec::new();
    for (&index, shapes) in targets.iter().zip(clipped) {
        let Some(shapes) = shapes else { continue };
        let target = &mut dataset.layers[index];
        if let Some(before) = &target.geometry {
            let nulls = count_new_nulls(before, &shapes);
            if nulls > 0 {
                warn!(
                    %command,
                    layer = target.display_name(),
                    count = nulls,
                    "shapes became null"
                );
            }
        }
        let output = if options.no_replace {
            copies.push(Layer {
                name: target.name.clone(),
                geometry: Some(shapes),
                data: target.data.clone(),
            });
            copies.last_mut()
        } else {
            target.geometry = Some(shapes);
            Some(target)
        };
        if let (true, Some(layer)) = (options.remove_empty, output) {
            let removed = layer.remove_null_shapes();
            debug!(layer = layer.display_name(), removed, "removed empty features");
        }
    }

    if uses_paths && options.cleanup {
        if options.no_replace {
            let kept = dataset.layers.len();
            dataset.layers.append(&mut copies);
            dissolve_arcs(dataset);
            copies = dataset.layers.split_off(kept);
        } else {
            dissolve_arcs(dataset);
        }
    }

    debug_assert!(dataset.validate().is_ok(), "clip left dangling arc references");

    Ok(if options.no_replace {
        LayerOutput::Copied(copies)
    } else {
        LayerOutput::Replaced(targets.to_vec())
    })
}

/// Clips one layer of `dataset`.
pub fn clip_layer(
    dataset: &mut Dataset,
    target: usize,
    source: Option<ClipSource<'_>>,
    options: &ClipOptions,
) -> Result<LayerOutput> {
    clip_layers(dataset, &[target], source, ClipMode::Clip, options)
}

/// Erases from one layer of `dataset`.
pub fn erase_layer(
    dataset: &mut Dataset,
    target: usize,
    source: Option<ClipSource<'_>>,
    options: &ClipOptions,
) -> Result<LayerOutput> {
    clip_layers(dataset, &[target], source, ClipMode::Erase, options)
}
