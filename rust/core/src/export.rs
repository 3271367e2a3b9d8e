// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate resolution for exporters.
//!
//! Writers for GeoJSON, TopoJSON or Shapefile consume [`ResolvedGeometry`]
//! instead of arc references. A null shape and a shape whose paths all
//! collapse both resolve to `None`, so they serialize identically as null
//! geometry.

use crate::arc::{ArcStore, Point};
use crate::geom;
use crate::layer::{Layer, Shapes};

/// Coordinates of one feature, with arc references resolved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "coordinates"))]
pub enum ResolvedGeometry {
    /// One or more points.
    Points(Vec<Point>),
    /// Polyline parts, each with at least two vertices.
    Lines(Vec<Vec<Point>>),
    /// Closed rings with non-zero area; clockwise rings are outer rings.
    Rings(Vec<Vec<Point>>),
}

/// Resolves feature `index` of `layer`; `None` for null or collapsed shapes.
pub fn resolve_shape(layer: &Layer, index: usize, arcs: &ArcStore) -> Option<ResolvedGeometry> {
    match layer.geometry.as_ref()? {
        Shapes::Point(s) => {
            let points = s.get(index)?.as_ref()?;
            (!points.is_empty()).then(|| ResolvedGeometry::Points(points.clone()))
        }
        Shapes::Polyline(s) => {
            let lines: Vec<_> = s
                .get(index)?
                .as_ref()?
                .iter()
                .map(|part| geom::path_points(part, arcs))
                .filter(|pts| geom::polyline_length(pts) > 0.0)
                .collect();
            (!lines.is_empty()).then_some(ResolvedGeometry::Lines(lines))
        }
        Shapes::Polygon(s) => {
            let rings: Vec<_> = s
                .get(index)?
                .as_ref()?
                .iter()
                .map(|ring| geom::path_points(ring, arcs))
                .filter(|pts| geom::ring_area(pts) != 0.0)
                .collect();
            (!rings.is_empty()).then_some(ResolvedGeometry::Rings(rings))
        }
    }
}

/// Resolves every feature of `layer`, index-aligned with its shapes.
pub fn resolve_layer(layer: &Layer, arcs: &ArcStore) -> Vec<Option<ResolvedGeometry>> {
    (0..layer.feature_count())
        .map(|i| resolve_shape(layer, i, arcs))
        .collect()
}
