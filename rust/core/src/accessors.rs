// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only per-shape geometry accessors.
//!
//! These are the values an expression evaluator exposes for a feature
//! (bounds, width, height, centroid, part count, null check, area). They
//! resolve arc references through the dataset's [`ArcStore`] and never
//! mutate anything.

use nalgebra::Point2;

use crate::arc::ArcStore;
use crate::bounds::Bounds;
use crate::geom;
use crate::layer::{Layer, Shapes};

impl Layer {
    /// Returns `true` if feature `index` has no geometry.
    pub fn is_null(&self, index: usize) -> bool {
        self.geometry.as_ref().map_or(true, |s| s.is_null(index))
    }

    /// Number of points, parts or rings in feature `index` (0 when null).
    pub fn part_count(&self, index: usize) -> usize {
        match &self.geometry {
            Some(Shapes::Point(s)) => s.get(index).and_then(Option::as_ref).map_or(0, Vec::len),
            Some(Shapes::Polyline(s) | Shapes::Polygon(s)) => {
                s.get(index).and_then(Option::as_ref).map_or(0, Vec::len)
            }
            None => 0,
        }
    }

    /// Bounding box of feature `index`; empty for null shapes.
    pub fn shape_bounds(&self, index: usize, arcs: &ArcStore) -> Bounds {
        let mut bounds = Bounds::empty();
        match &self.geometry {
            Some(Shapes::Point(s)) => {
                for p in s.get(index).into_iter().flatten().flatten() {
                    bounds.extend(*p);
                }
            }
            Some(Shapes::Polyline(s) | Shapes::Polygon(s)) => {
                for arc_ref in s.get(index).into_iter().flatten().flatten().flatten() {
                    bounds.merge(&arcs.arc_bounds(arc_ref.id()));
                }
            }
            None => {}
        }
        bounds
    }

    pub fn shape_width(&self, index: usize, arcs: &ArcStore) -> f64 {
        self.shape_bounds(index, arcs).width()
    }

    pub fn shape_height(&self, index: usize, arcs: &ArcStore) -> f64 {
        self.shape_bounds(index, arcs).height()
    }

    /// Planar area of a polygon feature (holes subtract); 0 for other kinds.
    pub fn shape_area(&self, index: usize, arcs: &ArcStore) -> f64 {
        match &self.geometry {
            Some(Shapes::Polygon(s)) => s
                .get(index)
                .and_then(Option::as_ref)
                .map_or(0.0, |rings| rings.iter().map(|r| geom::path_area(r, arcs)).sum()),
            _ => 0.0,
        }
    }

    /// Representative centre of feature `index`.
    ///
    /// Polygons use the centroid of their largest ring, polylines the
    /// length-weighted midpoint of all segments, points the coordinate mean.
    pub fn shape_centroid(&self, index: usize, arcs: &ArcStore) -> Option<Point2<f64>> {
        match self.geometry.as_ref()? {
            Shapes::Point(s) => geom::vertex_mean(s.get(index)?.as_ref()?),
            Shapes::Polyline(s) => {
                let parts = s.get(index)?.as_ref()?;
                let (mut sx, mut sy, mut total) = (0.0, 0.0, 0.0);
                let mut vertices = Vec::new();
                for part in parts {
                    let pts = geom::path_points(part, arcs);
                    let len = geom::polyline_length(&pts);
                    if let Some(c) = geom::polyline_centroid(&pts) {
                        sx += c.x * len;
                        sy += c.y * len;
                    }
                    total += len;
                    vertices.extend(pts);
                }
                if total > 0.0 {
                    Some(Point2::new(sx / total, sy / total))
                } else {
                    geom::vertex_mean(&vertices)
                }
            }
            Shapes::Polygon(s) => {
                let rings = s.get(index)?.as_ref()?;
                let largest = rings
                    .iter()
                    .map(|r| geom::path_points(r, arcs))
                    .map(|pts| (geom::ring_area(&pts), pts))
                    .fold(None::<(f64, Vec<_>)>, |best, (area, pts)| match best {
                        Some((best_area, _)) if best_area >= area => best,
                        _ => Some((area, pts)),
                    })?;
                geom::ring_centroid(&largest.1)
            }
        }
    }
}
