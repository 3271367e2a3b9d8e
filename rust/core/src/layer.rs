// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layers: a geometry kind, index-aligned shapes and an optional attribute table.
//!
//! A shape is `Option<_>`: `None` is a null shape, which is a valid state in
//! its own right (a feature with attributes but no geometry) and is kept
//! distinct from a shape that merely has no parts.

use std::fmt;

use crate::arc::{ArcRef, ArcStore, Point};
use crate::attributes::AttributeTable;
use crate::error::{Error, Result};

/// A chain of arc references (polyline part or polygon ring).
pub type PathPart = Vec<ArcRef>;

/// The parts (or rings) of one polyline or polygon shape.
pub type PathShape = Vec<PathPart>;

/// The coordinates of one point or multipoint shape.
pub type PointShape = Vec<Point>;

/// The kind of geometry held by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GeometryType {
    Point,
    Polyline,
    Polygon,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "point",
            GeometryType::Polyline => "polyline",
            GeometryType::Polygon => "polygon",
        }
    }

    /// Returns `true` for kinds whose shapes reference arcs.
    pub fn has_paths(&self) -> bool {
        !matches!(self, GeometryType::Point)
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shapes of a layer, tagged by geometry kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Shapes {
    Point(Vec<Option<PointShape>>),
    Polyline(Vec<Option<PathShape>>),
    Polygon(Vec<Option<PathShape>>),
}

impl Shapes {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Shapes::Point(_) => GeometryType::Point,
            Shapes::Polyline(_) => GeometryType::Polyline,
            Shapes::Polygon(_) => GeometryType::Polygon,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Shapes::Point(s) => s.len(),
            Shapes::Polyline(s) | Shapes::Polygon(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if shape `index` is null (or out of range).
    pub fn is_null(&self, index: usize) -> bool {
        match self {
            Shapes::Point(s) => s.get(index).map_or(true, Option::is_none),
            Shapes::Polyline(s) | Shapes::Polygon(s) => s.get(index).map_or(true, Option::is_none),
        }
    }

    /// Path shapes for polyline and polygon layers.
    pub fn paths(&self) -> Option<&[Option<PathShape>]> {
        match self {
            Shapes::Point(_) => None,
            Shapes::Polyline(s) | Shapes::Polygon(s) => Some(s),
        }
    }

    pub fn paths_mut(&mut self) -> Option<&mut Vec<Option<PathShape>>> {
        match self {
            Shapes::Point(_) => None,
            Shapes::Polyline(s) | Shapes::Polygon(s) => Some(s),
        }
    }

    pub fn points(&self) -> Option<&[Option<PointShape>]> {
        match self {
            Shapes::Point(s) => Some(s),
            _ => None,
        }
    }

    fn retain_indices<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mut index = 0;
        let mut pred = || {
            let k = keep(index);
            index += 1;
            k
        };
        match self {
            Shapes::Point(s) => s.retain(|_| pred()),
            Shapes::Polyline(s) | Shapes::Polygon(s) => s.retain(|_| pred()),
        }
    }
}

/// A named collection of shapes sharing one geometry kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub name: Option<String>,
    /// `None` for a data-only layer.
    pub geometry: Option<Shapes>,
    pub data: Option<AttributeTable>,
}

impl Layer {
    pub fn new(name: Option<String>, geometry: Option<Shapes>) -> Self {
        Self {
            name,
            geometry,
            data: None,
        }
    }

    /// Creates an unnamed polygon layer.
    pub fn polygons(shapes: Vec<Option<PathShape>>) -> Self {
        Self::new(None, Some(Shapes::Polygon(shapes)))
    }

    /// Creates an unnamed polyline layer.
    pub fn polylines(shapes: Vec<Option<PathShape>>) -> Self {
        Self::new(None, Some(Shapes::Polyline(shapes)))
    }

    /// Creates an unnamed point layer.
    pub fn points(shapes: Vec<Option<PointShape>>) -> Self {
        Self::new(None, Some(Shapes::Point(shapes)))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: AttributeTable) -> Self {
        self.data = Some(data);
        self
    }

    /// Name for messages; unnamed layers print as `[unnamed]`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("[unnamed]")
    }

    pub fn geometry_type(&self) -> Option<GeometryType> {
        self.geometry.as_ref().map(Shapes::geometry_type)
    }

    /// Returns `true` for polyline and polygon layers.
    pub fn has_paths(&self) -> bool {
        self.geometry_type().is_some_and(|t| t.has_paths())
    }

    pub fn is_polygon(&self) -> bool {
        self.geometry_type() == Some(GeometryType::Polygon)
    }

    /// Number of features (shapes, or records for a data-only layer).
    pub fn feature_count(&self) -> usize {
        match (&self.geometry, &self.data) {
            (Some(shapes), _) => shapes.len(),
            (None, Some(data)) => data.len(),
            (None, None) => 0,
        }
    }

    pub fn path_shapes(&self) -> Option<&[Option<PathShape>]> {
        self.geometry.as_ref().and_then(Shapes::paths)
    }

    pub fn path_shapes_mut(&mut self) -> Option<&mut Vec<Option<PathShape>>> {
        self.geometry.as_mut().and_then(Shapes::paths_mut)
    }

    /// Checks record alignment and that every arc reference resolves.
    pub fn validate(&self, arcs: &ArcStore) -> Result<()> {
        if let (Some(shapes), Some(data)) = (&self.geometry, &self.data) {
            if shapes.len() != data.len() {
                return Err(Error::RecordCountMismatch {
                    shapes: shapes.len(),
                    records: data.len(),
                });
            }
        }
        for arc_ref in self.arc_refs() {
            if !arcs.contains(arc_ref) {
                return Err(Error::DanglingArcRef {
                    arc_ref,
                    arc_count: arcs.len(),
                });
            }
        }
        Ok(())
    }

    /// Iterates every arc reference of every path shape.
    pub fn arc_refs(&self) -> impl Iterator<Item = ArcRef> + '_ {
        self.path_shapes()
            .into_iter()
            .flatten()
            .flatten()
            .flatten()
            .flatten()
            .copied()
    }

    /// Rewrites every arc reference through `f`.
    pub fn map_arc_refs<F>(&mut self, mut f: F)
    where
        F: FnMut(ArcRef) -> ArcRef,
    {
        if let Some(shapes) = self.path_shapes_mut() {
            for part in shapes.iter_mut().flatten().flatten() {
                for r in part.iter_mut() {
                    *r = f(*r);
                }
            }
        }
    }

    /// Keeps the features whose index satisfies `keep`, shapes and records together.
    pub fn retain_features<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let flags: Vec<bool> = (0..self.feature_count()).map(&mut keep).collect();
        if let Some(shapes) = self.geometry.as_mut() {
            shapes.retain_indices(|i| flags[i]);
        }
        if let Some(data) = self.data.as_mut() {
            data.retain_indices(|i| flags.get(i).copied().unwrap_or(false));
        }
    }

    /// Removes null shapes together with their records. Returns the number removed.
    pub fn remove_null_shapes(&mut self) -> usize {
        let Some(shapes) = self.geometry.as_ref() else {
            return 0;
        };
        let nulls: Vec<bool> = (0..shapes.len()).map(|i| shapes.is_null(i)).collect();
        let removed = nulls.iter().filter(|n| **n).count();
        if removed > 0 {
            self.retain_features(|i| !nulls[i]);
        }
        removed
    }
}

/// Position of an arc reference within a layer's path shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub shape: usize,
    pub part: usize,
    /// Index of the arc within its part.
    pub index: usize,
    pub arc_ref: ArcRef,
}

/// Visits every arc of every part of every non-null shape, in order.
///
/// `on_part` is called before the arcs of each part are visited.
pub fn traverse_paths<P, A>(shapes: &[Option<PathShape>], mut on_part: P, mut on_arc: A)
where
    P: FnMut(usize, usize, &[ArcRef]),
    A: FnMut(PathStep),
{
    for (shape, parts) in shapes.iter().enumerate() {
        let Some(parts) = parts else { continue };
        for (part, arcs) in parts.iter().enumerate() {
            on_part(shape, part, arcs);
            for (index, &arc_ref) in arcs.iter().enumerate() {
                on_arc(PathStep {
                    shape,
                    part,
                    index,
                    arc_ref,
                });
            }
        }
    }
}
