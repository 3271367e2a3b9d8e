// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Arc-Lite Core
//!
//! Arc-based vector data model for GIS layers.
//!
//! ## Overview
//!
//! Polygon and polyline shapes do not store coordinates. Each boundary is an
//! *arc* kept once in a shared [`ArcStore`], and shapes reference arcs through
//! signed [`ArcRef`]s (`!id` traverses arc `id` backwards). Two polygons that
//! share a border therefore reference the same arc in opposite directions,
//! which is what the topology, clipping and line extraction code builds on.
//!
//! - **Arc store**: flat coordinate buffers addressed by dense arc ids
//! - **Layers**: geometry kind, index-aligned shapes (`None` = null shape)
//!   and an optional [`AttributeTable`]
//! - **Datasets**: one arc store shared by many layers, with [`Dataset::merge`]
//! - **Accessors**: bounds, centroid, area and part counts per feature
//! - **Export resolution**: arc references resolved to coordinates, with
//!   collapsed shapes reported as null
//!
//! ## Quick Start
//!
//! ```rust
//! use arc_lite_core::{ArcRef, ArcStore, Dataset, Layer};
//!
//! let arcs = ArcStore::from_paths(vec![vec![
//!     [0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0],
//! ]])
//! .unwrap();
//! let layer = Layer::polygons(vec![Some(vec![vec![ArcRef::forward(0)]])]);
//! let dataset = Dataset::new(arcs, vec![layer]);
//!
//! assert_eq!(dataset.layers[0].shape_area(0, &dataset.arcs), 16.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for references, values and resolved geometry

pub mod accessors;
pub mod arc;
pub mod attributes;
pub mod bounds;
pub mod dataset;
pub mod error;
pub mod export;
pub mod geom;
pub mod layer;

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

pub use arc::{coord_key, reverse_path, ArcPoints, ArcRef, ArcStore, CoordKey, Point};
pub use attributes::{AttributeTable, Record, Value};
pub use bounds::Bounds;
pub use dataset::{arc_ref_counts, Dataset};
pub use error::{Error, Result};
pub use export::{resolve_layer, resolve_shape, ResolvedGeometry};
pub use layer::{
    traverse_paths, GeometryType, Layer, PathPart, PathShape, PathStep, PointShape, Shapes,
};
