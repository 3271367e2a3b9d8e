// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Arc-Lite Topology
//!
//! Planar topology over the arc data model of `arc-lite-core`.
//!
//! - **Topology builder**: [`build_topology`] cuts every arc at every
//!   crossing, touch and overlap, merges duplicate boundaries and rewrites
//!   all layers in one step
//! - **Path divider**: [`divide_arcs`] does the same for the arcs used by a
//!   set of layers plus a detached clip layer
//! - **Node graph**: [`NodeGraph`], exact-match adjacency of arc endpoints
//! - **Region index**: [`RegionIndex`], point-in-polygon against a union of
//!   polygon shapes, and the covered [`Sides`] of an arc
//! - **Classifier**: [`ArcClassifier`] tags arcs with the shapes on either
//!   side; [`KeyPolicy`] turns that into line keys
//! - **Line extractor**: [`extract_lines`] and its outer/inner variants
//! - **Dissolve**: [`dissolve_arcs`] drops unused arcs and merges
//!   non-branching chains
//!
//! Every operation validates its input before touching the dataset, so a
//! failed call leaves arcs and layers as they were.

pub mod builder;
pub mod classify;
pub mod dissolve;
pub mod error;
pub mod intersect;
pub mod lines;
pub mod nodes;
pub mod region;

pub use builder::{build_topology, divide_arc_set, divide_arcs, ArcDivision};
pub use classify::{ArcClassifier, ArcKeys, KeyPolicy, LineKey};
pub use dissolve::{dissolve_arcs, dissolve_layers, DissolveStats};
pub use error::{Error, Result};
pub use intersect::segment_intersections;
pub use lines::{extract_inner_lines, extract_lines, extract_outer_lines};
pub use nodes::NodeGraph;
pub use region::{arc_midpoint, Location, RegionIndex, Sides};
