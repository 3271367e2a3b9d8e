// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the arc data model.
//!
//! Every variant here is an invariant violation: the data handed to the core
//! is inconsistent, which points at a bug in an importer or an earlier edit
//! rather than at bad user options.

use crate::arc::ArcRef;

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when the arc data model is inconsistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A vertex has a NaN or infinite coordinate.
    #[error("arc {arc} has a non-finite coordinate at vertex {vertex}")]
    NonFiniteCoordinate { arc: usize, vertex: usize },

    /// An arc was given fewer than two vertices.
    #[error("arc {arc} has fewer than 2 vertices")]
    ShortArc { arc: usize },

    /// A shape references an arc id outside the arc store.
    #[error("arc reference {arc_ref} does not resolve (arc store holds {arc_count} arcs)")]
    DanglingArcRef { arc_ref: ArcRef, arc_count: usize },

    /// A layer's attribute table is not index-aligned with its shapes.
    #[error("layer has {shapes} shapes but {records} records")]
    RecordCountMismatch { shapes: usize, records: usize },
}
