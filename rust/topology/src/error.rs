// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for topology operations.

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during topology operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input arcs or shapes violate a data model invariant.
    #[error("invalid arc data: {0}")]
    Core(#[from] arc_lite_core::Error),

    /// A field-based classifier was requested for a layer without attributes.
    #[error("layer has no attribute table")]
    MissingDataTable,

    /// A field-based classifier names a field the table does not have.
    #[error("unknown data field: {field}")]
    UnknownField { field: String },
}
