// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for processing commands.

use std::fmt;

use thiserror::Error;

/// Result type for processing commands.
pub type Result<T> = std::result::Result<T, Error>;

/// The command an error is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Clip,
    Erase,
    Innerlines,
    Lines,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Clip => "clip",
            Command::Erase => "erase",
            Command::Innerlines => "innerlines",
            Command::Lines => "lines",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by processing commands.
///
/// Usage errors are detected before any layer or arc is modified.
/// `Internal` and `Topology` report inconsistent input data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("[{command}] Missing clipping data")]
    MissingClipSource { command: Command },

    #[error("[{command}] Clipping layer not found: {name}")]
    ClipLayerNotFound { command: Command, name: String },

    #[error("[{command}] Received more than one source layer named {name} ({count} matches)")]
    AmbiguousClipLayer {
        command: Command,
        name: String,
        count: usize,
    },

    #[error("[{command}] Only single-layer clipping sources are supported, received {count} layers")]
    MultiLayerClipSource { command: Command, count: usize },

    #[error("[{command}] Invalid bbox (should be [xmin, ymin, xmax, ymax]): {bbox:?}")]
    InvalidBbox { command: Command, bbox: [f64; 4] },

    #[error("[{command}] Requires a polygon layer, {layer} is not one")]
    NotPolygonLayer { command: Command, layer: String },

    #[error("[{command}] Can't clip a layer with itself: {layer}")]
    SelfClip { command: Command, layer: String },

    #[error("[{command}] Invalid target layer: {layer}")]
    UnsupportedGeometry { command: Command, layer: String },

    #[error("[{command}] Layer index {index} is out of range ({count} layers)")]
    LayerIndexOutOfRange {
        command: Command,
        index: usize,
        count: usize,
    },

    #[error("[{command}] Layer {layer} is missing a data table")]
    MissingDataTable { command: Command, layer: String },

    #[error("[{command}] Unknown data field: {field}")]
    UnknownField { command: Command, field: String },

    #[error("[{command}] Unable to import {path}: {message}")]
    Import {
        command: Command,
        path: String,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] arc_lite_core::Error),

    #[error("Topology error: {0}")]
    Topology(#[from] arc_lite_topology::Error),
}

impl Error {
    /// `true` for errors caused by command options or layer choice, as
    /// opposed to inconsistent data.
    pub fn is_usage(&self) -> bool {
        !matches!(self, Error::Internal(_) | Error::Topology(_))
    }

    /// The command that raised a usage error.
    pub fn command(&self) -> Option<Command> {
        match self {
            Error::MissingClipSource { command }
            | Error::ClipLayerNotFound { command, .. }
            | Error::AmbiguousClipLayer { command, .. }
            | Error::MultiLayerClipSource { command, .. }
            | Error::InvalidBbox { command, .. }
            | Error::NotPolygonLayer { command, .. }
            | Error::SelfClip { command, .. }
            | Error::UnsupportedGeometry { command, .. }
            | Error::LayerIndexOutOfRange { command, .. }
            | Error::MissingDataTable { command, .. }
            | Error::UnknownField { command, .. }
            | Error::Import { command, .. } => Some(*command),
            Error::Internal(_) | Error::Topology(_) => None,
        }
    }
}
