// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command options, as supplied by an already-validated command line or a
//! JSON request.

use serde::{Deserialize, Serialize};

use crate::error::Command;

/// Boolean operation applied by [`crate::clip_layers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipMode {
    /// Keep the parts of each target inside the clip region.
    Clip,
    /// Keep the parts of each target outside the clip region.
    Erase,
}

impl ClipMode {
    pub fn command(self) -> Command {
        match self {
            ClipMode::Clip => Command::Clip,
            ClipMode::Erase => Command::Erase,
        }
    }

    pub fn is_erase(self) -> bool {
        self == ClipMode::Erase
    }
}

/// Options of the `clip` and `erase` commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Clip rectangle `[xmin, ymin, xmax, ymax]`, used when no clip source is given.
    pub bbox: Option<[f64; 4]>,
    /// Write clipped copies instead of replacing the target layers.
    pub no_replace: bool,
    /// Dissolve unused and split arcs after clipping paths.
    pub cleanup: bool,
    /// Remove features whose shape became null.
    pub remove_empty: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            bbox: None,
            no_replace: false,
            cleanup: true,
            remove_empty: true,
        }
    }
}

impl ClipOptions {
    pub fn with_bbox(bbox: [f64; 4]) -> Self {
        Self {
            bbox: Some(bbox),
            ..Self::default()
        }
    }
}

/// Options of the `innerlines` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InnerlinesOptions {
    pub no_replace: bool,
}

/// Options of the `lines` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinesOptions {
    /// Fields whose value changes mark additional boundary lines.
    pub fields: Vec<String>,
    pub no_replace: bool,
}
