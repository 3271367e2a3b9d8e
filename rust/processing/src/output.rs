// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use arc_lite_core::{Dataset, Layer};

/// Layers produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerOutput {
    /// The inputs were replaced in place; their indices in the dataset.
    Replaced(Vec<usize>),
    /// New layers; the dataset's layers are left as they were. Arc
    /// references resolve into the dataset's arc store.
    Copied(Vec<Layer>),
}

impl LayerOutput {
    /// The output layers, in input order.
    pub fn layers<'a>(&'a self, dataset: &'a Dataset) -> Vec<&'a Layer> {
        match self {
            LayerOutput::Replaced(indices) => indices.iter().map(|&i| &dataset.layers[i]).collect(),
            LayerOutput::Copied(layers) => layers.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LayerOutput::Replaced(indices) => indices.len(),
            LayerOutput::Copied(layers) => layers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
