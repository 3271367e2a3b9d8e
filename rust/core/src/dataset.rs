// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datasets: one arc store shared by any number of layers.

use crate::arc::ArcStore;
use crate::error::Result;
use crate::layer::Layer;

/// An arc store together with the layers whose shapes reference it.
///
/// Every arc reference in every layer must resolve into `arcs`; any edit that
/// renumbers arcs must rewrite all layers in the same step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub arcs: ArcStore,
    pub layers: Vec<Layer>,
}

impl Dataset {
    pub fn new(arcs: ArcStore, layers: Vec<Layer>) -> Self {
        Self { arcs, layers }
    }

    /// Checks arc validity, record alignment and reference resolution.
    pub fn validate(&self) -> Result<()> {
        self.arcs.validate()?;
        for layer in &self.layers {
            layer.validate(&self.arcs)?;
        }
        Ok(())
    }

    /// Indices of the layers named `name`.
    pub fn find_layers(&self, name: &str) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.name.as_deref() == Some(name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Merges several datasets into one, concatenating their arc stores and
    /// shifting the arc references of every absorbed layer.
    pub fn merge(datasets: Vec<Dataset>) -> Dataset {
        let mut merged = Dataset::default();
        for mut dataset in datasets {
            let offset = merged.arcs.append(&dataset.arcs);
            if offset > 0 {
                for layer in &mut dataset.layers {
                    layer.map_arc_refs(|r| r.with_id(r.id() + offset));
                }
            }
            merged.layers.append(&mut dataset.layers);
        }
        merged
    }

    /// Number of references to each arc id across all layers.
    pub fn arc_ref_counts(&self) -> Vec<u32> {
        arc_ref_counts(self.arcs.len(), self.layers.iter())
    }
}

/// Number of references to each arc id across `layers`.
pub fn arc_ref_counts<'a, I>(arc_count: usize, layers: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a Layer>,
{
    let mut counts = vec![0u32; arc_count];
    for layer in layers {
        for r in layer.arc_refs() {
            counts[r.id()] += 1;
        }
    }
    counts
}
