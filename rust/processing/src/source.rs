// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip-source resolution.
//!
//! A clip region is either a layer of the target dataset or a single-layer
//! dataset of its own (an imported file, a caller-built dataset, or a
//! bbox rectangle). Resolution only validates; merging the detached arcs
//! into the target dataset happens later, once every check has passed.

use std::path::Path;

use arc_lite_core::{ArcRef, ArcStore, Dataset, Layer};

use crate::error::{Command, Error, Result};

/// Boxed error returned by importers.
pub type ImportError = Box<dyn std::error::Error + Send + Sync>;

/// Reads a file into a dataset without building topology.
///
/// File formats live outside this crate; callers plug in their reader here.
pub trait DatasetImporter: Send + Sync {
    fn import(&self, path: &Path) -> std::result::Result<Dataset, ImportError>;
}

/// Where the clip polygons come from.
#[derive(Clone)]
pub enum ClipSource<'a> {
    /// A layer of the target dataset, by index.
    Layer(usize),
    /// The single layer of the target dataset with this name.
    LayerName(String),
    /// A separate single-layer dataset.
    Dataset(Dataset),
    /// A file read through `importer`.
    File {
        path: &'a Path,
        importer: &'a dyn DatasetImporter,
    },
}

impl std::fmt::Debug for ClipSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipSource::Layer(i) => f.debug_tuple("Layer").field(i).finish(),
            ClipSource::LayerName(n) => f.debug_tuple("LayerName").field(n).finish(),
            ClipSource::Dataset(d) => f
                .debug_struct("Dataset")
                .field("arcs", &d.arcs.len())
                .field("layers", &d.layers.len())
                .finish(),
            ClipSource::File { path, .. } => f.debug_struct("File").field("path", path).finish(),
        }
    }
}

/// A validated clip region.
#[derive(Debug, Clone)]
pub(crate) enum ClipRegion {
    /// Index of a polygon layer inside the target dataset.
    Attached(usize),
    /// A polygon layer with its own arcs.
    Detached(Dataset),
}

/// Builds the single-rectangle dataset for `bbox`.
pub fn bbox_dataset(command: Command, bbox: [f64; 4]) -> Result<Dataset> {
    let [x0, y0, x1, y1] = bbox;
    if !(bbox.iter().all(|v| v.is_finite()) && x1 > x0 && y1 > y0) {
        return Err(Error::InvalidBbox { command, bbox });
    }
    let ring = vec![[x0, y0], [x0, y1], [x1, y1], [x1, y0], [x0, y0]];
    let arcs = ArcStore::from_paths(vec![ring])?;
    let layer = Layer::polygons(vec![Some(vec![vec![ArcRef::forward(0)]])]);
    Ok(Dataset::new(arcs, vec![layer]))
}

fn require_polygons(command: Command, layer: &Layer) -> Result<()> {
    if layer.is_polygon() {
        Ok(())
    } else {
        Err(Error::NotPolygonLayer {
            command,
            layer: layer.display_name().to_string(),
        })
    }
}

fn single_layer(command: Command, dataset: Dataset) -> Result<Dataset> {
    if dataset.layers.len() != 1 {
        return Err(Error::MultiLayerClipSource {
            command,
            count: dataset.layers.len(),
        });
    }
    dataset.validate()?;
    require_polygons(command, &dataset.layers[0])?;
    Ok(dataset)
}

/// Resolves a clip source against `dataset` without modifying anything.
///
/// Without a source, `bbox` is used; without either the call fails.
pub(crate) fn resolve_clip_source(
    command: Command,
    source: Option<ClipSource<'_>>,
    bbox: Option<[f64; 4]>,
    dataset: &Dataset,
) -> Result<ClipRegion> {
    let region = match source {
        Some(ClipSource::Layer(index)) => {
            let count = dataset.layers.len();
            if index >= count {
                return Err(Error::LayerIndexOutOfRange {
                    command,
                    index,
                    count,
                });
            }
            ClipRegion::Attached(index)
        }
        Some(ClipSource::LayerName(name)) => match dataset.find_layers(&name).as_slice() {
            [] => return Err(Error::ClipLayerNotFound { command, name }),
            [index] => ClipRegion::Attached(*index),
            matches => {
                return Err(Error::AmbiguousClipLayer {
                    command,
                    count: matches.len(),
                    name,
                })
            }
        },
        Some(ClipSource::Dataset(source)) => ClipRegion::Detached(single_layer(command, source)?),
        Some(ClipSource::File { path, importer }) => {
            let imported = importer.import(path).map_err(|err| Error::Import {
                command,
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
            ClipRegion::Detached(single_layer(command, imported)?)
        }
        None => match bbox {
            Some(bbox) => ClipRegion::Detached(bbox_dataset(command, bbox)?),
            None => return Err(Error::MissingClipSource { command }),
        },
    };
    if let ClipRegion::Attached(index) = &region {
        require_polygons(command, &dataset.layers[*index])?;
    }
    Ok(region)
}
