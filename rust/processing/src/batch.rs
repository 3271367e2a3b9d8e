// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One clip or erase request applied to many independent datasets.
//!
//! Datasets share nothing, so they are processed in parallel. Each dataset
//! is still clipped by a single thread.

use arc_lite_core::Dataset;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::clip::clip_layers;
use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::options::{ClipMode, ClipOptions};
use crate::output::LayerOutput;
use crate::source::ClipSource;

// The clip layer of a dataset, when the source names one.
fn attached_clip_layer(dataset: &Dataset, source: &ClipSource<'_>) -> Option<usize> {
    match source {
        ClipSource::Layer(index) => Some(*index),
        ClipSource::LayerName(name) => match dataset.find_layers(name).as_slice() {
            [index] => Some(*index),
            _ => None,
        },
        ClipSource::Dataset(_) | ClipSource::File { .. } => None,
    }
}

fn clip_dataset(
    dataset: &mut Dataset,
    source: &ClipSource<'_>,
    mode: ClipMode,
    options: &ClipOptions,
) -> Result<LayerOutput> {
    let clip_index = attached_clip_layer(dataset, source);
    let targets: Vec<usize> = (0..dataset.layers.len())
        .filter(|&i| Some(i) != clip_index)
        .collect();
    clip_layers(dataset, &targets, Some(source.clone()), mode, options)
}

/// Clips every layer of every dataset except the clip layer itself.
///
/// Results are returned in dataset order. A failing dataset is left as it
/// was and does not affect the others.
pub fn clip_datasets(
    datasets: &mut [Dataset],
    source: &ClipSource<'_>,
    mode: ClipMode,
    options: &ClipOptions,
    config: &ProcessingConfig,
) -> Vec<Result<LayerOutput>> {
    info!(
        command = %mode.command(),
        datasets = datasets.len(),
        threads = config.worker_threads,
        "clipping datasets"
    );
    let run = |datasets: &mut [Dataset]| -> Vec<Result<LayerOutput>> {
        datasets
            .par_iter_mut()
            .map(|dataset| clip_dataset(dataset, source, mode, options))
            .collect()
    };
    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build()
    {
        Ok(pool) => pool.install(|| run(datasets)),
        Err(err) => {
            warn!(error = %err, "failed to build worker pool, using the global pool");
            run(datasets)
        }
    }
}
