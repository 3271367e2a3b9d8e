// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Arc-Lite Processing
//!
//! Layer commands built on `arc-lite-topology`.
//!
//! - [`clip_layers`] / [`clip_layer`] / [`erase_layer`]: intersection or
//!   difference of point, polyline and polygon layers with a polygon
//!   clip source ([`ClipSource`] or a bbox)
//! - [`innerlines`] and [`lines`]: polygon boundaries as polyline layers
//! - [`clip_datasets`]: one clip request over many datasets, in parallel
//!
//! Commands report usage errors before modifying the dataset.
//!
//! ```no_run
//! use arc_lite_core::Dataset;
//! use arc_lite_processing::{clip_layer, ClipOptions};
//!
//! fn clip_to_box(dataset: &mut Dataset) -> arc_lite_processing::Result<()> {
//!     let options = ClipOptions::with_bbox([0.0, 0.0, 10.0, 10.0]);
//!     clip_layer(dataset, 0, None, &options)?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod clip;
pub mod config;
pub mod error;
pub mod lines;
pub mod options;
pub mod output;
pub mod source;

pub use batch::clip_datasets;
pub use clip::{clip_layer, clip_layers, erase_layer};
pub use config::ProcessingConfig;
pub use error::{Command, Error, Result};
pub use lines::{innerlines, lines};
pub use options::{ClipMode, ClipOptions, InnerlinesOptions, LinesOptions};
pub use output::LayerOutput;
pub use source::{bbox_dataset, ClipSource, DatasetImporter, ImportError};
