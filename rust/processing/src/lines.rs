// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `innerlines` and `lines` commands: polygon boundaries as polylines.

use arc_lite_core::{AttributeTable, Dataset, Layer, PathShape, Value};
use arc_lite_topology::{
    extract_inner_lines, extract_lines, extract_outer_lines, ArcClassifier, KeyPolicy,
};
use tracing::{debug, info_span, warn};

use crate::error::{Command, Error, Result};
use crate::options::{InnerlinesOptions, LinesOptions};
use crate::output::LayerOutput;

fn polygon_layer(command: Command, dataset: &Dataset, index: usize) -> Result<&Layer> {
    let count = dataset.layers.len();
    let layer = dataset.layers.get(index).ok_or(Error::LayerIndexOutOfRange {
        command,
        index,
        count,
    })?;
    if !layer.is_polygon() {
        return Err(Error::NotPolygonLayer {
            command,
            layer: layer.display_name().to_string(),
        });
    }
    dataset.validate()?;
    Ok(layer)
}

fn field_error(command: Command, layer: &Layer, err: arc_lite_topology::Error) -> Error {
    match err {
        arc_lite_topology::Error::MissingDataTable => Error::MissingDataTable {
            command,
            layer: layer.display_name().to_string(),
        },
        arc_lite_topology::Error::UnknownField { field } => Error::UnknownField { command, field },
        other => Error::Topology(other),
    }
}

// The output keeps the source name when it replaces the source.
fn place_output(
    dataset: &mut Dataset,
    index: usize,
    mut output: Layer,
    no_replace: bool,
) -> LayerOutput {
    if no_replace {
        LayerOutput::Copied(vec![output])
    } else {
        output.name = dataset.layers[index].name.take();
        dataset.layers[index] = output;
        LayerOutput::Replaced(vec![index])
    }
}

/// Replaces a polygon layer with the boundaries shared by its shapes.
pub fn innerlines(
    dataset: &mut Dataset,
    layer: usize,
    options: &InnerlinesOptions,
) -> Result<LayerOutput> {
    let command = Command::Innerlines;
    let span = info_span!("innerlines", layer);
    let _guard = span.enter();

    let source = polygon_layer(command, dataset, layer)?;
    let shapes = source.path_shapes().unwrap_or(&[]);
    let classifier = ArcClassifier::new(shapes, dataset.arcs.len());
    let lines = extract_inner_lines(shapes, &classifier);
    if lines.is_empty() {
        warn!(%command, layer = source.display_name(), "no shared boundaries were found");
    }
    let output = Layer::polylines(lines.into_iter().map(Some).collect());
    Ok(place_output(dataset, layer, output, options.no_replace))
}

/// Replaces a polygon layer with typed boundary lines.
///
/// The output holds outer boundaries (`TYPE` 0), then for each field in
/// `options.fields` the shared boundaries where that field's value changes
/// (`TYPE` 1, 2, ...), then all shared boundaries (the last `TYPE`). Each
/// batch is placed in front of the previous ones, so the inner lines come
/// first.
pub fn lines(dataset: &mut Dataset, layer: usize, options: &LinesOptions) -> Result<LayerOutput> {
    let command = Command::Lines;
    let span = info_span!("lines", layer, fields = options.fields.len());
    let _guard = span.enter();

    let source = polygon_layer(command, dataset, layer)?;
    if !options.fields.is_empty() && source.data.is_none() {
        return Err(Error::MissingDataTable {
            command,
            layer: source.display_name().to_string(),
        });
    }
    let shapes = source.path_shapes().unwrap_or(&[]);
    let classifier = ArcClassifier::new(shapes, dataset.arcs.len());

    let mut batches: Vec<Vec<PathShape>> = vec![extract_outer_lines(shapes, &classifier)];
    for field in &options.fields {
        let policy = KeyPolicy::FieldDiffers {
            field: field.clone(),
        };
        let keys = classifier
            .with_policy(&policy, source.data.as_ref())
            .map_err(|err| field_error(command, source, err))?;
        batches.push(extract_lines(shapes, &keys));
    }
    batches.push(extract_inner_lines(shapes, &classifier));

    let mut lines = Vec::new();
    let mut records = Vec::new();
    for (type_id, batch) in batches.into_iter().enumerate().rev() {
        debug!(type_id, lines = batch.len(), "extracted line batch");
        records.extend(std::iter::repeat(type_id as i64).take(batch.len()));
        lines.extend(batch.into_iter().map(Some));
    }
    if lines.is_empty() {
        warn!(%command, layer = source.display_name(), "no lines were found");
    }
    let data = AttributeTable::from_records(
        records
            .into_iter()
            .map(|type_id| [("TYPE", Value::from(type_id))]),
    );
    let output = Layer::polylines(lines).with_data(data);
    Ok(place_output(dataset, layer, output, options.no_replace))
}
