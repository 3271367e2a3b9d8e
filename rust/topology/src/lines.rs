// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary line extraction.
//!
//! Walks the rings of a polygon layer in shape, ring and arc order and
//! collects every keyed arc into the line of its key. Consecutive arcs of
//! one ring with the same key extend the same part. Each arc is emitted at
//! most once, by the first ring that reaches it.

use arc_lite_core::{ArcRef, PathShape};
use rustc_hash::FxHashMap;

use crate::classify::{ArcClassifier, ArcKeys, LineKey};

/// Extracts one polyline shape per distinct key, in order of first appearance.
pub fn extract_lines(shapes: &[Option<PathShape>], keys: &ArcKeys<'_>) -> Vec<PathShape> {
    let mut lines: Vec<PathShape> = Vec::new();
    let mut index: FxHashMap<LineKey, usize> = FxHashMap::default();
    let mut emitted = vec![false; keys.arc_count()];
    let mut prev: Option<(usize, usize, LineKey)> = None;

    for (shape_id, parts) in shapes.iter().enumerate() {
        let Some(parts) = parts else { continue };
        for (part_id, ring) in parts.iter().enumerate() {
            for (i, &arc_ref) in ring.iter().enumerate() {
                let id = arc_ref.id();
                let key = if emitted[id] { None } else { keys.key(arc_ref) };
                let Some(key) = key else {
                    prev = None;
                    continue;
                };
                emitted[id] = true;

                let continues = prev == Some((shape_id, part_id, key));
                let line_id = *index.entry(key).or_insert_with(|| {
                    lines.push(Vec::new());
                    lines.len() - 1
                });
                let line = &mut lines[line_id];
                match line.last_mut() {
                    Some(current) if continues => current.push(arc_ref),
                    _ => line.push(vec![arc_ref]),
                }
                if i == ring.len() - 1 {
                    join_wrapped(line, ring[0]);
                }
                prev = Some((shape_id, part_id, key));
            }
        }
    }
    lines
}

/// Joins the last part of `line` onto its first part when the first part
/// starts at the ring's first arc, undoing the split caused by starting the
/// walk at an arbitrary position of a closed ring.
fn join_wrapped(line: &mut PathShape, ring_start: ArcRef) {
    if line.len() < 2 || line[0].first() != Some(&ring_start) {
        return;
    }
    if let Some(mut tail) = line.pop() {
        tail.append(&mut line[0]);
        line[0] = tail;
    }
}

/// Outer boundary of each shape, one line per shape that has one.
pub fn extract_outer_lines(
    shapes: &[Option<PathShape>],
    classifier: &ArcClassifier,
) -> Vec<PathShape> {
    extract_lines(shapes, &classifier.outer_keys())
}

/// Boundaries shared by two shapes, one line per pair of neighbours.
pub fn extract_inner_lines(
    shapes: &[Option<PathShape>],
    classifier: &ArcClassifier,
) -> Vec<PathShape> {
    extract_lines(shapes, &classifier.inner_keys())
}
