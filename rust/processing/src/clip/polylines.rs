// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyline clipping.
//!
//! Arcs have already been cut at every crossing with the clip outline, so
//! each arc lies entirely on one side of it and is tested once through a
//! representative point. Kept arcs are regrouped into maximal runs.

use arc_lite_core::{ArcRef, ArcStore, PathPart, PathShape};

use super::ClipContext;

// Arcs on the clip outline survive both operations.
fn keep_arc(arc_ref: ArcRef, ctx: &ClipContext<'_>) -> bool {
    let sides = ctx.clip_sides(arc_ref.id());
    sides.left != sides.right || sides.right != ctx.erase()
}

fn is_closed(part: &[ArcRef], arcs: &ArcStore) -> bool {
    match (part.first(), part.last()) {
        (Some(&first), Some(&last)) => arcs.first_point(first) == arcs.last_point(last),
        _ => false,
    }
}

/// Maximal runs of consecutive kept arcs. In a closed part, a run that
/// wraps past the last arc is joined with the one at the start.
pub(crate) fn kept_runs(part: &[ArcRef], keep: &[bool], closed: bool) -> Vec<PathPart> {
    let mut runs: Vec<PathPart> = Vec::new();
    for (i, &r) in part.iter().enumerate() {
        if !keep[i] {
            continue;
        }
        match runs.last_mut() {
            Some(run) if i > 0 && keep[i - 1] => run.push(r),
            _ => runs.push(vec![r]),
        }
    }
    let wraps = closed && keep.first() == Some(&true) && keep.last() == Some(&true);
    if wraps && runs.len() > 1 {
        if let Some(mut tail) = runs.pop() {
            tail.append(&mut runs[0]);
            runs[0] = tail;
        }
    }
    runs
}

fn clip_polyline(shape: &PathShape, ctx: &ClipContext<'_>) -> Option<PathShape> {
    let mut parts = Vec::new();
    for part in shape {
        let keep: Vec<bool> = part.iter().map(|&r| keep_arc(r, ctx)).collect();
        parts.extend(kept_runs(part, &keep, is_closed(part, ctx.arcs)));
    }
    (!parts.is_empty()).then_some(parts)
}

pub(crate) fn clip_polylines(
    shapes: &[Option<PathShape>],
    ctx: &ClipContext<'_>,
) -> Vec<Option<PathShape>> {
    shapes
        .iter()
        .map(|shape| clip_polyline(shape.as_ref()?, ctx))
        .collect()
}
