// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use arc_lite_core::{Point, PointShape};
use arc_lite_topology::Location;

use super::ClipContext;

// Points on the clip outline survive both operations.
fn keep_point(p: Point, ctx: &ClipContext<'_>) -> bool {
    match ctx.region.locate(p) {
        Location::Boundary => true,
        Location::Inside => !ctx.erase(),
        Location::Outside => ctx.erase(),
    }
}

pub(crate) fn clip_points(
    shapes: &[Option<PointShape>],
    ctx: &ClipContext<'_>,
) -> Vec<Option<PointShape>> {
    shapes
        .iter()
        .map(|shape| {
            let kept: PointShape = shape
                .as_ref()?
                .iter()
                .copied()
                .filter(|&p| keep_point(p, ctx))
                .collect();
            (!kept.is_empty()).then_some(kept)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ClipMode;
    use arc_lite_core::{ArcRef, ArcStore};

    fn clip_arcs() -> ArcStore {
        ArcStore::from_paths(vec![vec![
            [0.0, 0.0],
            [0.0, 2.0],
            [2.0, 2.0],
            [2.0, 0.0],
            [0.0, 0.0],
        ]])
        .unwrap()
    }

    fn run(mode: ClipMode) -> Vec<Option<PointShape>> {
        let arcs = clip_arcs();
        let clip = vec![Some(vec![vec![ArcRef::forward(0)]])];
        let ctx = ClipContext::new(&clip, &arcs, None, mode);
        let shapes = vec![
            Some(vec![[1.0, 1.0], [5.0, 5.0]]),
            Some(vec![[2.0, 1.0]]),
            Some(vec![[7.0, 7.0]]),
            None,
        ];
        clip_points(&shapes, &ctx)
    }

    #[test]
    fn clip_keeps_inside_and_boundary() {
        assert_eq!(
            run(ClipMode::Clip),
            vec![Some(vec![[1.0, 1.0]]), Some(vec![[2.0, 1.0]]), None, None]
        );
    }

    #[test]
    fn erase_keeps_outside_and_boundary() {
        assert_eq!(
            run(ClipMode::Erase),
            vec![
                Some(vec![[5.0, 5.0]]),
                Some(vec![[2.0, 1.0]]),
                Some(vec![[7.0, 7.0]]),
                None
            ]
        );
    }
}
