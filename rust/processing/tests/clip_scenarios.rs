// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end clip and erase over small hand-built datasets.

use approx::assert_relative_eq;
use arc_lite_core::geom::polyline_length;
use arc_lite_core::{
    resolve_layer, resolve_shape, ArcRef, ArcStore, Dataset, Layer, Point, ResolvedGeometry,
};
use arc_lite_processing::{
    clip_layer, clip_layers, erase_layer, ClipMode, ClipOptions, ClipSource, LayerOutput,
};
use arc_lite_topology::dissolve_arcs;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ring(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![[x0, y0], [x0, y1], [x1, y1], [x1, y0], [x0, y0]]
}

/// One polygon layer holding the square [0,4]x[0,4].
fn square() -> Dataset {
    let arcs = ArcStore::from_paths(vec![ring(0.0, 0.0, 4.0, 4.0)]).unwrap();
    let layer = Layer::polygons(vec![Some(vec![vec![ArcRef::forward(0)]])]).with_name("square");
    Dataset::new(arcs, vec![layer])
}

fn bbox(b: [f64; 4]) -> ClipOptions {
    ClipOptions::with_bbox(b)
}

fn area(dataset: &Dataset, layer: &Layer) -> f64 {
    (0..layer.feature_count())
        .map(|i| layer.shape_area(i, &dataset.arcs))
        .sum()
}

/// Rings without their closing vertex, each rotated to start at its
/// smallest vertex, in sorted order.
fn normalized(geometry: &ResolvedGeometry) -> Vec<Vec<Point>> {
    let ResolvedGeometry::Rings(rings) = geometry else {
        panic!("expected polygon geometry");
    };
    let mut out: Vec<Vec<Point>> = rings
        .iter()
        .map(|r| {
            let open = &r[..r.len() - 1];
            let start = (0..open.len())
                .min_by(|&a, &b| open[a].partial_cmp(&open[b]).unwrap())
                .unwrap();
            open[start..].iter().chain(&open[..start]).copied().collect()
        })
        .collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap());
    out
}

#[test]
fn bbox_clip_of_square() {
    init_tracing();
    let mut dataset = square();
    let output = clip_layer(&mut dataset, 0, None, &bbox([1.0, 1.0, 3.0, 3.0])).unwrap();
    assert_eq!(output, LayerOutput::Replaced(vec![0]));
    assert_eq!(
        resolve_shape(&dataset.layers[0], 0, &dataset.arcs),
        Some(ResolvedGeometry::Rings(vec![ring(1.0, 1.0, 3.0, 3.0)]))
    );
    // Cleanup drops the unused outline of the original square.
    assert_eq!(dataset.arcs.len(), 1);
    dataset.validate().unwrap();
}

#[test]
fn bbox_erase_of_square_leaves_hole() {
    init_tracing();
    let mut dataset = square();
    erase_layer(&mut dataset, 0, None, &bbox([1.0, 1.0, 3.0, 3.0])).unwrap();
    let geometry = resolve_shape(&dataset.layers[0], 0, &dataset.arcs).unwrap();
    let ResolvedGeometry::Rings(rings) = &geometry else {
        panic!("expected rings");
    };
    assert_eq!(rings.len(), 2);
    assert_eq!(rings[0], ring(0.0, 0.0, 4.0, 4.0));
    assert_eq!(
        rings[1],
        vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0], [1.0, 1.0]]
    );
    assert_relative_eq!(area(&dataset, &dataset.layers[0]), 12.0);
}

#[test]
fn clip_and_erase_areas_are_complementary() {
    init_tracing();
    let boxes = [
        [1.0, 1.0, 3.0, 3.0],
        [2.0, 2.0, 6.0, 6.0],
        [-1.0, 1.0, 5.0, 3.0],
        [0.0, 0.0, 4.0, 4.0],
        [-2.0, -2.0, 6.0, 6.0],
        [10.0, 10.0, 11.0, 11.0],
        [0.5, -1.0, 3.5, 2.5],
    ];
    for b in boxes {
        let mut clipped = square();
        clip_layer(&mut clipped, 0, None, &bbox(b)).unwrap();
        let mut erased = square();
        erase_layer(&mut erased, 0, None, &bbox(b)).unwrap();
        let total = area(&clipped, &clipped.layers[0]) + area(&erased, &erased.layers[0]);
        assert_relative_eq!(total, 16.0, epsilon = 1e-9);
    }
}

#[test]
fn strip_erase_splits_square_into_two_rings() {
    let mut dataset = square();
    erase_layer(&mut dataset, 0, None, &bbox([-1.0, 1.0, 5.0, 3.0])).unwrap();
    let geometry = resolve_shape(&dataset.layers[0], 0, &dataset.arcs).unwrap();
    assert_eq!(
        normalized(&geometry),
        vec![
            vec![[0.0, 0.0], [0.0, 1.0], [4.0, 1.0], [4.0, 0.0]],
            vec![[0.0, 3.0], [0.0, 4.0], [4.0, 4.0], [4.0, 3.0]],
        ]
    );
}

#[test]
fn polyline_clip_and_erase_split_length() {
    init_tracing();
    let line = || {
        let arcs = ArcStore::from_paths(vec![vec![[-2.0, 2.0], [6.0, 2.0]]]).unwrap();
        Dataset::new(
            arcs,
            vec![Layer::polylines(vec![Some(vec![vec![ArcRef::forward(0)]])])],
        )
    };
    let length = |dataset: &Dataset| -> f64 {
        match resolve_shape(&dataset.layers[0], 0, &dataset.arcs) {
            Some(ResolvedGeometry::Lines(parts)) => parts.iter().map(|p| polyline_length(p)).sum(),
            _ => 0.0,
        }
    };
    let b = bbox([0.0, 0.0, 4.0, 4.0]);

    let mut clipped = line();
    clip_layer(&mut clipped, 0, None, &b).unwrap();
    assert_relative_eq!(length(&clipped), 4.0);
    assert_eq!(
        resolve_shape(&clipped.layers[0], 0, &clipped.arcs),
        Some(ResolvedGeometry::Lines(vec![vec![[0.0, 2.0], [4.0, 2.0]]]))
    );

    let mut erased = line();
    erase_layer(&mut erased, 0, None, &b).unwrap();
    assert_relative_eq!(length(&erased), 4.0);
    assert_eq!(erased.layers[0].part_count(0), 2);
}

#[test]
fn boundary_points_survive_both_modes() {
    let points = || {
        Dataset::new(
            ArcStore::new(),
            vec![Layer::points(vec![
                Some(vec![[1.0, 1.0], [5.0, 5.0]]),
                Some(vec![[0.0, 2.0]]),
            ])],
        )
    };
    let b = ClipOptions {
        remove_empty: false,
        ..bbox([0.0, 0.0, 4.0, 4.0])
    };

    let mut clipped = points();
    clip_layer(&mut clipped, 0, None, &b).unwrap();
    assert_eq!(
        resolve_layer(&clipped.layers[0], &clipped.arcs),
        vec![
            Some(ResolvedGeometry::Points(vec![[1.0, 1.0]])),
            Some(ResolvedGeometry::Points(vec![[0.0, 2.0]])),
        ]
    );

    let mut erased = points();
    erase_layer(&mut erased, 0, None, &b).unwrap();
    assert_eq!(
        resolve_layer(&erased.layers[0], &erased.arcs),
        vec![
            Some(ResolvedGeometry::Points(vec![[5.0, 5.0]])),
            Some(ResolvedGeometry::Points(vec![[0.0, 2.0]])),
        ]
    );
    // Points need no topology, so no arcs were merged in.
    assert!(erased.arcs.is_empty());
}

#[test]
fn null_and_emptied_shapes_export_alike() {
    let arcs = ArcStore::from_paths(vec![ring(0.0, 0.0, 4.0, 4.0)]).unwrap();
    let layer = Layer::polygons(vec![None, Some(vec![]), Some(vec![vec![ArcRef::forward(0)]])]);
    let mut dataset = Dataset::new(arcs, vec![layer]);
    let options = ClipOptions {
        remove_empty: false,
        ..bbox([10.0, 10.0, 12.0, 12.0])
    };
    clip_layer(&mut dataset, 0, None, &options).unwrap();
    assert_eq!(dataset.layers[0].feature_count(), 3);
    assert_eq!(resolve_layer(&dataset.layers[0], &dataset.arcs), vec![None, None, None]);
}

#[test]
fn dissolve_after_clip_keeps_geometry() {
    init_tracing();
    let mut dataset = square();
    let options = ClipOptions {
        cleanup: false,
        ..bbox([2.0, 2.0, 6.0, 6.0])
    };
    erase_layer(&mut dataset, 0, None, &options).unwrap();
    let before = resolve_layer(&dataset.layers[0], &dataset.arcs);
    let arcs_before = dataset.arcs.len();

    let stats = dissolve_arcs(&mut dataset);
    assert!(dataset.arcs.len() < arcs_before);
    assert_eq!(stats.arcs_after, dataset.arcs.len());
    assert!(dataset.arc_ref_counts().iter().all(|&n| n > 0));
    let after = resolve_layer(&dataset.layers[0], &dataset.arcs);
    assert_eq!(
        normalized(before[0].as_ref().unwrap()),
        normalized(after[0].as_ref().unwrap())
    );

    let once = dataset.clone();
    dissolve_arcs(&mut dataset);
    assert_eq!(dataset, once);
}

#[test]
fn clip_by_layer_of_same_dataset() {
    let arcs = ArcStore::from_paths(vec![
        ring(0.0, 0.0, 4.0, 4.0),
        ring(2.0, -1.0, 6.0, 5.0),
        vec![[-1.0, 1.0], [5.0, 1.0]],
    ])
    .unwrap();
    let f = ArcRef::forward;
    let mut dataset = Dataset::new(
        arcs,
        vec![
            Layer::polygons(vec![Some(vec![vec![f(0)]])]).with_name("land"),
            Layer::polygons(vec![Some(vec![vec![f(1)]])]).with_name("mask"),
            Layer::polylines(vec![Some(vec![vec![f(2)]])]).with_name("road"),
        ],
    );
    let output = clip_layers(
        &mut dataset,
        &[0, 2],
        Some(ClipSource::LayerName("mask".into())),
        ClipMode::Clip,
        &ClipOptions::default(),
    )
    .unwrap();
    assert_eq!(output.len(), 2);
    dataset.validate().unwrap();
    assert_relative_eq!(area(&dataset, &dataset.layers[0]), 8.0);
    assert_relative_eq!(area(&dataset, &dataset.layers[1]), 24.0);
    assert_eq!(
        resolve_shape(&dataset.layers[2], 0, &dataset.arcs),
        Some(ResolvedGeometry::Lines(vec![vec![[2.0, 1.0], [4.0, 1.0], [5.0, 1.0]]]))
    );
}

#[test]
fn no_replace_returns_copies_sharing_arcs() {
    let mut dataset = square();
    let options = ClipOptions {
        no_replace: true,
        ..bbox([1.0, 1.0, 3.0, 3.0])
    };
    let output = clip_layer(&mut dataset, 0, None, &options).unwrap();
    let LayerOutput::Copied(copies) = &output else {
        panic!("expected copies");
    };
    assert_relative_eq!(area(&dataset, &dataset.layers[0]), 16.0);
    assert_relative_eq!(area(&dataset, &copies[0]), 4.0);
    dataset.validate().unwrap();
    copies[0].validate(&dataset.arcs).unwrap();
}

#[test]
fn failed_calls_leave_dataset_unchanged() {
    let mut dataset = square();
    let before = dataset.clone();
    assert!(clip_layer(&mut dataset, 0, None, &ClipOptions::default()).is_err());
    assert!(clip_layer(&mut dataset, 0, None, &bbox([3.0, 3.0, 1.0, 1.0])).is_err());
    assert!(clip_layer(&mut dataset, 4, None, &bbox([1.0, 1.0, 3.0, 3.0])).is_err());
    let err = clip_layer(&mut dataset, 0, Some(ClipSource::Layer(0)), &ClipOptions::default())
        .unwrap_err();
    assert!(err.is_usage());
    assert_eq!(dataset, before);
}

/// Counter-clockwise ring, for holes.
fn hole(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]
}

fn polygon_layer(shapes: Vec<Vec<Vec<Point>>>, paths: &mut Vec<Vec<Point>>) -> Layer {
    let shapes = shapes
        .into_iter()
        .map(|rings| {
            let rings = rings
                .into_iter()
                .map(|r| {
                    paths.push(r);
                    vec![ArcRef::forward(paths.len() - 1)]
                })
                .collect();
            Some(rings)
        })
        .collect();
    Layer::polygons(shapes)
}

/// Layer "target" built from `targets` and layer "mask" from `masks`, each
/// shape given as its rings.
fn target_and_mask(targets: &[Vec<Vec<Point>>], masks: &[Vec<Vec<Point>>]) -> Dataset {
    let mut paths = Vec::new();
    let target = polygon_layer(targets.to_vec(), &mut paths).with_name("target");
    let mask = polygon_layer(masks.to_vec(), &mut paths).with_name("mask");
    Dataset::new(ArcStore::from_paths(paths).unwrap(), vec![target, mask])
}

fn clipped_by_mask(
    targets: &[Vec<Vec<Point>>],
    masks: &[Vec<Vec<Point>>],
    mode: ClipMode,
) -> Dataset {
    let mut dataset = target_and_mask(targets, masks);
    clip_layers(&mut dataset, &[0], Some(ClipSource::Layer(1)), mode, &ClipOptions::default())
        .unwrap();
    dataset.validate().unwrap();
    dataset
}

/// Total target area after clip, then after erase.
fn clip_and_erase_areas(targets: &[Vec<Vec<Point>>], masks: &[Vec<Vec<Point>>]) -> (f64, f64) {
    let clipped = clipped_by_mask(targets, masks, ClipMode::Clip);
    let erased = clipped_by_mask(targets, masks, ClipMode::Erase);
    (
        area(&clipped, &clipped.layers[0]),
        area(&erased, &erased.layers[0]),
    )
}

#[test]
fn overlapping_clip_shapes_act_as_their_union() {
    init_tracing();
    let targets = [vec![ring(0.0, 0.0, 4.0, 4.0)]];
    let masks = [vec![ring(1.0, 1.0, 3.0, 3.0)], vec![ring(2.0, 2.0, 5.0, 5.0)]];
    let (clipped, erased) = clip_and_erase_areas(&targets, &masks);
    assert_relative_eq!(clipped, 7.0);
    assert_relative_eq!(erased, 9.0);

    let dataset = clipped_by_mask(&targets, &masks, ClipMode::Clip);
    let geometry = resolve_shape(&dataset.layers[0], 0, &dataset.arcs).unwrap();
    assert_eq!(
        normalized(&geometry),
        vec![vec![
            [1.0, 1.0],
            [1.0, 3.0],
            [2.0, 3.0],
            [2.0, 4.0],
            [4.0, 4.0],
            [4.0, 2.0],
            [3.0, 2.0],
            [3.0, 1.0],
        ]]
    );

    let dataset = clipped_by_mask(&targets, &masks, ClipMode::Erase);
    assert_eq!(dataset.layers[0].part_count(0), 1);
}

#[test]
fn overlapping_rings_of_one_target_merge() {
    init_tracing();
    let targets = [vec![ring(0.0, 0.0, 3.0, 3.0), ring(2.0, 0.0, 5.0, 3.0)]];
    let (clipped, erased) = clip_and_erase_areas(&targets, &[vec![ring(1.0, 1.0, 4.0, 2.0)]]);
    assert_relative_eq!(clipped, 3.0);
    assert_relative_eq!(erased, 12.0);

    // A mask that misses the shape still dissolves its rings into one.
    let far = [vec![ring(10.0, 10.0, 11.0, 11.0)]];
    let dataset = clipped_by_mask(&targets, &far, ClipMode::Erase);
    assert_eq!(dataset.layers[0].part_count(0), 1);
    assert_relative_eq!(area(&dataset, &dataset.layers[0]), 15.0);
}

#[test]
fn clip_shape_with_hole() {
    let masks = [vec![ring(-1.0, -1.0, 5.0, 5.0), hole(1.0, 1.0, 3.0, 3.0)]];
    let (clipped, erased) = clip_and_erase_areas(&[vec![ring(0.0, 0.0, 4.0, 4.0)]], &masks);
    assert_relative_eq!(clipped, 12.0);
    assert_relative_eq!(erased, 4.0);
}

#[test]
fn adjacent_targets_sharing_an_edge() {
    let targets = [vec![ring(0.0, 0.0, 2.0, 4.0)], vec![ring(2.0, 0.0, 4.0, 4.0)]];
    let masks = [vec![ring(1.0, 1.0, 3.0, 3.0)]];
    let (clipped, erased) = clip_and_erase_areas(&targets, &masks);
    assert_relative_eq!(clipped, 4.0);
    assert_relative_eq!(erased, 12.0);

    let dataset = clipped_by_mask(&targets, &masks, ClipMode::Clip);
    for i in 0..2 {
        assert_relative_eq!(dataset.layers[0].shape_area(i, &dataset.arcs), 2.0);
    }
}

#[test]
fn slanted_clip_edges_keep_areas_complementary() {
    let triangle = vec![[-1.0, -1.0], [2.0, 5.0], [5.0, -1.0], [-1.0, -1.0]];
    let target = [vec![ring(0.0, 0.0, 4.0, 4.0)]];
    let (clipped, erased) = clip_and_erase_areas(&target, &[vec![triangle]]);
    assert!(clipped > 0.0 && erased > 0.0);
    assert_relative_eq!(clipped + erased, 16.0, epsilon = 1e-9);
}

#[test]
fn line_on_an_edge_inside_another_clip_shape_is_inside() {
    // The first line runs along the right edge of the first mask square,
    // inside the second one. The second line crosses both squares.
    let run = |mode: ClipMode| {
        let mut paths = vec![vec![[3.0, 2.0], [3.0, 3.0]], vec![[0.0, 2.5], [6.0, 2.5]]];
        let mask = polygon_layer(
            vec![vec![ring(1.0, 1.0, 3.0, 3.0)], vec![ring(2.0, 2.0, 5.0, 5.0)]],
            &mut paths,
        );
        let f = ArcRef::forward;
        let lines = Layer::polylines(vec![Some(vec![vec![f(0)]]), Some(vec![vec![f(1)]])]);
        let mut dataset = Dataset::new(ArcStore::from_paths(paths).unwrap(), vec![lines, mask]);
        let options = ClipOptions {
            remove_empty: false,
            ..ClipOptions::default()
        };
        clip_layers(&mut dataset, &[0], Some(ClipSource::Layer(1)), mode, &options).unwrap();
        resolve_layer(&dataset.layers[0], &dataset.arcs)
    };

    assert_eq!(
        run(ClipMode::Clip),
        vec![
            Some(ResolvedGeometry::Lines(vec![vec![[3.0, 2.0], [3.0, 2.5], [3.0, 3.0]]])),
            Some(ResolvedGeometry::Lines(vec![vec![
                [1.0, 2.5],
                [2.0, 2.5],
                [3.0, 2.5],
                [5.0, 2.5]
            ]])),
        ]
    );
    assert_eq!(
        run(ClipMode::Erase),
        vec![
            None,
            Some(ResolvedGeometry::Lines(vec![
                vec![[0.0, 2.5], [1.0, 2.5]],
                vec![[5.0, 2.5], [6.0, 2.5]],
            ])),
        ]
    );
}
