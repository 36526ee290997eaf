mod support;

use std::collections::HashSet;

use spherical_quadtree::{
    QuadNode, QuadTree,
    float_types::{PI, Real},
    geometry::cap_area,
    quadtree::{FirstEncountered, NearestToCentroid, ReduceThresholds},
};

use crate::support::{sorted, uniform_sphere};

/// Nodes where a reduction with `thresholds` stops descending.
fn stopping_nodes<'t>(node: &'t QuadNode, thresholds: &ReduceThresholds, out: &mut Vec<&'t QuadNode>) {
    if node.is_empty() {
        return;
    }
    let stop = node.is_leaf()
        || node.area() <= thresholds.cap_area
        || node.radius() <= thresholds.theta
        || node.len() <= thresholds.numpts;
    match node.children() {
        Some(children) if !stop => children.iter().for_each(|child| stopping_nodes(child, thresholds, out)),
        _ => out.push(node),
    }
}

fn assert_subset_without_duplicates(reduced: &[usize], count: usize) {
    let unique: HashSet<usize> = reduced.iter().copied().collect();
    assert_eq!(unique.len(), reduced.len(), "duplicate indices in reduced set");
    assert!(reduced.iter().all(|&index| index < count));
}

#[test]
fn one_point_per_cell_thins_uniform_points() {
    let points = uniform_sphere(1000, 99);
    let tree = QuadTree::new(&points).unwrap();

    let reduced = tree.reduce(20.0, 1);
    assert!(!reduced.is_empty());
    // every depth-2 triangle already has a circumradius under 20°
    assert!(reduced.len() <= 8 * 16, "kept {} points", reduced.len());
    assert!(reduced.len() < 1000 / 5);
    assert_subset_without_duplicates(&reduced, 1000);

    // at most one survivor per collapsed region
    let thresholds = ReduceThresholds::from_resolution(20.0, 1);
    let kept: HashSet<usize> = reduced.iter().copied().collect();
    let mut regions = Vec::new();
    for root in tree.roots() {
        stopping_nodes(root, &thresholds, &mut regions);
    }
    assert_eq!(regions.len(), reduced.len());
    for region in regions {
        let survivors = region.get_all().into_iter().filter(|index| kept.contains(index)).count();
        assert_eq!(survivors, 1);
    }
}

#[test]
fn finer_resolution_keeps_more_points() {
    let points = uniform_sphere(1500, 5);
    let tree = QuadTree::new(&points).unwrap();

    let mut previous = 0;
    for red in [90.0, 40.0, 20.0, 10.0, 5.0, 2.0] {
        let reduced = tree.reduce(red, 1);
        assert_subset_without_duplicates(&reduced, points.len());
        assert!(reduced.len() >= previous, "red {red}: {} < {previous}", reduced.len());
        previous = reduced.len();
    }
    assert!(previous <= points.len());
}

#[test]
fn points_per_cell_scales_the_output() {
    let points = uniform_sphere(1000, 31);
    let tree = QuadTree::new(&points).unwrap();

    let single = tree.reduce(20.0, 1);
    let triple = tree.reduce(20.0, 3);
    assert!(triple.len() > single.len());
    assert!(triple.len() <= 3 * 8 * 16);
    assert_subset_without_duplicates(&triple, 1000);

    // zero behaves like one
    assert_eq!(tree.reduce(20.0, 0), single);
}

#[test]
fn no_angular_bound_keeps_every_distinct_point() {
    let points = uniform_sphere(400, 77);
    let tree = QuadTree::new(&points).unwrap();

    assert_eq!(sorted(tree.reduce(0.0, 1)), (0..400).collect::<Vec<_>>());
    assert_eq!(sorted(tree.reduce(-3.0, 1)), (0..400).collect::<Vec<_>>());
    assert_eq!(sorted(tree.reduce(Real::NAN, 1)), (0..400).collect::<Vec<_>>());

    // the point-count bound alone never thins a default tree
    assert_eq!(sorted(tree.reduce_with_thresholds(0.0, 0.0, 1)), (0..400).collect::<Vec<_>>());
    assert!(tree.reduce(20.0, 1).len() < 400);
}

#[test]
fn whole_sphere_cell_keeps_one_point_per_root() {
    let points = uniform_sphere(800, 3);
    let tree = QuadTree::new(&points).unwrap();

    let reduced = tree.reduce_with_thresholds(PI, 0.0, 1);
    assert_eq!(reduced.len(), tree.roots().iter().filter(|root| !root.is_empty()).count());

    let unreachable = tree.reduce_with_thresholds(0.0, 0.0, 0);
    assert_eq!(sorted(unreachable), (0..800).collect::<Vec<_>>());
}

#[test]
fn nearest_to_centroid_picks_the_central_point() {
    let points: Vec<[Real; 3]> = vec![[1.0, 0.2, 0.2], [0.2, 1.0, 0.2], [0.2, 0.2, 1.0], [1.0, 1.0, 1.0]];
    let tree = QuadTree::new(&points).unwrap();
    let thresholds = ReduceThresholds { theta: PI, cap_area: cap_area(PI), numpts: 1 };

    assert_eq!(tree.reduce_with(thresholds, &NearestToCentroid), vec![3]);

    let root = &tree.roots()[0];
    assert_eq!(root.reduce(&points, PI, cap_area(PI), 1), vec![3]);
    assert_eq!(tree.reduce_with(thresholds, &FirstEncountered), vec![root.get_all()[0]]);

    let two = root.reduce_with(&points, ReduceThresholds { numpts: 2, ..thresholds }, &NearestToCentroid);
    assert_eq!(two.len(), 2);
    assert_eq!(two[0], 3);
}

#[test]
fn coincident_points_collapse_to_the_lowest_index() {
    let points: Vec<[Real; 3]> = vec![[-0.5, 0.5, 0.7]; 30];
    let tree = QuadTree::new(&points).unwrap();

    assert_eq!(tree.reduce(0.0, 1), vec![0]);
    assert_eq!(tree.reduce(0.0, 4), vec![0, 1, 2, 3]);
}
