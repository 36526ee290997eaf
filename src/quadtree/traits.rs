//! Traits defining quadtree operations for dependency inversion

use crate::float_types::Real;
use crate::geometry::{angle_between, cap_area, normalize};
use crate::point_set::PointSet;
use crate::quadtree::build::BuildContext;
use crate::quadtree::node::QuadNode;
use crate::quadtree::QuadTreeConfig;
use nalgebra::Vector3;

/// Tree-wide operations over the 8 octahedron roots
pub trait QuadTreeOps {
    /// Build one root per octant from the pre-partitioned point indices.
    ///
    /// Returns the roots in octant order together with the final vertex pool
    /// and edge-midpoint map.
    fn build_roots<P: PointSet + ?Sized>(
        &self,
        points: &P,
        octants: [Vec<usize>; 8],
        config: &QuadTreeConfig,
    ) -> (Vec<QuadNode>, BuildContext);

    /// Every point within `radius` of the unit vector `direction`
    fn search<P: PointSet + ?Sized>(
        &self,
        roots: &[QuadNode],
        points: &P,
        direction: &Vector3<Real>,
        radius: Real,
    ) -> Vec<usize>;

    /// Direction-space reduction of every root
    fn reduce<P: PointSet + ?Sized, S: RepresentativeStrategy>(
        &self,
        roots: &[QuadNode],
        points: &P,
        thresholds: ReduceThresholds,
        strategy: &S,
    ) -> Vec<usize>;
}

/// Stopping thresholds for [`QuadNode::reduce`].
///
/// A node stops descending as soon as one of the three bounds holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceThresholds {
    /// Angular circumradius bound (radians)
    pub theta: Real,
    /// Solid-angle bound (steradians)
    pub cap_area: Real,
    /// Point-count bound, also the number of representatives kept per stopping node
    pub numpts: usize,
}

impl ReduceThresholds {
    /// Thresholds for an angular cell size of `red` degrees keeping `octree`
    /// points per cell.
    ///
    /// Negative or non-finite `red` disables the angular bounds, leaving only
    /// the point count, which drops nothing beyond what leaves already
    /// separate. `octree` is raised to at least one.
    pub fn from_resolution(red: Real, octree: usize) -> Self {
        let theta = if red.is_finite() { red.max(0.0).to_radians() } else { 0.0 };
        Self {
            theta,
            cap_area: cap_area(theta),
            numpts: octree.max(1),
        }
    }
}

/// Trait for picking which points survive when a region is collapsed by `reduce`
pub trait RepresentativeStrategy: Sync {
    /// Pick at most `count` indices from the points under `node`.
    ///
    /// Only called with `0 < count < node.len()`.
    fn select<P: PointSet + ?Sized>(&self, points: &P, node: &QuadNode, count: usize) -> Vec<usize>;
}

/// Default strategy: the points angularly nearest to the mean direction of
/// the node's points, nearest first, ties broken by lower index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestToCentroid;

impl RepresentativeStrategy for NearestToCentroid {
    fn select<P: PointSet + ?Sized>(&self, points: &P, node: &QuadNode, count: usize) -> Vec<usize> {
        let candidates = node.get_all();
        let directions: Vec<Vector3<Real>> = candidates.iter().map(|&index| points.direction(index)).collect();

        let sum = directions.iter().fold(Vector3::<Real>::zeros(), |acc, d| acc + d);
        let centroid = normalize(&sum).unwrap_or(*node.center());

        let mut ranked: Vec<(Real, usize)> = directions
            .iter()
            .zip(&candidates)
            .map(|(d, &index)| (angle_between(d, &centroid), index))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        ranked.into_iter().take(count).map(|(_, index)| index).collect()
    }
}

/// Keep the first points in [`QuadNode::get_all`] order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEncountered;

impl RepresentativeStrategy for FirstEncountered {
    fn select<P: PointSet + ?Sized>(&self, _points: &P, node: &QuadNode, count: usize) -> Vec<usize> {
        let mut all = node.get_all();
        all.truncate(count);
        all
    }
}
