//! Spherical quadtree over directions
//!
//! The sphere is tiled by the 8 faces of the unit octahedron; each face is
//! recursively quartered through its edge midpoints. Point indices are
//! distributed down the tree so every leaf holds exactly the points whose
//! direction falls in its triangle.
//!
//! Operations are implemented serially or with rayon depending on the
//! `parallel` feature, behind the [`QuadTreeOps`] trait.

pub mod build;
pub mod node;
pub mod traits;

#[cfg(not(feature = "parallel"))]
pub mod serial;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use build::{BuildContext, EdgeKey, OCTAHEDRON_VERTICES};
pub use node::QuadNode;
pub use traits::{FirstEncountered, NearestToCentroid, QuadTreeOps, ReduceThresholds, RepresentativeStrategy};

#[cfg(not(feature = "parallel"))]
pub use serial::SerialQuadTreeOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelQuadTreeOps;

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::geometry::angle_between;
use crate::point_set::PointSet;
use nalgebra::Vector3;

/// Deepest subdivision a [`QuadTreeConfig`] may request.
pub const MAX_SUPPORTED_DEPTH: usize = 30;

pub const DEFAULT_MIN_POINTS: usize = 1;
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Leaf criteria used while building a [`QuadTree`].
///
/// A node becomes a leaf when it holds at most `min_points` points or sits
/// at `max_depth`; the depth bound is what guarantees termination for
/// coincident points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeConfig {
    pub min_points: usize,
    pub max_depth: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_POINTS, DEFAULT_MAX_DEPTH)
    }
}

impl QuadTreeConfig {
    pub const fn new(min_points: usize, max_depth: usize) -> Self {
        Self { min_points, max_depth }
    }

    pub const fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_depth == 0 || self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ValidationError::InvalidConfig(format!(
                "max_depth {} is outside 1..={}",
                self.max_depth, MAX_SUPPORTED_DEPTH
            )));
        }
        Ok(())
    }
}

/// Octant of a direction: bit 0 set for negative x, bit 1 for negative y,
/// bit 2 for negative z. Zero (of either sign) counts as non-negative.
#[inline]
pub fn octant_of(p: &Vector3<Real>) -> usize {
    (p.x < 0.0) as usize | ((p.y < 0.0) as usize) << 1 | ((p.z < 0.0) as usize) << 2
}

/// Pool indices of the octahedron face covering `octant`, counter-clockwise
/// seen from outside.
#[inline]
pub const fn root_vertices(octant: usize) -> [usize; 3] {
    let x = octant & 1;
    let y = 2 + ((octant >> 1) & 1);
    let z = 4 + ((octant >> 2) & 1);
    // an odd number of negative axes mirrors the face
    if (octant.count_ones() & 1) == 1 { [x, z, y] } else { [x, y, z] }
}

/// Spherical quadtree over a borrowed point set.
///
/// Built once, read-only afterwards. Queries return indices into the point
/// set the tree was built from.
#[derive(Debug)]
pub struct QuadTree<'a, P: PointSet + ?Sized> {
    points: &'a P,
    roots: Vec<QuadNode>,
    context: BuildContext,
    config: QuadTreeConfig,
}

impl<'a, P: PointSet + ?Sized> QuadTree<'a, P> {
    /// Build a tree with the default [`QuadTreeConfig`].
    pub fn new(points: &'a P) -> Result<Self, ValidationError> {
        Self::with_config(points, QuadTreeConfig::default())
    }

    /// Build a tree over `points`.
    ///
    /// Fails on an empty point set, on non-finite coordinates, on zero
    /// vectors and on an invalid `config`; no tree is returned in that case.
    /// Any other finite vector is accepted whatever its magnitude.
    pub fn with_config(points: &'a P, config: QuadTreeConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        if points.is_empty() {
            return Err(ValidationError::EmptyPointSet);
        }

        let mut octants: [Vec<usize>; 8] = Default::default();
        for index in 0..points.len() {
            let p = points.point(index);
            if !p.iter().all(|c| c.is_finite()) {
                return Err(ValidationError::InvalidCoordinate { index, point: [p.x, p.y, p.z] });
            }
            if p == Vector3::zeros() {
                return Err(ValidationError::ZeroLengthVector { index });
            }
            octants[octant_of(&p)].push(index);
        }

        #[cfg(not(feature = "parallel"))]
        let ops = SerialQuadTreeOps::new();
        #[cfg(feature = "parallel")]
        let ops = ParallelQuadTreeOps::new();

        let (roots, context) = ops.build_roots(points, octants, &config);

        let tree = Self { points, roots, context, config };
        log::debug!(
            "built spherical quadtree: {} points, {} vertices, {} nodes, {} leaves, depth {}",
            tree.len(),
            tree.vertices().len(),
            tree.node_count(),
            tree.leaf_count(),
            tree.depth()
        );

        Ok(tree)
    }

    /// Every point index whose direction is within angular distance `radius`
    /// (radians, inclusive) of `direction`.
    ///
    /// Subtrees whose bounding cap cannot reach the query cap are skipped.
    /// A zero or non-finite direction, or a radius that is NaN or not
    /// strictly positive, yields an empty result. Any radius of at least π,
    /// infinity included, returns every point.
    #[cfg(not(feature = "parallel"))]
    pub fn search(&self, direction: &Vector3<Real>, radius: Real) -> Vec<usize> {
        match node::query_direction(direction, radius) {
            Some(direction) => SerialQuadTreeOps::new().search(&self.roots, self.points, &direction, radius),
            None => Vec::new(),
        }
    }

    #[cfg(feature = "parallel")]
    pub fn search(&self, direction: &Vector3<Real>, radius: Real) -> Vec<usize> {
        match node::query_direction(direction, radius) {
            Some(direction) => ParallelQuadTreeOps::new().search(&self.roots, self.points, &direction, radius),
            None => Vec::new(),
        }
    }

    /// Brute-force [`QuadTree::search`]: tests every point, no pruning.
    ///
    /// Returns indices in ascending order.
    pub fn search_exhaustive(&self, direction: &Vector3<Real>, radius: Real) -> Vec<usize> {
        let Some(direction) = node::query_direction(direction, radius) else {
            return Vec::new();
        };
        (0..self.points.len())
            .filter(|&index| angle_between(&self.points.direction(index), &direction) <= radius)
            .collect()
    }

    /// Direction-space reduction.
    ///
    /// `red` is the angular cell size in degrees and `octree` the number of
    /// points kept per cell (at least one). A region stops subdividing once
    /// its circumradius is within `red`, its area within the cap of radius
    /// `red`, or it holds at most `octree` points; it then contributes the
    /// points nearest to its mean direction.
    ///
    /// Thinning needs a positive `red`. With the angular bounds disabled
    /// (`red <= 0` or non-finite) only the point-count bound remains, and
    /// under the default leaf rule every leaf already holds at most one
    /// point, so `reduce(0.0, 1)` keeps every point.
    pub fn reduce(&self, red: Real, octree: usize) -> Vec<usize> {
        self.reduce_with(ReduceThresholds::from_resolution(red, octree), &NearestToCentroid)
    }

    /// Reduction with raw `(theta, cap_area, numpts)` thresholds dispatched
    /// to all 8 roots.
    ///
    /// `numpts` on its own does not thin a tree built with the default
    /// config: only a node holding more than `numpts` points that is also
    /// stopped by `theta`, `cap_area` or the leaf rule drops any of them.
    pub fn reduce_with_thresholds(&self, theta: Real, cap_area: Real, numpts: usize) -> Vec<usize> {
        self.reduce_with(ReduceThresholds { theta, cap_area, numpts }, &NearestToCentroid)
    }

    /// Reduction with explicit thresholds and representative strategy.
    #[cfg(not(feature = "parallel"))]
    pub fn reduce_with<S: RepresentativeStrategy>(&self, thresholds: ReduceThresholds, strategy: &S) -> Vec<usize> {
        SerialQuadTreeOps::new().reduce(&self.roots, self.points, thresholds, strategy)
    }

    #[cfg(feature = "parallel")]
    pub fn reduce_with<S: RepresentativeStrategy>(&self, thresholds: ReduceThresholds, strategy: &S) -> Vec<usize> {
        ParallelQuadTreeOps::new().reduce(&self.roots, self.points, thresholds, strategy)
    }

    /// The point set the tree was built over
    pub const fn points(&self) -> &'a P {
        self.points
    }

    /// The 8 octahedron roots, in octant order (see [`octant_of`])
    pub fn roots(&self) -> &[QuadNode] {
        &self.roots
    }

    pub const fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Vertex pool: the 6 octahedron corners followed by every midpoint
    /// created during subdivision.
    pub fn vertices(&self) -> &[Vector3<Real>] {
        self.context.vertices()
    }

    /// `(edge, midpoint)` pairs recorded while subdividing
    pub fn midpoints(&self) -> impl Iterator<Item = (EdgeKey, usize)> + '_ {
        self.context.midpoints()
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.roots.iter().map(QuadNode::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| root.descendants().count()).sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.roots
            .iter()
            .map(|root| root.descendants().filter(|node| node.is_leaf()).count())
            .sum()
    }

    /// Depth of the deepest node; roots are at depth 0.
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .flat_map(|root| root.descendants())
            .map(QuadNode::depth)
            .max()
            .unwrap_or(0)
    }
}
