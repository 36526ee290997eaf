//! Serial implementation of quadtree operations

use crate::float_types::Real;
use crate::point_set::PointSet;
use crate::quadtree::build::BuildContext;
use crate::quadtree::node::QuadNode;
use crate::quadtree::traits::{QuadTreeOps, ReduceThresholds, RepresentativeStrategy};
use crate::quadtree::{QuadTreeConfig, root_vertices};
use nalgebra::Vector3;

/// Serial implementation of quadtree operations
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialQuadTreeOps;

impl SerialQuadTreeOps {
    pub const fn new() -> Self {
        Self
    }
}

impl QuadTreeOps for SerialQuadTreeOps {
    fn build_roots<P: PointSet + ?Sized>(
        &self,
        points: &P,
        octants: [Vec<usize>; 8],
        config: &QuadTreeConfig,
    ) -> (Vec<QuadNode>, BuildContext) {
        // One context for all roots so edges between neighbouring faces share
        // their midpoints
        let mut context = BuildContext::new();

        let roots = octants
            .into_iter()
            .enumerate()
            .map(|(octant, indices)| {
                log::trace!("building root {} over {} points", octant, indices.len());
                QuadNode::build(root_vertices(octant), indices, 0, points, &mut context, config)
            })
            .collect();

        (roots, context)
    }

    fn search<P: PointSet + ?Sized>(
        &self,
        roots: &[QuadNode],
        points: &P,
        direction: &Vector3<Real>,
        radius: Real,
    ) -> Vec<usize> {
        let mut result = Vec::new();
        for root in roots {
            root.search_into(points, direction, radius, &mut result);
        }
        result
    }

    fn reduce<P: PointSet + ?Sized, S: RepresentativeStrategy>(
        &self,
        roots: &[QuadNode],
        points: &P,
        thresholds: ReduceThresholds,
        strategy: &S,
    ) -> Vec<usize> {
        let mut result = Vec::new();
        for root in roots {
            root.reduce_into(points, &thresholds, strategy, &mut result);
        }
        result
    }
}
