//! Parallel implementation of quadtree operations

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::float_types::Real;
use crate::point_set::PointSet;
use crate::quadtree::build::BuildContext;
use crate::quadtree::node::QuadNode;
use crate::quadtree::traits::{QuadTreeOps, ReduceThresholds, RepresentativeStrategy};
use crate::quadtree::{QuadTreeConfig, root_vertices};
use nalgebra::Vector3;

/// Parallel implementation of quadtree operations
///
/// Roots are built concurrently, each against a private [`BuildContext`];
/// the contexts are merged afterwards in octant order so the resulting pool
/// matches the serial build exactly.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelQuadTreeOps;

#[cfg(feature = "parallel")]
impl ParallelQuadTreeOps {
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(feature = "parallel")]
impl QuadTreeOps for ParallelQuadTreeOps {
    fn build_roots<P: PointSet + ?Sized>(
        &self,
        points: &P,
        octants: [Vec<usize>; 8],
        config: &QuadTreeConfig,
    ) -> (Vec<QuadNode>, BuildContext) {
        let built: Vec<(QuadNode, BuildContext)> = Vec::from(octants)
            .into_par_iter()
            .enumerate()
            .map(|(octant, indices)| {
                log::trace!("building root {} over {} points", octant, indices.len());
                let mut context = BuildContext::new();
                let root = QuadNode::build(root_vertices(octant), indices, 0, points, &mut context, config);
                (root, context)
            })
            .collect();

        let mut global = BuildContext::new();
        let roots = built
            .into_iter()
            .map(|(mut root, context)| {
                let remap = global.merge(context);
                root.remap_vertices(&remap);
                root
            })
            .collect();

        (roots, global)
    }

    fn search<P: PointSet + ?Sized>(
        &self,
        roots: &[QuadNode],
        points: &P,
        direction: &Vector3<Real>,
        radius: Real,
    ) -> Vec<usize> {
        let parts: Vec<Vec<usize>> = roots
            .par_iter()
            .map(|root| {
                let mut part = Vec::new();
                root.search_into(points, direction, radius, &mut part);
                part
            })
            .collect();
        parts.concat()
    }

    fn reduce<P: PointSet + ?Sized, S: RepresentativeStrategy>(
        &self,
        roots: &[QuadNode],
        points: &P,
        thresholds: ReduceThresholds,
        strategy: &S,
    ) -> Vec<usize> {
        let parts: Vec<Vec<usize>> = roots
            .par_iter()
            .map(|root| {
                let mut part = Vec::new();
                root.reduce_into(points, &thresholds, strategy, &mut part);
                part
            })
            .collect();
        parts.concat()
    }
}
