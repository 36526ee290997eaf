//! Quadtree node data structure

use crate::float_types::{Real, tolerance};
use crate::geometry::{angle_between, circumcenter_and_radius, normalize, orientation, solid_angle};
use crate::point_set::PointSet;
use crate::quadtree::QuadTreeConfig;
use crate::quadtree::build::BuildContext;
use crate::quadtree::traits::{NearestToCentroid, ReduceThresholds, RepresentativeStrategy};
use nalgebra::Vector3;

/// One spherical triangle of the quadtree, holding the indices of the points
/// whose direction falls inside it.
///
/// Children are the three corner triangles (one parent vertex and the two
/// adjacent edge midpoints) followed by the inner triangle spanned by the
/// three midpoints.
#[derive(Debug, Clone)]
pub struct QuadNode {
    /// Corner indices into the tree's vertex pool, counter-clockwise seen
    /// from outside the sphere.
    pub(crate) vertices: [usize; 3],

    /// Point indices, kept on leaves only.
    pub(crate) indices: Vec<usize>,

    /// Circumcenter direction.
    pub(crate) center: Vector3<Real>,

    /// Angular circumradius, radians.
    pub(crate) radius: Real,

    /// Solid angle, steradians.
    pub(crate) area: Real,

    /// Number of points beneath this node.
    pub(crate) count: usize,

    pub(crate) depth: usize,

    pub(crate) children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    /// Recursively build the subtree for triangle `vertices` over the point
    /// indices the parent assigned to it.
    ///
    /// Every index ends up in exactly one leaf. Points on a boundary between
    /// two children go to the first matching corner, otherwise to the inner
    /// triangle.
    pub(crate) fn build<P: PointSet + ?Sized>(
        vertices: [usize; 3],
        indices: Vec<usize>,
        depth: usize,
        points: &P,
        context: &mut BuildContext,
        config: &QuadTreeConfig,
    ) -> Self {
        let [a, b, c] = vertices.map(|v| context.vertex(v));
        let (center, radius) = circumcenter_and_radius(&a, &b, &c);
        let area = solid_angle(&a, &b, &c);
        let count = indices.len();

        if count == 0 || count <= config.min_points || depth >= config.max_depth {
            return Self {
                vertices,
                indices,
                center,
                radius,
                area,
                count,
                depth,
                children: None,
            };
        }

        let [v0, v1, v2] = vertices;
        let m01 = context.midpoint(v0, v1);
        let m12 = context.midpoint(v1, v2);
        let m20 = context.midpoint(v2, v0);

        let corners = [[v0, m01, m20], [v1, m12, m01], [v2, m20, m12]];
        let inner = [m01, m12, m20];

        // Great circle bounding each corner against the inner triangle
        let cuts = corners.map(|[_, m1, m2]| (context.vertex(m1), context.vertex(m2)));

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for index in indices {
            let p = points.direction(index);
            let slot = cuts
                .iter()
                .position(|(m1, m2)| orientation(m1, m2, &p) > 0.0)
                .unwrap_or(3);
            buckets[slot].push(index);
        }

        let [b0, b1, b2, b3] = buckets;
        let children = [
            Self::build(corners[0], b0, depth + 1, points, context, config),
            Self::build(corners[1], b1, depth + 1, points, context, config),
            Self::build(corners[2], b2, depth + 1, points, context, config),
            Self::build(inner, b3, depth + 1, points, context, config),
        ];

        Self {
            vertices,
            indices: Vec::new(),
            center,
            radius,
            area,
            count,
            depth,
            children: Some(Box::new(children)),
        }
    }

    /// Vertex-pool indices of the three corners
    pub const fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    /// Circumcenter direction of the triangle
    pub const fn center(&self) -> &Vector3<Real> {
        &self.center
    }

    /// Angular circumradius of the triangle (radians)
    pub const fn radius(&self) -> Real {
        self.radius
    }

    /// Solid angle of the triangle (steradians)
    pub const fn area(&self) -> Real {
        self.area
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Number of points held beneath this node
    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<&[QuadNode; 4]> {
        self.children.as_deref()
    }

    /// Point indices stored directly on this node; empty for internal nodes.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Every point index beneath this node, leaves in child order.
    pub fn get_all(&self) -> Vec<usize> {
        let mut result = Vec::with_capacity(self.count);
        self.collect_into(&mut result);
        result
    }

    fn collect_into(&self, out: &mut Vec<usize>) {
        match &self.children {
            None => out.extend_from_slice(&self.indices),
            Some(children) => children.iter().for_each(|child| child.collect_into(out)),
        }
    }

    /// Depth-first iterator over this node and all of its descendants
    pub fn descendants(&self) -> impl Iterator<Item = &QuadNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            if let Some(children) = &current.children {
                stack.extend(children.iter().rev());
            }
            Some(current)
        })
    }

    /// Every point within angular distance `radius` of `direction`.
    ///
    /// `direction` need not be unit length. A zero or non-finite direction,
    /// or a radius that is NaN or not strictly positive, yields no points.
    /// Any radius of at least π returns every point.
    pub fn search<P: PointSet + ?Sized>(&self, points: &P, direction: &Vector3<Real>, radius: Real) -> Vec<usize> {
        let mut result = Vec::new();
        if let Some(direction) = query_direction(direction, radius) {
            self.search_into(points, &direction, radius, &mut result);
        }
        result
    }

    pub(crate) fn search_into<P: PointSet + ?Sized>(
        &self,
        points: &P,
        direction: &Vector3<Real>,
        radius: Real,
        out: &mut Vec<usize>,
    ) {
        if self.count == 0 {
            return;
        }

        let distance = angle_between(direction, &self.center);
        if distance > radius + self.radius + tolerance() {
            return;
        }

        // bounding cap entirely inside the query cap
        if distance + self.radius + tolerance() <= radius {
            self.collect_into(out);
            return;
        }

        match &self.children {
            None => out.extend(
                self.indices
                    .iter()
                    .copied()
                    .filter(|&index| angle_between(&points.direction(index), direction) <= radius),
            ),
            Some(children) => children
                .iter()
                .for_each(|child| child.search_into(points, direction, radius, out)),
        }
    }

    /// Direction-space reduction of this subtree using [`NearestToCentroid`].
    ///
    /// Descends until a node's solid angle is at most `cap_area`, its
    /// circumradius at most `theta`, or it holds at most `numpts` points;
    /// that node then contributes at most `max(numpts, 1)` of its points.
    pub fn reduce<P: PointSet + ?Sized>(&self, points: &P, theta: Real, cap_area: Real, numpts: usize) -> Vec<usize> {
        self.reduce_with(points, ReduceThresholds { theta, cap_area, numpts }, &NearestToCentroid)
    }

    /// [`QuadNode::reduce`] with an explicit representative strategy.
    pub fn reduce_with<P: PointSet + ?Sized, S: RepresentativeStrategy>(
        &self,
        points: &P,
        thresholds: ReduceThresholds,
        strategy: &S,
    ) -> Vec<usize> {
        let mut result = Vec::new();
        self.reduce_into(points, &thresholds, strategy, &mut result);
        result
    }

    pub(crate) fn reduce_into<P: PointSet + ?Sized, S: RepresentativeStrategy>(
        &self,
        points: &P,
        thresholds: &ReduceThresholds,
        strategy: &S,
        out: &mut Vec<usize>,
    ) {
        if self.count == 0 {
            return;
        }

        let stop = self.is_leaf()
            || self.area <= thresholds.cap_area
            || self.radius <= thresholds.theta
            || self.count <= thresholds.numpts;

        if stop {
            let keep = thresholds.numpts.max(1);
            if self.count <= keep {
                self.collect_into(out);
            } else {
                out.extend(strategy.select(points, self, keep));
            }
            return;
        }

        if let Some(children) = &self.children {
            children
                .iter()
                .for_each(|child| child.reduce_into(points, thresholds, strategy, out));
        }
    }

    /// Rewrite vertex indices after the pool this node was built against got
    /// merged into another one.
    #[cfg(feature = "parallel")]
    pub(crate) fn remap_vertices(&mut self, remap: &[usize]) {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            current.vertices = current.vertices.map(|v| remap[v]);
            if let Some(children) = current.children.as_deref_mut() {
                stack.extend(children.iter_mut());
            }
        }
    }
}

/// Unit query direction, or `None` when the query can match nothing.
///
/// An infinite radius is a valid query covering the whole sphere.
pub(crate) fn query_direction(direction: &Vector3<Real>, radius: Real) -> Option<Vector3<Real>> {
    if radius.is_nan() || radius <= 0.0 {
        return None;
    }
    normalize(direction)
}
