//! Construction-time state shared by the nodes of a quadtree: the vertex
//! pool and the edge-midpoint map.

use crate::float_types::Real;
use crate::geometry::midpoint;
use nalgebra::Vector3;

#[cfg(feature = "hashmap")]
use hashbrown::HashMap;
#[cfg(not(feature = "hashmap"))]
use std::collections::HashMap;

/// Unordered pair of vertex-pool indices, stored as `(min, max)`.
pub type EdgeKey = (usize, usize);

/// The 6 octahedron corners, in pool order `+X, -X, +Y, -Y, +Z, -Z`.
pub const OCTAHEDRON_VERTICES: [[Real; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

#[inline]
pub const fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a < b { (a, b) } else { (b, a) }
}

/// Vertex pool plus edge→midpoint deduplication map.
///
/// Every triangle asking for the midpoint of the same edge gets the same
/// pool index back, which keeps the subdivided mesh free of duplicate
/// vertices and T-junctions.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub(crate) vertices: Vec<Vector3<Real>>,
    pub(crate) middlemap: HashMap<EdgeKey, usize>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildContext {
    /// A fresh context holding only the octahedron corners.
    pub fn new() -> Self {
        Self {
            vertices: OCTAHEDRON_VERTICES
                .iter()
                .map(|v| Vector3::new(v[0], v[1], v[2]))
                .collect(),
            middlemap: HashMap::new(),
        }
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> Vector3<Real> {
        self.vertices[index]
    }

    pub fn vertices(&self) -> &[Vector3<Real>] {
        &self.vertices
    }

    /// Pool index of the midpoint of edge `(a, b)`, appending it on first request.
    pub fn midpoint(&mut self, a: usize, b: usize) -> usize {
        let key = edge_key(a, b);
        if let Some(&index) = self.middlemap.get(&key) {
            return index;
        }

        let mid = midpoint(&self.vertices[a], &self.vertices[b]);
        let index = self.vertices.len();
        self.vertices.push(mid);
        self.middlemap.insert(key, index);
        index
    }

    /// Fold a context that was built independently (from [`BuildContext::new`])
    /// into this one.
    ///
    /// Returns the table mapping `other`'s pool indices to indices in `self`.
    /// Midpoints of edges already present here are reused, so merging the
    /// per-root contexts of a tree yields the same pool a single shared
    /// context would have produced.
    pub fn merge(&mut self, other: BuildContext) -> Vec<usize> {
        let base = OCTAHEDRON_VERTICES.len();
        let mut origins: Vec<EdgeKey> = vec![(0, 0); other.vertices.len().saturating_sub(base)];
        for (&key, &index) in &other.middlemap {
            origins[index - base] = key;
        }

        let mut remap: Vec<usize> = (0..base.min(other.vertices.len())).collect();
        remap.reserve(origins.len());

        // a midpoint is always created after both of its endpoints
        for (offset, &(a, b)) in origins.iter().enumerate() {
            let key = edge_key(remap[a], remap[b]);
            let index = match self.middlemap.get(&key) {
                Some(&index) => index,
                None => {
                    let index = self.vertices.len();
                    self.vertices.push(other.vertices[base + offset]);
                    self.middlemap.insert(key, index);
                    index
                },
            };
            remap.push(index);
        }

        log::trace!(
            "merged {} private midpoints into a pool of {} vertices",
            origins.len(),
            self.vertices.len()
        );

        remap
    }

    /// Iterate over `(edge, midpoint)` pairs.
    pub fn midpoints(&self) -> impl Iterator<Item = (EdgeKey, usize)> + '_ {
        self.middlemap.iter().map(|(&key, &index)| (key, index))
    }
}
