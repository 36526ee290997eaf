//! A **spherical quadtree**: a hierarchical index over directions on the unit sphere.
//!
//! Built for scan processing, where it bins estimated surface normals for
//! Hough-style plane voting ([`QuadTree::search`]) and subsamples point sets
//! so that angular density rather than raw point count is bounded
//! ([`QuadTree::reduce`]).
//!
//! The sphere is tiled by the 8 faces of the unit octahedron and each face is
//! recursively quartered through its edge midpoints, sharing midpoints
//! between neighbouring triangles so the subdivision stays watertight.
//!
//! ```
//! use nalgebra::Vector3;
//! use spherical_quadtree::QuadTree;
//!
//! let normals = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.999, 0.01, 0.0]];
//! let tree = QuadTree::new(&normals).unwrap();
//!
//! let mut near_x = tree.search(&Vector3::x(), 0.05);
//! near_x.sort();
//! assert_eq!(near_x, vec![0, 2]);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **hashmap**: use hashbrown for the edge-midpoint map
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to build the 8 roots and dispatch queries concurrently

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod point_set;
pub mod quadtree;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::ValidationError;
pub use point_set::PointSet;
pub use quadtree::{QuadNode, QuadTree, QuadTreeConfig};
