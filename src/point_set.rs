//! Indexed, read-only access to the directions a [`QuadTree`](crate::QuadTree) is built over.
//!
//! The tree only ever stores indices into a point set; the coordinates stay
//! with the caller (a scan reader, a normal estimator, ...).

use crate::float_types::Real;
use crate::geometry::normalize;
use nalgebra::{Point3, Vector3};

/// An ordered sequence of 3D coordinates interpreted as directions.
///
/// Coordinates need not be unit length; every consumer in this crate only
/// looks at their direction. Point sets are shared read-only between
/// threads when the `parallel` feature is enabled.
pub trait PointSet: Sync {
    /// Number of points in the set.
    fn len(&self) -> usize;

    /// The coordinates of point `index`. `index` is always `< self.len()`.
    fn point(&self, index: usize) -> Vector3<Real>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unit direction of point `index`; the raw coordinates when they have none.
    #[inline]
    fn direction(&self, index: usize) -> Vector3<Real> {
        let p = self.point(index);
        normalize(&p).unwrap_or(p)
    }
}

macro_rules! impl_point_set {
    ($elem:ty, |$p:ident| $conv:expr) => {
        impl PointSet for [$elem] {
            #[inline]
            fn len(&self) -> usize {
                <[$elem]>::len(self)
            }

            #[inline]
            fn point(&self, index: usize) -> Vector3<Real> {
                let $p = &self[index];
                $conv
            }
        }

        impl PointSet for Vec<$elem> {
            #[inline]
            fn len(&self) -> usize {
                Vec::len(self)
            }

            #[inline]
            fn point(&self, index: usize) -> Vector3<Real> {
                self.as_slice().point(index)
            }
        }
    };
}

impl_point_set!([Real; 3], |p| Vector3::new(p[0], p[1], p[2]));
impl_point_set!(Vector3<Real>, |p| *p);
impl_point_set!(Point3<Real>, |p| p.coords);
