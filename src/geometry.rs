//! Spherical geometry on unit directions.
//!
//! All functions are pure. Inputs that are documented as unit vectors are
//! assumed to be normalized; functions taking arbitrary directions say so.

use crate::float_types::{FULL_SPHERE, PI, Real, TAU, tolerance};
use nalgebra::Vector3;

/// Scale `v` to unit length.
///
/// Returns `None` for the zero vector and for vectors with a non-finite
/// coordinate. Dividing by the largest component first keeps the norm from
/// overflowing or underflowing on very large or very small finite input.
#[inline]
pub fn normalize(v: &Vector3<Real>) -> Option<Vector3<Real>> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    let scale = v.amax();
    if scale <= 0.0 {
        return None;
    }
    let scaled = v / scale;
    Some(scaled / scaled.norm())
}

/// The point on the sphere halfway between two unit vectors, `normalize((a + b) / 2)`.
///
/// Antipodal pairs have no unique midpoint; `a` is returned for them.
#[inline]
pub fn midpoint(a: &Vector3<Real>, b: &Vector3<Real>) -> Vector3<Real> {
    normalize(&((a + b) * 0.5)).unwrap_or(*a)
}

/// Angle in radians between two arbitrary non-zero directions.
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel
/// vectors and does not require unit input.
#[inline]
pub fn angle_between(a: &Vector3<Real>, b: &Vector3<Real>) -> Real {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Signed volume of `(a, b, p)`; positive when `p` lies on the left of the
/// great circle running from `a` to `b`.
#[inline]
pub fn orientation(a: &Vector3<Real>, b: &Vector3<Real>, p: &Vector3<Real>) -> Real {
    p.dot(&a.cross(b))
}

/// Circumcenter direction and angular circumradius of a spherical triangle.
///
/// The center is the unit normal of the plane through the three vertices,
/// oriented towards them; every vertex is at the same angle from it, and the
/// radius reported is the largest of the three measured angles so that the
/// resulting cap never underestimates the triangle.
pub fn circumcenter_and_radius(
    v1: &Vector3<Real>,
    v2: &Vector3<Real>,
    v3: &Vector3<Real>,
) -> (Vector3<Real>, Real) {
    let normal = (v2 - v1).cross(&(v3 - v1));
    let center = match normalize(&normal) {
        Some(n) if n.dot(&(v1 + v2 + v3)) < 0.0 => -n,
        Some(n) => n,
        // collinear corners
        None => normalize(&(v1 + v2 + v3)).unwrap_or(*v1),
    };

    let radius = angle_between(&center, v1)
        .max(angle_between(&center, v2))
        .max(angle_between(&center, v3));

    (center, radius)
}

/// Solid angle (steradians) of the spherical triangle spanned by three unit vectors.
///
/// Evaluates the spherical excess through the Van Oosterom–Strackee identity
/// `tan(Ω / 2) = |a · (b × c)| / (1 + a·b + b·c + c·a)`, which does not lose
/// precision for tiny triangles the way summing interior angles does.
pub fn solid_angle(v1: &Vector3<Real>, v2: &Vector3<Real>, v3: &Vector3<Real>) -> Real {
    let triple = v1.dot(&v2.cross(v3)).abs();
    let denominator = 1.0 + v1.dot(v2) + v2.dot(v3) + v3.dot(v1);
    2.0 * triple.atan2(denominator)
}

/// Whether direction `p` (any length) lies inside or on the spherical
/// triangle `(v1, v2, v3)`, up to the crate tolerance.
///
/// Same-side test against the three great-circle planes of the edges; works
/// for either winding.
pub fn triangle_contains(
    v1: &Vector3<Real>,
    v2: &Vector3<Real>,
    v3: &Vector3<Real>,
    p: &Vector3<Real>,
) -> bool {
    let Some(u) = normalize(p) else {
        return false;
    };
    let winding = if orientation(v1, v2, v3) < 0.0 { -1.0 } else { 1.0 };
    let slack = -tolerance();

    winding * orientation(v1, v2, &u) >= slack
        && winding * orientation(v2, v3, &u) >= slack
        && winding * orientation(v3, v1, &u) >= slack
}

/// Area of a spherical cap with angular radius `theta`, `2π(1 - cos θ)`.
///
/// `theta` is clamped to `[0, π]`, so the result lies in `[0, 4π]`; NaN
/// gives an empty cap.
pub fn cap_area(theta: Real) -> Real {
    if theta.is_nan() || theta <= 0.0 {
        return 0.0;
    }
    if theta >= PI {
        return FULL_SPHERE;
    }
    TAU * (1.0 - theta.cos())
}
