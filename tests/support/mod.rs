//! Test support library
//! Provides fixtures and helpers shared by the quadtree tests.

use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spherical_quadtree::float_types::{Real, TAU};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// The 6 signed unit axes, in the order `+X, -X, +Y, -Y, +Z, -Z`.
pub fn axis_vectors() -> Vec<[Real; 3]> {
    vec![
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ]
}

/// Uniformly distributed unit vectors, reproducible from `seed`.
pub fn uniform_sphere(count: usize, seed: u64) -> Vec<Vector3<Real>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| random_direction(&mut rng)).collect()
}

/// Uniform directions scaled by a random factor in `[0.5, 2)`, the way
/// unnormalized normal estimates arrive from a scan.
pub fn scaled_sphere(count: usize, seed: u64) -> Vec<Vector3<Real>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let scale: Real = rng.random_range(0.5..2.0);
            random_direction(&mut rng) * scale
        })
        .collect()
}

pub fn random_direction<R: Rng>(rng: &mut R) -> Vector3<Real> {
    let z: Real = rng.random_range(-1.0..1.0);
    let phi: Real = rng.random_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn sorted(mut indices: Vec<usize>) -> Vec<usize> {
    indices.sort_unstable();
    indices
}
