#![allow(dead_code)]

use image_transforms::ImageBatch;
use ndarray::{Array4, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seeded batch of raw pixel-like values in `[0, 255)`.
///
/// Each channel gets its own offset and spread so per-channel statistics differ.
pub fn random_batch(shape: (usize, usize, usize, usize), seed: u64) -> ImageBatch {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut batch = Array4::<f32>::zeros(shape);
    for (c, mut plane) in batch.axis_iter_mut(Axis(3)).enumerate() {
        let spread = 255.0 / (c as f32 + 1.0);
        plane.mapv_inplace(|_| rng.random_range(0.0..spread) + c as f32 * 10.0);
    }
    batch.mapv_inplace(|v| v.min(254.0));
    batch
}

/// Asserts two arrays match element for element within `tol`.
pub fn assert_close(actual: &ImageBatch, expected: &ImageBatch, tol: f32) {
    assert_eq!(actual.shape(), expected.shape());
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!((a - e).abs() <= tol, "element {}: {} != {} (tol {})", i, a, e, tol);
    }
}
