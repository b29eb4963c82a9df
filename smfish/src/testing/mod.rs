//! Synthetic images for unit tests.

use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Isotropic Gaussian spot on a constant background.
///
/// `center` may be sub-pixel; `amplitude` is the peak height above
/// `background`.
pub fn gaussian_spot(
    shape: &[usize],
    center: &[f64],
    sigma: f64,
    amplitude: f64,
    background: f64,
) -> ArrayD<f64> {
    let mut image = ArrayD::from_elem(IxDyn(shape), background);
    add_gaussian(&mut image, center, sigma, amplitude);
    image
}

/// Add a Gaussian spot to an existing image.
pub fn add_gaussian(image: &mut ArrayD<f64>, center: &[f64], sigma: f64, amplitude: f64) {
    assert_eq!(center.len(), image.ndim());
    let two_sigma_sq = 2.0 * sigma * sigma;

    for (index, value) in image.indexed_iter_mut() {
        let r2: f64 = (0..center.len())
            .map(|axis| {
                let d = index[axis] as f64 - center[axis];
                d * d
            })
            .sum();
        *value += amplitude * (-r2 / two_sigma_sq).exp();
    }
}

/// Add uniform noise in `[-level, level]` with a fixed seed.
pub fn add_noise(image: &mut ArrayD<f64>, level: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for value in image.iter_mut() {
        *value += rng.random_range(-level..=level);
    }
}

/// Round and saturate to `u16`.
pub fn to_u16(image: &ArrayD<f64>) -> ArrayD<u16> {
    image.mapv(|v| v.round().clamp(0.0, u16::MAX as f64) as u16)
}
