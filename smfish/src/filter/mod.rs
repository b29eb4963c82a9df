//! Laplacian-of-Gaussian enhancement of spot-like features.
//!
//! The filter runs separable 1-D Gaussian passes in `f64`: for every axis the
//! image is correlated with the second-derivative kernel along that axis and
//! the smoothing kernel along the others, and the per-axis terms are summed.
//! Boundaries reflect (`d c b a | a b c d`).

mod kernel;


use ndarray::{ArrayD, ArrayViewD, Zip};

use crate::error::{Error, Result};
use crate::image::{check_array, Pixel, IMAGE};
use crate::params::Sigma;

pub use kernel::{correlate_axis, gaussian_kernel_1d};

/// Kernel radius in units of sigma.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// Largest kernel radius, in pixels, the filter will build.
pub const MAX_KERNEL_RADIUS: f64 = 10_000.0;

/// Spot-enhancing filter applied before local-maximum detection.
///
/// Implementations must return an array with the input's shape and dtype in
/// which spots are bright and the background is non-negative.
pub trait LogFilter: Send + Sync {
    fn filter<P: Pixel>(&self, image: ArrayViewD<'_, P>, sigma: &Sigma) -> Result<ArrayD<P>>;
}

/// Negated Laplacian of Gaussian, clipped at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianLaplace {
    /// Kernels extend `int(truncate * sigma + 0.5)` pixels on each side.
    pub truncate: f64,
}

impl Default for GaussianLaplace {
    fn default() -> Self {
        Self {
            truncate: DEFAULT_TRUNCATE,
        }
    }
}

impl GaussianLaplace {
    /// Filter response in `f64`, before the cast back to the input dtype.
    pub fn response<P: Pixel>(
        &self,
        image: ArrayViewD<'_, P>,
        sigma: &Sigma,
    ) -> Result<ArrayD<f64>> {
        check_array("image", &image, &IMAGE)?;
        let sigmas = sigma.per_axis(image.ndim())?;
        if let Some(too_wide) = sigmas
            .iter()
            .find(|&&s| self.truncate * s + 0.5 > MAX_KERNEL_RADIUS)
        {
            return Err(Error::invalid_value(
                "sigma",
                format!("sigma {too_wide} needs a kernel wider than {MAX_KERNEL_RADIUS} pixels"),
            ));
        }

        let normalized = image.mapv(|v| v.normalized());
        Ok(negated_laplace(&normalized.view(), &sigmas, self.truncate))
    }
}

impl LogFilter for GaussianLaplace {
    fn filter<P: Pixel>(&self, image: ArrayViewD<'_, P>, sigma: &Sigma) -> Result<ArrayD<P>> {
        let filtered = self.response(image, sigma)?;
        Ok(filtered.mapv(P::from_normalized))
    }
}

/// Laplacian of Gaussian of an `f64` array, one sigma per axis.
pub fn gaussian_laplace(input: &ArrayViewD<'_, f64>, sigmas: &[f64], truncate: f64) -> ArrayD<f64> {
    assert_eq!(sigmas.len(), input.ndim(), "one sigma per axis");

    let smooth: Vec<Vec<f64>> = sigmas
        .iter()
        .map(|&s| gaussian_kernel_1d(s, false, truncate))
        .collect();
    let second: Vec<Vec<f64>> = sigmas
        .iter()
        .map(|&s| gaussian_kernel_1d(s, true, truncate))
        .collect();

    let mut total = ArrayD::<f64>::zeros(input.raw_dim());
    for derivative_axis in 0..input.ndim() {
        let mut term = input.to_owned();
        for axis in 0..input.ndim() {
            let kernel = if axis == derivative_axis {
                &second[axis]
            } else {
                &smooth[axis]
            };
            term = correlate_axis(&term.view(), kernel, axis);
        }
        total += &term;
    }

    total
}

/// `max(-LoG(input), 0)` in `f64`.
fn negated_laplace(input: &ArrayViewD<'_, f64>, sigmas: &[f64], truncate: f64) -> ArrayD<f64> {
    let mut filtered = gaussian_laplace(input, sigmas, truncate);
    Zip::from(&mut filtered).for_each(|v| *v = (-*v).max(0.0));
    filtered
}

/// Filter `image` with the default [`GaussianLaplace`], keeping its dtype.
///
/// Integer images are mapped to `[0, 1]` by their full-scale value before
/// filtering and mapped back afterwards, truncating toward zero.
pub fn log_filter<P: Pixel>(image: ArrayViewD<'_, P>, sigma: &Sigma) -> Result<ArrayD<P>> {
    GaussianLaplace::default().filter(image, sigma)
}

/// Like [`log_filter`] but returns the `f64` response on the normalized scale.
pub fn log_filter_f64<P: Pixel>(image: ArrayViewD<'_, P>, sigma: &Sigma) -> Result<ArrayD<f64>> {
    GaussianLaplace::default().response(image, sigma)
}
