//! Local-maximum detection and thresholded spot extraction.
//!
//! `log_lm` chains the LoG filter, [`detect_local_maxima`] on the filtered
//! image and [`extract_spots`] against the original intensities.


use ndarray::{Array2, ArrayViewD, Zip};

use crate::error::{Error, Result};
use crate::filter::log_filter;
use crate::image::{check_array, check_same_shape, Mask, Pixel, Spots, IMAGE, MASK};
use crate::morphology::{maximum_filter, BoundaryMode};
use crate::params::{Radius, Sigma};

/// Spots that passed the intensity threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotExtraction {
    pub spots: Spots,
    pub radius: Radius,
    /// Local maxima above the threshold.
    pub mask: Mask,
}

/// Output of [`log_lm`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpotDetection {
    pub spots: Spots,
    pub radius: Radius,
}

/// Mark pixels equal to the maximum of the `2 * minimum_distance + 1` box
/// centered on them.
///
/// Plateaus are kept whole. With `minimum_distance == 0` every pixel is a
/// local maximum.
pub fn detect_local_maxima<P: Pixel>(
    image: ArrayViewD<'_, P>,
    minimum_distance: usize,
) -> Result<Mask> {
    check_array("image", &image, &IMAGE)?;

    let size = minimum_distance.saturating_mul(2).saturating_add(1);
    let sizes = vec![size; image.ndim()];
    let maxima = maximum_filter(&image, &sizes, BoundaryMode::Reflect);

    Ok(Zip::from(&maxima).and(&image).map_collect(|&m, &v| m == v))
}

/// Keep the `mask` pixels whose intensity in `image` is strictly above
/// `threshold` and return their coordinates in row-major order.
pub fn extract_spots<P: Pixel>(
    image: ArrayViewD<'_, P>,
    sigma: &Sigma,
    mask: ArrayViewD<'_, bool>,
    threshold: f64,
) -> Result<SpotExtraction> {
    check_array("image", &image, &IMAGE)?;
    check_array("mask", &mask, &MASK)?;
    check_same_shape("mask", image.shape(), mask.shape())?;
    sigma.per_axis(image.ndim())?;
    if threshold.is_nan() {
        return Err(Error::invalid_value("threshold", "threshold is NaN"));
    }

    let mask = Zip::from(&mask)
        .and(&image)
        .map_collect(|&m, &v| m && v.to_f64() > threshold);
    let spots = mask_coordinates(&mask.view());
    let radius = sigma.radius(image.ndim());

    log::debug!(
        "{} of {} candidate pixels above threshold {threshold}",
        spots.nrows(),
        image.len()
    );

    Ok(SpotExtraction { spots, radius, mask })
}

/// Coordinates of the `true` pixels, one row per pixel in row-major order.
pub fn mask_coordinates(mask: &ArrayViewD<'_, bool>) -> Spots {
    let ndim = mask.ndim();
    let mut flat = Vec::new();
    let mut count = 0;
    for (index, &on) in mask.indexed_iter() {
        if on {
            flat.extend((0..ndim).map(|axis| index[axis]));
            count += 1;
        }
    }
    Array2::from_shape_vec((count, ndim), flat).unwrap_or_else(|_| Array2::zeros((0, ndim)))
}

/// LoG filter, local maxima, then threshold on the original image.
pub fn log_lm<P: Pixel>(
    image: ArrayViewD<'_, P>,
    sigma: &Sigma,
    threshold: f64,
    minimum_distance: usize,
) -> Result<SpotDetection> {
    check_array("image", &image, &IMAGE)?;

    let filtered = log_filter(image.view(), sigma)?;
    let maxima = detect_local_maxima(filtered.view(), minimum_distance)?;
    let SpotExtraction { spots, radius, .. } =
        extract_spots(image, sigma, maxima.view(), threshold)?;

    Ok(SpotDetection { spots, radius })
}
