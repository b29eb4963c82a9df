//! Per-spot signal-to-noise ratio.
//!
//! The signal is the mean intensity in a box of half-width `signal_radius`
//! around the spot. The noise is the standard deviation of a box of half-width
//! `noise_radius`, with every detected spot grown by `signal_radius` and the
//! spot's own central block excluded.

#[cfg(test)]
mod tests;

use ndarray::{ArrayD, ArrayViewD, Slice, Zip};
use rayon::prelude::*;

use crate::detection::{detect_local_maxima, mask_coordinates};
use crate::error::{Error, Result};
use crate::filter::log_filter;
use crate::image::{check_array, check_same_shape, Pixel, IMAGE, MASK};
use crate::math::{nan_mean, nan_std};
use crate::morphology::dilate_mask;
use crate::params::{Sigma, Threshold};

/// Default ratio between the noise and signal radii.
pub const DEFAULT_NEIGHBOR_FACTOR: f64 = 3.0;

/// Signal and noise half-widths per axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnrRadii {
    pub signal: Vec<usize>,
    pub noise: Vec<usize>,
}

impl SnrRadii {
    /// `round(sqrt(ndim) * sigma)` and `round(sqrt(ndim) * sigma * neighbor_factor)`.
    pub fn new(sigmas: &[f64], neighbor_factor: f64) -> Self {
        let factor = (sigmas.len() as f64).sqrt();
        Self {
            signal: sigmas.iter().map(|s| (factor * s).round() as usize).collect(),
            noise: sigmas
                .iter()
                .map(|s| (factor * s * neighbor_factor).round() as usize)
                .collect(),
        }
    }

    /// Whether the full noise window around `coord` lies inside `shape`.
    #[inline]
    pub fn fits(&self, coord: &[usize], shape: &[usize]) -> bool {
        coord
            .iter()
            .zip(shape)
            .zip(&self.noise)
            .all(|((&c, &len), &r)| c >= r && c.saturating_add(r) < len)
    }
}

/// SNR of every `mask` pixel strictly above `threshold`, in row-major order.
///
/// Spots whose noise window does not fit in the image get NaN. Zero noise
/// or an entirely excluded noise window gives a non-finite value.
pub fn estimate_snr<P: Pixel>(
    image: ArrayViewD<'_, P>,
    sigma: &Sigma,
    mask: ArrayViewD<'_, bool>,
    threshold: Threshold,
    neighbor_factor: f64,
) -> Result<Vec<f64>> {
    check_array("image", &image, &IMAGE)?;
    check_array("mask", &mask, &MASK)?;
    check_same_shape("mask", image.shape(), mask.shape())?;
    let sigmas = sigma.per_axis(image.ndim())?;
    threshold.validate()?;
    validate_neighbor_factor(neighbor_factor)?;

    let image_max = image
        .iter()
        .map(|v| v.to_f64())
        .fold(f64::NEG_INFINITY, f64::max);
    let threshold = threshold.resolve(image_max);

    let peaks = Zip::from(&mask)
        .and(&image)
        .map_collect(|&m, &v| m && v.to_f64() > threshold);
    let spots = mask_coordinates(&peaks.view());
    if spots.nrows() == 0 {
        log::debug!("no spot above {threshold}, nothing to measure");
        return Ok(Vec::new());
    }

    let radii = SnrRadii::new(&sigmas, neighbor_factor);
    let signal_zone = dilate_mask(&peaks.view(), &radii.signal);
    let noise = Zip::from(&image)
        .and(&signal_zone)
        .map_collect(|&v, &excluded| if excluded { f64::NAN } else { v.to_f64() });

    let shape = image.shape();
    let coords: Vec<Vec<usize>> = spots.rows().into_iter().map(|row| row.to_vec()).collect();
    let snr: Vec<f64> = coords
        .par_iter()
        .map(|coord| {
            if !radii.fits(coord, shape) {
                log::trace!("spot {coord:?} too close to the border for its noise window");
                return f64::NAN;
            }
            spot_snr(&image, &noise, coord, &radii)
        })
        .collect();

    let nb_undefined = snr.iter().filter(|v| !v.is_finite()).count();
    log::debug!("SNR measured for {} spots, {nb_undefined} undefined", snr.len());
    if nb_undefined == snr.len() {
        log::warn!("no spot has a defined SNR (radii {:?})", radii.noise);
    }

    Ok(snr)
}

fn spot_snr<P: Pixel>(
    image: &ArrayViewD<'_, P>,
    noise: &ArrayD<f64>,
    coord: &[usize],
    radii: &SnrRadii,
) -> f64 {
    let signal = image.slice_each_axis(|axis| {
        let k = axis.axis.index();
        window(coord[k], radii.signal[k], axis.len)
    });
    let mean = nan_mean(signal.iter().map(|v| v.to_f64()));

    let mut local_noise = noise
        .slice_each_axis(|axis| {
            let k = axis.axis.index();
            window(coord[k], radii.noise[k], axis.len)
        })
        .to_owned();
    local_noise
        .slice_each_axis_mut(|axis| {
            let k = axis.axis.index();
            let start = coord[k].saturating_sub(radii.noise[k]);
            let lo = coord[k]
                .saturating_sub(radii.signal[k])
                .saturating_sub(start)
                .min(axis.len);
            let hi = (coord[k].saturating_add(radii.signal[k]) - start)
                .saturating_add(1)
                .min(axis.len);
            Slice::from(lo..hi)
        })
        .fill(f64::NAN);

    let values: Vec<f64> = local_noise.iter().copied().collect();
    mean / nan_std(&values)
}

/// `center ± radius`, clipped to `0..len`.
#[inline]
fn window(center: usize, radius: usize, len: usize) -> Slice {
    let start = center.saturating_sub(radius);
    let end = center.saturating_add(radius).saturating_add(1).min(len);
    Slice::from(start..end)
}

fn validate_neighbor_factor(neighbor_factor: f64) -> Result<()> {
    if !(neighbor_factor.is_finite() && neighbor_factor > 0.0) {
        return Err(Error::invalid_value(
            "neighbor_factor",
            format!("must be positive and finite, got {neighbor_factor}"),
        ));
    }
    Ok(())
}

/// LoG filter, local maxima, then [`estimate_snr`] on the original image.
pub fn compute_snr<P: Pixel>(
    image: ArrayViewD<'_, P>,
    sigma: &Sigma,
    minimum_distance: usize,
    threshold: Threshold,
    neighbor_factor: f64,
) -> Result<Vec<f64>> {
    check_array("image", &image, &IMAGE)?;
    let filtered = log_filter(image.view(), sigma)?;
    let maxima = detect_local_maxima(filtered.view(), minimum_distance)?;
    estimate_snr(image, sigma, maxima.view(), threshold, neighbor_factor)
}
