//! Connected regions of the LoG-filtered image and their properties.

mod labeling;
mod properties;


use ndarray::{ArrayViewD, Zip};

pub use labeling::{label_mask, Connectivity, Labeling};
pub use properties::{region_properties, RegionProps};

use crate::error::{Error, Result};
use crate::filter::log_filter;
use crate::image::{check_array, LabelImage, Pixel, IMAGE, IMAGE_ALLOW_NAN};
use crate::params::Sigma;

/// Label the regions of `filtered` strictly above `threshold`, with full
/// connectivity.
pub fn label_components<P: Pixel>(
    filtered: ArrayViewD<'_, P>,
    threshold: f64,
) -> Result<LabelImage> {
    label_components_with_connectivity(filtered, threshold, Connectivity::default())
}

/// [`label_components`] with an explicit neighbourhood.
pub fn label_components_with_connectivity<P: Pixel>(
    filtered: ArrayViewD<'_, P>,
    threshold: f64,
    connectivity: Connectivity,
) -> Result<LabelImage> {
    check_array("image", &filtered, &IMAGE_ALLOW_NAN)?;
    if threshold.is_nan() {
        return Err(Error::invalid_value("threshold", "threshold is NaN"));
    }

    let mask = Zip::from(&filtered).map_collect(|&v| v.to_f64() > threshold);
    let Labeling { labels, count } = label_mask(&mask.view(), connectivity);
    log::debug!("{count} connected components above {threshold}");

    Ok(labels)
}

/// LoG filter `image`, then label the filtered regions above `threshold`.
pub fn log_cc<P: Pixel>(
    image: ArrayViewD<'_, P>,
    sigma: &Sigma,
    threshold: f64,
) -> Result<LabelImage> {
    check_array("image", &image, &IMAGE)?;
    let filtered = log_filter(image, sigma)?;
    label_components(filtered.view(), threshold)
}
