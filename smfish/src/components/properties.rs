//! Per-region area, peak intensity and bounding box.

use ndarray::{ArrayViewD, Dimension};

use crate::error::Result;
use crate::image::{check_array, check_same_shape, Pixel, IMAGE_ALLOW_NAN, LABELS};
use crate::math::BoundingBox;

/// Measurements of one labeled region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProps {
    pub label: u32,
    /// Pixel count.
    pub area: usize,
    /// Largest intensity inside the region, NaN if any pixel is NaN.
    pub max_intensity: f64,
    pub bbox: BoundingBox,
}

/// Properties of every non-empty label in `labels`, ascending by label.
///
/// Intensities are read from `intensity`, which must have the same shape.
pub fn region_properties<P: Pixel>(
    labels: ArrayViewD<'_, u32>,
    intensity: ArrayViewD<'_, P>,
) -> Result<Vec<RegionProps>> {
    check_array("labels", &labels, &LABELS)?;
    check_array("intensity", &intensity, &IMAGE_ALLOW_NAN)?;
    check_same_shape("intensity", labels.shape(), intensity.shape())?;

    let ndim = labels.ndim();
    let nb_labels = labels.iter().copied().max().unwrap_or(0) as usize;
    let mut regions: Vec<Option<RegionProps>> = vec![None; nb_labels + 1];

    for ((index, &label), value) in labels.indexed_iter().zip(intensity.iter()) {
        if label == 0 {
            continue;
        }
        let value = value.to_f64();
        let region = regions[label as usize].get_or_insert_with(|| RegionProps {
            label,
            area: 0,
            max_intensity: f64::NEG_INFINITY,
            bbox: BoundingBox::empty(ndim),
        });
        region.area += 1;
        region.bbox.include(index.slice());
        if value.is_nan() || region.max_intensity.is_nan() {
            region.max_intensity = f64::NAN;
        } else if value > region.max_intensity {
            region.max_intensity = value;
        }
    }

    Ok(regions.into_iter().flatten().collect())
}
