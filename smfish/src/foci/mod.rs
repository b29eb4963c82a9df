//! Aggregation of spots into foci: labeled regions kept for their size, spot
//! count or brightness.
//!
//! Spot membership uses the region's bounding box, edges included, not the
//! exact region shape.


use ndarray::{Array2, ArrayView2, ArrayViewD, Axis};

use crate::components::{region_properties, RegionProps};
use crate::error::{Error, Result};
use crate::image::{
    check_array, check_same_shape, check_spots, Pixel, Spots, IMAGE_ALLOW_NAN, LABELS,
};
use crate::math::{median, BoundingBox};

/// A kept region and the number of spots inside its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    pub region: RegionProps,
    pub nb_spots: usize,
}

/// Output of [`filter_regions`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRegions {
    /// Kept regions, ascending by label.
    pub foci: Vec<Focus>,
    /// Spots outside every kept region's bounding box, in input order.
    pub spots_outside: Spots,
    /// Regions with `area > min_area`, kept or not.
    pub nb_large_regions: usize,
}

/// Keep labeled regions that are large enough and either hold more than
/// `min_nb_spots` spots or peak above `median * min_intensity_factor`.
///
/// The median is taken over the max intensities of the regions that passed
/// the area filter. When none pass, every spot is reported outside.
pub fn filter_regions<P: Pixel>(
    image: ArrayViewD<'_, P>,
    labels: ArrayViewD<'_, u32>,
    spots: ArrayView2<'_, usize>,
    min_area: usize,
    min_nb_spots: usize,
    min_intensity_factor: f64,
) -> Result<FilteredRegions> {
    check_array("image", &image, &IMAGE_ALLOW_NAN)?;
    check_array("labels", &labels, &LABELS)?;
    check_same_shape("labels", image.shape(), labels.shape())?;
    check_spots(&spots, image.ndim())?;
    if !min_intensity_factor.is_finite() {
        return Err(Error::invalid_value(
            "min_intensity_factor",
            format!("must be finite, got {min_intensity_factor}"),
        ));
    }

    let large: Vec<RegionProps> = region_properties(labels, image)?
        .into_iter()
        .filter(|region| region.area > min_area)
        .collect();

    if large.is_empty() {
        log::debug!("no region larger than {min_area} pixels");
        return Ok(FilteredRegions {
            foci: Vec::new(),
            spots_outside: spots.to_owned(),
            nb_large_regions: 0,
        });
    }
    let nb_large_regions = large.len();

    let counts: Vec<usize> = large
        .iter()
        .map(|region| count_spots_in(&region.bbox, &spots))
        .collect();

    let mut intensities: Vec<f64> = large.iter().map(|region| region.max_intensity).collect();
    let intensity_bar = median(&mut intensities) * min_intensity_factor;

    let foci: Vec<Focus> = large
        .into_iter()
        .zip(counts)
        .filter(|(region, nb_spots)| {
            *nb_spots > min_nb_spots || region.max_intensity > intensity_bar
        })
        .map(|(region, nb_spots)| Focus { region, nb_spots })
        .collect();

    let spots_outside = spots_outside_boxes(&spots, foci.iter().map(|focus| &focus.region.bbox));

    log::debug!(
        "{} of {nb_large_regions} large regions kept as foci, {} spots outside",
        foci.len(),
        spots_outside.nrows()
    );

    Ok(FilteredRegions {
        foci,
        spots_outside,
        nb_large_regions,
    })
}

fn count_spots_in(bbox: &BoundingBox, spots: &ArrayView2<'_, usize>) -> usize {
    spots
        .rows()
        .into_iter()
        .filter(|spot| bbox.contains(&spot.to_vec()))
        .count()
}

/// Rows of `spots` that fall in none of `boxes`, in their original order.
pub fn spots_outside_boxes<'a>(
    spots: &ArrayView2<'_, usize>,
    boxes: impl Iterator<Item = &'a BoundingBox> + Clone,
) -> Spots {
    let outside: Vec<usize> = spots
        .rows()
        .into_iter()
        .enumerate()
        .filter(|(_, spot)| {
            let coord = spot.to_vec();
            !boxes.clone().any(|bbox| bbox.contains(&coord))
        })
        .map(|(row, _)| row)
        .collect();

    if outside.is_empty() {
        return Array2::zeros((0, spots.ncols()));
    }
    spots.select(Axis(0), &outside)
}
