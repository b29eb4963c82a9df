use ndarray::{s, ArrayD, IxDyn};

use super::*;
use crate::testing::{add_noise, gaussian_spot, to_u16};

/// Checkerboard of 0 and 2 with a 3x3 block of 100 centered on `center`.
fn checkerboard_with_block(size: usize, center: usize) -> ArrayD<f64> {
    let mut image = ArrayD::from_shape_fn(IxDyn(&[size, size]), |index| {
        if (index[0] + index[1]) % 2 == 0 {
            2.0
        } else {
            0.0
        }
    });
    image
        .slice_mut(s![center - 1..=center + 1, center - 1..=center + 1])
        .fill(100.0);
    image
}

fn single_peak(shape: &[usize], coord: &[usize]) -> ArrayD<bool> {
    let mut mask = ArrayD::from_elem(IxDyn(shape), false);
    mask[coord] = true;
    mask
}

#[test]
fn test_snr_radii_rounding() {
    let radii = SnrRadii::new(&[1.0, 1.0], 3.0);
    assert_eq!(radii.signal, vec![1, 1]); // sqrt(2) = 1.41
    assert_eq!(radii.noise, vec![4, 4]); // 4.24

    let radii = SnrRadii::new(&[1.0, 1.5, 1.5], 3.0);
    assert_eq!(radii.signal, vec![2, 3, 3]); // 1.73, 2.60
    assert_eq!(radii.noise, vec![5, 8, 8]); // 5.20, 7.79
}

#[test]
fn test_snr_exact_value() {
    // Noise window 7x7 minus the 3x3 block holds 20 twos and 20 zeros:
    // mean 1, population std 1. Signal mean is 100.
    let image = checkerboard_with_block(21, 10);
    let mask = single_peak(&[21, 21], &[10, 10]);

    let snr = estimate_snr(
        image.view(),
        &Sigma::Uniform(1.0),
        mask.view(),
        Threshold::Absolute(50.0),
        2.0,
    )
    .unwrap();
    assert_eq!(snr, vec![100.0]);

    let snr = estimate_snr(
        image.view(),
        &Sigma::Uniform(1.0),
        mask.view(),
        Threshold::Relative(0.5),
        2.0,
    )
    .unwrap();
    assert_eq!(snr, vec![100.0]);
}

#[test]
fn test_snr_threshold_is_strict() {
    let image = checkerboard_with_block(21, 10);
    let mask = single_peak(&[21, 21], &[10, 10]);

    let snr = estimate_snr(
        image.view(),
        &Sigma::Uniform(1.0),
        mask.view(),
        Threshold::Relative(1.0),
        2.0,
    )
    .unwrap();
    assert!(snr.is_empty());

    let snr = estimate_snr(
        image.view(),
        &Sigma::Uniform(1.0),
        mask.view(),
        Threshold::Absolute(100.0),
        2.0,
    )
    .unwrap();
    assert!(snr.is_empty());
}

#[test]
fn test_snr_nan_near_borders_in_spot_order() {
    let mut image = ArrayD::from_elem(IxDyn(&[40, 40]), 500.0);
    add_noise(&mut image, 50.0, 42);

    // sigma 1 in 2-D with factor 3: noise radius 4.
    let coords = [[3, 10], [4, 30], [20, 4], [20, 36], [35, 10], [36, 30]];
    let mut mask = ArrayD::from_elem(IxDyn(&[40, 40]), false);
    for [y, x] in coords {
        mask[[y, x]] = true;
        image[[y, x]] = 5000.0;
    }

    let snr = estimate_snr(
        image.view(),
        &Sigma::Uniform(1.0),
        mask.view(),
        Threshold::Absolute(1000.0),
        DEFAULT_NEIGHBOR_FACTOR,
    )
    .unwrap();

    assert_eq!(snr.len(), coords.len());
    let defined: Vec<bool> = snr.iter().map(|v| v.is_finite()).collect();
    assert_eq!(defined, vec![false, true, true, false, true, false]);
    assert!(snr.iter().filter(|v| v.is_finite()).all(|&v| v > 0.0));
}

#[test]
fn test_snr_empty_and_indeterminate() {
    let image = ArrayD::from_elem(IxDyn(&[15, 15]), 10.0f32);
    let mask = ArrayD::from_elem(IxDyn(&[15, 15]), false);
    let sigma = Sigma::Uniform(1.0);
    let snr = estimate_snr(image.view(), &sigma, mask.view(), Threshold::Absolute(0.0), 3.0).unwrap();
    assert!(snr.is_empty());

    // Constant background: zero noise gives a non-finite ratio, not an error.
    let mut image = image;
    image[[7, 7]] = 50.0;
    let mask = single_peak(&[15, 15], &[7, 7]);
    let snr = estimate_snr(image.view(), &sigma, mask.view(), Threshold::Absolute(20.0), 3.0).unwrap();
    assert_eq!(snr.len(), 1);
    assert!(!snr[0].is_finite());
}

#[test]
fn test_snr_validates_inputs() {
    let image = ArrayD::<u16>::zeros(IxDyn(&[10, 10]));
    let mask = ArrayD::from_elem(IxDyn(&[10, 10]), false);
    let sigma = Sigma::Uniform(1.0);
    let absolute = Threshold::Absolute(1.0);

    assert!(matches!(
        estimate_snr(image.view(), &sigma, mask.view(), absolute, 0.0),
        Err(Error::InvalidValue { name: "neighbor_factor", .. })
    ));
    assert!(matches!(
        estimate_snr(image.view(), &sigma, mask.view(), Threshold::Relative(1.5), 3.0),
        Err(Error::InvalidValue { name: "threshold", .. })
    ));

    let small_mask = ArrayD::from_elem(IxDyn(&[10, 9]), false);
    assert!(matches!(
        estimate_snr(image.view(), &sigma, small_mask.view(), absolute, 3.0),
        Err(Error::ShapeMismatch { name: "mask", .. })
    ));
}

#[test]
fn test_compute_snr_single_bump_3d() {
    let mut image = gaussian_spot(&[21, 21, 21], &[10.0, 10.0, 10.0], 1.0, 5000.0, 500.0);
    add_noise(&mut image, 50.0, 9);
    let image = to_u16(&image);

    let threshold = Threshold::Absolute(2000.0);
    let snr = compute_snr(image.view(), &Sigma::Uniform(1.0), 1, threshold, 3.0).unwrap();
    assert_eq!(snr.len(), 1);
    assert!(snr[0].is_finite() && snr[0] > 1.0, "snr = {}", snr[0]);
}

#[test]
fn test_snr_huge_sigma_is_undefined() {
    let image = checkerboard_with_block(15, 7);
    let mask = single_peak(&[15, 15], &[7, 7]);
    let snr = estimate_snr(
        image.view(),
        &Sigma::Uniform(1e19),
        mask.view(),
        Threshold::Absolute(50.0),
        3.0,
    )
    .unwrap();
    assert_eq!(snr.len(), 1);
    assert!(snr[0].is_nan());
}
