//! 1-D Gaussian kernels and separable correlation along one axis.

use ndarray::{ArrayD, ArrayViewD, Axis, Zip};

use crate::morphology::reflect_index;

/// Sampled Gaussian of standard deviation `sigma`, or its second derivative.
///
/// Radius is `int(truncate * sigma + 0.5)`. The smoothing kernel sums to 1;
/// the second-derivative kernel is the smoothing kernel times
/// `x^2 / sigma^4 - 1 / sigma^2`.
pub fn gaussian_kernel_1d(sigma: f64, second_derivative: bool, truncate: f64) -> Vec<f64> {
    assert!(sigma > 0.0, "Sigma must be positive");

    let radius = (truncate * sigma + 0.5) as isize;
    let sigma_sq = sigma * sigma;

    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| {
            let x = x as f64;
            (-0.5 * x * x / sigma_sq).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    if second_derivative {
        for (v, x) in kernel.iter_mut().zip(-radius..=radius) {
            let x = x as f64;
            *v *= x * x / (sigma_sq * sigma_sq) - 1.0 / sigma_sq;
        }
    }

    kernel
}

/// Correlate every lane along `axis` with `kernel`, reflecting at the edges.
pub fn correlate_axis(input: &ArrayViewD<'_, f64>, kernel: &[f64], axis: usize) -> ArrayD<f64> {
    let mut output = ArrayD::<f64>::zeros(input.raw_dim());
    let radius = (kernel.len() / 2) as isize;
    let len = input.len_of(Axis(axis));
    if len == 0 {
        return output;
    }

    let mut lane_buf = Vec::with_capacity(len);
    Zip::from(output.lanes_mut(Axis(axis)))
        .and(input.lanes(Axis(axis)))
        .for_each(|mut out_lane, in_lane| {
            lane_buf.clear();
            lane_buf.extend(in_lane.iter().copied());

            for (i, out) in out_lane.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let j = i as isize + k as isize - radius;
                    let sample = if (0..len as isize).contains(&j) {
                        lane_buf[j as usize]
                    } else {
                        lane_buf[reflect_index(j, len)]
                    };
                    sum += weight * sample;
                }
                *out = sum;
            }
        });

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_smoothing_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(1.5, false, 4.0);
        assert_eq!(kernel.len(), 2 * 6 + 1); // int(4 * 1.5 + 0.5) = 6
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
        assert!(kernel[6] > kernel[5]);
    }

    #[test]
    fn test_second_derivative_kernel_shape() {
        let sigma = 2.0;
        let kernel = gaussian_kernel_1d(sigma, true, 4.0);
        let center = kernel.len() / 2;
        // Negative core, positive tails.
        assert!(kernel[center] < 0.0);
        assert!(kernel[0] > 0.0);
        // Zero crossing at |x| = sigma.
        assert!(kernel[center + 2].abs() < 1e-15);
    }

    #[test]
    fn test_correlate_constant_is_preserved_by_smoothing() {
        let input = arr1(&[3.0; 9]).into_dyn();
        let kernel = gaussian_kernel_1d(1.0, false, 4.0);
        let output = correlate_axis(&input.view(), &kernel, 0);
        for v in output.iter() {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_correlate_kernel_longer_than_lane() {
        // Reflection must keep folding when the kernel spans the lane twice.
        let input = arr1(&[1.0, 2.0]).into_dyn();
        let kernel = vec![1.0; 7];
        let output = correlate_axis(&input.view(), &kernel, 0);
        // Indices -3..=4 map to 2 2 1 [1 2] 2 1 1.
        assert_eq!(output[[0]], 11.0);
        assert_eq!(output[[1]], 10.0);
    }
}
