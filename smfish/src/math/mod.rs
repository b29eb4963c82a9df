//! Statistics over pixel samples and the N-dimensional bounding box.

mod bbox;

pub use bbox::BoundingBox;

/// Median of `values`, reordering the buffer.
///
/// Even lengths average the two middle values. Any NaN makes the result NaN.
/// Returns NaN for an empty slice.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }

    let len = values.len();
    let mid = len / 2;
    let (left, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;

    if len % 2 == 1 {
        upper
    } else {
        let lower = left.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) * 0.5
    }
}

/// Mean of the non-NaN samples, NaN when there are none.
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population standard deviation (ddof = 0) of the non-NaN samples.
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values.iter().copied());
    if mean.is_nan() {
        return f64::NAN;
    }
    let variance = nan_mean(values.iter().map(|v| (v - mean) * (v - mean)));
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut [7.0]), 7.0);
    }

    #[test]
    fn test_median_nan_and_empty() {
        assert!(median(&mut []).is_nan());
        assert!(median(&mut [1.0, f64::NAN, 3.0]).is_nan());
    }

    #[test]
    fn test_nan_mean_skips_missing() {
        assert_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN, f64::NAN]).is_nan());
        assert!(nan_mean(std::iter::empty()).is_nan());
    }

    #[test]
    fn test_nan_std_population() {
        // Population std of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2.
        let values = [2.0, 4.0, 4.0, 4.0, f64::NAN, 5.0, 5.0, 7.0, 9.0];
        assert!((nan_std(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_std_degenerate() {
        assert_eq!(nan_std(&[5.0, 5.0, 5.0]), 0.0);
        assert!(nan_std(&[f64::NAN]).is_nan());
        assert!(nan_std(&[]).is_nan());
    }
}
