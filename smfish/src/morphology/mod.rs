//! Box-neighbourhood maximum filter and binary dilation for 2-D and 3-D arrays.
//!
//! Both run as separable 1-D passes along each axis, so a `k`-wide hyper-cube
//! costs `O(ndim * k)` per pixel instead of `O(k^ndim)`.


use ndarray::{ArrayD, ArrayView1, ArrayViewD, ArrayViewMut1, Axis, Zip};

/// How samples outside the array are produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundaryMode<T> {
    /// Half-sample symmetric: `d c b a | a b c d | d c b a`.
    #[default]
    Reflect,
    /// Pad with a constant value: `k k k k | a b c d | k k k k`.
    Constant(T),
}

/// Map an out-of-range index into `0..len` by half-sample symmetric reflection.
#[inline]
pub(crate) fn reflect_index(index: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    if len == 1 {
        return 0;
    }
    let period = 2 * len as isize;
    let folded = index.rem_euclid(period) as usize;
    if folded < len {
        folded
    } else {
        2 * len - 1 - folded
    }
}

/// Maximum over a centered box of `sizes[k]` pixels along each axis `k`.
///
/// Sizes should be odd so the window is centered; even sizes extend one pixel
/// further toward lower indices.
pub fn maximum_filter<T>(
    input: &ArrayViewD<'_, T>,
    sizes: &[usize],
    mode: BoundaryMode<T>,
) -> ArrayD<T>
where
    T: Copy + PartialOrd,
{
    assert_eq!(sizes.len(), input.ndim(), "one window size per axis");

    let mut current = input.to_owned();
    for (axis, &size) in sizes.iter().enumerate() {
        let len = input.len_of(Axis(axis));
        if size <= 1 || len == 0 {
            continue;
        }
        // Any wider window sees the whole lane and the boundary on both sides.
        let size = size.min(2 * len + 1);

        let mut output = current.clone();
        let mut scratch = Vec::with_capacity(len);
        Zip::from(output.lanes_mut(Axis(axis)))
            .and(current.lanes(Axis(axis)))
            .for_each(|out_lane, in_lane| {
                max_filter_lane(in_lane, out_lane, size, mode, &mut scratch);
            });
        current = output;
    }

    current
}

fn max_filter_lane<T>(
    input: ArrayView1<'_, T>,
    mut output: ArrayViewMut1<'_, T>,
    size: usize,
    mode: BoundaryMode<T>,
    scratch: &mut Vec<T>,
) where
    T: Copy + PartialOrd,
{
    scratch.clear();
    scratch.extend(input.iter().copied());

    let len = scratch.len() as isize;
    let before = (size / 2) as isize;
    let after = size as isize - before - 1;

    for (i, out) in output.iter_mut().enumerate() {
        let center = i as isize;
        let mut best = scratch[i];
        for j in (center - before)..=(center + after) {
            let value = if (0..len).contains(&j) {
                scratch[j as usize]
            } else {
                match mode {
                    BoundaryMode::Reflect => scratch[reflect_index(j, scratch.len())],
                    BoundaryMode::Constant(fill) => fill,
                }
            };
            if value > best {
                best = value;
            }
        }
        *out = best;
    }
}

/// Grow every `true` pixel into a box of `2 * radii[k] + 1` pixels per axis.
///
/// Pixels outside the array count as `false`.
pub fn dilate_mask(mask: &ArrayViewD<'_, bool>, radii: &[usize]) -> ArrayD<bool> {
    let sizes: Vec<usize> = radii
        .iter()
        .map(|r| r.saturating_mul(2).saturating_add(1))
        .collect();
    maximum_filter(mask, &sizes, BoundaryMode::Constant(false))
}
