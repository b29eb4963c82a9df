//! Axis-aligned bounding box for pixel regions of any dimensionality.

/// Axis-aligned bounding box with `usize` coordinates.
///
/// Uses inclusive bounds: a pixel is inside if `min[k] <= c[k] <= max[k]`
/// on every axis `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    min: Vec<usize>,
    max: Vec<usize>,
}

impl BoundingBox {
    /// Create a bounding box from inclusive per-axis bounds.
    pub fn new(min: Vec<usize>, max: Vec<usize>) -> Self {
        assert_eq!(min.len(), max.len(), "bounds must have the same length");
        Self { min, max }
    }

    /// Create an empty bounding box (for accumulation).
    ///
    /// The empty box has inverted bounds so that the first point passed to
    /// `include()` sets the initial bounds.
    pub fn empty(ndim: usize) -> Self {
        Self {
            min: vec![usize::MAX; ndim],
            max: vec![0; ndim],
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.min.len()
    }

    #[inline]
    pub fn min(&self) -> &[usize] {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &[usize] {
        &self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(&self.max).any(|(lo, hi)| lo > hi)
    }

    /// Expand this bounding box to include the given point.
    #[inline]
    pub fn include(&mut self, coord: &[usize]) {
        debug_assert_eq!(coord.len(), self.ndim());
        for ((lo, hi), &c) in self.min.iter_mut().zip(self.max.iter_mut()).zip(coord) {
            *lo = (*lo).min(c);
            *hi = (*hi).max(c);
        }
    }

    /// Check if a point is inside the bounding box, edges included.
    #[inline]
    pub fn contains(&self, coord: &[usize]) -> bool {
        coord.len() == self.ndim()
            && coord
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(c, (lo, hi))| lo <= c && c <= hi)
    }

    /// Number of pixels along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.max[axis].saturating_sub(self.min[axis]) + 1
    }

    /// Number of pixels enclosed by the box.
    pub fn volume(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (0..self.ndim()).map(|axis| self.extent(axis)).product()
    }
}
