//! Fail-fast validation shared by every public entry point.

use ndarray::{ArrayView2, ArrayViewD};

use super::{Dtype, Element};
use crate::error::{Error, Result};

/// Dtypes accepted for intensity images.
pub const IMAGE_DTYPES: [Dtype; 4] = [Dtype::U8, Dtype::U16, Dtype::F32, Dtype::F64];

/// Constraints an array must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct ArrayCheck<'a> {
    pub ndims: &'a [usize],
    pub dtypes: &'a [Dtype],
    pub allow_nan: bool,
}

/// Intensity image without missing values.
pub const IMAGE: ArrayCheck<'static> = ArrayCheck {
    ndims: &[2, 3],
    dtypes: &IMAGE_DTYPES,
    allow_nan: false,
};

/// Intensity image that may carry NaN (filtered images, region intensities).
pub const IMAGE_ALLOW_NAN: ArrayCheck<'static> = ArrayCheck {
    ndims: &[2, 3],
    dtypes: &IMAGE_DTYPES,
    allow_nan: true,
};

pub const MASK: ArrayCheck<'static> = ArrayCheck {
    ndims: &[2, 3],
    dtypes: &[Dtype::Bool],
    allow_nan: false,
};

pub const LABELS: ArrayCheck<'static> = ArrayCheck {
    ndims: &[2, 3],
    dtypes: &[Dtype::U32],
    allow_nan: false,
};

/// Check dimensionality, dtype and missing values of `array`.
pub fn check_array<E: Element>(
    name: &'static str,
    array: &ArrayViewD<'_, E>,
    check: &ArrayCheck<'_>,
) -> Result<()> {
    if !check.ndims.contains(&array.ndim()) {
        return Err(Error::InvalidShape {
            name,
            ndim: array.ndim(),
            expected: check.ndims.to_vec(),
        });
    }

    if !check.dtypes.contains(&E::DTYPE) {
        return Err(Error::InvalidDtype {
            name,
            dtype: E::DTYPE,
            expected: check.dtypes.to_vec(),
        });
    }

    if !check.allow_nan && array.iter().any(|v| v.is_nan()) {
        return Err(Error::NanValues { name });
    }

    Ok(())
}

pub fn check_same_shape(name: &'static str, expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected != actual {
        return Err(Error::ShapeMismatch {
            name,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

/// Spot tables need one column per image axis.
pub fn check_spots(spots: &ArrayView2<'_, usize>, ndim: usize) -> Result<()> {
    if spots.ncols() != ndim {
        return Err(Error::ShapeMismatch {
            name: "spots",
            expected: vec![spots.nrows(), ndim],
            actual: spots.shape().to_vec(),
        });
    }
    Ok(())
}
