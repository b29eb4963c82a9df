//! Error types for input validation.
//!
//! Only malformed inputs are errors. Empty detections and undefined SNR values
//! are regular results and never surface here.

use thiserror::Error;

use crate::image::Dtype;

/// Errors raised by the public entry points before any computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{name} must have one of {expected:?} dimensions, got {ndim}")]
    InvalidShape {
        name: &'static str,
        ndim: usize,
        expected: Vec<usize>,
    },

    #[error("{name} shape {actual:?} does not match expected shape {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{name} has dtype {dtype}, expected one of [{}]", join_dtypes(.expected))]
    InvalidDtype {
        name: &'static str,
        dtype: Dtype,
        expected: Vec<Dtype>,
    },

    #[error("{name} contains NaN values")]
    NanValues { name: &'static str },

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl Error {
    pub(crate) fn invalid_value(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_dtypes(dtypes: &[Dtype]) -> String {
    dtypes
        .iter()
        .map(|dtype| dtype.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
