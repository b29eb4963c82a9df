//! Tagged parameter types resolved once at the API boundary.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Standard deviation of the Gaussian PSF, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sigma {
    /// Same sigma along every axis.
    Uniform(f64),
    /// One sigma per axis, in image axis order.
    PerAxis(Vec<f64>),
}

impl Default for Sigma {
    fn default() -> Self {
        Sigma::Uniform(1.0)
    }
}

impl Sigma {
    pub fn validate(&self) -> Result<()> {
        let values: &[f64] = match self {
            Sigma::Uniform(value) => std::slice::from_ref(value),
            Sigma::PerAxis(values) => values,
        };
        if values.is_empty() {
            return Err(Error::invalid_value("sigma", "per-axis sigma is empty"));
        }
        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(Error::invalid_value(
                "sigma",
                format!("must be positive and finite, got {bad}"),
            ));
        }
        Ok(())
    }

    /// Sigma expanded to one value per axis of an `ndim`-dimensional image.
    pub fn per_axis(&self, ndim: usize) -> Result<Vec<f64>> {
        self.validate()?;
        match self {
            Sigma::Uniform(value) => Ok(vec![*value; ndim]),
            Sigma::PerAxis(values) if values.len() == ndim => Ok(values.clone()),
            Sigma::PerAxis(values) => Err(Error::invalid_value(
                "sigma",
                format!(
                    "expected {ndim} per-axis values for a {ndim}-d image, got {}",
                    values.len()
                ),
            )),
        }
    }

    /// Detection radius `sqrt(ndim) * sigma`, keeping the uniform/per-axis shape.
    pub fn radius(&self, ndim: usize) -> Radius {
        let factor = (ndim as f64).sqrt();
        match self {
            Sigma::Uniform(value) => Radius::Uniform(factor * value),
            Sigma::PerAxis(values) => Radius::PerAxis(values.iter().map(|v| factor * v).collect()),
        }
    }
}

impl From<f64> for Sigma {
    fn from(value: f64) -> Self {
        Sigma::Uniform(value)
    }
}

impl From<Vec<f64>> for Sigma {
    fn from(values: Vec<f64>) -> Self {
        Sigma::PerAxis(values)
    }
}

impl<const N: usize> From<[f64; N]> for Sigma {
    fn from(values: [f64; N]) -> Self {
        Sigma::PerAxis(values.to_vec())
    }
}

/// Radius implied by the PSF sigma, shaped like the [`Sigma`] it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Radius {
    Uniform(f64),
    PerAxis(Vec<f64>),
}

/// Intensity threshold, either absolute or a fraction of the image maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    Absolute(f64),
    Relative(f64),
}

impl Threshold {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Threshold::Absolute(value) if value.is_nan() => {
                Err(Error::invalid_value("threshold", "absolute threshold is NaN"))
            }
            Threshold::Relative(fraction) if !(fraction > 0.0 && fraction <= 1.0) => {
                Err(Error::invalid_value(
                    "threshold",
                    format!("relative threshold must be in (0, 1], got {fraction}"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Absolute intensity threshold for an image whose maximum is `image_max`.
    #[inline]
    pub fn resolve(&self, image_max: f64) -> f64 {
        match *self {
            Threshold::Absolute(value) => value,
            Threshold::Relative(fraction) => fraction * image_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_keeps_shape() {
        let radius = Sigma::PerAxis(vec![1.5, 2.0]).radius(3);
        let Radius::PerAxis(values) = radius else {
            panic!("tuple sigma must give a tuple radius");
        };
        assert_eq!(values.len(), 2);
        assert!((values[0] - 3f64.sqrt() * 1.5).abs() < 1e-12);
        assert!((values[1] - 3f64.sqrt() * 2.0).abs() < 1e-12);
        assert!((values[0] - 2.598).abs() < 1e-3);
        assert!((values[1] - 3.464).abs() < 1e-3);

        let radius = Sigma::Uniform(2.0).radius(2);
        assert_eq!(radius, Radius::Uniform(2f64.sqrt() * 2.0));
    }

    #[test]
    fn test_per_axis_expansion() {
        assert_eq!(Sigma::Uniform(1.5).per_axis(3).unwrap(), vec![1.5; 3]);
        assert_eq!(
            Sigma::from([1.0, 2.0]).per_axis(2).unwrap(),
            vec![1.0, 2.0]
        );
        assert!(Sigma::from([1.0, 2.0]).per_axis(3).is_err());
    }

    #[test]
    fn test_sigma_validation() {
        assert!(Sigma::Uniform(0.0).validate().is_err());
        assert!(Sigma::Uniform(f64::NAN).validate().is_err());
        assert!(Sigma::PerAxis(vec![]).validate().is_err());
        assert!(Sigma::PerAxis(vec![1.0, -1.0]).validate().is_err());
        assert!(Sigma::PerAxis(vec![1.0, 0.5]).validate().is_ok());
    }

    #[test]
    fn test_threshold_resolve() {
        assert_eq!(Threshold::Absolute(2000.0).resolve(10.0), 2000.0);
        assert_eq!(Threshold::Relative(0.25).resolve(400.0), 100.0);
    }

    #[test]
    fn test_threshold_whole_number_stays_absolute() {
        // No type sniffing: 2000.0 is absolute because the tag says so.
        let threshold: Threshold =
            serde_json::from_str(r#"{"kind": "absolute", "value": 2000.0}"#).unwrap();
        assert_eq!(threshold.resolve(65535.0), 2000.0);

        let threshold: Threshold =
            serde_json::from_str(r#"{"kind": "relative", "value": 0.5}"#).unwrap();
        assert_eq!(threshold, Threshold::Relative(0.5));
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Threshold::Relative(0.0).validate().is_err());
        assert!(Threshold::Relative(1.5).validate().is_err());
        assert!(Threshold::Relative(1.0).validate().is_ok());
        assert!(Threshold::Absolute(f64::NAN).validate().is_err());
        assert!(Threshold::Absolute(-5.0).validate().is_ok());
    }

    #[test]
    fn test_sigma_untagged_serde() {
        let sigma: Sigma = serde_json::from_str("1.5").unwrap();
        assert_eq!(sigma, Sigma::Uniform(1.5));
        let sigma: Sigma = serde_json::from_str("[1, 2, 2]").unwrap();
        assert_eq!(sigma, Sigma::PerAxis(vec![1.0, 2.0, 2.0]));
    }
}
