//! PSF width in pixels from the microscope's voxel size and optical PSF.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::Sigma;

/// Voxel size and theoretical PSF size, all in nanometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsfGeometry {
    /// Height of a voxel along z.
    pub voxel_size_z: f64,
    /// Size of a voxel in the yx plane.
    pub voxel_size_yx: f64,
    /// PSF size along z.
    pub psf_z: f64,
    /// PSF size in the yx plane.
    pub psf_yx: f64,
}

impl Default for PsfGeometry {
    fn default() -> Self {
        Self {
            voxel_size_z: 300.0,
            voxel_size_yx: 103.0,
            psf_z: 400.0,
            psf_yx: 200.0,
        }
    }
}

impl PsfGeometry {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("voxel_size_z", self.voxel_size_z),
            ("voxel_size_yx", self.voxel_size_yx),
            ("psf_z", self.psf_z),
            ("psf_yx", self.psf_yx),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid_value(
                    name,
                    format!("must be positive and finite, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// PSF standard deviation along z, in pixels.
    #[inline]
    pub fn sigma_z(&self) -> f64 {
        self.psf_z / self.voxel_size_z
    }

    /// PSF standard deviation in the yx plane, in pixels.
    #[inline]
    pub fn sigma_yx(&self) -> f64 {
        self.psf_yx / self.voxel_size_yx
    }

    /// Per-axis sigma for a 2-D `(y, x)` or 3-D `(z, y, x)` image.
    pub fn sigma(&self, ndim: usize) -> Result<Sigma> {
        self.validate()?;
        let yx = self.sigma_yx();
        match ndim {
            2 => Ok(Sigma::PerAxis(vec![yx, yx])),
            3 => Ok(Sigma::PerAxis(vec![self.sigma_z(), yx, yx])),
            _ => Err(Error::InvalidShape {
                name: "image",
                ndim,
                expected: vec![2, 3],
            }),
        }
    }
}
