//! Pipeline configuration.
//!
//! Every tunable of [`SpotDetector`](crate::SpotDetector) lives here and can
//! be loaded from a YAML or JSON file. Optional stages (foci, SNR) are
//! skipped when their section is absent.

use std::path::Path;

use anyhow::Context;
use common::{LogSettings, SerdeFormat};
use serde::{Deserialize, Serialize};

use crate::components::Connectivity;
use crate::error::{Error, Result};
use crate::params::{Sigma, Threshold};
use crate::snr::DEFAULT_NEIGHBOR_FACTOR;

// ============================================================================
// Stage configs
// ============================================================================

/// Aggregation of spots into foci.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FociConfig {
    /// Absolute threshold on the LoG-filtered image for region labeling.
    pub threshold: f64,
    /// Regions need strictly more pixels than this to be considered.
    pub min_area: usize,
    /// Regions with strictly more spots than this are kept.
    pub min_nb_spots: usize,
    /// Regions peaking above `median * min_intensity_factor` are kept.
    pub min_intensity_factor: f64,
    pub connectivity: Connectivity,
}

impl Default for FociConfig {
    fn default() -> Self {
        Self {
            threshold: 1000.0,
            min_area: 10,
            min_nb_spots: 2,
            min_intensity_factor: 2.0,
            connectivity: Connectivity::Full,
        }
    }
}

/// Per-spot signal-to-noise estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnrConfig {
    pub threshold: Threshold,
    /// Noise radius over signal radius.
    pub neighbor_factor: f64,
}

impl Default for SnrConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::Absolute(2000.0),
            neighbor_factor: DEFAULT_NEIGHBOR_FACTOR,
        }
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PSF standard deviation in pixels, a number or one value per axis.
    pub sigma: Sigma,
    /// Half-width of the local-maximum window.
    pub minimum_distance: usize,
    /// Spots must be strictly brighter than this in the original image.
    pub threshold: f64,
    pub foci: Option<FociConfig>,
    pub snr: Option<SnrConfig>,
    pub logging: LogSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sigma: Sigma::default(),
            minimum_distance: 1,
            threshold: 2000.0,
            foci: None,
            snr: None,
            logging: LogSettings::default(),
        }
    }
}

impl Config {
    /// Check every parameter that does not depend on the image.
    pub fn validate(&self) -> Result<()> {
        self.sigma.validate()?;
        if self.threshold.is_nan() {
            return Err(Error::invalid_value("threshold", "threshold is NaN"));
        }

        if let Some(foci) = &self.foci {
            if foci.threshold.is_nan() {
                return Err(Error::invalid_value("foci.threshold", "threshold is NaN"));
            }
            if !foci.min_intensity_factor.is_finite() {
                return Err(Error::invalid_value(
                    "foci.min_intensity_factor",
                    format!("must be finite, got {}", foci.min_intensity_factor),
                ));
            }
        }

        if let Some(snr) = &self.snr {
            snr.threshold.validate()?;
            if !(snr.neighbor_factor.is_finite() && snr.neighbor_factor > 0.0) {
                return Err(Error::invalid_value(
                    "snr.neighbor_factor",
                    format!("must be positive and finite, got {}", snr.neighbor_factor),
                ));
            }
        }

        Ok(())
    }

    /// Load and validate a YAML (`.yaml`, `.yml`) or JSON (`.json`) file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config: Self = common::file_format::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_str(text: &str, format: SerdeFormat) -> anyhow::Result<Self> {
        let config: Self = format.deserialize(text).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_string(&self, format: SerdeFormat) -> anyhow::Result<String> {
        Ok(format.serialize(self)?)
    }
}
