//! smFISH - Spot and foci detection for fluorescence microscopy images.
//!
//! Works on 2-D `(y, x)` and 3-D `(z, y, x)` images of `u8`, `u16`, `f32` or
//! `f64` pixels:
//! - Laplacian-of-Gaussian spot enhancement
//! - Local-maximum spot detection with an intensity threshold
//! - Connected-component labeling and foci filtering
//! - Per-spot signal-to-noise estimation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use smfish::{Config, FociConfig, Sigma, SpotDetector};
//!
//! let config = Config {
//!     sigma: Sigma::PerAxis(vec![1.3, 1.9, 1.9]),
//!     threshold: 1500.0,
//!     foci: Some(FociConfig::default()),
//!     ..Default::default()
//! };
//! let detector = SpotDetector::from_config(config);
//! let result = detector.detect(volume.view())?;
//!
//! println!("{} spots, {} foci", result.spots.nrows(), result.foci.len());
//! ```
//!
//! Each stage is also available on its own: [`log_lm`], [`log_cc`],
//! [`filter_regions`] and [`compute_snr`].

pub mod components;
mod config;
pub mod detection;
mod detector;
mod error;
pub mod filter;
pub mod foci;
pub mod image;
pub(crate) mod math;
pub(crate) mod morphology;
mod params;
mod psf;
pub mod snr;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Pipeline
// ============================================================================

pub use config::{Config, FociConfig, SnrConfig};
pub use detector::{DetectionResult, Diagnostics, SpotDetector};
pub use error::{Error, Result};

// ============================================================================
// Parameters
// ============================================================================

pub use params::{Radius, Sigma, Threshold};
pub use psf::PsfGeometry;

// ============================================================================
// Stages
// ============================================================================

pub use components::{
    label_components, label_components_with_connectivity, log_cc, region_properties,
    Connectivity, RegionProps,
};
pub use detection::{detect_local_maxima, extract_spots, log_lm, SpotDetection};
pub use filter::{log_filter, log_filter_f64, GaussianLaplace, LogFilter};
pub use foci::{filter_regions, FilteredRegions, Focus};
pub use image::{Dtype, LabelImage, Mask, Pixel, Spots};
pub use math::BoundingBox;
pub use snr::{compute_snr, estimate_snr, SnrRadii};
