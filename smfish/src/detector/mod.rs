//! Spot detector running every stage of the pipeline once per image.
//!
//! The LoG-filtered image and the local-maximum mask are computed once and
//! shared by the spot, foci and SNR stages.


use ndarray::ArrayViewD;
use rayon::prelude::*;

use crate::components::label_components_with_connectivity;
use crate::config::Config;
use crate::detection::{detect_local_maxima, extract_spots, SpotExtraction};
use crate::error::Result;
use crate::filter::{GaussianLaplace, LogFilter};
use crate::foci::{filter_regions, FilteredRegions, Focus};
use crate::image::{check_array, Pixel, Spots, IMAGE};
use crate::params::Radius;
use crate::snr::estimate_snr;

/// Result of spot detection with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Spot coordinates in row-major order of the image.
    pub spots: Spots,
    pub radius: Radius,
    /// Kept regions. Empty when foci detection is disabled.
    pub foci: Vec<Focus>,
    /// Spots outside every focus. All spots when foci detection is disabled.
    pub spots_outside: Spots,
    /// One value per local maximum above the SNR threshold, in row-major
    /// order. Matches `spots` row for row when both thresholds agree.
    /// `None` when SNR is disabled.
    pub snr: Option<Vec<f64>>,
    pub diagnostics: Diagnostics,
}

/// Counts from each stage of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Pixels equal to the maximum of their neighbourhood in the filtered image.
    pub local_maxima: usize,
    /// Local maxima above the spot threshold.
    pub spots: usize,
    /// Connected regions of the filtered image above the foci threshold.
    pub connected_components: usize,
    /// Regions larger than `min_area`.
    pub large_regions: usize,
    pub foci: usize,
    pub spots_outside: usize,
    /// SNR values that are NaN or infinite.
    pub undefined_snr: usize,
}

/// Spot detector configured once and applied to any number of images.
///
/// ```rust,ignore
/// let detector = SpotDetector::from_config(Config {
///     sigma: Sigma::PerAxis(vec![1.3, 1.9, 1.9]),
///     foci: Some(FociConfig::default()),
///     ..Default::default()
/// });
/// let result = detector.detect(image.view())?;
/// ```
#[derive(Debug, Clone)]
pub struct SpotDetector<F: LogFilter = GaussianLaplace> {
    config: Config,
    filter: F,
}

impl Default for SpotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotDetector {
    /// Create a detector with the default configuration.
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    pub fn from_config(config: Config) -> Self {
        Self::with_filter(config, GaussianLaplace::default())
    }
}

impl<F: LogFilter> SpotDetector<F> {
    /// Create a detector with a custom spot-enhancing filter.
    pub fn with_filter(config: Config, filter: F) -> Self {
        Self { config, filter }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Detect spots, and foci and SNR when configured, in a 2-D or 3-D image.
    pub fn detect<P: Pixel>(&self, image: ArrayViewD<'_, P>) -> Result<DetectionResult> {
        self.config.validate()?;
        check_array("image", &image, &IMAGE)?;
        let config = &self.config;

        // Step 1: enhance spots and find local maxima
        let filtered = self.filter.filter(image.view(), &config.sigma)?;
        let maxima = detect_local_maxima(filtered.view(), config.minimum_distance)?;

        let mut diagnostics = Diagnostics {
            local_maxima: maxima.iter().filter(|&&m| m).count(),
            ..Default::default()
        };

        // Step 2: keep maxima bright enough in the original image
        let SpotExtraction { spots, radius, .. } =
            extract_spots(image.view(), &config.sigma, maxima.view(), config.threshold)?;
        diagnostics.spots = spots.nrows();
        log::debug!(
            "{} spots from {} local maxima",
            diagnostics.spots,
            diagnostics.local_maxima
        );

        // Step 3: aggregate spots into foci
        let (foci, spots_outside) = match &config.foci {
            Some(foci_config) => {
                let labels = label_components_with_connectivity(
                    filtered.view(),
                    foci_config.threshold,
                    foci_config.connectivity,
                )?;
                diagnostics.connected_components =
                    labels.iter().copied().max().unwrap_or(0) as usize;

                let FilteredRegions {
                    foci,
                    spots_outside,
                    nb_large_regions,
                } = filter_regions(
                    image.view(),
                    labels.view(),
                    spots.view(),
                    foci_config.min_area,
                    foci_config.min_nb_spots,
                    foci_config.min_intensity_factor,
                )?;
                diagnostics.large_regions = nb_large_regions;
                (foci, spots_outside)
            }
            None => (Vec::new(), spots.clone()),
        };
        diagnostics.foci = foci.len();
        diagnostics.spots_outside = spots_outside.nrows();

        // Step 4: signal-to-noise per spot
        let snr = match &config.snr {
            Some(snr_config) => {
                let snr = estimate_snr(
                    image.view(),
                    &config.sigma,
                    maxima.view(),
                    snr_config.threshold,
                    snr_config.neighbor_factor,
                )?;
                diagnostics.undefined_snr = snr.iter().filter(|v| !v.is_finite()).count();
                Some(snr)
            }
            None => None,
        };

        log::debug!("detection finished: {diagnostics:?}");

        Ok(DetectionResult {
            spots,
            radius,
            foci,
            spots_outside,
            snr,
            diagnostics,
        })
    }

    /// Run [`SpotDetector::detect`] on several images in parallel.
    pub fn detect_all<P: Pixel>(
        &self,
        images: &[ArrayViewD<'_, P>],
    ) -> Vec<Result<DetectionResult>> {
        images
            .par_iter()
            .map(|image| self.detect(image.view()))
            .collect()
    }
}
