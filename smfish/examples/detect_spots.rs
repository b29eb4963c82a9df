//! Example: Detect spots and foci in a 3-D smFISH volume
//!
//! Loads a YAML or JSON configuration, starts logging from its `logging`
//! section and runs the full pipeline. Without a volume argument a synthetic
//! volume with isolated spots and a few dense clusters is generated.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example detect_spots
//! cargo run --release --example detect_spots -- my_config.yaml
//! cargo run --release --example detect_spots -- my_config.yaml volume.raw 32 512 512
//! ```
//!
//! `volume.raw` holds little-endian `u16` pixels in `(z, y, x)` row-major order.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smfish::{Config, SpotDetector};

/// Number of spots printed in the summary.
const SPOTS_TO_PRINT: usize = 10;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config_path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("config/detection.yaml"));
    let config = Config::from_file(&config_path)?;
    common::setup_logging(&config.logging)?;
    log::info!("Loaded config from {}", config_path.display());

    let volume = match args.get(1) {
        Some(path) => load_raw_u16(Path::new(path), &args[2..])?,
        None => {
            log::info!("No volume given, generating a synthetic one");
            synthetic_volume([32, 256, 256], 300, 8, 42)
        }
    };
    log::info!("Volume shape {:?}", volume.shape());

    let detector = SpotDetector::from_config(config);
    let start = Instant::now();
    let result = detector.detect(volume.view())?;
    let elapsed = start.elapsed();

    log::info!(
        "Detected {} spots and {} foci in {} ms",
        result.spots.nrows(),
        result.foci.len(),
        elapsed.as_millis()
    );
    log::debug!("Diagnostics: {:?}", result.diagnostics);

    println!("\nFirst {SPOTS_TO_PRINT} spots:");
    println!("{:>4}  {:>5}  {:>5}  {:>5}  {:>8}", "#", "Z", "Y", "X", "SNR");
    for (i, spot) in result.spots.rows().into_iter().take(SPOTS_TO_PRINT).enumerate() {
        let snr = result
            .snr
            .as_ref()
            .and_then(|snr| snr.get(i))
            .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
        println!(
            "{:>4}  {:>5}  {:>5}  {:>5}  {:>8}",
            i + 1,
            spot[0],
            spot[1],
            spot[2],
            snr
        );
    }

    println!("\nFoci:");
    for focus in &result.foci {
        println!(
            "  label {:>4}  area {:>5}  spots {:>3}  box {:?}..={:?}",
            focus.region.label,
            focus.region.area,
            focus.nb_spots,
            focus.region.bbox.min(),
            focus.region.bbox.max()
        );
    }
    println!("Spots outside foci: {}", result.spots_outside.nrows());

    Ok(())
}

/// Read a raw little-endian `u16` volume whose shape is given as `z y x`.
fn load_raw_u16(path: &Path, shape_args: &[String]) -> anyhow::Result<ArrayD<u16>> {
    if shape_args.len() != 3 {
        bail!("expected the volume shape as three numbers: z y x");
    }
    let shape = shape_args
        .iter()
        .map(|arg| arg.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .context("volume shape must be positive integers")?;

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let pixels: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    ArrayD::from_shape_vec(IxDyn(&shape), pixels)
        .with_context(|| format!("{} does not hold a {shape:?} u16 volume", path.display()))
}

/// `u16` volume with isolated spots plus `nb_clusters` tight groups of spots.
fn synthetic_volume(
    shape: [usize; 3],
    nb_spots: usize,
    nb_clusters: usize,
    seed: u64,
) -> ArrayD<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    let random_center = |rng: &mut StdRng, margin: f64| {
        [
            rng.random_range(2.0..shape[0] as f64 - 2.0),
            rng.random_range(margin..shape[1] as f64 - margin),
            rng.random_range(margin..shape[2] as f64 - margin),
        ]
    };

    let mut centers: Vec<[f64; 3]> = (0..nb_spots).map(|_| random_center(&mut rng, 4.0)).collect();
    for _ in 0..nb_clusters {
        let [z, y, x] = random_center(&mut rng, 16.0);
        for _ in 0..6 {
            centers.push([
                z,
                y + rng.random_range(-6.0..6.0),
                x + rng.random_range(-6.0..6.0),
            ]);
        }
    }

    ArrayD::from_shape_fn(IxDyn(&shape), |index| {
        let mut value = 100.0 + rng.random_range(-10.0..=10.0);
        for center in &centers {
            let dz = (index[0] as f64 - center[0]) / 1.3;
            let dy = (index[1] as f64 - center[1]) / 1.9;
            let dx = (index[2] as f64 - center[2]) / 1.9;
            let r2 = dz * dz + dy * dy + dx * dx;
            if r2 < 25.0 {
                value += 3000.0 * (-r2 / 2.0).exp();
            }
        }
        value.round().min(u16::MAX as f64) as u16
    })
}
