//! Synthetic benchmark data: noisy Gaussian scatter plots.
//!
//! For every run `k` a directory `noisy_gaussian_<k>` receives one plot per
//! configured size (`noisy_gauss<n>.svg`) and a marker-free `clear.svg`, the
//! layout [`crate::batch::run_benchmark`] expects.

pub mod plot;

use std::fs;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use plot::{AxesLimits, MarkerStyle, write_clean, write_scatter};

/// Plot sizes of a full benchmark, from ten points to two million.
pub const DEFAULT_SIZES: [u64; 17] = [
    10, 50, 100, 500, 1_000, 5_000, 10_000, 25_000, 50_000, 75_000, 100_000, 250_000, 500_000,
    750_000, 1_000_000, 1_500_000, 2_000_000,
];

/// Name of the marker-free plot in every run directory.
pub const CLEAN_FILE_NAME: &str = "clear.svg";

/// Shape of the noisy signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianSignal {
    /// Peak height.
    pub amplitude: f64,
    /// Peak position.
    pub mu: f64,
    /// Peak width.
    pub sigma: f64,
    /// Standard deviation of the additive noise.
    pub noise: f64,
}

impl Default for GaussianSignal {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            mu: 5.0,
            sigma: 0.75,
            noise: 0.1,
        }
    }
}

impl GaussianSignal {
    /// Noise-free value at `x`.
    #[must_use]
    pub fn value(&self, x: f64) -> f64 {
        self.amplitude * (-(x - self.mu).powi(2) / (2.0 * self.sigma * self.sigma)).exp()
    }

    /// Noisy samples at every `x`.
    pub fn sample<R: Rng>(&self, xs: &[f64], rng: &mut R) -> Vec<f64> {
        xs.iter()
            .map(|&x| {
                let z: f64 = rng.sample(StandardNormal);
                self.value(x) + self.noise * z
            })
            .collect()
    }
}

/// Configuration for [`generate_datasets`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Number of run directories.
    pub runs: u32,
    /// Plot sizes generated in every run.
    pub sizes: Vec<u64>,
    /// Signal shape.
    pub signal: GaussianSignal,
    /// Marker area in square points.
    pub marker_area: f64,
    /// Base seed; a random one is drawn when `None`.
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            runs: 8,
            sizes: DEFAULT_SIZES.to_vec(),
            signal: GaussianSignal::default(),
            marker_area: 10.0,
            seed: None,
        }
    }
}

impl SynthConfig {
    fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(Error::InvalidConfig("at least one run is required".to_string()));
        }
        if self.sizes.is_empty() {
            return Err(Error::InvalidConfig("no plot sizes given".to_string()));
        }
        if !(self.signal.sigma.is_finite() && self.signal.sigma > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sigma must be positive, got {}",
                self.signal.sigma
            )));
        }
        if !(self.marker_area.is_finite() && self.marker_area > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "marker area must be positive, got {}",
                self.marker_area
            )));
        }
        Ok(())
    }
}

/// Files written by [`generate_datasets`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthReport {
    /// Created run directories.
    pub directories: Vec<PathBuf>,
    /// Number of plots written, clean plots excluded.
    pub plots: usize,
    /// Seed the plots were derived from.
    pub seed: u64,
}

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// # Example
///
/// ```
/// use marker_merge::synth::linspace;
///
/// assert_eq!(linspace(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
/// assert_eq!(linspace(0.0, 10.0, 1), vec![0.0]);
/// ```
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// Seed of one plot, derived from the base seed, the run and the size.
#[must_use]
pub fn plot_seed(base: u64, run: u32, n: u64) -> u64 {
    // splitmix64 finalizer over the combined inputs
    let mut z = base ^ (u64::from(run) << 48) ^ n.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// File name of the plot with `n` points.
#[must_use]
pub fn plot_file_name(n: u64) -> String {
    format!("noisy_gauss{n}.svg")
}

/// Write one noisy Gaussian plot with `n` points.
pub fn write_plot(path: &Path, n: u64, config: &SynthConfig, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let limits = AxesLimits::default();
    let xs = linspace(limits.x.0, limits.x.1, n as usize);
    let ys = config.signal.sample(&xs, &mut rng);
    let style = MarkerStyle {
        area: config.marker_area,
        ..MarkerStyle::default()
    };

    let mut out = BufWriter::new(fs::File::create(path)?);
    write_scatter(&mut out, &xs, &ys, &limits, &style)?;
    out.flush()?;
    debug!(plot = %path.display(), n, seed, "wrote synthetic plot");
    Ok(())
}

/// Generate every run directory under `root`.
///
/// Plots within a run are written in parallel; each plot has its own seed, so
/// the output does not depend on scheduling.
pub fn generate_datasets(root: &Path, config: &SynthConfig) -> Result<SynthReport> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    fs::create_dir_all(root)?;

    let mut directories = Vec::with_capacity(config.runs as usize);
    let mut plots = 0;
    for run in 1..=config.runs {
        let dir = root.join(format!("noisy_gaussian_{run}"));
        fs::create_dir_all(&dir)?;
        info!(directory = %dir.display(), sizes = config.sizes.len(), "generating run");

        config
            .sizes
            .par_iter()
            .map(|&n| write_plot(&dir.join(plot_file_name(n)), n, config, plot_seed(seed, run, n)))
            .collect::<Result<Vec<()>>>()?;
        plots += config.sizes.len();

        let mut out = BufWriter::new(fs::File::create(dir.join(CLEAN_FILE_NAME))?);
        write_clean(&mut out, &AxesLimits::default())?;
        out.flush()?;

        directories.push(dir);
    }

    Ok(SynthReport {
        directories,
        plots,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BenchConfig, discover_runs, point_count};
    use crate::svg::{StyleKey, collect_markers, parse_document};

    fn small_config() -> SynthConfig {
        SynthConfig {
            runs: 2,
            sizes: vec![5, 20],
            seed: Some(7),
            ..SynthConfig::default()
        }
    }

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(0.0, 10.0, 11);
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[10], 10.0);
        assert!((xs[3] - 3.0).abs() < 1e-12);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_signal_without_noise_is_gaussian() {
        let signal = GaussianSignal {
            noise: 0.0,
            ..GaussianSignal::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let ys = signal.sample(&[5.0, 5.75], &mut rng);
        assert!((ys[0] - 1.0).abs() < 1e-12);
        assert!((ys[1] - (-0.5_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_plot_seeds_differ() {
        assert_ne!(plot_seed(1, 1, 10), plot_seed(1, 2, 10));
        assert_ne!(plot_seed(1, 1, 10), plot_seed(1, 1, 50));
        assert_eq!(plot_seed(3, 4, 5), plot_seed(3, 4, 5));
    }

    #[test]
    fn test_generate_datasets_layout() {
        let root = tempfile::TempDir::new().unwrap();
        let report = generate_datasets(root.path(), &small_config()).unwrap();

        assert_eq!(report.plots, 4);
        assert_eq!(report.seed, 7);
        let runs = discover_runs(root.path(), &BenchConfig::default()).unwrap();
        assert_eq!(runs.len(), 2);
        for run in &runs {
            assert_eq!(run.clean.file_name().unwrap(), CLEAN_FILE_NAME);
            let sizes: Vec<u64> = run
                .plots
                .iter()
                .filter_map(|p| point_count(&p.file_name().unwrap().to_string_lossy()))
                .collect();
            assert_eq!(sizes, vec![20, 5]);
        }

        let text = fs::read_to_string(root.path().join("noisy_gaussian_1").join("noisy_gauss20.svg")).unwrap();
        let doc = parse_document(&text).unwrap();
        assert_eq!(collect_markers(&doc, StyleKey::Exact).placement_count(), 20);
    }

    #[test]
    fn test_generate_datasets_is_reproducible() {
        let first = tempfile::TempDir::new().unwrap();
        let second = tempfile::TempDir::new().unwrap();
        generate_datasets(first.path(), &small_config()).unwrap();
        generate_datasets(second.path(), &small_config()).unwrap();

        let name = Path::new("noisy_gaussian_2").join("noisy_gauss20.svg");
        assert_eq!(
            fs::read(first.path().join(&name)).unwrap(),
            fs::read(second.path().join(&name)).unwrap()
        );
    }

    #[test]
    fn test_invalid_config() {
        let root = tempfile::TempDir::new().unwrap();
        let config = SynthConfig {
            runs: 0,
            ..small_config()
        };
        assert!(matches!(
            generate_datasets(root.path(), &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
