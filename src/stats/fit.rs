//! Complexity fits over benchmark timings.
//!
//! ## Methodology
//!
//! Timing tables from several runs are stacked; for every plot size the mean
//! time and its population standard deviation across runs are computed. Sizes
//! above a threshold (small plots are dominated by fixed costs) are fitted
//! with each [`ComplexityModel`] by least squares.
//!
//! Models that are linear in their parameters are solved directly from the
//! normal equations. The power law `a·n^b` starts from a log-log regression
//! and is refined with Gauss-Newton on the original scale, so all models
//! minimise the same residuals.
//!
//! Parameter standard errors come from `s²·(JᵀJ)⁻¹` with
//! `s² = SSR / (points − parameters)`; t-values and two-sided p-values use the
//! same degrees of freedom.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::chart::{ChartConfig, ChartPoint, ChartSeries, SeriesKind, colors, generate_svg};
use super::distribution::two_sided_p_value;
use super::{mean, population_std_dev};
use crate::batch::timing::{TimingTable, discover_tables};
use crate::error::{Error, Result};

const GAUSS_NEWTON_MAX_ITERATIONS: usize = 200;
const GAUSS_NEWTON_TOLERANCE: f64 = 1e-12;
const CURVE_SAMPLES: usize = 200;

/// A candidate growth law for compression time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityModel {
    /// `a·n`
    Linear,
    /// `a·n² + b·n + c`
    Quadratic,
    /// `a·n·ln(n) + b`
    NLogN,
    /// `a·n^b`
    Power,
}

impl ComplexityModel {
    /// Every model, in report order.
    pub const ALL: [Self; 4] = [Self::Linear, Self::Quadratic, Self::NLogN, Self::Power];

    /// Short identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::NLogN => "nlogn",
            Self::Power => "power",
        }
    }

    /// Model formula.
    #[must_use]
    pub fn formula(self) -> &'static str {
        match self {
            Self::Linear => "a·n",
            Self::Quadratic => "a·n² + b·n + c",
            Self::NLogN => "a·n·ln(n) + b",
            Self::Power => "a·n^b",
        }
    }

    /// Chart legend and title text.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Linear => "Linear Function Fit",
            Self::Quadratic => "Quadratic Function Fit",
            Self::NLogN => "N log N Function Fit",
            Self::Power => "Power Function Fit",
        }
    }

    /// Parameter names in result order.
    #[must_use]
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Self::Linear => &["a"],
            Self::Quadratic => &["a", "b", "c"],
            Self::NLogN | Self::Power => &["a", "b"],
        }
    }

    /// Number of fitted parameters.
    #[must_use]
    pub fn parameter_count(self) -> usize {
        self.parameter_names().len()
    }

    /// Model value at `n`.
    #[must_use]
    pub fn evaluate(self, params: &[f64], n: f64) -> f64 {
        match self {
            Self::Power => params[0] * n.powf(params[1]),
            _ => self
                .basis(n)
                .iter()
                .zip(params)
                .map(|(basis, p)| basis * p)
                .sum(),
        }
    }

    /// Basis functions of the models that are linear in their parameters.
    fn basis(self, n: f64) -> Vec<f64> {
        match self {
            Self::Linear => vec![n],
            Self::Quadratic => vec![n * n, n, 1.0],
            Self::NLogN => vec![n * n.ln(), 1.0],
            Self::Power => Vec::new(),
        }
    }
}

impl fmt::Display for ComplexityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for [`analyze_directory`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Only sizes strictly above this are fitted.
    pub threshold: f64,
    /// Models to fit.
    pub models: Vec<ComplexityModel>,
    /// Model drawn in the charts.
    pub chart_model: ComplexityModel,
    /// Error bar multiplier on the log-log chart.
    pub log_error_scale: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            threshold: 10_000.0,
            models: ComplexityModel::ALL.to_vec(),
            chart_model: ComplexityModel::Linear,
            log_error_scale: 5.0,
        }
    }
}

/// Per-size timings aggregated across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAggregate {
    /// Plot sizes, shared by every run.
    pub sizes: Vec<u64>,
    /// Mean time per size.
    pub means: Vec<f64>,
    /// Population standard deviation per size.
    pub std_devs: Vec<f64>,
    /// Number of runs aggregated.
    pub runs: usize,
}

impl TimingAggregate {
    /// Sizes, means and deviations of the sizes above `threshold`.
    #[must_use]
    pub fn above(&self, threshold: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut ns = Vec::new();
        let mut means = Vec::new();
        let mut errors = Vec::new();
        for ((&n, &m), &e) in self.sizes.iter().zip(&self.means).zip(&self.std_devs) {
            if n as f64 > threshold {
                ns.push(n as f64);
                means.push(m);
                errors.push(e);
            }
        }
        (ns, means, errors)
    }
}

/// Stack timing tables and aggregate each size.
///
/// Every table must list the same sizes in the same order.
pub fn aggregate_tables(tables: &[TimingTable]) -> Result<TimingAggregate> {
    let Some(first) = tables.first() else {
        return Err(Error::Fit("no timing tables to aggregate".to_string()));
    };
    let sizes = first.sizes();
    if sizes.is_empty() {
        return Err(Error::Fit("timing tables are empty".to_string()));
    }
    for (i, table) in tables.iter().enumerate().skip(1) {
        if table.sizes() != sizes {
            return Err(Error::Fit(format!(
                "timing table {} lists different sizes than the first table",
                i + 1
            )));
        }
    }

    let columns: Vec<Vec<f64>> = tables.iter().map(TimingTable::times).collect();
    let mut means = Vec::with_capacity(sizes.len());
    let mut std_devs = Vec::with_capacity(sizes.len());
    for row in 0..sizes.len() {
        let values: Vec<f64> = columns.iter().map(|c| c[row]).collect();
        means.push(mean(&values));
        std_devs.push(population_std_dev(&values));
    }

    Ok(TimingAggregate {
        sizes,
        means,
        std_devs,
        runs: tables.len(),
    })
}

/// Fitted parameters of one model with their uncertainties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    /// Fitted model.
    pub model: ComplexityModel,
    /// Parameters, in [`ComplexityModel::parameter_names`] order.
    pub params: Vec<f64>,
    /// Standard error of each parameter.
    pub std_errors: Vec<f64>,
    /// Parameter divided by its standard error.
    pub t_values: Vec<f64>,
    /// Two-sided p-value of each t-value.
    pub p_values: Vec<f64>,
    /// Degrees of freedom: points minus parameters.
    pub dof: usize,
    /// Coefficient of determination (1.0 = perfect fit).
    pub r_squared: f64,
    /// Number of fitted points.
    pub points: usize,
}

impl FitResult {
    /// Fitted model value at `n`.
    #[must_use]
    pub fn predict(&self, n: f64) -> f64 {
        self.model.evaluate(&self.params, n)
    }
}

/// Least-squares fit of `model` to `(ns[i], ys[i])`.
pub fn fit_model(model: ComplexityModel, ns: &[f64], ys: &[f64]) -> Result<FitResult> {
    if ns.len() != ys.len() {
        return Err(Error::Fit(format!(
            "{} sizes but {} times",
            ns.len(),
            ys.len()
        )));
    }
    let k = model.parameter_count();
    if ns.len() <= k {
        return Err(Error::Fit(format!(
            "{model} fit needs more than {k} points, got {}",
            ns.len()
        )));
    }
    if ns.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(Error::Fit("non-finite value in fit data".to_string()));
    }
    if model == ComplexityModel::NLogN && ns.iter().any(|&n| n <= 0.0) {
        return Err(Error::Fit("n·ln(n) needs positive sizes".to_string()));
    }

    let (params, unscaled_cov) = match model {
        ComplexityModel::Power => fit_power(ns, ys)?,
        _ => {
            let design: Vec<Vec<f64>> = ns.iter().map(|&n| model.basis(n)).collect();
            least_squares(&design, ys)?
        }
    };

    let residuals: Vec<f64> = ns
        .iter()
        .zip(ys)
        .map(|(&n, &y)| y - model.evaluate(&params, n))
        .collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let y_mean = mean(ys);
    let ss_tot: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    let dof = ns.len() - k;
    let residual_variance = ss_res / dof as f64;
    let std_errors: Vec<f64> = (0..k)
        .map(|i| (residual_variance * unscaled_cov[i][i]).max(0.0).sqrt())
        .collect();
    let t_values: Vec<f64> = params.iter().zip(&std_errors).map(|(p, se)| p / se).collect();
    let p_values = t_values
        .iter()
        .map(|&t| two_sided_p_value(t, dof as f64))
        .collect();

    debug!(%model, ?params, r_squared, "fitted model");

    Ok(FitResult {
        model,
        params,
        std_errors,
        t_values,
        p_values,
        dof,
        r_squared,
        points: ns.len(),
    })
}

/// Solve the normal equations of `design · β = ys`.
///
/// Columns are scaled to unit maximum before solving, since the quadratic
/// basis spans many orders of magnitude. Returns `β` and `(XᵀX)⁻¹`.
fn least_squares(design: &[Vec<f64>], ys: &[f64]) -> Result<(Vec<f64>, Vec<Vec<f64>>)> {
    let k = design.first().map_or(0, Vec::len);
    let scales: Vec<f64> = (0..k)
        .map(|j| {
            let max = design.iter().map(|row| row[j].abs()).fold(0.0, f64::max);
            if max > 0.0 { max } else { 1.0 }
        })
        .collect();

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &y) in design.iter().zip(ys) {
        for i in 0..k {
            let xi = row[i] / scales[i];
            xty[i] += xi * y;
            for j in 0..k {
                xtx[i][j] += xi * row[j] / scales[j];
            }
        }
    }

    let inverse = invert(&xtx)?;
    let beta: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum::<f64>() / scales[i])
        .collect();
    let cov = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] / (scales[i] * scales[j])).collect())
        .collect();
    Ok((beta, cov))
}

/// Fit `a·n^b`: log-log regression, then Gauss-Newton on the raw residuals.
fn fit_power(ns: &[f64], ys: &[f64]) -> Result<(Vec<f64>, Vec<Vec<f64>>)> {
    if ns.iter().chain(ys).any(|&v| v <= 0.0) {
        return Err(Error::Fit("power fit needs positive sizes and times".to_string()));
    }
    let log_design: Vec<Vec<f64>> = ns.iter().map(|n| vec![n.ln(), 1.0]).collect();
    let log_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
    let (log_params, _) = least_squares(&log_design, &log_ys)?;
    let mut a = log_params[1].exp();
    let mut b = log_params[0];

    let ssr = |a: f64, b: f64| -> f64 {
        ns.iter()
            .zip(ys)
            .map(|(&n, &y)| (y - a * n.powf(b)).powi(2))
            .sum()
    };
    let jacobian = |a: f64, b: f64| -> Vec<Vec<f64>> {
        ns.iter()
            .map(|&n| {
                let nb = n.powf(b);
                vec![nb, a * nb * n.ln()]
            })
            .collect()
    };

    let mut current = ssr(a, b);
    for _ in 0..GAUSS_NEWTON_MAX_ITERATIONS {
        let residuals: Vec<f64> = ns.iter().zip(ys).map(|(&n, &y)| y - a * n.powf(b)).collect();
        let Ok((step, _)) = least_squares(&jacobian(a, b), &residuals) else {
            break;
        };

        // halve the step until the residuals shrink
        let mut scale = 1.0;
        let mut improved = None;
        while scale > 1e-10 {
            let (na, nb) = (a + scale * step[0], b + scale * step[1]);
            let candidate = ssr(na, nb);
            if candidate.is_finite() && candidate <= current {
                improved = Some((na, nb, candidate));
                break;
            }
            scale /= 2.0;
        }
        let Some((na, nb, candidate)) = improved else {
            break;
        };
        let converged = current - candidate <= GAUSS_NEWTON_TOLERANCE * current.max(f64::MIN_POSITIVE);
        a = na;
        b = nb;
        current = candidate;
        if converged {
            break;
        }
    }

    let (_, cov) = least_squares(&jacobian(a, b), &vec![0.0; ns.len()])?;
    Ok((vec![a, b], cov))
}

/// Gauss-Jordan inverse with partial pivoting.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let k = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&x, &y| {
                a[x][col]
                    .abs()
                    .partial_cmp(&a[y][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-14 {
            return Err(Error::Fit("singular normal equations".to_string()));
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        let pivot_row: Vec<f64> = a[col].iter().map(|v| v / p).collect();
        let pivot_inv: Vec<f64> = inv[col].iter().map(|v| v / p).collect();
        for row in 0..k {
            let factor = if row == col { 0.0 } else { a[row][col] };
            for j in 0..k {
                if row == col {
                    a[row][j] = pivot_row[j];
                    inv[row][j] = pivot_inv[j];
                } else if factor != 0.0 {
                    a[row][j] -= factor * pivot_row[j];
                    inv[row][j] -= factor * pivot_inv[j];
                }
            }
        }
    }
    Ok(inv)
}

/// A model that could not be fitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFit {
    /// The model.
    pub model: ComplexityModel,
    /// Why fitting failed.
    pub reason: String,
}

/// Aggregated timings of a results directory and the fits over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    /// Timing tables that were read.
    pub tables: Vec<PathBuf>,
    /// Aggregated timings.
    pub aggregate: TimingAggregate,
    /// Threshold used to select fitted sizes.
    pub threshold: f64,
    /// Successful fits, in configured order.
    pub fits: Vec<FitResult>,
    /// Models that could not be fitted.
    pub skipped: Vec<SkippedFit>,
    /// When the analysis ran.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ComplexityAnalysis {
    /// Fit of `model`, if it succeeded.
    #[must_use]
    pub fn fit(&self, model: ComplexityModel) -> Option<&FitResult> {
        self.fits.iter().find(|f| f.model == model)
    }
}

/// Read every timing table in `dir`, aggregate them and fit the configured
/// models.
pub fn analyze_directory(dir: &Path, config: &FitConfig) -> Result<ComplexityAnalysis> {
    let paths = discover_tables(dir)?;
    if paths.is_empty() {
        return Err(Error::Fit(format!("no timing tables in {}", dir.display())));
    }

    let mut tables = Vec::with_capacity(paths.len());
    for path in &paths {
        let table = TimingTable::read(path)?;
        info!(table = %path.display(), rows = table.records.len(), "loaded timing table");
        tables.push(table);
    }
    let aggregate = aggregate_tables(&tables)?;

    let (ns, means, _) = aggregate.above(config.threshold);
    if ns.is_empty() {
        return Err(Error::Fit(format!("no sizes above the threshold {}", config.threshold)));
    }

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    for &model in &config.models {
        match fit_model(model, &ns, &means) {
            Ok(fit) => fits.push(fit),
            Err(e) => {
                warn!(%model, error = %e, "could not fit model");
                skipped.push(SkippedFit {
                    model,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(ComplexityAnalysis {
        tables: paths,
        aggregate,
        threshold: config.threshold,
        fits,
        skipped,
        timestamp: chrono::Utc::now(),
    })
}

/// Evenly spaced curve sample positions, logarithmically when `log`.
fn curve_positions(start: f64, end: f64, log: bool) -> Vec<f64> {
    let steps = (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| {
            let t = i as f64 / steps;
            if log {
                (start.ln() + t * (end.ln() - start.ln())).exp()
            } else {
                start + t * (end - start)
            }
        })
        .collect()
}

/// Render the linear and log-log charts of the measured timings with the
/// curve of `config.chart_model`.
///
/// Returns `(linear, loglog)` SVG documents.
pub fn render_charts(analysis: &ComplexityAnalysis, config: &FitConfig) -> Result<(String, String)> {
    let fit = analysis.fit(config.chart_model).ok_or_else(|| {
        Error::Fit(format!("no {} fit to draw", config.chart_model))
    })?;
    let aggregate = &analysis.aggregate;
    let max_n = aggregate.sizes.iter().copied().max().unwrap_or(1) as f64 * 1.25;

    let render = |log: bool, error_scale: f64| {
        let data = ChartSeries {
            name: "Data".to_string(),
            color: colors::RED.to_string(),
            kind: SeriesKind::Markers,
            points: aggregate
                .sizes
                .iter()
                .zip(&aggregate.means)
                .zip(&aggregate.std_devs)
                .map(|((&n, &m), &e)| ChartPoint {
                    x: n as f64,
                    y: m,
                    error: Some(e * error_scale),
                })
                .collect(),
        };
        let curve = ChartSeries {
            name: fit.model.title().to_string(),
            color: colors::BLUE.to_string(),
            kind: SeriesKind::Line,
            points: curve_positions(1.0, max_n, log)
                .into_iter()
                .map(|n| ChartPoint::new(n, fit.predict(n)))
                .collect(),
        };
        let chart = ChartConfig::new(fit.model.title()).with_log_axes(log);
        generate_svg(&[curve, data], &chart)
    };

    Ok((render(false, 1.0), render(true, config.log_error_scale)))
}

/// Write the charts of [`render_charts`] into `out_dir` as
/// `<model>_function_fit.svg` and `<model>_function_fit_loglog.svg`.
pub fn write_charts(analysis: &ComplexityAnalysis, out_dir: &Path, config: &FitConfig) -> Result<Vec<PathBuf>> {
    let (linear, loglog) = render_charts(analysis, config)?;
    fs::create_dir_all(out_dir)?;

    let name = config.chart_model.name();
    let linear_path = out_dir.join(format!("{name}_function_fit.svg"));
    let loglog_path = out_dir.join(format!("{name}_function_fit_loglog.svg"));
    fs::write(&linear_path, linear)?;
    fs::write(&loglog_path, loglog)?;
    info!(linear = %linear_path.display(), loglog = %loglog_path.display(), "saved charts");

    Ok(vec![linear_path, loglog_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::timing::{TimingRecord, table_file_name};

    fn table(rows: &[(u64, f64)]) -> TimingTable {
        TimingTable::new(
            rows.iter()
                .map(|&(n, seconds)| TimingRecord { n, seconds })
                .collect(),
        )
    }

    /// Deterministic wobble in [-1, 1].
    fn wobble(i: usize) -> f64 {
        ((i as f64) * 1.7).sin()
    }

    #[test]
    fn test_aggregate_tables() {
        let tables = [
            table(&[(10, 1.0), (20, 2.0)]),
            table(&[(10, 3.0), (20, 2.0)]),
        ];
        let aggregate = aggregate_tables(&tables).unwrap();
        assert_eq!(aggregate.sizes, vec![10, 20]);
        assert_eq!(aggregate.means, vec![2.0, 2.0]);
        assert_eq!(aggregate.std_devs, vec![1.0, 0.0]);
        assert_eq!(aggregate.runs, 2);

        let (ns, means, errors) = aggregate.above(10.0);
        assert_eq!(ns, vec![20.0]);
        assert_eq!(means, vec![2.0]);
        assert_eq!(errors, vec![0.0]);
    }

    #[test]
    fn test_aggregate_rejects_mismatched_sizes() {
        let tables = [table(&[(10, 1.0)]), table(&[(11, 1.0)])];
        assert!(matches!(aggregate_tables(&tables), Err(Error::Fit(_))));
        assert!(matches!(aggregate_tables(&[]), Err(Error::Fit(_))));
    }

    #[test]
    fn test_linear_fit_recovers_slope() {
        let ns: Vec<f64> = (1..=12).map(|i| f64::from(i) * 50_000.0).collect();
        let ys: Vec<f64> = ns
            .iter()
            .enumerate()
            .map(|(i, n)| 4e-7 * n * (1.0 + 0.01 * wobble(i)))
            .collect();

        let fit = fit_model(ComplexityModel::Linear, &ns, &ys).unwrap();
        assert_eq!(fit.dof, 11);
        assert!((fit.params[0] - 4e-7).abs() / 4e-7 < 0.01);
        assert!(fit.std_errors[0] > 0.0);
        assert!(fit.t_values[0] > 100.0);
        assert!(fit.p_values[0] < 1e-10);
        assert!(fit.r_squared > 0.99);
    }

    #[test]
    fn test_exact_polynomials_are_recovered() {
        let ns: Vec<f64> = [25_000.0, 50_000.0, 75_000.0, 100_000.0, 250_000.0, 500_000.0, 1e6, 2e6].to_vec();

        let quad: Vec<f64> = ns.iter().map(|n| 2e-12 * n * n + 3e-7 * n + 0.05).collect();
        let fit = fit_model(ComplexityModel::Quadratic, &ns, &quad).unwrap();
        assert!((fit.params[0] - 2e-12).abs() < 1e-15);
        assert!((fit.params[1] - 3e-7).abs() < 1e-9);
        assert!((fit.params[2] - 0.05).abs() < 1e-4);

        let nlogn: Vec<f64> = ns.iter().map(|n| 1e-8 * n * n.ln() + 0.2).collect();
        let fit = fit_model(ComplexityModel::NLogN, &ns, &nlogn).unwrap();
        assert!((fit.params[0] - 1e-8).abs() < 1e-12);
        assert!((fit.params[1] - 0.2).abs() < 1e-5);
        assert!(fit.r_squared > 0.999_999);
    }

    #[test]
    fn test_power_fit() {
        let ns: Vec<f64> = (1..=10).map(|i| f64::from(i) * 100_000.0).collect();
        let ys: Vec<f64> = ns
            .iter()
            .enumerate()
            .map(|(i, n)| 3e-6 * n.powf(0.9) * (1.0 + 0.005 * wobble(i)))
            .collect();

        let fit = fit_model(ComplexityModel::Power, &ns, &ys).unwrap();
        assert!((fit.params[1] - 0.9).abs() < 0.02);
        assert!((fit.predict(500_000.0) - 3e-6 * 500_000_f64.powf(0.9)).abs() / fit.predict(500_000.0) < 0.02);
        assert_eq!(fit.dof, 8);
    }

    #[test]
    fn test_too_few_points() {
        let err = fit_model(ComplexityModel::Quadratic, &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::Fit(_)));
    }

    #[test]
    fn test_analyze_directory_and_charts() {
        let dir = tempfile::TempDir::new().unwrap();
        let sizes = [10_u64, 5_000, 25_000, 50_000, 100_000, 250_000, 500_000];
        for run in 1..=3_usize {
            let rows: Vec<(u64, f64)> = sizes
                .iter()
                .enumerate()
                .map(|(i, &n)| (n, 2e-6 * n as f64 + 0.001 * wobble(i + run * 7).abs()))
                .collect();
            table(&rows).write(&dir.path().join(table_file_name(&run.to_string()))).unwrap();
        }

        let config = FitConfig::default();
        let analysis = analyze_directory(dir.path(), &config).unwrap();
        assert_eq!(analysis.tables.len(), 3);
        assert_eq!(analysis.aggregate.runs, 3);
        assert_eq!(analysis.fits.len(), 4);
        assert!(analysis.skipped.is_empty());

        let linear = analysis.fit(ComplexityModel::Linear).unwrap();
        assert_eq!(linear.points, 5);
        assert!((linear.params[0] - 2e-6).abs() / 2e-6 < 0.05);

        let out = dir.path().join("charts");
        let written = write_charts(&analysis, &out, &config).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("linear_function_fit.svg"));
        assert!(written[1].ends_with("linear_function_fit_loglog.svg"));
        let loglog = fs::read_to_string(&written[1]).unwrap();
        assert!(loglog.contains("Linear Function Fit"));
    }

    #[test]
    fn test_analyze_directory_without_tables() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = analyze_directory(dir.path(), &FitConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Fit(_)));
    }
}
