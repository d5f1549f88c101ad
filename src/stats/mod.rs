//! Statistics over benchmark timings.
//!
//! - [`mean`], [`population_std_dev`]: Per-size spread of timings across runs
//! - [`fit`]: Aggregate timing tables across runs and fit complexity models
//! - [`distribution`]: Student's t distribution for parameter p-values
//! - [`chart`]: SVG charts of timings and fitted curves

pub mod chart;
pub mod distribution;
pub mod fit;

pub use chart::{ChartConfig, ChartPoint, ChartSeries, SeriesKind, generate_svg};
pub use fit::{
    ComplexityAnalysis, ComplexityModel, FitConfig, FitResult, TimingAggregate, aggregate_tables,
    analyze_directory, fit_model, write_charts,
};

/// Compute arithmetic mean.
///
/// # Example
///
/// ```
/// use marker_merge::stats::mean;
///
/// assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 3.0).abs() < 0.001);
/// ```
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute population standard deviation (N denominator).
///
/// This is the spread reported for timings across runs.
///
/// # Example
///
/// ```
/// use marker_merge::stats::population_std_dev;
///
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[5.0, 1.0, 3.0, 2.0, 4.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[3.0]), 0.0);
        assert!((population_std_dev(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!((population_std_dev(&[5.0, 1.0, 3.0, 2.0, 4.0]) - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
