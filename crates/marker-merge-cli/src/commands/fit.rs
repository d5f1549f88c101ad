//! Fit command: complexity models over timing tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use marker_merge::stats::{ComplexityAnalysis, ComplexityModel, FitConfig, analyze_directory, write_charts};

pub struct FitArgs {
    pub dir: PathBuf,
    pub threshold: f64,
    pub models: Vec<ComplexityModel>,
    pub chart_model: ComplexityModel,
    pub write_charts: bool,
    pub charts_dir: Option<PathBuf>,
}

pub fn run(args: FitArgs, json: bool) -> Result<()> {
    let mut config = FitConfig {
        threshold: args.threshold,
        chart_model: args.chart_model,
        ..FitConfig::default()
    };
    if !args.models.is_empty() {
        config.models = args.models;
    }
    if args.write_charts && !config.models.contains(&config.chart_model) {
        config.models.push(config.chart_model);
    }

    let analysis = analyze_directory(&args.dir, &config)
        .with_context(|| format!("Failed to analyze timings in {}", args.dir.display()))?;

    let charts = if args.write_charts {
        let out_dir = args.charts_dir.unwrap_or_else(|| args.dir.clone());
        write_charts(&analysis, &out_dir, &config).context("Failed to write charts")?
    } else {
        Vec::new()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print_analysis(&analysis);
    for chart in &charts {
        println!("Saved: {}", chart.display());
    }
    Ok(())
}

fn print_analysis(analysis: &ComplexityAnalysis) {
    let aggregate = &analysis.aggregate;
    println!(
        "Loaded {} timing table(s), {} sizes",
        analysis.tables.len(),
        aggregate.sizes.len()
    );
    println!();
    println!("{:>10} {:>14} {:>14}", "n", "mean (s)", "std (s)");
    println!("{:-<40}", "");
    for ((n, mean), std) in aggregate.sizes.iter().zip(&aggregate.means).zip(&aggregate.std_devs) {
        let marker = if *n as f64 > analysis.threshold { "*" } else { " " };
        println!("{:>10} {:>14.6e} {:>14.6e} {}", n, mean, std, marker);
    }
    println!("(* fitted: n > {})", analysis.threshold);

    for fit in &analysis.fits {
        println!();
        println!("{} fit: {}", fit.model.title(), fit.model.formula());
        println!("{:-<60}", "");
        println!(
            "{:<6} {:>14} {:>14} {:>10} {:>12}",
            "param", "value", "std error", "t-value", "p-value"
        );
        let names = fit.model.parameter_names();
        for (i, name) in names.iter().enumerate() {
            println!(
                "{:<6} {:>14.6e} {:>14.6e} {:>10.3} {:>12.3e}",
                name, fit.params[i], fit.std_errors[i], fit.t_values[i], fit.p_values[i]
            );
        }
        println!("R² = {:.6}, dof = {}", fit.r_squared, fit.dof);
    }

    for skipped in &analysis.skipped {
        println!();
        println!("{} fit skipped: {}", skipped.model.title(), skipped.reason);
    }
    println!();
}
