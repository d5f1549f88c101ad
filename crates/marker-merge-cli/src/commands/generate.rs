//! Generate command: synthetic benchmark plots.

use std::path::PathBuf;

use anyhow::{Context, Result};
use marker_merge::{SynthConfig, generate_datasets};

pub fn run(root: PathBuf, runs: u32, sizes: Vec<u64>, seed: Option<u64>) -> Result<()> {
    let mut config = SynthConfig {
        runs,
        seed,
        ..SynthConfig::default()
    };
    if !sizes.is_empty() {
        config.sizes = sizes;
    }

    let report = generate_datasets(&root, &config)
        .with_context(|| format!("Failed to generate plots in {}", root.display()))?;

    println!(
        "Generated {} plot(s) in {} run director{} (seed {})",
        report.plots,
        report.directories.len(),
        if report.directories.len() == 1 { "y" } else { "ies" },
        report.seed
    );
    for dir in &report.directories {
        println!("  {}", dir.display());
    }
    Ok(())
}
