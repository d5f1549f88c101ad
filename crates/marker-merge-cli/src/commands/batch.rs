//! Batch command: compress a whole directory onto one clean plot.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use marker_merge::batch::{parse_bool, resolve_clean_path};
use marker_merge::{BatchOptions, MergeConfig, StyleKey, compress_directory};

pub struct BatchArgs {
    pub dir: Option<PathBuf>,
    pub clean: Option<PathBuf>,
    pub point_framing: Option<String>,
    pub style_key: StyleKey,
    pub segments: usize,
    pub parallel: bool,
}

/// Ask on stderr, read one line from stdin.
fn prompt(question: &str) -> Result<String> {
    eprint!("{question}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        bail!("no answer to \"{question}\" (end of input)");
    }
    Ok(line.trim().to_string())
}

pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => PathBuf::from(prompt("Directory with plots")?),
    };
    let clean = match args.clean {
        Some(clean) => clean,
        None => PathBuf::from(prompt("Clean plot file name")?),
    };
    let framing_answer = match args.point_framing {
        Some(answer) => answer,
        None => prompt("Use point framing? (yes/no)")?,
    };
    let point_framing = parse_bool(&framing_answer).context("Invalid point framing answer")?;

    let clean = resolve_clean_path(&dir, &clean);
    if !clean.is_file() {
        bail!("Clean plot not found: {}", clean.display());
    }

    let options = BatchOptions {
        merge: MergeConfig::builder()
            .point_framing(point_framing)
            .style_key(args.style_key)
            .disk_segments(args.segments)
            .build(),
        parallel: args.parallel,
    };

    let report = compress_directory(&dir, &clean, &options)
        .with_context(|| format!("Failed to compress directory {}", dir.display()))?;

    for compressed in &report.compressed {
        if verbose {
            super::compress::print_report(compressed);
            println!();
        } else {
            println!(
                "{} -> {} ({:.1}x)",
                compressed.input.display(),
                compressed.output.display(),
                compressed.compression_ratio()
            );
        }
    }

    println!();
    println!(
        "Compressed {} plot(s), {} failure(s)",
        report.compressed.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  {}: {}", failure.path.display(), failure.error);
    }
    Ok(())
}
