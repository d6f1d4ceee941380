//! Compare command.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use render_eval::{BatchEvaluator, Summary};

pub fn run(
    ground_truth: PathBuf,
    candidates: Vec<PathBuf>,
    window: usize,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    if window == 0 || window % 2 == 0 {
        bail!("--window must be odd and at least 1, got {window}");
    }

    if verbose {
        eprintln!(
            "Scoring {} dataset(s) against: {}",
            candidates.len(),
            ground_truth.display()
        );
    }

    let run = BatchEvaluator::new(&ground_truth)
        .with_window_size(window)
        .run(&candidates)
        .context("evaluation failed")?;

    let mut stdout = std::io::stdout().lock();
    run.write_text(&mut stdout)?;

    if verbose {
        for report in &run.datasets {
            let psnr: Vec<f64> = report.scored().map(|(_, m)| m.psnr).collect();
            let ssim: Vec<f64> = report.scored().map(|(_, m)| m.ssim).collect();

            if let Some(s) = Summary::compute(&psnr) {
                eprintln!(
                    "{}: PSNR n={} mean={:.2} min={:.2} max={:.2} stddev={:.2}",
                    report.dataset, s.count, s.mean, s.min, s.max, s.std_dev
                );
            }
            if let Some(s) = Summary::compute(&ssim) {
                eprintln!(
                    "{}: SSIM n={} mean={:.4} min={:.4} max={:.4} stddev={:.4}",
                    report.dataset, s.count, s.mean, s.min, s.max, s.std_dev
                );
            }
        }
    }

    if let Some(path) = json {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &run)
            .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
        if verbose {
            eprintln!("Wrote JSON report to: {}", path.display());
        }
    }

    if let Some(path) = csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        run.write_csv(file)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        if verbose {
            eprintln!("Wrote CSV report to: {}", path.display());
        }
    }

    Ok(())
}
