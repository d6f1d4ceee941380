//! Report types for evaluation runs.
//!
//! Reports are built once per run and not mutated afterwards. Text
//! rendering keeps the line formats downstream tooling parses:
//! `filename: PSNR=<2dp>, SSIM=<4dp>` per scored pair and
//! `<dataset> Average → PSNR: <mean>, SSIM: <mean>` per dataset.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::MetricResult;
use crate::stats;

/// Outcome of scoring one ground-truth file against a candidate dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PairOutcome {
    /// Both images decoded and both metrics were computed.
    Scored(MetricResult),
    /// The candidate directory has no file with this name.
    Missing,
    /// Decoding or scoring failed; the reason is the error's display text.
    Failed {
        /// Why the pair could not be scored.
        reason: String,
    },
}

/// One ground-truth filename and its outcome against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    /// Filename shared between ground truth and candidate.
    pub filename: String,
    /// What happened when scoring it.
    pub outcome: PairOutcome,
}

/// Mean scores over a dataset's scored pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetAggregate {
    /// Mean PSNR in dB. Infinite when every scored pair was identical.
    pub mean_psnr: f64,
    /// Mean SSIM.
    pub mean_ssim: f64,
    /// Number of pairs the means cover.
    pub scored: usize,
}

/// Per-dataset results in canonical (lexicographic) filename order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    /// Candidate directory name.
    pub dataset: String,
    /// One record per ground-truth filename.
    pub pairs: Vec<PairRecord>,
    /// `None` when no pair was scored ("no data").
    pub aggregate: Option<DatasetAggregate>,
}

impl DatasetReport {
    /// Build a report from scored pairs, computing the aggregate over the
    /// successfully-scored pairs only.
    #[must_use]
    pub fn new(dataset: String, pairs: Vec<PairRecord>) -> Self {
        let psnr: Vec<f64> = pairs
            .iter()
            .filter_map(|p| match &p.outcome {
                PairOutcome::Scored(m) => Some(m.psnr),
                _ => None,
            })
            .collect();
        let ssim: Vec<f64> = pairs
            .iter()
            .filter_map(|p| match &p.outcome {
                PairOutcome::Scored(m) => Some(m.ssim),
                _ => None,
            })
            .collect();

        let aggregate = if psnr.is_empty() {
            None
        } else {
            Some(DatasetAggregate {
                mean_psnr: stats::mean(&psnr),
                mean_ssim: stats::mean(&ssim),
                scored: psnr.len(),
            })
        };

        Self {
            dataset,
            pairs,
            aggregate,
        }
    }

    /// Scored pairs only, in report order.
    pub fn scored(&self) -> impl Iterator<Item = (&str, MetricResult)> {
        self.pairs.iter().filter_map(|p| match &p.outcome {
            PairOutcome::Scored(m) => Some((p.filename.as_str(), *m)),
            _ => None,
        })
    }

    /// Write the per-pair lines and the summary line for this dataset.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for pair in &self.pairs {
            match &pair.outcome {
                PairOutcome::Scored(m) => writeln!(
                    out,
                    "{}: PSNR={:.2}, SSIM={:.4}",
                    pair.filename, m.psnr, m.ssim
                )?,
                PairOutcome::Missing => {
                    writeln!(out, "{}: missing (no candidate file)", pair.filename)?;
                }
                PairOutcome::Failed { reason } => {
                    writeln!(out, "{}: failed ({reason})", pair.filename)?;
                }
            }
        }

        match &self.aggregate {
            Some(agg) => writeln!(
                out,
                "{} Average → PSNR: {:.2}, SSIM: {:.4}",
                self.dataset, agg.mean_psnr, agg.mean_ssim
            ),
            None => writeln!(out, "{} Average → no data", self.dataset),
        }
    }
}

/// Results for a whole run: one [`DatasetReport`] per candidate directory,
/// in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    /// Per-dataset reports, in the order the candidates were given.
    pub datasets: Vec<DatasetReport>,
    /// When this run was produced.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl EvaluationRun {
    /// Wrap dataset reports with a creation timestamp.
    #[must_use]
    pub fn new(datasets: Vec<DatasetReport>) -> Self {
        Self {
            datasets,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Write the full text report, one dataset block per candidate.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (i, dataset) in self.datasets.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            dataset.write_text(out)?;
        }
        Ok(())
    }

    /// Write flat per-pair rows: `dataset, filename, status, psnr, ssim`.
    /// Metric fields are empty for missing and failed rows.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["dataset", "filename", "status", "psnr", "ssim"])?;

        for dataset in &self.datasets {
            for pair in &dataset.pairs {
                match &pair.outcome {
                    PairOutcome::Scored(m) => writer.write_record([
                        dataset.dataset.as_str(),
                        pair.filename.as_str(),
                        "scored",
                        &m.psnr.to_string(),
                        &m.ssim.to_string(),
                    ])?,
                    PairOutcome::Missing => writer.write_record([
                        dataset.dataset.as_str(),
                        pair.filename.as_str(),
                        "missing",
                        "",
                        "",
                    ])?,
                    PairOutcome::Failed { .. } => writer.write_record([
                        dataset.dataset.as_str(),
                        pair.filename.as_str(),
                        "failed",
                        "",
                        "",
                    ])?,
                }
            }
        }

        writer.flush()?;
        Ok(())
    }
}
