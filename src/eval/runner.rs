//! Batch evaluation of candidate datasets against a ground-truth set.
//!
//! The pipeline is enumerate → match → score → aggregate. Every stage
//! produces explicit values: a missing or broken pair becomes a report
//! entry, never an exception path, and only unreadable root directories
//! abort a run.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::decode::load_bgr8;
use crate::error::{Error, Result};
use crate::eval::report::{DatasetReport, EvaluationRun, PairOutcome, PairRecord};
use crate::metrics::{self, DEFAULT_WINDOW, MetricResult};

/// File extensions considered part of an image set.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "bmp", "tif", "tiff"];

/// Pairs ground-truth images with same-named candidate images and scores
/// each dataset with PSNR and SSIM.
#[derive(Debug, Clone)]
pub struct BatchEvaluator {
    ground_truth: PathBuf,
    window_size: usize,
}

impl BatchEvaluator {
    /// Create an evaluator for the given ground-truth directory with the
    /// default SSIM window.
    pub fn new(ground_truth: impl Into<PathBuf>) -> Self {
        Self {
            ground_truth: ground_truth.into(),
            window_size: DEFAULT_WINDOW,
        }
    }

    /// Set the nominal SSIM window size.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is even or zero.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        assert!(
            window_size >= 1 && window_size % 2 == 1,
            "SSIM window must be odd and >= 1, got {window_size}"
        );
        self.window_size = window_size;
        self
    }

    /// Score every candidate dataset against the ground-truth set.
    ///
    /// Candidates are processed in input order and appear in the same order
    /// in the result. Pairs within a dataset are scored in parallel;
    /// records come back in canonical (lexicographic) filename order
    /// regardless of completion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Directory`] if the ground-truth directory or any
    /// candidate root cannot be read. Per-pair failures are downgraded to
    /// report entries and never abort the run.
    pub fn run(&self, candidates: &[PathBuf]) -> Result<EvaluationRun> {
        let names = list_image_names(&self.ground_truth)?;

        let mut datasets = Vec::with_capacity(candidates.len());
        for dir in candidates {
            datasets.push(self.evaluate_dataset(dir, &names)?);
        }

        Ok(EvaluationRun::new(datasets))
    }

    fn evaluate_dataset(&self, dir: &Path, names: &[String]) -> Result<DatasetReport> {
        if !dir.is_dir() {
            return Err(Error::Directory {
                path: dir.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let dataset = dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("candidate")
            .to_string();

        // Pairs are independent; ordered collect restores filename order.
        let pairs: Vec<PairRecord> = names
            .par_iter()
            .map(|name| PairRecord {
                filename: name.clone(),
                outcome: self.score_pair(name, dir),
            })
            .collect();

        Ok(DatasetReport::new(dataset, pairs))
    }

    fn score_pair(&self, name: &str, dir: &Path) -> PairOutcome {
        let candidate_path = dir.join(name);
        if !candidate_path.is_file() {
            return PairOutcome::Missing;
        }

        match self.score_images(&self.ground_truth.join(name), &candidate_path) {
            Ok(result) => PairOutcome::Scored(result),
            Err(err) => PairOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }

    fn score_images(&self, gt_path: &Path, candidate_path: &Path) -> Result<MetricResult> {
        let gt = load_bgr8(gt_path)?;
        let candidate = load_bgr8(candidate_path)?;

        if gt.width() != candidate.width() || gt.height() != candidate.height() {
            return Err(Error::DimensionMismatch {
                expected: (gt.width(), gt.height()),
                actual: (candidate.width(), candidate.height()),
            });
        }

        // SSIM first: it rejects zero-sized images before PSNR divides by
        // the sample count.
        let ssim = metrics::calculate_ssim(&gt, &candidate, self.window_size)?;
        let psnr = metrics::calculate_psnr(&gt, &candidate);

        Ok(MetricResult { psnr, ssim })
    }
}

/// Image filenames directly under `dir`, lexicographically sorted.
fn list_image_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::Directory {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Directory {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32, shade: u8) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                shade.wrapping_add((x % 16) as u8),
                shade.wrapping_add((y % 16) as u8),
                shade,
            ])
        });
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_identical_directories() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        for name in ["r_0.png", "r_1.png"] {
            write_png(gt.path(), name, 16, 16, 60);
            write_png(cand.path(), name, 16, 16, 60);
        }

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        assert_eq!(run.datasets.len(), 1);
        let report = &run.datasets[0];
        assert_eq!(report.pairs.len(), 2);
        for (_, m) in report.scored() {
            assert!(m.psnr.is_infinite());
            assert!((m.ssim - 1.0).abs() < 1e-9);
        }

        let agg = report.aggregate.unwrap();
        assert_eq!(agg.scored, 2);
        assert!(agg.mean_psnr.is_infinite());
        assert!((agg.mean_ssim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_candidate_file() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 8, 8, 10);
        write_png(gt.path(), "b.png", 8, 8, 10);
        write_png(cand.path(), "a.png", 8, 8, 20);

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        let report = &run.datasets[0];
        assert!(matches!(report.pairs[0].outcome, PairOutcome::Scored(_)));
        assert_eq!(report.pairs[1].outcome, PairOutcome::Missing);
        assert_eq!(report.aggregate.unwrap().scored, 1);
    }

    #[test]
    fn test_shape_mismatch_recorded_and_run_continues() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 16, 16, 10);
        write_png(cand.path(), "a.png", 8, 8, 10);
        write_png(gt.path(), "b.png", 16, 16, 10);
        write_png(cand.path(), "b.png", 16, 16, 10);

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        let report = &run.datasets[0];
        assert!(matches!(
            &report.pairs[0].outcome,
            PairOutcome::Failed { reason } if reason.contains("Dimension mismatch")
        ));
        assert!(matches!(report.pairs[1].outcome, PairOutcome::Scored(_)));
        assert_eq!(report.aggregate.unwrap().scored, 1);
    }

    #[test]
    fn test_corrupt_candidate_recorded() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 8, 8, 10);
        fs::write(cand.path().join("a.png"), b"garbage").unwrap();

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        assert!(matches!(
            run.datasets[0].pairs[0].outcome,
            PairOutcome::Failed { .. }
        ));
        assert!(run.datasets[0].aggregate.is_none());
    }

    #[test]
    fn test_no_overlap_reports_no_data() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 8, 8, 10);
        write_png(cand.path(), "z.png", 8, 8, 10);

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        let report = &run.datasets[0];
        assert!(report.aggregate.is_none());

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no data"));
    }

    #[test]
    fn test_pairs_in_lexicographic_order() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        for name in ["c.png", "a.png", "b.png"] {
            write_png(gt.path(), name, 8, 8, 10);
            write_png(cand.path(), name, 8, 8, 10);
        }

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        let names: Vec<&str> = run.datasets[0]
            .pairs
            .iter()
            .map(|p| p.filename.as_str())
            .collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_candidates_in_input_order() {
        let gt = tempfile::tempdir().unwrap();
        let cand_a = tempfile::tempdir().unwrap();
        let cand_b = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 8, 8, 10);
        write_png(cand_a.path(), "a.png", 8, 8, 10);
        write_png(cand_b.path(), "a.png", 8, 8, 10);

        let dirs = [cand_b.path().to_path_buf(), cand_a.path().to_path_buf()];
        let run = BatchEvaluator::new(gt.path()).run(&dirs).unwrap();

        let expected: Vec<String> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        let actual: Vec<&String> = run.datasets.iter().map(|d| &d.dataset).collect();
        assert_eq!(actual, expected.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_missing_ground_truth_is_fatal() {
        let cand = tempfile::tempdir().unwrap();
        let result =
            BatchEvaluator::new("/definitely/not/here").run(&[cand.path().to_path_buf()]);
        assert!(matches!(result, Err(Error::Directory { .. })));
    }

    #[test]
    fn test_missing_candidate_root_is_fatal() {
        let gt = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 8, 8, 10);

        let result =
            BatchEvaluator::new(gt.path()).run(&[PathBuf::from("/definitely/not/here")]);
        assert!(matches!(result, Err(Error::Directory { .. })));
    }

    #[test]
    fn test_non_image_files_ignored() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        write_png(gt.path(), "a.png", 8, 8, 10);
        write_png(cand.path(), "a.png", 8, 8, 10);
        fs::write(gt.path().join("notes.txt"), b"not an image").unwrap();

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        assert_eq!(run.datasets[0].pairs.len(), 1);
    }

    #[test]
    fn test_small_images_score_with_shrunk_window() {
        let gt = tempfile::tempdir().unwrap();
        let cand = tempfile::tempdir().unwrap();
        write_png(gt.path(), "tiny.png", 5, 5, 10);
        write_png(cand.path(), "tiny.png", 5, 5, 30);

        let run = BatchEvaluator::new(gt.path())
            .run(&[cand.path().to_path_buf()])
            .unwrap();

        assert!(matches!(
            run.datasets[0].pairs[0].outcome,
            PairOutcome::Scored(_)
        ));
    }
}
