//! Batch evaluation and report generation.
//!
//! - [`runner::BatchEvaluator`]: pairs ground-truth and candidate images by
//!   filename and scores every dataset
//! - [`report`]: report types plus text and CSV rendering

pub mod report;
pub mod runner;

pub use report::{DatasetAggregate, DatasetReport, EvaluationRun, PairOutcome, PairRecord};
pub use runner::BatchEvaluator;
