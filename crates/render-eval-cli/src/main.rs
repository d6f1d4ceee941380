//! render-eval CLI - batch image fidelity comparison tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Batch image fidelity comparison against ground-truth renders.
#[derive(Parser)]
#[command(name = "render-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score candidate datasets against a ground-truth directory
    Compare {
        /// Ground-truth directory
        #[arg(short, long)]
        ground_truth: PathBuf,

        /// Candidate dataset directories, reported in the given order
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        /// Nominal SSIM window size (odd, shrinks for small images)
        #[arg(long, default_value_t = render_eval::DEFAULT_WINDOW)]
        window: usize,

        /// Write the full run as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write flat per-pair rows as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Rename zero-padded frame captures to the r_<index> layout
    Rename {
        /// Directory containing the frames
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Number of frame indices to try
        #[arg(long, default_value_t = 100)]
        count: u32,

        /// Prefix for the renamed files
        #[arg(long, default_value = "r_")]
        prefix: String,

        /// Print what would be renamed without touching anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            ground_truth,
            candidates,
            window,
            json,
            csv,
        } => commands::compare::run(ground_truth, candidates, window, json, csv, cli.verbose),
        Commands::Rename {
            dir,
            count,
            prefix,
            dry_run,
        } => commands::rename::run(dir, count, &prefix, dry_run, cli.verbose),
    }
}
