//! Frame rename command.
//!
//! Capture tools emit zero-padded frame numbers (`00000.png`, `00001.png`,
//! ...); the ground-truth sets use `r_<index>.png`. This renames one layout
//! to the other, reporting and skipping indices with no file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn run(dir: PathBuf, count: u32, prefix: &str, dry_run: bool, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("Renaming up to {count} frames in: {}", dir.display());
    }

    let mut renamed = 0_u32;
    for index in 0..count {
        let old = dir.join(format!("{index:05}.png"));
        let new = dir.join(format!("{prefix}{index}.png"));

        if !old.is_file() {
            println!("Skip: {} not found", old.display());
            continue;
        }

        if dry_run {
            println!("Would rename {} -> {}", old.display(), new.display());
            continue;
        }

        fs::rename(&old, &new)
            .with_context(|| format!("Failed to rename {}", old.display()))?;
        println!("Renamed {} -> {}", old.display(), new.display());
        renamed += 1;
    }

    if verbose {
        eprintln!("Renamed {renamed} file(s)");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renames_zero_padded_frames() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("00000.png"), b"frame0").unwrap();
        fs::write(dir.path().join("00002.png"), b"frame2").unwrap();
        fs::write(dir.path().join("other.png"), b"unrelated").unwrap();

        run(dir.path().to_path_buf(), 3, "r_", false, false).unwrap();

        assert!(dir.path().join("r_0.png").is_file());
        assert!(!dir.path().join("00000.png").exists());
        assert!(dir.path().join("r_2.png").is_file());
        // Index 1 had no file, so nothing appears for it.
        assert!(!dir.path().join("r_1.png").exists());
        // Files outside the zero-padded layout are left alone.
        assert!(dir.path().join("other.png").is_file());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("00000.png"), b"frame0").unwrap();

        run(dir.path().to_path_buf(), 1, "r_", true, false).unwrap();

        assert!(dir.path().join("00000.png").is_file());
        assert!(!dir.path().join("r_0.png").exists());
    }
}
