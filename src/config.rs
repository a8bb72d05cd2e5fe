use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::MatchOptions;

/// Where jump files live when nothing else is configured.
pub const DEFAULT_BASE_DIR: &str = "/mobileye/DC/Voice_Tagging/";

/// Resolve the base directory holding the per-project jump file folders.
///
/// Priority:
/// 1. `--base-dir` flag
/// 2. `DATACO_BASE_DIR` env var
/// 3. [`DEFAULT_BASE_DIR`]
pub fn resolve_base_dir(flag: Option<&Path>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    match std::env::var("DATACO_BASE_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_BASE_DIR),
    }
}

/// Like [`resolve_base_dir`], but the directory must exist.
pub fn detect_base_dir(flag: Option<&Path>) -> anyhow::Result<PathBuf> {
    let dir = resolve_base_dir(flag);
    anyhow::ensure!(dir.is_dir(), "base directory is not a directory: {}", dir.display());
    Ok(dir)
}

/// Default location for merge output: `<base>/merged/<merged_id>.jump`
pub fn merge_output_path(base_dir: &Path, merged_id: &str) -> PathBuf {
    base_dir.join("merged").join(format!("{}.jump", merged_id))
}

/// Glob pattern for the jump files of one dataset: `<base>/*/*DATACO-<n>.jump`.
pub fn dataco_pattern(base_dir: &Path, dataco_number: &str) -> anyhow::Result<String> {
    let base = base_dir
        .to_str()
        .with_context(|| format!("base directory is not valid UTF-8: {}", base_dir.display()))?;

    let pattern = PathBuf::from(glob::Pattern::escape(base))
        .join("*")
        .join(format!("*DATACO-{}.jump", glob::Pattern::escape(dataco_number)));
    Ok(pattern.to_string_lossy().into_owned())
}

/// Jump files of one dataset, found in the project folders directly under
/// `base_dir`. Hidden files and folders are not matched. Sorted by path.
pub fn find_dataco_files(base_dir: &Path, dataco_number: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = dataco_pattern(base_dir, dataco_number)?;
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "skipping unreadable path"),
        }
    }

    files.sort();
    tracing::debug!(dataco = dataco_number, found = files.len(), "searched base directory");
    Ok(files)
}
