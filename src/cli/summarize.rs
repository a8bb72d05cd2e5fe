use std::path::{Path, PathBuf};

use crate::analysis::summary::{DatasetSummary, SummaryBuilder};
use crate::config;
use crate::jump::file::{parse_file, validate_file};

/// Build a summary for one dataset from explicit jump files, or from the
/// files found under the base directory when none are given.
pub fn run(dataco: &str, files: &[PathBuf], base_dir: Option<&Path>) -> anyhow::Result<()> {
    let files = if files.is_empty() {
        let base_dir = config::detect_base_dir(base_dir)?;
        config::find_dataco_files(&base_dir, dataco)?
    } else {
        files.to_vec()
    };

    if files.is_empty() {
        eprintln!("dataco-jumps: no files found for DATACO-{}", dataco);
        println!(
            "{}",
            serde_json::json!({
                "success": false,
                "error": format!("No files found for DATACO-{}", dataco),
            })
        );
        return Ok(());
    }

    let summary = summarize_files(dataco, &files);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    eprintln!(
        "dataco-jumps: summarized DATACO-{} ({} files, {} events, {} tags)",
        dataco, summary.processed_files, summary.event_count, summary.unique_tags
    );
    Ok(())
}

pub fn summarize_files(dataco: &str, files: &[PathBuf]) -> DatasetSummary {
    load_dataset(dataco, files).summary
}

/// One dataset's summary together with every event line read from its files.
pub struct LoadedDataset {
    pub summary: DatasetSummary,
    pub lines: Vec<String>,
}

pub fn load_dataset(dataco: &str, files: &[PathBuf]) -> LoadedDataset {
    let mut builder = SummaryBuilder::new(dataco);
    let mut lines = Vec::new();

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let file = parse_file(&content);
                let report = validate_file(&file);
                if !report.valid {
                    tracing::debug!(file = %path.display(), errors = ?report.errors, "jump file has problems");
                }
                builder.add_file(&name, &file);
                lines.extend(file.events.into_iter().map(|e| e.raw));
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "cannot read jump file");
                builder.add_failed(&name);
            }
        }
    }

    LoadedDataset {
        summary: builder.finish(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_files_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("SBS1_Wstn_250108_095047_0000_vt_DATACO-5.jump");
        std::fs::write(
            &good,
            "SBS1_Wstn_250108_095047_0000_s001_v_s60_1 main 10 car\n\
             SBS1_Wstn_250108_095047_0000_s001_v_s60_1 main 20 stop sign\n\
             #format: trackfile camera frameIDStartFrame tag\n",
        )
        .unwrap();
        let missing = dir.path().join("gone_vt_DATACO-5.jump");

        let summary = summarize_files("5", &[good, missing]);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.processed_files, 1);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.event_count, 2);
        assert_eq!(summary.sessions, vec!["SBS1_Wstn_250108_095047_0000"]);
        assert_eq!(summary.tag_counts["stop sign"], 1);
        assert_eq!(summary.min_date.as_deref(), Some("2025-01-08T09:50:47"));
    }

    #[test]
    fn test_load_dataset_keeps_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a_vt_DATACO-5.jump");
        let b = dir.path().join("b_vt_DATACO-5.jump");
        let body: String = (0..120).map(|i| format!("t cam {} car\n", i)).collect();
        std::fs::write(&a, &body).unwrap();
        std::fs::write(&b, "u cam 1 bus\n#format: trackfile camera frameIDStartFrame tag\n").unwrap();

        let dataset = load_dataset("5", &[a, b]);
        assert_eq!(dataset.lines.len(), 121);
        assert_eq!(dataset.lines[120], "u cam 1 bus");
        assert_eq!(dataset.summary.event_count, 121);
        assert_eq!(dataset.summary.content_sample.len(), 100);
        assert!(dataset.summary.content_truncated);
    }

    #[test]
    fn test_run_discovers_files_in_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("SBS1");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(project.join("a_vt_DATACO-3.jump"), "t cam 1 car\n").unwrap();

        run("3", &[], Some(dir.path())).unwrap();
        run("4", &[], Some(dir.path())).unwrap();
        assert!(run("3", &[], Some(dir.path().join("nope").as_path())).is_err());
    }
}
