use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::analysis::merge::merge;
use crate::analysis::summary::DatasetSummary;
use crate::config;
use crate::jump::writer::lines_to_file_content;

use super::load_summaries;
use super::summarize::load_dataset;

/// Where merged content goes, if anywhere.
#[derive(Debug, Clone, Default)]
pub enum MergeOutput {
    #[default]
    None,
    /// `<base>/merged/<id>.jump`
    BaseDir(Option<PathBuf>),
    Path(PathBuf),
}

#[derive(Debug, Serialize)]
struct MergeReport {
    #[serde(flatten)]
    summary: DatasetSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
}

/// What to merge: summary documents, or the jump files of DATACO numbers
/// found under the base directory.
#[derive(Debug, Clone)]
pub enum MergeSource {
    Summaries(Vec<PathBuf>),
    Datacos {
        numbers: Vec<String>,
        base_dir: Option<PathBuf>,
    },
}

pub fn run(source: &MergeSource, output: &MergeOutput) -> anyhow::Result<()> {
    let (merged, lines) = match source {
        MergeSource::Summaries(paths) => {
            let merged = merge(&load_summaries(paths))?;
            let lines = merged.content_sample.clone();
            (merged, lines)
        }
        MergeSource::Datacos { numbers, base_dir } => merge_datacos(numbers, base_dir.as_deref())?,
    };

    let output_path = match output {
        MergeOutput::None => None,
        MergeOutput::BaseDir(flag) => {
            let base_dir = config::detect_base_dir(flag.as_deref())?;
            Some(config::merge_output_path(&base_dir, &merged.dataco_number))
        }
        MergeOutput::Path(path) => Some(path.clone()),
    };

    if let Some(path) = &output_path {
        if matches!(source, MergeSource::Summaries(_)) && merged.content_truncated {
            anyhow::bail!(
                "merged content of {} is truncated ({} of {} events), refusing to write {}; \
                 merge the jump files with --dataco instead",
                merged.dataco_number,
                lines.len(),
                merged.event_count,
                path.display()
            );
        }
        write_merged(path, &lines)?;
        eprintln!("dataco-jumps: wrote {} lines to {}", lines.len(), path.display());
    }

    let report = MergeReport {
        summary: merged,
        output_path: output_path.map(|p| p.display().to_string()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Merge datasets from their jump files, keeping every event line.
/// Numbers with no files are skipped.
fn merge_datacos(numbers: &[String], base_dir: Option<&Path>) -> anyhow::Result<(DatasetSummary, Vec<String>)> {
    let base_dir = config::detect_base_dir(base_dir)?;

    let mut summaries = Vec::new();
    let mut lines = Vec::new();
    for number in numbers {
        let files = config::find_dataco_files(&base_dir, number)?;
        if files.is_empty() {
            tracing::warn!(dataco = %number, "no jump files found, skipping");
            continue;
        }
        let dataset = load_dataset(number, &files);
        lines.extend(dataset.lines);
        summaries.push(dataset.summary);
    }

    let merged = merge(&summaries)?;
    Ok((merged, lines))
}

/// Write merged event lines as a jump file.
fn write_merged(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let content = lines_to_file_content(lines.iter().map(String::as_str));
    std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
