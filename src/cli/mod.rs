pub mod check;
pub mod compare;
pub mod merge;
pub mod parse;
pub mod summarize;

use std::path::PathBuf;

use clap::ValueEnum;

use crate::analysis::summary::{DatasetSummary, SummaryDocument};
use crate::analysis::views::SortOrder;

/// Event attribute to group a parse report by.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupKey {
    Tag,
    Vehicle,
    Project,
    Date,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortOrder::Ascending,
            SortDirection::Desc => SortOrder::Descending,
        }
    }
}

/// Load summary documents, skipping any that are unreadable or report a
/// failure so the rest can still be compared or merged.
pub fn load_summaries(paths: &[PathBuf]) -> Vec<DatasetSummary> {
    let mut summaries = Vec::new();

    for path in paths {
        let source = path.display().to_string();

        let input = match std::fs::read_to_string(path) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(file = %source, error = %e, "cannot read summary, skipping");
                continue;
            }
        };

        let document = match SummaryDocument::from_json(&input) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(file = %source, error = %e, "not a summary document, skipping");
                continue;
            }
        };

        for result in document.into_summaries(&source) {
            match result {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::warn!(error = %e, "skipping dataset"),
            }
        }
    }

    tracing::debug!(requested = paths.len(), loaded = summaries.len(), "summaries loaded");
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_summaries_keeps_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let failed = dir.path().join("failed.json");
        let garbage = dir.path().join("garbage.json");
        let batch = dir.path().join("batch.json");
        std::fs::write(&good, r#"{"dataco_number": "1", "tag_counts": {"car": 1}}"#).unwrap();
        std::fs::write(&failed, r#"{"success": false, "error": "No files found for DATACO-2"}"#).unwrap();
        std::fs::write(&garbage, "not json").unwrap();
        std::fs::write(&batch, r#"{"datasets": [{"dataco_number": "3"}, {"dataco_number": "4"}]}"#).unwrap();

        let paths = vec![good, failed, garbage, dir.path().join("missing.json"), batch];
        let summaries = load_summaries(&paths);
        let ids: Vec<&str> = summaries.iter().map(|s| s.dataco_number.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
        assert_eq!(summaries[0].unique_tags, 1);
    }
}
