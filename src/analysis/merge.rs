use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::summary::{parse_iso, DatasetSummary};
use crate::error::{Error, Result};

/// Raw lines kept in a merged summary's content sample.
pub const MERGE_SAMPLE_CAP: usize = 50;

pub const MERGED_PREFIX: &str = "MERGED";

/// `MERGED_<id1>_<id2>...`, in input order.
pub fn merged_identifier(summaries: &[DatasetSummary]) -> String {
    let ids: Vec<&str> = summaries.iter().map(|s| s.dataco_number.as_str()).collect();
    format!("{}_{}", MERGED_PREFIX, ids.join("_"))
}

/// Combine two or more summaries into one.
///
/// Counters and per-tag counts add up (saturating at `u64::MAX`), sessions
/// are unioned in first-seen order, and the date range spans every input.
/// The content sample is filled line by line from the inputs' samples up to
/// [`MERGE_SAMPLE_CAP`]; once anything is dropped, or any input was already
/// truncated, the result is truncated.
pub fn merge(summaries: &[DatasetSummary]) -> Result<DatasetSummary> {
    if summaries.len() < 2 {
        return Err(Error::NotEnoughDatasets {
            operation: "merge",
            found: summaries.len(),
        });
    }

    let mut merged = DatasetSummary {
        dataco_number: merged_identifier(summaries),
        ..Default::default()
    };
    let mut seen_sessions = HashSet::new();

    for summary in summaries {
        merged.total_files = merged.total_files.saturating_add(summary.total_files);
        merged.processed_files = merged.processed_files.saturating_add(summary.processed_files);
        merged.failed_files = merged.failed_files.saturating_add(summary.failed_files);
        merged.event_count = merged.event_count.saturating_add(summary.event_count);

        for session in &summary.sessions {
            if seen_sessions.insert(session.as_str()) {
                merged.sessions.push(session.clone());
            }
        }

        for (tag, count) in &summary.tag_counts {
            let total = merged.tag_counts.entry(tag.clone()).or_insert(0);
            *total = total.saturating_add(*count);
        }

        if summary.content_truncated {
            merged.content_truncated = true;
        }
        for line in &summary.content_sample {
            if merged.content_sample.len() < MERGE_SAMPLE_CAP {
                merged.content_sample.push(line.clone());
            } else {
                merged.content_truncated = true;
            }
        }
    }

    merged.session_count = merged.sessions.len() as u64;
    merged.unique_tags = merged.tag_counts.len() as u64;
    merged.min_date = extreme_date(summaries.iter().map(|s| s.min_date.as_deref()), Extreme::Min);
    merged.max_date = extreme_date(summaries.iter().map(|s| s.max_date.as_deref()), Extreme::Max);

    tracing::debug!(
        id = %merged.dataco_number,
        inputs = summaries.len(),
        events = merged.event_count,
        "merge complete"
    );
    Ok(merged)
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

/// The earliest or latest of the given dates, returned as its original string.
fn extreme_date<'a>(dates: impl Iterator<Item = Option<&'a str>>, extreme: Extreme) -> Option<String> {
    let mut best: Option<(NaiveDateTime, &str)> = None;

    for raw in dates.flatten() {
        let Some(parsed) = parse_iso(raw) else {
            tracing::warn!(date = raw, "ignoring unparseable date in summary");
            continue;
        };
        let better = match (best, extreme) {
            (None, _) => true,
            (Some((current, _)), Extreme::Min) => parsed < current,
            (Some((current, _)), Extreme::Max) => parsed > current,
        };
        if better {
            best = Some((parsed, raw));
        }
    }

    best.map(|(_, raw)| raw.to_string())
}
