use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::jump::file::JumpFile;
use crate::jump::tokens::parse_session_name;

/// Raw lines kept in a locally built summary's content sample.
pub const SUMMARY_SAMPLE_CAP: usize = 100;

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Aggregate statistics for one dataset, in the wire shape the loader emits.
///
/// `unique_tags` always equals the number of keys in `tag_counts` and
/// `session_count` the number of entries in `sessions`; anything that edits
/// one side recomputes the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataco_number: String,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub processed_files: u64,
    #[serde(default)]
    pub failed_files: u64,
    #[serde(default)]
    pub session_count: u64,
    #[serde(default)]
    pub event_count: u64,
    #[serde(default)]
    pub unique_tags: u64,
    #[serde(default)]
    pub min_date: Option<String>,
    #[serde(default)]
    pub max_date: Option<String>,
    #[serde(default)]
    pub tag_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub sessions: Vec<String>,
    #[serde(default)]
    pub content_sample: Vec<String>,
    #[serde(default)]
    pub content_truncated: bool,
}

impl DatasetSummary {
    /// Deduplicate sessions and recompute both derived counts.
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        self.sessions.retain(|s| seen.insert(s.clone()));

        let session_count = self.sessions.len() as u64;
        if self.session_count != session_count {
            tracing::warn!(
                dataset = %self.dataco_number,
                supplied = self.session_count,
                actual = session_count,
                "session_count disagrees with sessions list, recomputing"
            );
            self.session_count = session_count;
        }

        let unique_tags = self.tag_counts.len() as u64;
        if self.unique_tags != unique_tags {
            tracing::warn!(
                dataset = %self.dataco_number,
                supplied = self.unique_tags,
                actual = unique_tags,
                "unique_tags disagrees with tag_counts, recomputing"
            );
            self.unique_tags = unique_tags;
        }

        self
    }
}

/// What the external loader prints for a request: one summary, a batch, or
/// a failure report (`{"success": false, "error": ...}`; only `error` is read).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SummaryDocument {
    Failure {
        error: String,
    },
    Batch {
        datasets: Vec<SummaryDocument>,
    },
    Single(DatasetSummary),
}

impl SummaryDocument {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Flatten into per-dataset results. `source` names the document in the
    /// error for failures that carry no dataset identifier.
    pub fn into_summaries(self, source: &str) -> Vec<Result<DatasetSummary>> {
        match self {
            SummaryDocument::Failure { error, .. } => vec![Err(Error::SummaryUnavailable {
                dataset: source.to_string(),
                reason: error,
            })],
            SummaryDocument::Batch { datasets } => datasets
                .into_iter()
                .flat_map(|doc| doc.into_summaries(source))
                .collect(),
            SummaryDocument::Single(summary) => vec![Ok(summary.normalized())],
        }
    }
}

/// Parse a date string from a summary. Accepts `YYYY-MM-DDTHH:MM:SS[.f]`,
/// RFC 3339 and bare `YYYY-MM-DD`.
pub fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Session name encoded in a jump file name
/// (`<session>_<suffix>_DATACO-<n>.jump`). Names that do not follow the
/// pattern yield their stem.
pub fn session_name_from_file_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".jump").unwrap_or(file_name);
    let Some(idx) = stem.rfind("_DATACO-") else {
        return stem.to_string();
    };

    let head = &stem[..idx];
    match head.rfind('_') {
        Some(j) => head[..j].to_string(),
        None => head.to_string(),
    }
}

/// Start timestamp of a session, from its date and time fragments.
pub fn session_timestamp(session_name: &str) -> Option<NaiveDateTime> {
    let info = parse_session_name(session_name);
    let date = info.date?;
    match NaiveTime::parse_from_str(&info.time, "%H:%M:%S") {
        Ok(time) => Some(date.and_time(time)),
        Err(_) => date.and_hms_opt(0, 0, 0),
    }
}

/// Accumulates parsed jump files of one dataset into a [`DatasetSummary`].
pub struct SummaryBuilder {
    dataco_number: String,
    total_files: u64,
    processed_files: u64,
    failed_files: u64,
    event_count: u64,
    tag_counts: BTreeMap<String, u64>,
    sessions: Vec<String>,
    seen_sessions: HashSet<String>,
    min_date: Option<NaiveDateTime>,
    max_date: Option<NaiveDateTime>,
    content_sample: Vec<String>,
    content_truncated: bool,
}

impl SummaryBuilder {
    pub fn new(dataco_number: &str) -> Self {
        Self {
            dataco_number: dataco_number.to_string(),
            total_files: 0,
            processed_files: 0,
            failed_files: 0,
            event_count: 0,
            tag_counts: BTreeMap::new(),
            sessions: Vec::new(),
            seen_sessions: HashSet::new(),
            min_date: None,
            max_date: None,
            content_sample: Vec::new(),
            content_truncated: false,
        }
    }

    pub fn add_file(&mut self, file_name: &str, file: &JumpFile) {
        self.total_files += 1;
        self.processed_files += 1;

        let session = session_name_from_file_name(file_name);
        if let Some(ts) = session_timestamp(&session) {
            self.min_date = Some(self.min_date.map_or(ts, |d| d.min(ts)));
            self.max_date = Some(self.max_date.map_or(ts, |d| d.max(ts)));
        } else {
            tracing::debug!(file = file_name, session = %session, "no date in session name");
        }
        if self.seen_sessions.insert(session.clone()) {
            self.sessions.push(session);
        }

        for event in &file.events {
            self.event_count += 1;
            *self.tag_counts.entry(event.tag.clone()).or_insert(0) += 1;

            if self.content_sample.len() < SUMMARY_SAMPLE_CAP {
                self.content_sample.push(event.raw.clone());
            } else {
                self.content_truncated = true;
            }
        }
    }

    /// Count a file that was found but could not be read.
    pub fn add_failed(&mut self, file_name: &str) {
        tracing::warn!(file = file_name, dataset = %self.dataco_number, "counting unreadable file as failed");
        self.total_files += 1;
        self.failed_files += 1;
    }

    pub fn finish(self) -> DatasetSummary {
        let format = |d: NaiveDateTime| d.format(ISO_DATETIME).to_string();
        DatasetSummary {
            dataco_number: self.dataco_number,
            total_files: self.total_files,
            processed_files: self.processed_files,
            failed_files: self.failed_files,
            session_count: self.sessions.len() as u64,
            event_count: self.event_count,
            unique_tags: self.tag_counts.len() as u64,
            min_date: self.min_date.map(format),
            max_date: self.max_date.map(format),
            tag_counts: self.tag_counts,
            sessions: self.sessions,
            content_sample: self.content_sample,
            content_truncated: self.content_truncated,
        }
    }
}
