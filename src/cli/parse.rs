use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::views::{
    apply_filters, extract_unique, group_by_date, group_by_project, group_by_tag, group_by_vehicle,
    sort_by_date_time, EventFilter, SortOrder,
};
use crate::jump::event::Event;
use crate::jump::file::{parse_file, validate_file, ValidationReport};
use crate::jump::writer::to_file_content;

use super::GroupKey;

#[derive(Debug, Default, clap::Args)]
pub struct FilterArgs {
    /// Keep only events with this exact tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Keep only events from this project
    #[arg(long)]
    pub project: Option<String>,
    /// Keep only events from this vehicle
    #[arg(long)]
    pub vehicle: Option<String>,
    /// Earliest session date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest session date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn filters(&self) -> Vec<EventFilter> {
        let mut filters = Vec::new();
        if let Some(tag) = &self.tag {
            filters.push(EventFilter::Tag(tag.clone()));
        }
        if let Some(project) = &self.project {
            filters.push(EventFilter::Project(project.clone()));
        }
        if let Some(vehicle) = &self.vehicle {
            filters.push(EventFilter::Vehicle(vehicle.clone()));
        }
        if self.from.is_some() || self.to.is_some() {
            filters.push(EventFilter::DateRange {
                from: self.from.unwrap_or(NaiveDate::MIN),
                to: self.to.unwrap_or(NaiveDate::MAX),
            });
        }
        filters
    }
}

#[derive(Debug, Default)]
pub struct ParseOptions {
    pub filters: Vec<EventFilter>,
    pub sort: Option<SortOrder>,
    pub group_by: Option<GroupKey>,
    pub json: bool,
    /// Write the selected events, in report order, as a new jump file.
    pub write: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GroupCount {
    key: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    file: String,
    has_format_row: bool,
    validation: ValidationReport,
    total_events: usize,
    matched_events: usize,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<Vec<GroupCount>>,
    events: Vec<&'a Event>,
}

pub fn run(path: &Path, options: &ParseOptions) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read jump file {}", path.display()))?;

    let file = parse_file(&content);
    let validation = validate_file(&file);
    for error in &validation.errors {
        tracing::warn!(file = %path.display(), "{}", error);
    }

    let mut events = apply_filters(&file.events, &options.filters);
    if let Some(order) = options.sort {
        events = sort_by_date_time(events, order);
    }

    if let Some(out) = &options.write {
        std::fs::write(out, to_file_content(events.iter().copied()))
            .with_context(|| format!("cannot write {}", out.display()))?;
        eprintln!("dataco-jumps: wrote {} events to {}", events.len(), out.display());
    }

    let report = ParseReport {
        file: path.display().to_string(),
        has_format_row: file.has_format_row,
        validation,
        total_events: file.events.len(),
        matched_events: events.len(),
        tags: extract_unique(events.iter().copied(), |e| e.tag.clone()),
        groups: options.group_by.map(|key| group_counts(&events, key)),
        events,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report)?);
    }

    Ok(())
}

fn group_counts(events: &[&Event], key: GroupKey) -> Vec<GroupCount> {
    let iter = events.iter().copied();
    let groups = match key {
        GroupKey::Tag => group_by_tag(iter),
        GroupKey::Vehicle => group_by_vehicle(iter),
        GroupKey::Project => group_by_project(iter),
        GroupKey::Date => group_by_date(iter),
    };

    groups
        .into_iter()
        .map(|(key, members)| GroupCount {
            key,
            count: members.len(),
        })
        .collect()
}

fn render_text(report: &ParseReport) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "{}", report.file)?;
    writeln!(out, "{}", "=".repeat(report.file.len().min(60)))?;
    writeln!(
        out,
        "Events:     {} ({} after filters)",
        report.total_events, report.matched_events
    )?;
    writeln!(
        out,
        "Format row: {}",
        if report.has_format_row { "yes" } else { "missing" }
    )?;
    if report.validation.valid {
        writeln!(out, "Valid:      yes")?;
    } else {
        writeln!(out, "Valid:      no ({})", report.validation.errors.join("; "))?;
    }
    writeln!(out, "Tags:       {}", report.tags.join(", "))?;

    if let Some(groups) = &report.groups {
        writeln!(out)?;
        for group in groups {
            let key = if group.key.is_empty() { "(none)" } else { group.key.as_str() };
            writeln!(out, "  {:<24} {}", key, group.count)?;
        }
    }

    if !report.events.is_empty() {
        writeln!(out)?;
    }
    for event in &report.events {
        let session = &event.trackfile.session;
        let date = session
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "????-??-??".to_string());
        let frame = event
            .frame_id
            .map(|f| f.to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            out,
            "  {} {:<8} {:<8} {:>8}  {}",
            date, session.time, event.camera, frame, event.tag
        )?;
    }

    Ok(out)
}
