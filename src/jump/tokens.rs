use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::TrackfileError;

const SESSION_MARKER: &str = "_s001_";
const CLIP_MARKER: &str = "_s60_";

/// Metadata decoded from a `PROJECT_VEHICLE_YYMMDD_HHMMSS_VERSION` session name.
///
/// Missing trailing fields are empty strings, never absent, so the record is
/// always complete. `parse_session_name("")` is the canonical empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub raw: String,
    pub project_name: String,
    pub vehicle_name: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub version_number: String,
}

/// A `<session>_s001_<view>_s60_<clip>` identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackfileInfo {
    pub raw: String,
    pub session: SessionInfo,
    pub view_name: String,
    pub clip_number: String,
}

impl TrackfileInfo {
    /// The value returned for identifiers that cannot be split: every field
    /// empty except `raw`.
    fn fallback(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            ..Self::default()
        }
    }
}

/// Decode a `YYMMDD` fragment as a date in the 2000s.
///
/// Out-of-range months and days roll over with calendar arithmetic
/// (`"251301"` is 2026-01-01, `"250100"` is 2024-12-31) instead of being
/// rejected. Anything that is not exactly six ASCII digits yields `None`.
pub fn parse_date6(yymmdd: &str) -> Option<NaiveDate> {
    if yymmdd.len() != 6 || !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let yy: i32 = yymmdd[0..2].parse().ok()?;
    let mm: i32 = yymmdd[2..4].parse().ok()?;
    let dd: i64 = yymmdd[4..6].parse().ok()?;

    let month0 = mm - 1;
    let year = 2000 + yy + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as u32 + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(dd - 1))
}

/// Format a `HHMMSS` fragment as `HH:MM:SS`.
///
/// No range checks. Input that is not six characters long comes back
/// unchanged so it can still be displayed.
pub fn format_time6(hhmmss: &str) -> String {
    let chars: Vec<char> = hhmmss.chars().collect();
    if chars.len() != 6 {
        return hhmmss.to_string();
    }

    let pair = |i: usize| chars[i..i + 2].iter().collect::<String>();
    format!("{}:{}:{}", pair(0), pair(2), pair(4))
}

pub fn parse_session_name(name: &str) -> SessionInfo {
    let parts: Vec<&str> = name.split('_').collect();
    let part = |i: usize| parts.get(i).copied().unwrap_or("");

    SessionInfo {
        raw: name.to_string(),
        project_name: part(0).to_string(),
        vehicle_name: part(1).to_string(),
        date: parse_date6(part(2)),
        time: format_time6(part(3)),
        version_number: part(4).to_string(),
    }
}

/// Split a trackfile identifier, reporting which marker was missing.
pub fn try_parse_trackfile(raw: &str) -> Result<TrackfileInfo, TrackfileError> {
    let (session_part, rest) = raw
        .split_once(SESSION_MARKER)
        .ok_or_else(|| TrackfileError::MissingSessionMarker(raw.to_string()))?;

    let (view_name, clip_number) = rest
        .split_once(CLIP_MARKER)
        .ok_or_else(|| TrackfileError::MissingClipMarker(raw.to_string()))?;

    Ok(TrackfileInfo {
        raw: raw.to_string(),
        session: parse_session_name(session_part),
        view_name: view_name.to_string(),
        clip_number: clip_number.to_string(),
    })
}

/// Split a trackfile identifier, falling back to an empty record that keeps
/// `raw` when either marker is missing.
pub fn parse_trackfile(raw: &str) -> TrackfileInfo {
    try_parse_trackfile(raw).unwrap_or_else(|_| TrackfileInfo::fallback(raw))
}
