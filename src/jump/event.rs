use serde::Serialize;

use super::tokens::{parse_trackfile, TrackfileInfo};

/// One `<trackfile> <camera> <frameId> <tag...>` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// The line as it appeared in the file. Output is written from this.
    pub raw: String,
    pub trackfile: TrackfileInfo,
    pub camera: String,
    /// `None` when the third column has no leading integer.
    pub frame_id: Option<i64>,
    pub tag: String,
}

impl Event {
    /// True when every field a well-formed record needs is present.
    pub fn is_well_formed(&self) -> bool {
        !self.trackfile.raw.is_empty()
            && !self.camera.is_empty()
            && !self.tag.is_empty()
            && self.frame_id.is_some()
    }
}

/// Parse one jump-file line. Blank lines, `#` comments and lines with fewer
/// than four columns yield `None`.
pub fn parse_event(line: &str) -> Option<Event> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }

    Some(Event {
        raw: line.to_string(),
        trackfile: parse_trackfile(tokens[0]),
        camera: tokens[1].to_string(),
        frame_id: parse_leading_int(tokens[2]),
        tag: tokens[3..].join(" "),
    })
}

/// Read an optional sign followed by leading ASCII digits, ignoring whatever
/// trails them. `"100abc"` is 100, `"abc"` is `None`.
fn parse_leading_int(token: &str) -> Option<i64> {
    let (sign, digits) = match token.as_bytes().first() {
        Some(b'-') => (-1, &token[1..]),
        Some(b'+') => (1, &token[1..]),
        _ => (1, token),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
