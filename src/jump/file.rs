use serde::Serialize;

use super::event::{parse_event, Event};

/// Prefix of the column-layout line jump files carry, usually at the end.
pub const FORMAT_ROW_PREFIX: &str = "#format:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JumpFile {
    /// Records in source line order.
    pub events: Vec<Event>,
    pub has_format_row: bool,
}

/// Diagnostic report for a parsed file. Never an error in itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub fn parse_file(content: &str) -> JumpFile {
    let mut file = JumpFile::default();

    for line in content.lines() {
        let line = line.trim();

        // Checked before the generic comment filter in parse_event.
        if line.starts_with(FORMAT_ROW_PREFIX) {
            file.has_format_row = true;
            continue;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(event) = parse_event(line) {
            file.events.push(event);
        }
    }

    file
}

pub fn validate_file(file: &JumpFile) -> ValidationReport {
    let mut errors = Vec::new();

    if file.events.is_empty() {
        errors.push("File contains no events".to_string());
    }
    if !file.has_format_row {
        errors.push(format!("Missing format row ({FORMAT_ROW_PREFIX} ...)"));
    }

    let invalid = file.events.iter().filter(|e| !e.is_well_formed()).count();
    if invalid > 0 {
        errors.push(format!("Found {} invalid event(s)", invalid));
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
