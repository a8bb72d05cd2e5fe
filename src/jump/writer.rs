use super::event::Event;

/// Trailing line every written jump file ends with.
pub const FORMAT_ROW: &str = "#format: trackfile camera frameIDStartFrame tag";

/// Rebuild file content from events. Each event is written from its `raw`
/// line, not regenerated from the parsed fields.
pub fn to_file_content<'a>(events: impl IntoIterator<Item = &'a Event>) -> String {
    lines_to_file_content(events.into_iter().map(|e| e.raw.as_str()))
}

/// Join lines and terminate them with the format row.
pub fn lines_to_file_content<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(FORMAT_ROW);
    out
}
