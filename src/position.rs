//! Map matched substrings back to editor line/column spans.

use crate::types::LinkPosition;

/// Span of the first line that contains `needle`, at the first occurrence on that line.
///
/// This searches by text, not by the offset the match came from: when the same
/// literal appears on an earlier line, that earlier line is reported.
///
/// Columns count chars. Returns `None` for an empty needle or when no line
/// contains it.
pub fn first_line_position(text: &str, needle: &str) -> Option<LinkPosition> {
    if needle.is_empty() {
        return None;
    }

    let (line, content) = text
        .split('\n')
        .enumerate()
        .find(|(_, content)| return content.contains(needle))?;
    let byte_start = content.find(needle)?;
    let col_start = content.get(..byte_start)?.chars().count();
    let col_end = col_start + needle.chars().count();

    return Some(LinkPosition { col_end, col_start, line });
}

/// Byte offset of a zero-based (line, column) pair, columns in chars.
/// Columns past the end of a line clamp to the line end; lines past the
/// end of the text give `None`.
pub fn offset_at(text: &str, line: usize, column: usize) -> Option<usize> {
    let mut line_start = 0;
    for (index, content) in text.split('\n').enumerate() {
        if index == line {
            let within = content
                .char_indices()
                .nth(column)
                .map_or(content.len(), |(byte, _)| return byte);
            return Some(line_start + within);
        }
        line_start += content.len() + 1;
    }
    return None;
}

/// Zero-based (line, column) of a byte offset, columns in chars.
/// Offsets inside a multi-byte char round down to its start.
pub fn line_column_of(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = text.get(..offset).unwrap_or("");
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| return i + 1);
    let column = before.get(line_start..).unwrap_or("").chars().count();
    return (line, column);
}
