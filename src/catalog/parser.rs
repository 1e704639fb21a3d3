//! Partition text parsing.
//!
//! Lines are located with `memchr` and decoded lossily with `bstr`, so a partition with a
//! stray invalid byte still yields every other record. Parsing never fails: short lines
//! produce empty fields and a zero rating.

use crate::catalog::layout::{Column, FieldLayout};
use crate::catalog::record::{compute_rating, ConferenceId, ExternalIds, PaperRecord};
use bstr::ByteSlice;

/// Token standing in for a literal comma inside title and abstract fields.
pub const ESCAPED_COMMA: &str = "##";

/// Field delimiter of partition lines.
pub const DELIMITER: char = ',';

/// Parse a whole partition, skipping the header line and blank lines.
pub fn parse_partition(
    text: &[u8],
    conference: &ConferenceId,
    layout: &FieldLayout,
) -> Vec<PaperRecord> {
    let text = text.trim();
    let mut records = Vec::new();
    let mut start = 0;
    let mut line_number = 0usize;

    loop {
        let end = memchr::memchr(b'\n', &text[start..])
            .map(|offset| start + offset)
            .unwrap_or(text.len());
        let line = &text[start..end];

        if line_number > 0 {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if !line.trim().is_empty() {
                records.push(parse_line(&line.to_str_lossy(), conference, layout));
            }
        }

        line_number += 1;
        if end >= text.len() {
            break;
        }
        start = end + 1;
    }

    records
}

/// Parse one data line positionally according to `layout`.
pub fn parse_line(line: &str, conference: &ConferenceId, layout: &FieldLayout) -> PaperRecord {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let field = |column: Column| {
        layout
            .position(column)
            .and_then(|index| fields.get(index).copied())
    };
    let non_empty = |column: Column| {
        field(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let id = field(Column::Id).unwrap_or_default().to_string();
    let title = decode_commas(field(Column::Title).unwrap_or_default());
    let abstract_text = decode_commas(field(Column::Abstract).unwrap_or_default());
    let rating = compute_rating(field(Column::RatingSum), field(Column::RatingCount));

    let openreview = if layout.id_is_openreview() {
        Some(id.trim().to_string()).filter(|value| !value.is_empty())
    } else {
        non_empty(Column::Openreview)
    };
    let external_ids = ExternalIds {
        arxiv: non_empty(Column::Arxiv),
        openreview,
    };

    PaperRecord::new(
        id,
        title,
        abstract_text,
        rating,
        conference.clone(),
        external_ids,
    )
}

/// Replace every escape token with a literal comma.
pub fn decode_commas(field: &str) -> String {
    field.replace(ESCAPED_COMMA, ",")
}
