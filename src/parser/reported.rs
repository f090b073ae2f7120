use crate::record::{ReportedRow, ReportedValidation, Validity};

use super::fields::FieldExtractor;
use super::labels;

/// Reads the model's own verdict: `OVERALL_OK:` and the rows of its
/// `VALIDATION_TABLE` (`line | expected | actual | ok | text`).
pub fn reported(fx: &FieldExtractor, text: &str) -> ReportedValidation {
    let overall = fx
        .field(text, labels::OVERALL_OK)
        .map(|v| Validity::parse_flag(&v))
        .unwrap_or_default();

    let rows = fx
        .block(text, labels::VALIDATION_TABLE, labels::TABLE_STOPS)
        .map(|table| table.lines().filter_map(parse_row).collect())
        .unwrap_or_default();

    ReportedValidation { rows, overall }
}

fn parse_row(line: &str) -> Option<ReportedRow> {
    let line = line.trim().trim_start_matches('|').trim_end_matches('|');
    let mut cells = line.splitn(5, '|').map(str::trim);

    let line_number = cells.next()?.parse().ok()?;
    let expected_word_count = cells.next()?.parse().ok()?;
    let actual_word_count = cells.next()?.parse().ok()?;
    let ok = cells.next().map(Validity::parse_flag).unwrap_or_default();
    let text = cells.next().unwrap_or("").to_string();

    Some(ReportedRow {
        line_number,
        expected_word_count,
        actual_word_count,
        ok,
        text,
    })
}
