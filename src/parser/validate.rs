use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::record::{ValidationRow, Validity};

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9'\x{2019}]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub rows: Vec<ValidationRow>,
    pub overall: Validity,
}

impl Validation {
    pub fn unknown() -> Self {
        Validation {
            rows: Vec::new(),
            overall: Validity::Unknown,
        }
    }
}

/// Runs of ASCII letters, digits and apostrophes (straight or curly).
pub fn word_count(line: &str) -> usize {
    WORD_RE.find_iter(line).count()
}

/// Checks poem lines against the digits of a postal code: line i must hold
/// exactly digit i words, and there must be one line per digit.
/// A postal code with any non-digit yields no rows and `Validity::Unknown`.
pub fn validate<S: AsRef<str>>(postal_code: &str, poem_lines: &[S]) -> Validation {
    if postal_code.is_empty() || !postal_code.bytes().all(|b| b.is_ascii_digit()) {
        return Validation::unknown();
    }

    let rows: Vec<ValidationRow> = postal_code
        .bytes()
        .enumerate()
        .map(|(i, digit)| {
            let expected = usize::from(digit - b'0');
            let text = poem_lines.get(i).map(|l| l.as_ref()).unwrap_or("");
            let actual = word_count(text);
            ValidationRow {
                line_number: i + 1,
                expected_word_count: expected,
                actual_word_count: actual,
                ok: actual == expected,
                text: text.to_string(),
            }
        })
        .collect();

    let overall = !rows.is_empty()
        && poem_lines.len() == rows.len()
        && rows.iter().all(|r| r.ok);

    Validation {
        rows,
        overall: Validity::from_bool(overall),
    }
}
