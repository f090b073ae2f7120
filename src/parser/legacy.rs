//! Free-form ("poem" mode) transcriptions: no labeled header, just the page
//! as written plus the trailing `POEM_*` and `Confidence:` lines.

use serde::Serialize;

use crate::record::{Confidence, Field, HeaderFields};

use super::fields::FieldExtractor;

const HEADER_LINES: usize = 5;
const MAX_NAME_WORDS: usize = 4;

/// Guesses student and school from the first lines of the page; title,
/// theme and language come from exact `POEM_*:` line prefixes, last one wins.
pub fn header_fields(text: &str) -> HeaderFields {
    let mut student: Option<String> = None;
    let mut school: Option<String> = None;

    for line in text.lines().take(HEADER_LINES) {
        let line = line.trim();
        if line.contains("School:") || line.to_lowercase().contains("school") {
            let value = match line.rsplit_once(':') {
                Some((_, after)) => after.trim(),
                None => line,
            };
            school = Some(value.replace("School", "").replace("school", "").trim().to_string());
        } else if !line.is_empty() && !line.starts_with("Grade") {
            if let Some((_, after)) = line.rsplit_once("Name:") {
                student = Some(after.trim().to_string());
            } else if student.is_none() && line.split_whitespace().count() <= MAX_NAME_WORDS {
                student = Some(line.to_string());
            }
        }
    }

    let mut title = None;
    let mut theme = None;
    let mut language = None;
    for line in text.lines() {
        if let Some(v) = line.strip_prefix("POEM_TITLE:") {
            title = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("POEM_THEME:") {
            theme = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("POEM_LANGUAGE:") {
            language = Some(v.to_string());
        }
    }

    HeaderFields {
        student_name: Field::from_option(student),
        school_name: Field::from_option(school),
        poem_title: Field::from_option(title),
        poem_theme: Field::from_option(theme),
        poem_language: Field::from_option(language),
    }
}

/// Drops every line starting with `Confidence:`.
pub fn strip_confidence(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.starts_with("Confidence:"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A poem-mode transcription ready for saving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub confidence: Option<Confidence>,
    #[serde(flatten)]
    pub header: HeaderFields,
}

impl Transcript {
    pub fn from_raw(fx: &FieldExtractor, raw: &str) -> Self {
        Transcript {
            text: strip_confidence(raw),
            confidence: fx.confidence(raw),
            header: header_fields(raw),
        }
    }
}
