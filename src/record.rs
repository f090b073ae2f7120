use serde::{Serialize, Serializer};

const UNKNOWN: &str = "Unknown";

/// A single extracted text value. Absent means the label was missing or
/// its value was blank; a document that literally says "Unknown" is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field(Option<String>);

impl Field {
    pub fn absent() -> Self {
        Field(None)
    }

    /// Trims the value; blank input becomes absent.
    pub fn new(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Field(None)
        } else {
            Field(Some(trimmed.to_string()))
        }
    }

    pub fn from_option(value: Option<String>) -> Self {
        value.map(Field::new).unwrap_or_default()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn or_unknown(&self) -> &str {
        self.0.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn or_empty(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

fn unknown_if_absent<S: Serializer>(field: &Field, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(field.or_unknown())
}

fn empty_if_absent<S: Serializer>(field: &Field, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(field.or_empty())
}

/// Three-valued outcome of the zip ode check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Validity {
    #[serde(rename = "true")]
    Valid,
    #[serde(rename = "false")]
    Invalid,
    #[default]
    Unknown,
}

impl Validity {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }

    /// Lenient reading of a model-written flag (`True`, `false`, `yes`, ...).
    pub fn parse_flag(raw: &str) -> Self {
        match raw.trim().trim_end_matches('.').to_lowercase().as_str() {
            "true" | "yes" | "ok" | "valid" => Validity::Valid,
            "false" | "no" | "invalid" => Validity::Invalid,
            _ => Validity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Validity::Valid => "true",
            Validity::Invalid => "false",
            Validity::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRow {
    pub line_number: usize,
    pub expected_word_count: usize,
    pub actual_word_count: usize,
    pub ok: bool,
    pub text: String,
}

/// A row of the model's own VALIDATION_TABLE, as written by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedRow {
    pub line_number: usize,
    pub expected_word_count: usize,
    pub actual_word_count: usize,
    pub ok: Validity,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportedValidation {
    pub rows: Vec<ReportedRow>,
    pub overall: Validity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confidence {
    pub score: u32,
    pub scale: u32,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredRecord {
    #[serde(serialize_with = "unknown_if_absent")]
    pub student_name: Field,
    #[serde(serialize_with = "unknown_if_absent")]
    pub school_name: Field,
    #[serde(serialize_with = "unknown_if_absent")]
    pub postal_code: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub poem_title: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub poem_theme: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub poem_language: Field,
    pub transcription_block: String,
    pub explanation_block: String,
    pub poem_lines: Vec<String>,
    pub validation_rows: Vec<ValidationRow>,
    pub overall_valid: Validity,
    pub reported: ReportedValidation,
    pub confidence: Option<Confidence>,
}

impl StructuredRecord {
    pub fn name_parts(&self) -> NameParts<'_> {
        NameParts {
            school: self.school_name.or_empty(),
            student: self.student_name.or_empty(),
            title: self.poem_title.or_empty(),
            theme: self.poem_theme.or_empty(),
            postal_code: self.postal_code.or_empty(),
        }
    }

    /// True when the model's own verdict disagrees with the computed one.
    /// Unknown on either side never counts as a disagreement.
    pub fn verdict_mismatch(&self) -> bool {
        !matches!(self.overall_valid, Validity::Unknown)
            && !matches!(self.reported.overall, Validity::Unknown)
            && self.overall_valid != self.reported.overall
    }
}

/// Fields from a free-form (unlabeled) poem transcription.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderFields {
    #[serde(serialize_with = "empty_if_absent")]
    pub student_name: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub school_name: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub poem_title: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub poem_theme: Field,
    #[serde(serialize_with = "empty_if_absent")]
    pub poem_language: Field,
}

impl HeaderFields {
    pub fn name_parts(&self) -> NameParts<'_> {
        NameParts {
            school: self.school_name.or_empty(),
            student: self.student_name.or_empty(),
            title: self.poem_title.or_empty(),
            theme: self.poem_theme.or_empty(),
            postal_code: "",
        }
    }
}

/// Inputs to filename derivation, in output order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameParts<'a> {
    pub school: &'a str,
    pub student: &'a str,
    pub title: &'a str,
    pub theme: &'a str,
    pub postal_code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_is_absent() {
        assert!(!Field::new("   ").is_present());
        assert_eq!(Field::new("  Ana ").get(), Some("Ana"));
    }

    #[test]
    fn literal_unknown_is_present() {
        let f = Field::new("Unknown");
        assert!(f.is_present());
        assert_eq!(f.or_empty(), "Unknown");
        assert_eq!(Field::absent().or_empty(), "");
        assert_eq!(Field::absent().or_unknown(), "Unknown");
    }

    #[test]
    fn validity_flags() {
        assert_eq!(Validity::parse_flag("True"), Validity::Valid);
        assert_eq!(Validity::parse_flag(" false. "), Validity::Invalid);
        assert_eq!(Validity::parse_flag("maybe"), Validity::Unknown);
        assert_eq!(serde_json::to_string(&Validity::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(serde_json::to_string(&Validity::Valid).unwrap(), "\"true\"");
    }
}
