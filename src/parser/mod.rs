pub mod fields;
pub mod labels;
pub mod legacy;
pub mod naming;
pub mod reported;
pub mod validate;

use crate::record::{Field, StructuredRecord};
use fields::FieldExtractor;

/// Parses zip ode reports. Cloning shares the underlying pattern cache.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    fields: FieldExtractor,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractor(fields: FieldExtractor) -> Self {
        Parser { fields }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.fields
    }

    /// Fields → blocks → poem lines → validation. Never fails; missing
    /// pieces come back absent or empty.
    pub fn parse(&self, raw: &str) -> StructuredRecord {
        let fx = &self.fields;
        let field = |key: &str| Field::from_option(fx.field(raw, key));

        let postal_code = field(labels::ZIP_CODE);
        let poem_lines = poem_lines(
            &fx.block(raw, labels::POEM, labels::POEM_STOPS)
                .unwrap_or_default(),
        );
        let validation = match postal_code.get() {
            Some(code) => validate::validate(code, poem_lines.as_slice()),
            None => validate::Validation::unknown(),
        };

        StructuredRecord {
            student_name: field(labels::STUDENT_NAME),
            school_name: field(labels::SCHOOL_NAME),
            postal_code,
            poem_title: field(labels::POEM_TITLE),
            poem_theme: field(labels::POEM_THEME),
            poem_language: field(labels::POEM_LANGUAGE),
            transcription_block: fx
                .block(raw, labels::TRANSCRIPTION, labels::TRANSCRIPTION_STOPS)
                .unwrap_or_default(),
            explanation_block: fx
                .block(raw, labels::EXPLANATION, labels::EXPLANATION_STOPS)
                .unwrap_or_default(),
            poem_lines,
            validation_rows: validation.rows,
            overall_valid: validation.overall,
            reported: reported::reported(fx, raw),
            confidence: fx.confidence(raw),
        }
    }
}

/// Parse with a throwaway extractor.
pub fn parse(raw: &str) -> StructuredRecord {
    Parser::new().parse(raw)
}

fn poem_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{NameParts, Validity};

    const REPORT: &str = "STUDENT_NAME: John Doe
SCHOOL_NAME: Test School
ZIP_CODE: 12345
POEM_TITLE: My Poem
POEM_THEME: Nature
POEM_LANGUAGE: English
OVERALL_OK: True
TRANSCRIPTION:
This is a test poem.
ZIP_ODE_EXPLANATION: This is a test explanation.
POEM:
This is a test poem.
VALIDATION_TABLE:
Line | ExpectedWords | ActualWords | OK(true/false) | LineText
1 | 4 | 4 | true | This is a test poem.
OVERALL_OK: True
POEM_TITLE: My Poem
POEM_THEME: Nature
POEM_LANGUAGE: English
Confidence: 10/10
";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn schema_report() {
        let r = parse(REPORT);
        assert_eq!(r.student_name.get(), Some("John Doe"));
        assert_eq!(r.school_name.get(), Some("Test School"));
        assert_eq!(r.postal_code.get(), Some("12345"));
        assert_eq!(r.poem_title.get(), Some("My Poem"));
        assert_eq!(r.poem_theme.get(), Some("Nature"));
        assert_eq!(r.poem_language.get(), Some("English"));
        assert_eq!(r.transcription_block, "This is a test poem.");
        assert_eq!(r.explanation_block, "This is a test explanation.");
        assert_eq!(r.poem_lines, vec!["This is a test poem."]);
        assert_eq!(r.validation_rows.len(), 5);
        assert_eq!(r.overall_valid, Validity::Invalid);
        assert_eq!(r.reported.overall, Validity::Valid);
        assert_eq!(r.reported.rows.len(), 1);
        assert!(r.verdict_mismatch());
        assert_eq!(r.confidence.as_ref().map(|c| c.score), Some(10));
    }

    #[test]
    fn idempotent() {
        assert_eq!(parse(REPORT), parse(REPORT));
        let p = Parser::new();
        assert_eq!(p.parse(REPORT), p.parse(REPORT));
    }

    #[test]
    fn empty_input_gives_defaults() {
        let r = parse("");
        assert!(!r.student_name.is_present());
        assert_eq!(r.student_name.or_unknown(), "Unknown");
        assert_eq!(r.poem_title.or_empty(), "");
        assert!(r.transcription_block.is_empty());
        assert!(r.poem_lines.is_empty());
        assert!(r.validation_rows.is_empty());
        assert_eq!(r.overall_valid, Validity::Unknown);
        assert!(r.confidence.is_none());
    }

    #[test]
    fn placeholder_zip_skips_validation() {
        let r = parse("ZIP_CODE: 331XX\nPOEM:\none\ntwo words\n");
        assert_eq!(r.postal_code.get(), Some("331XX"));
        assert_eq!(r.poem_lines.len(), 2);
        assert!(r.validation_rows.is_empty());
        assert_eq!(r.overall_valid, Validity::Unknown);
    }

    #[test]
    fn poem_lines_drop_blanks_and_trailing_space() {
        let r = parse("POEM:\n  first line   \n\n   \nsecond\t\nPOEM_TITLE: t");
        assert_eq!(r.poem_lines, vec!["first line", "second"]);
    }

    #[test]
    fn reordered_labels_after_poem_end_the_block() {
        let r = parse(
            "POEM:\nWaves roll in\nSun\nZIP_CODE: 31\nSTUDENT_NAME: Ana\n\
             ZIP_ODE_EXPLANATION: three then one\nTRANSCRIPTION:\nWaves roll in\n",
        );
        assert_eq!(r.poem_lines, vec!["Waves roll in", "Sun"]);
        assert_eq!(r.student_name.get(), Some("Ana"));
        assert_eq!(r.overall_valid, Validity::Valid);
    }

    #[test]
    fn literal_unknown_is_kept_apart_from_missing() {
        let r = parse("STUDENT_NAME: Unknown\n");
        assert!(r.student_name.is_present());
        assert!(!r.school_name.is_present());
        assert_eq!(r.name_parts().student, "Unknown");
        assert_eq!(r.name_parts().school, "");
    }

    #[test]
    fn json_boundary_uses_display_defaults() {
        let v = serde_json::to_value(parse("POEM_TITLE: Sea")).unwrap();
        assert_eq!(v["student_name"], "Unknown");
        assert_eq!(v["postal_code"], "Unknown");
        assert_eq!(v["poem_title"], "Sea");
        assert_eq!(v["poem_theme"], "");
        assert_eq!(v["overall_valid"], "unknown");
    }

    #[test]
    fn valid_fixture() {
        let r = parse(&fixture("valid_zip_ode"));
        assert_eq!(r.student_name.get(), Some("Maria Gonzalez"));
        assert_eq!(r.school_name.get(), Some("Coral Reef Elementary"));
        assert_eq!(r.postal_code.get(), Some("33132"));
        assert_eq!(r.poem_lines.len(), 5);
        assert_eq!(r.overall_valid, Validity::Valid);
        assert!(r.validation_rows.iter().all(|row| row.ok));
        assert!(r.transcription_block.starts_with("Maria Gonzalez"));
        assert!(!r.transcription_block.contains("POEM:"));
        assert!(!r.verdict_mismatch());
    }

    #[test]
    fn chatty_fixture_with_lowercase_labels() {
        let r = parse(&fixture("chatty_model"));
        assert_eq!(r.student_name.get(), Some("Devon Park"));
        assert_eq!(r.school_name.get(), Some("Biscayne Gardens K-8"));
        assert_eq!(r.postal_code.get(), Some("33169"));
        assert_eq!(r.poem_title.get(), Some("Night Bus"));
        assert_eq!(r.poem_theme.get(), Some("miami"));
        assert_eq!(r.poem_lines.len(), 4);
        assert_eq!(r.overall_valid, Validity::Invalid);
        assert!(!r.validation_rows[3].ok);
        assert_eq!(r.validation_rows.len(), 5);
        assert_eq!(r.validation_rows[4].actual_word_count, 0);
    }

    #[test]
    fn fixture_filename() {
        let r = parse(&fixture("valid_zip_ode"));
        assert_eq!(
            naming::derive_filename(&r.name_parts(), "scan"),
            "Coral_Reef_Elementary_Maria_Gonzalez_Sea_Breeze_nature_33132"
        );
        let empty = parse("");
        assert_eq!(naming::derive_filename(&empty.name_parts(), "scan"), "scan");
        assert_eq!(empty.name_parts(), NameParts::default());
    }
}
