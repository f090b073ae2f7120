//! Labels of the zip ode report schema the upstream model is asked to emit.

pub const STUDENT_NAME: &str = "STUDENT_NAME";
pub const SCHOOL_NAME: &str = "SCHOOL_NAME";
pub const ZIP_CODE: &str = "ZIP_CODE";
pub const POEM_TITLE: &str = "POEM_TITLE";
pub const POEM_THEME: &str = "POEM_THEME";
pub const POEM_LANGUAGE: &str = "POEM_LANGUAGE";
pub const OVERALL_OK: &str = "OVERALL_OK";
pub const TRANSCRIPTION: &str = "TRANSCRIPTION";
pub const EXPLANATION: &str = "ZIP_ODE_EXPLANATION";
pub const POEM: &str = "POEM";
pub const VALIDATION_TABLE: &str = "VALIDATION_TABLE";
pub const CONFIDENCE: &str = "Confidence";

pub const TRANSCRIPTION_STOPS: &[&str] = &[
    EXPLANATION,
    POEM,
    VALIDATION_TABLE,
    OVERALL_OK,
    POEM_TITLE,
    POEM_THEME,
    POEM_LANGUAGE,
    CONFIDENCE,
];

pub const EXPLANATION_STOPS: &[&str] = &[
    POEM,
    VALIDATION_TABLE,
    OVERALL_OK,
    POEM_TITLE,
    POEM_THEME,
    POEM_LANGUAGE,
    CONFIDENCE,
];

pub const POEM_STOPS: &[&str] = &[
    STUDENT_NAME,
    SCHOOL_NAME,
    ZIP_CODE,
    TRANSCRIPTION,
    EXPLANATION,
    VALIDATION_TABLE,
    OVERALL_OK,
    POEM_TITLE,
    POEM_THEME,
    POEM_LANGUAGE,
    CONFIDENCE,
];

pub const TABLE_STOPS: &[&str] = &[OVERALL_OK, POEM_TITLE, POEM_THEME, POEM_LANGUAGE, CONFIDENCE];
