//! Instruction text handed to the transcription model for each mode. The
//! zip ode prompt pins down the schema `parser` expects.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const THEMES: &[&str] = &[
    "family",
    "nature",
    "friendship",
    "school",
    "emotions",
    "seasons",
    "miami",
];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingMode {
    /// Free-form transcription with trailing title/theme/language lines
    Poem,
    /// Labeled report with postal-code word-count validation
    #[default]
    ZipOde,
    /// Free-form transcription driven by user settings
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomPoemSettings {
    pub name: String,
    pub description: String,
    pub structure: String,
    pub document_contains: Vec<String>,
    pub prompt_template: String,
}

impl Default for CustomPoemSettings {
    fn default() -> Self {
        CustomPoemSettings {
            name: "Custom Poem".into(),
            description: "User-defined poem structure and content".into(),
            structure: "Free verse with custom requirements".into(),
            document_contains: vec![
                "Student name".into(),
                "School name".into(),
                "Poem text".into(),
            ],
            prompt_template: "Transcribe everything in this image including {document_contains}. \
                Preserve exact formatting, line breaks, and punctuation. \
                Use [?] for unclear words. At the end, add exactly these lines:\n\
                POEM_TITLE: [actual title]\n\
                POEM_THEME: [theme]\n\
                POEM_LANGUAGE: [language]\n\
                CUSTOM_STRUCTURE: {structure}\n\
                Confidence: X/10"
                .into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    custom_poem: Option<CustomPoemSettings>,
}

impl CustomPoemSettings {
    /// Reads `{"custom_poem": {...}}`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let file: SettingsFile = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.custom_poem.unwrap_or_default())
    }

    pub fn render(&self) -> String {
        self.prompt_template
            .replace("{document_contains}", &self.document_contains.join(", "))
            .replace("{structure}", &self.structure)
    }
}

pub fn prompt_for(mode: ProcessingMode, custom: &CustomPoemSettings) -> String {
    let themes = THEMES.join(", ");
    match mode {
        ProcessingMode::Poem => format!(
            "Transcribe everything in this image including student name, school name at the top, \
             and the complete poem below. Preserve exact formatting, line breaks, and punctuation. \
             Use [?] for unclear words. At the end, add exactly these 4 lines with no additional text:\n\
             POEM_TITLE: [actual title]\n\
             POEM_THEME: [one word: {themes}]\n\
             POEM_LANGUAGE: [language name]\n\
             Confidence: X/10"
        ),
        ProcessingMode::ZipOde => format!(
            "This image is a zip ode: a poem whose line count equals the number of digits in the \
             student's ZIP code, and whose line N has exactly as many words as digit N.\n\
             Reply using exactly this layout:\n\
             STUDENT_NAME: [name]\n\
             SCHOOL_NAME: [school]\n\
             ZIP_CODE: [digits only, or Unknown]\n\
             TRANSCRIPTION:\n\
             [everything on the page, preserving line breaks, [?] for unclear words]\n\
             ZIP_ODE_EXPLANATION: [one sentence]\n\
             POEM:\n\
             [one poem line per line, no blank lines]\n\
             VALIDATION_TABLE:\n\
             Line | ExpectedWords | ActualWords | OK(true/false) | LineText\n\
             OVERALL_OK: [True/False]\n\
             POEM_TITLE: [actual title]\n\
             POEM_THEME: [one word: {themes}]\n\
             POEM_LANGUAGE: [language name]\n\
             Confidence: X/10"
        ),
        ProcessingMode::Custom => custom.render(),
    }
}
