//! Parser and validator for zip ode transcription reports.

pub mod batch;
pub mod config;
pub mod parser;
pub mod prompt;
pub mod record;

pub use parser::naming::derive_filename;
pub use parser::validate::{validate, Validation};
pub use parser::{parse, Parser};
pub use record::{Field, NameParts, StructuredRecord, ValidationRow, Validity};
