use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::parser::naming::{clean_part, derive_filename};
use crate::parser::Parser;
use crate::record::{StructuredRecord, Validity};

const TRANSCRIPT_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    pub saved_as: String,
    pub record: StructuredRecord,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unknown: usize,
    pub mismatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub counts: BatchCounts,
    pub duplicate_names: Vec<String>,
    pub entries: Vec<BatchEntry>,
}

/// Transcript files directly inside `dir`, sorted by name.
pub fn list_transcripts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_transcript = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TRANSCRIPT_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if path.is_file() && is_transcript {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parses every transcript in `dir` in parallel through one shared parser.
/// Unreadable files are skipped with a warning.
pub fn process_dir(parser: &Parser, dir: &Path, fallback: &str) -> Result<BatchReport> {
    let files = list_transcripts(dir)?;
    info!("Found {} transcripts in {}", files.len(), dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let entries: Vec<BatchEntry> = files
        .par_iter()
        .filter_map(|path| {
            let entry = process_file(parser, path, fallback);
            pb.inc(1);
            entry
        })
        .collect();
    pb.finish_and_clear();

    let counts = count(&entries);
    let duplicate_names = duplicates(&entries);
    for name in &duplicate_names {
        warn!("Several transcripts map to {}", name);
    }
    info!(
        "Parsed {} transcripts ({} valid, {} invalid, {} unknown)",
        counts.total, counts.valid, counts.invalid, counts.unknown
    );

    Ok(BatchReport {
        counts,
        duplicate_names,
        entries,
    })
}

fn process_file(parser: &Parser, path: &Path, fallback: &str) -> Option<BatchEntry> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let stem = stem_or_fallback(path, fallback);

    let record = parser.parse(&raw);
    let saved_as = format!("{}.txt", derive_filename(&record.name_parts(), &stem));
    Some(BatchEntry {
        filename,
        saved_as,
        record,
        processed_at: Utc::now(),
    })
}

/// Name for a report with no usable fields: the cleaned file stem, or
/// `fallback` when nothing of the stem survives cleaning.
fn stem_or_fallback(path: &Path, fallback: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| clean_part(&s.to_string_lossy()))
        .unwrap_or_default();
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem
    }
}

fn count(entries: &[BatchEntry]) -> BatchCounts {
    let mut counts = BatchCounts {
        total: entries.len(),
        ..Default::default()
    };
    for e in entries {
        match e.record.overall_valid {
            Validity::Valid => counts.valid += 1,
            Validity::Invalid => counts.invalid += 1,
            Validity::Unknown => counts.unknown += 1,
        }
        if e.record.verdict_mismatch() {
            counts.mismatched += 1;
        }
    }
    counts
}

fn duplicates(entries: &[BatchEntry]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for e in entries {
        *seen.entry(e.saved_as.as_str()).or_default() += 1;
    }
    let mut dups: Vec<String> = seen
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    dups.sort();
    dups
}
